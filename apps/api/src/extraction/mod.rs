// Résumé extraction: PDF bytes → plain text → structured profile via the LLM.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod pdf;
pub mod profile;
pub mod prompts;

use thiserror::Error;

use crate::errors::AppError;
use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be read: {0}")]
    Pdf(String),

    #[error("No text could be extracted from the document")]
    EmptyText,

    #[error("PDF extraction task failed: {0}")]
    Task(String),

    #[error("Profile extraction failed: {0}")]
    Llm(#[from] LlmError),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Pdf(_) | ExtractionError::EmptyText => {
                AppError::UnprocessableEntity(err.to_string())
            }
            ExtractionError::Task(msg) => {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {msg}"))
            }
            ExtractionError::Llm(e) => AppError::Llm(e.to_string()),
        }
    }
}
