//! LLM-backed résumé extraction: plain text → `ParsedResume`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::extraction::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};
use crate::extraction::ExtractionError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::matching::models::{lenient, Certification};

/// Structured résumé as returned by the extraction model.
///
/// Serializes with the same camelCase keys the Match API reads, so the body
/// can be posted back as `cv_data` unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub experience_level: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::certifications")]
    pub certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "lenient::values")]
    pub education: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values")]
    pub work_experience: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values")]
    pub awards: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::values")]
    pub projects: Vec<Value>,
}

/// Sends résumé text to the LLM and decodes the structured profile.
pub async fn extract_profile(text: &str, llm: &LlmClient) -> Result<ParsedResume, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }

    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", text);
    let system = format!("{RESUME_PARSE_SYSTEM} {JSON_ONLY_INSTRUCTION}");

    let resume: ParsedResume = llm.call_json(&prompt, &system).await?;

    info!(
        "Extracted résumé via {}: {} skills, {} certifications, level '{}'",
        llm.model(),
        resume.skills.len(),
        resume.certifications.len(),
        resume.experience_level
    );
    Ok(resume)
}
