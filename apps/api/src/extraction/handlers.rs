//! Axum route handlers for résumé parsing.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::pdf::extract_text_from_pdf;
use crate::extraction::profile::{extract_profile, ParsedResume};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/v1/parse-resume
///
/// Accepts a multipart upload with the PDF in the `file` field and returns
/// the structured profile. The response body can be sent back as `cv_data`.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResume>, AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Unavailable("Résumé parsing requires OPENROUTER_API_KEY".to_string())
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            upload = Some((file_name, bytes));
            break;
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError::Validation(format!("Multipart field '{FILE_FIELD}' is required"))
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let request_id = Uuid::new_v4();
    let span = info_span!("parse_resume", %request_id);
    async move {
        info!(
            "Parsing résumé {} ({} bytes)",
            file_name.as_deref().unwrap_or("<unnamed>"),
            bytes.len()
        );
        let text = extract_text_from_pdf(bytes).await?;
        let resume = extract_profile(&text, llm).await?;
        Ok::<_, AppError>(Json(resume))
    }
    .instrument(span)
    .await
}
