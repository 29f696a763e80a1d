use bytes::Bytes;
use tracing::debug;

use crate::extraction::ExtractionError;

/// Extracts the text layer of a PDF on the blocking pool.
/// Whitespace-only output (e.g. a scanned image) is `EmptyText`.
pub async fn extract_text_from_pdf(bytes: Bytes) -> Result<String, ExtractionError> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }

    debug!("Extracted {} chars of text from a {size}-byte PDF", text.len());
    Ok(text)
}
