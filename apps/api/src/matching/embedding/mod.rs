//! Embedding Provider: turns batches of normalized strings into dense vectors.
//!
//! The provider is built once at startup (`build_embedder`) and shared by every
//! request as an `Arc<dyn EmbeddingProvider>`. A provider that cannot be built
//! stops the process before the listener is bound.
//!
//! Backends:
//! - `HashedEmbedder`: local feature hashing, deterministic, no model download.
//! - `RemoteEmbedder`: OpenAI-compatible `/embeddings` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{EmbeddingBackend, EmbeddingSettings};

mod hashed;
mod remote;

pub use hashed::HashedEmbedder;
pub use remote::RemoteEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    Decode(String),

    #[error("Embedding batch size mismatch: sent {expected}, received {actual}")]
    BatchSize { expected: usize, actual: usize },

    #[error("Embedding dimension mismatch: expected {expected}, received {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Embedding provider failed to initialize: {0}")]
    Init(String),
}

/// A batch text embedder plus the similarity function used to compare its vectors.
///
/// Implementations must return exactly one vector per input, in input order.
/// They are shared read-only across concurrent requests.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short backend label, reported by `/health`.
    fn name(&self) -> &'static str;

    fn dimension(&self) -> usize;

    /// Whether vectors capture meaning rather than spelling.
    /// A lexical backend scores "JS" and "JavaScript" near 0.
    fn semantic(&self) -> bool {
        true
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }
}

/// Cosine similarity in [-1, 1]. Zero-length or zero-norm vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Builds the process-wide provider selected by configuration.
///
/// For the remote backend this performs a probe request, so a bad key or an
/// unreachable endpoint is reported here rather than on the first match.
pub async fn build_embedder(
    settings: &EmbeddingSettings,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    let provider: Arc<dyn EmbeddingProvider> = match settings.backend {
        EmbeddingBackend::Hashed => Arc::new(HashedEmbedder::default()),
        EmbeddingBackend::Remote => {
            let api_key = settings.api_key.clone().ok_or_else(|| {
                EmbeddingError::Init("EMBEDDING_API_KEY is required for the remote backend".into())
            })?;
            Arc::new(RemoteEmbedder::connect(&settings.api_url, api_key, &settings.model).await?)
        }
    };

    info!(
        "Embedding provider ready: backend={} dimension={}",
        provider.name(),
        provider.dimension()
    );
    if !provider.semantic() {
        warn!(
            "Backend '{}' compares spelling, not meaning; set EMBEDDING_BACKEND=remote for semantic matching",
            provider.name()
        );
    }
    Ok(provider)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_is_minus_one() {
        let s = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((s + 1.0).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_build_hashed_backend() {
        let settings = EmbeddingSettings {
            backend: EmbeddingBackend::Hashed,
            api_url: String::new(),
            api_key: None,
            model: String::new(),
        };
        let provider = build_embedder(&settings).await.unwrap();
        assert_eq!(provider.name(), "hashed");
        assert!(!provider.semantic());
    }

    #[tokio::test]
    async fn test_build_remote_without_key_fails_at_init() {
        let settings = EmbeddingSettings {
            backend: EmbeddingBackend::Remote,
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            model: "m".to_string(),
        };
        let err = build_embedder(&settings).await.err().unwrap();
        assert!(matches!(err, EmbeddingError::Init(_)));
    }
}
