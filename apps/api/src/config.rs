use anyhow::{bail, Context, Result};

use crate::matching::skills::DEFAULT_MATCH_THRESHOLD;

const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_LLM_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "openai/gpt-3.5-turbo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Hashed,
    Remote,
}

impl EmbeddingBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hashed" => Ok(EmbeddingBackend::Hashed),
            "remote" => Ok(EmbeddingBackend::Remote),
            other => bail!("EMBEDDING_BACKEND must be 'hashed' or 'remote', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    /// Without a key the résumé parsing endpoint answers 503.
    pub api_key: Option<String>,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub match_threshold: f32,
    pub embedding: EmbeddingSettings,
    pub llm: LlmSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let match_threshold = match get("MATCH_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .context("MATCH_THRESHOLD must be a number")?,
            None => DEFAULT_MATCH_THRESHOLD,
        };
        if !(0.0..=1.0).contains(&match_threshold) {
            bail!("MATCH_THRESHOLD must be within [0, 1], got {match_threshold}");
        }

        let backend = match get("EMBEDDING_BACKEND") {
            Some(raw) => EmbeddingBackend::parse(&raw)?,
            None => EmbeddingBackend::Hashed,
        };
        let embedding = EmbeddingSettings {
            backend,
            api_url: get("EMBEDDING_API_URL").unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string()),
            api_key: get("EMBEDDING_API_KEY"),
            model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        };
        if embedding.backend == EmbeddingBackend::Remote && embedding.api_key.is_none() {
            bail!("Required environment variable 'EMBEDDING_API_KEY' is not set (EMBEDDING_BACKEND=remote)");
        }

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            match_threshold,
            embedding,
            llm: LlmSettings {
                api_url: get("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
                api_key: get("OPENROUTER_API_KEY"),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            },
        })
    }
}
