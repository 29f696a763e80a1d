use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::aggregate::ProfileMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the process-wide embedding provider, built once at startup.
    pub matcher: ProfileMatcher,
    /// `None` when no LLM key is configured; résumé parsing is then unavailable.
    pub llm: Option<LlmClient>,
}
