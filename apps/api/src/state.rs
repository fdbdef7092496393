use std::sync::Arc;

use crate::analysis::input::PageFetcher;
use crate::auth::jwt::TokenService;
use crate::config::Config;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Remote text model. Default: `LlmClient`; tests swap in a stub.
    pub model: Arc<dyn TextModel>,
    pub fetcher: PageFetcher,
    /// `None` when JWT_SECRET / AUTH_USERNAME / AUTH_PASSWORD are not all set.
    pub tokens: Option<Arc<TokenService>>,
}

impl AppState {
    pub fn new(config: Config, model: Arc<dyn TextModel>, fetcher: PageFetcher) -> Self {
        let tokens = config
            .jwt_secret
            .as_deref()
            .filter(|_| config.issuer_configured())
            .map(|secret| Arc::new(TokenService::new(secret, config.token_ttl_hours)));

        Self {
            config: Arc::new(config),
            model,
            fetcher,
            tokens,
        }
    }
}
