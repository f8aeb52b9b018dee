use std::sync::Arc;

use crate::accounts::directory::AccountDirectory;
use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::proxy::fetcher::PageFetcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Source of target account names. Default: PgAccountDirectory.
    pub accounts: Arc<dyn AccountDirectory>,
    /// Chat model used for personalization. Default: LlmClient.
    pub llm: Arc<dyn ChatModel>,
    pub fetcher: PageFetcher,
    pub config: Config,
}
