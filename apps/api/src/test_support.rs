//! In-memory stand-ins for the database and model, shared by handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::accounts::directory::{account_names_from_records, AccountDirectory};
use crate::config::{Config, DatabaseConfig};
use crate::errors::AppError;
use crate::llm_client::{ChatModel, LlmError};
use crate::proxy::fetcher::PageFetcher;
use crate::state::AppState;

/// Chat model returning a canned reply (or API error) and counting calls.
pub struct ScriptedModel {
    reply: Result<String, (u16, String)>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            reply: Err((status, message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Account directory backed by fixture `data` records.
pub struct FixtureDirectory {
    records: Option<Vec<Value>>,
}

impl FixtureDirectory {
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            records: Some(records),
        }
    }

    pub fn unavailable() -> Self {
        Self { records: None }
    }
}

#[async_trait]
impl AccountDirectory for FixtureDirectory {
    async fn account_names(&self) -> Result<Vec<String>, AppError> {
        match &self.records {
            Some(records) => Ok(account_names_from_records(records)),
            None => Err(AppError::Database(sqlx::Error::PoolTimedOut)),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database: DatabaseConfig::Url("postgres://localhost/addb_test".to_string()),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://127.0.0.1:9/v1".to_string(),
        static_dir: "static".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(accounts: Arc<dyn AccountDirectory>, llm: Arc<dyn ChatModel>) -> AppState {
    AppState {
        accounts,
        llm,
        fetcher: PageFetcher::new().expect("fetcher builds"),
        config: test_config(),
    }
}
