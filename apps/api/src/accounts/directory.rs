//! Account directory: pluggable source of target account names.
//!
//! Default: `PgAccountDirectory`, reading the `target_accounts` table.
//! `AppState` holds an `Arc<dyn AccountDirectory>`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Key inside an account record that holds metadata rather than an account.
pub const RESERVED_META_KEY: &str = "meta";

const SELECT_ACCOUNT_RECORDS: &str = "SELECT data FROM target_accounts";

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn account_names(&self) -> Result<Vec<String>, AppError>;
}

/// Reads account records from PostgreSQL.
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn account_names(&self) -> Result<Vec<String>, AppError> {
        let records: Vec<Value> = sqlx::query_scalar(SELECT_ACCOUNT_RECORDS)
            .fetch_all(&self.pool)
            .await?;

        let names = account_names_from_records(&records);
        debug!(
            "Loaded {} account names from {} records",
            names.len(),
            records.len()
        );
        Ok(names)
    }
}

/// Flattens account records into a list of names, skipping the reserved key.
///
/// Records are visited in row order and keys in the record's own order.
/// A record whose `data` is not a JSON object contributes nothing.
pub fn account_names_from_records(records: &[Value]) -> Vec<String> {
    let mut names = Vec::new();
    for record in records {
        let Some(object) = record.as_object() else {
            warn!("Skipping target account record that is not a JSON object");
            continue;
        };
        names.extend(
            object
                .keys()
                .filter(|key| key.as_str() != RESERVED_META_KEY)
                .cloned(),
        );
    }
    names
}
