use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database: &DatabaseConfig) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let options = match database {
        DatabaseConfig::Url(url) => url.parse::<PgConnectOptions>()?,
        DatabaseConfig::Parts {
            host,
            port,
            user,
            password,
            database,
        } => PgConnectOptions::new()
            .host(host)
            .port(*port)
            .username(user)
            .password(password)
            .database(database),
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}
