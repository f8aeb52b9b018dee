use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_STATIC_DIR: &str = "apps/web/static";

/// Where the target-account database lives.
/// `DATABASE_URL` wins; otherwise the discrete `DB_*` variables are required.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub static_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let database = match lookup("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: require("DB_HOST")?,
                port: parse_port(lookup("DB_PORT"), 5432).context("DB_PORT must be a valid port number")?,
                user: require("DB_USER")?,
                password: require("DB_PASSWORD")?,
                database: require("DB_DATABASE")?,
            },
        };

        Ok(Config {
            database,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            port: parse_port(lookup("PORT"), 8080).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_port(raw: Option<String>, default: u16) -> Result<u16> {
    match raw {
        Some(value) => Ok(value.trim().parse::<u16>()?),
        None => Ok(default),
    }
}
