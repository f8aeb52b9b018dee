//! Wire types and paths for the composer backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACCOUNT_NAMES_PATH: &str = "/api/account-names";
pub const PERSONALIZE_PATH: &str = "/api/personalize";
pub const FETCH_URL_PATH: &str = "/fetch-url/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizeRequest {
    pub client: String,
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeResponse {
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub original_texts: Vec<String>,
    #[serde(default)]
    pub personalized_content: Vec<String>,
}

/// Why a backend call produced no usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub fn decode_account_names(body: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(body)
}
