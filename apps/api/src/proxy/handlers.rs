use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchUrlQuery {
    pub url: Option<String>,
}

/// GET /fetch-url/?url=<encoded URL>
pub async fn handle_fetch_url(
    State(state): State<AppState>,
    Query(params): Query<FetchUrlQuery>,
) -> Result<Html<String>, AppError> {
    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'url' query parameter".to_string()))?;

    let html = state.fetcher.fetch(&url).await?;
    Ok(Html(html))
}
