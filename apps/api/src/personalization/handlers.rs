//! Axum route handlers for the Personalization API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::warn;

use crate::errors::AppError;
use crate::personalization::personalizer::{personalize, PersonalizeRequest, PersonalizeResponse};
use crate::state::AppState;

/// POST /api/personalize
///
/// Rewrites every text in the request for the named client with a single
/// model call. Malformed bodies are reported as 400 `Invalid input`.
pub async fn handle_personalize(
    State(state): State<AppState>,
    payload: Result<Json<PersonalizeRequest>, JsonRejection>,
) -> Result<Json<PersonalizeResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected personalization body: {rejection}");
        AppError::Validation("Invalid input".to_string())
    })?;

    let validated = request.validate()?;
    let response = personalize(state.llm.as_ref(), validated).await?;

    Ok(Json(response))
}
