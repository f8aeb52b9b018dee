use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/account-names
///
/// Returns every target account name as a flat JSON array of strings.
pub async fn handle_account_names(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let names = state.accounts.account_names().await?;
    info!("Serving {} account names", names.len());
    Ok(Json(names))
}
