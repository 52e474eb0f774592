pub mod routes;

pub use routes::advance_routes;

use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::State;
use core::service::service::AdvanceOutcome;

/// Simulates exactly one game day, one playoff reveal day, or runs the
/// full offseason, depending on where the calendar stands.
pub async fn advance_action(State(state): State<GameAppData>) -> ApiResult<Json<AdvanceOutcome>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.advance()?))
}
