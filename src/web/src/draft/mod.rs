pub mod routes;

pub use routes::draft_routes;

use crate::{ApiError, ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Query, State};
use core::league::needs::DraftFocus;
use core::league::offseason::DraftSessionPick;
use core::service::service::DraftStateView;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct TeamQuery {
    pub team: String,
}

pub async fn draft_state_action(
    State(state): State<GameAppData>,
    Query(query): Query<TeamQuery>,
) -> ApiResult<Json<DraftStateView>> {
    let service = state.service.lock().await;
    Ok(Json(service.draft_state(&query.team)?))
}

#[derive(Deserialize)]
pub struct DraftFocusSelection {
    pub team_name: String,
    pub focus: String,
}

pub async fn set_draft_focus_action(
    State(state): State<GameAppData>,
    Json(payload): Json<DraftFocusSelection>,
) -> ApiResult<Json<serde_json::Value>> {
    let focus: DraftFocus = payload.focus.parse().map_err(ApiError::bad_request)?;
    let mut service = state.service.lock().await;
    let focus = service.set_draft_focus(&payload.team_name, focus)?;
    Ok(Json(serde_json::json!({"ok": true, "focus": focus.as_str()})))
}

#[derive(Deserialize)]
pub struct DraftBoardSelection {
    pub team_name: String,
    #[serde(default)]
    pub prospect_ids: Vec<String>,
}

pub async fn set_draft_board_action(
    State(state): State<GameAppData>,
    Json(payload): Json<DraftBoardSelection>,
) -> ApiResult<Json<Vec<String>>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.set_draft_board(&payload.team_name, payload.prospect_ids)?))
}

#[derive(Deserialize)]
pub struct DraftPickSelection {
    pub team_name: String,
    pub prospect_id: String,
}

pub async fn make_draft_pick_action(
    State(state): State<GameAppData>,
    Json(payload): Json<DraftPickSelection>,
) -> ApiResult<Json<DraftSessionPick>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.make_draft_pick(&payload.team_name, &payload.prospect_id)?))
}

#[derive(Deserialize)]
pub struct DraftAdvanceSelection {
    pub team_name: String,
}

pub async fn sim_to_user_pick_action(
    State(state): State<GameAppData>,
    Json(payload): Json<DraftAdvanceSelection>,
) -> ApiResult<Json<DraftStateView>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.sim_draft_to_user_pick(&payload.team_name)?))
}
