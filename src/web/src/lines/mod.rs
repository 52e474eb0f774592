pub mod routes;

pub use routes::lines_routes;

use crate::{ApiError, ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Deserialize)]
pub struct LinesQuery {
    #[serde(default)]
    pub team: Option<String>,
}

#[derive(Serialize)]
pub struct LinesView {
    pub team: String,
    pub assignments: BTreeMap<String, String>,
    pub starting_goalie: Option<String>,
    pub position_penalty: f32,
}

pub async fn lines_action(
    State(state): State<GameAppData>,
    Query(query): Query<LinesQuery>,
) -> ApiResult<Json<LinesView>> {
    let service = state.service.lock().await;
    let team_name = query
        .team
        .unwrap_or_else(|| service.runtime.user_team_name.clone());
    let team = service
        .sim
        .get_team(&team_name)
        .ok_or_else(|| ApiError::from(core::shared::error::SimError::TeamNotFound(team_name.clone())))?;
    Ok(Json(LinesView {
        team: team.name.clone(),
        assignments: team.line_assignments.clone(),
        starting_goalie: team.starting_goalie_name.clone(),
        position_penalty: team.lineup_position_penalty(),
    }))
}

#[derive(Deserialize)]
pub struct LinesSelection {
    pub team_name: String,
    #[serde(default)]
    pub assignments: BTreeMap<String, String>,
}

pub async fn set_lines_action(
    State(state): State<GameAppData>,
    Json(payload): Json<LinesSelection>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut service = state.service.lock().await;
    let penalty = service.set_lines(&payload.team_name, &payload.assignments)?;
    Ok(Json(serde_json::json!({"ok": true, "position_penalty": penalty})))
}

#[derive(Deserialize)]
pub struct AutoLinesSelection {
    pub team_name: String,
}

pub async fn auto_lines_action(
    State(state): State<GameAppData>,
    Json(payload): Json<AutoLinesSelection>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut service = state.service.lock().await;
    let penalty = service.auto_set_best_lines(&payload.team_name)?;
    Ok(Json(serde_json::json!({"ok": true, "position_penalty": penalty})))
}
