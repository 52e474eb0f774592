pub mod routes;

pub use routes::league_routes;

use crate::{ApiError, ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Query, State};
use core::club::coach::CoachStyle;
use core::service::runtime::GameMode;
use core::service::service::{MetaView, StandingsView};
use serde::Deserialize;

pub async fn meta_action(State(state): State<GameAppData>) -> ApiResult<Json<MetaView>> {
    let service = state.service.lock().await;
    Ok(Json(service.meta()))
}

#[derive(Deserialize)]
pub struct StandingsQuery {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub value: Option<String>,
}

pub async fn standings_action(
    State(state): State<GameAppData>,
    Query(query): Query<StandingsQuery>,
) -> ApiResult<Json<StandingsView>> {
    let service = state.service.lock().await;
    let mode = if query.mode.is_empty() { "league" } else { &query.mode };
    let view = service.standings(mode, query.value.as_deref())?;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct TeamSelection {
    pub team_name: String,
}

pub async fn set_user_team_action(
    State(state): State<GameAppData>,
    Json(payload): Json<TeamSelection>,
) -> ApiResult<Json<MetaView>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.set_user_team(&payload.team_name)?))
}

#[derive(Deserialize)]
pub struct StrategySelection {
    pub strategy: String,
    #[serde(default)]
    pub override_coach_for_strategy: Option<bool>,
}

pub async fn set_strategy_action(
    State(state): State<GameAppData>,
    Json(payload): Json<StrategySelection>,
) -> ApiResult<Json<MetaView>> {
    let strategy: CoachStyle = payload
        .strategy
        .parse()
        .map_err(ApiError::bad_request)?;
    let mut service = state.service.lock().await;
    Ok(Json(service.set_strategy(strategy, payload.override_coach_for_strategy)?))
}

#[derive(Deserialize)]
pub struct ControlOverrideSelection {
    pub override_coach_for_lines: bool,
    pub override_coach_for_strategy: bool,
    #[serde(default)]
    pub auto_injury_moves: Option<bool>,
}

pub async fn set_control_overrides_action(
    State(state): State<GameAppData>,
    Json(payload): Json<ControlOverrideSelection>,
) -> ApiResult<Json<MetaView>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.set_control_overrides(
        payload.override_coach_for_lines,
        payload.override_coach_for_strategy,
        payload.auto_injury_moves,
    )))
}

#[derive(Deserialize)]
pub struct GameModeSelection {
    pub mode: GameMode,
}

pub async fn set_game_mode_action(
    State(state): State<GameAppData>,
    Json(payload): Json<GameModeSelection>,
) -> ApiResult<Json<MetaView>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.set_game_mode(payload.mode)))
}

pub async fn reset_action(State(state): State<GameAppData>) -> ApiResult<Json<MetaView>> {
    let mut service = state.service.lock().await;
    Ok(Json(service.reset()?))
}
