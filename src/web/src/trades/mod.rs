pub mod routes;

pub use routes::trade_routes;

use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Query, State};
use core::service::service::{TradeBlockUpdate, TradeOutcome};
use core::trades::TradeInsight;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct TradeProposalSelection {
    pub team_name: String,
    pub partner_team: String,
    pub give_player: String,
    pub receive_player: String,
}

pub async fn propose_trade_action(
    State(state): State<GameAppData>,
    Json(payload): Json<TradeProposalSelection>,
) -> ApiResult<Json<TradeOutcome>> {
    let mut service = state.service.lock().await;
    let outcome = service.propose_trade(
        &payload.team_name,
        &payload.partner_team,
        &payload.give_player,
        &payload.receive_player,
    )?;
    Ok(Json(outcome))
}

pub async fn evaluate_trade_action(
    State(state): State<GameAppData>,
    Json(payload): Json<TradeProposalSelection>,
) -> ApiResult<Json<TradeInsight>> {
    let service = state.service.lock().await;
    let insight = service.evaluate_trade(
        &payload.team_name,
        &payload.partner_team,
        &payload.give_player,
        &payload.receive_player,
    )?;
    Ok(Json(insight))
}

#[derive(Deserialize)]
pub struct TradeBlockQuery {
    pub team: String,
}

pub async fn trade_block_action(
    State(state): State<GameAppData>,
    Query(query): Query<TradeBlockQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let service = state.service.lock().await;
    Ok(Json(service.trade_block(&query.team)?))
}

#[derive(Deserialize)]
pub struct TradeBlockSelection {
    pub team_name: String,
    pub player_name: String,
    #[serde(default = "default_action")]
    pub action: String,
}

fn default_action() -> String {
    String::from("toggle")
}

pub async fn update_trade_block_action(
    State(state): State<GameAppData>,
    Json(payload): Json<TradeBlockSelection>,
) -> ApiResult<Json<Vec<String>>> {
    let mut service = state.service.lock().await;
    let update = TradeBlockUpdate {
        player_name: payload.player_name,
        action: payload.action,
    };
    Ok(Json(service.update_trade_block(&payload.team_name, &update)?))
}
