pub mod routes;

pub use routes::roster_routes;

use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Query, State};
use core::club::player::Player;
use core::league::league::SigningOutcome;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct SkaterRow {
    pub team: String,
    pub player: String,
    pub position: String,
    pub age: u8,
    pub jersey: Option<u8>,
    pub gp: u32,
    pub g: u32,
    pub a: u32,
    pub p: u32,
    pub injury_status: String,
    pub games_out: u32,
}

#[derive(Serialize)]
pub struct GoalieStatRow {
    pub team: String,
    pub goalie: String,
    pub age: u8,
    pub gp: u32,
    pub w: u32,
    pub l: u32,
    pub otl: u32,
    pub so: u32,
    pub sv_pct: f32,
    pub gaa: f32,
}

fn skater_row(player: &Player) -> SkaterRow {
    SkaterRow {
        team: player.team_name.clone(),
        player: player.name.clone(),
        position: player.position.as_str().to_string(),
        age: player.age,
        jersey: player.jersey_number,
        gp: player.season.games_played,
        g: player.season.goals,
        a: player.season.assists,
        p: player.points(),
        injury_status: format!("{:?}", player.health.injury_status),
        games_out: player.health.injured_games_remaining,
    }
}

fn goalie_row(player: &Player) -> GoalieStatRow {
    GoalieStatRow {
        team: player.team_name.clone(),
        goalie: player.name.clone(),
        age: player.age,
        gp: player.season.goalie_games,
        w: player.season.goalie_wins,
        l: player.season.goalie_losses,
        otl: player.season.goalie_ot_losses,
        so: player.season.goalie_shutouts,
        sv_pct: (player.save_pct() * 1000.0).round() / 1000.0,
        gaa: (player.gaa() * 100.0).round() / 100.0,
    }
}

#[derive(Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub team: Option<String>,
}

pub async fn players_action(
    State(state): State<GameAppData>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<SkaterRow>>> {
    let service = state.service.lock().await;
    let rows = service
        .sim
        .get_player_stats(query.team.as_deref())
        .into_iter()
        .filter(|p| !p.position.is_goalie())
        .map(skater_row)
        .collect();
    Ok(Json(rows))
}

pub async fn goalies_action(
    State(state): State<GameAppData>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<GoalieStatRow>>> {
    let service = state.service.lock().await;
    let rows = service
        .sim
        .get_goalie_stats(query.team.as_deref())
        .into_iter()
        .map(goalie_row)
        .collect();
    Ok(Json(rows))
}

pub async fn free_agents_action(
    State(state): State<GameAppData>,
) -> ApiResult<Json<Vec<SkaterRow>>> {
    let service = state.service.lock().await;
    let rows = service
        .sim
        .get_free_agents()
        .into_iter()
        .map(skater_row)
        .collect();
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct CallupSelection {
    pub team_name: String,
    pub player_name: String,
}

pub async fn promote_action(
    State(state): State<GameAppData>,
    Json(payload): Json<CallupSelection>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut service = state.service.lock().await;
    service.promote_minor_player(&payload.team_name, &payload.player_name)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

pub async fn demote_action(
    State(state): State<GameAppData>,
    Json(payload): Json<CallupSelection>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut service = state.service.lock().await;
    service.demote_roster_player(&payload.team_name, &payload.player_name)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

#[derive(Deserialize)]
pub struct ContractSelection {
    pub team_name: String,
    pub player_name: String,
    #[serde(default)]
    pub years: Option<u32>,
    #[serde(default)]
    pub cap_hit: Option<f64>,
}

pub async fn sign_free_agent_action(
    State(state): State<GameAppData>,
    Json(payload): Json<ContractSelection>,
) -> ApiResult<Json<SigningOutcome>> {
    let mut service = state.service.lock().await;
    let outcome = service.sign_free_agent(
        &payload.team_name,
        &payload.player_name,
        payload.years,
        payload.cap_hit,
    )?;
    Ok(Json(outcome))
}

pub async fn extend_contract_action(
    State(state): State<GameAppData>,
    Json(payload): Json<ContractSelection>,
) -> ApiResult<Json<SigningOutcome>> {
    let mut service = state.service.lock().await;
    let outcome = service.extend_contract(
        &payload.team_name,
        &payload.player_name,
        payload.years,
        payload.cap_hit,
    )?;
    Ok(Json(outcome))
}
