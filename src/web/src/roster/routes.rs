use crate::GameAppData;
use crate::roster::{
    demote_action, extend_contract_action, free_agents_action, goalies_action, players_action,
    promote_action, sign_free_agent_action,
};
use axum::Router;
use axum::routing::{get, post};

pub fn roster_routes() -> Router<GameAppData> {
    Router::new()
        .route("/api/players", get(players_action))
        .route("/api/goalies", get(goalies_action))
        .route("/api/free-agents", get(free_agents_action))
        .route("/api/callups/promote", post(promote_action))
        .route("/api/callups/demote", post(demote_action))
        .route("/api/free-agents/sign", post(sign_free_agent_action))
        .route("/api/contracts/extend", post(extend_contract_action))
}
