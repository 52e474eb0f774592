use crate::GameAppData;
use crate::league::{
    meta_action, reset_action, set_control_overrides_action, set_game_mode_action,
    set_strategy_action, set_user_team_action, standings_action,
};
use axum::Router;
use axum::routing::{get, post};

pub fn league_routes() -> Router<GameAppData> {
    Router::new()
        .route("/api/meta", get(meta_action))
        .route("/api/standings", get(standings_action))
        .route("/api/team", post(set_user_team_action))
        .route("/api/strategy", post(set_strategy_action))
        .route("/api/controls", post(set_control_overrides_action))
        .route("/api/game-mode", post(set_game_mode_action))
        .route("/api/reset", post(reset_action))
}
