use crate::GameAppData;
use crate::lines::{auto_lines_action, lines_action, set_lines_action};
use axum::Router;
use axum::routing::{get, post};

pub fn lines_routes() -> Router<GameAppData> {
    Router::new()
        .route("/api/lines", get(lines_action))
        .route("/api/lines/set", post(set_lines_action))
        .route("/api/lines/auto", post(auto_lines_action))
}
