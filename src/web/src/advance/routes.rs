use crate::GameAppData;
use crate::advance::advance_action;
use axum::Router;
use axum::routing::post;

pub fn advance_routes() -> Router<GameAppData> {
    Router::new().route("/api/advance", post(advance_action))
}
