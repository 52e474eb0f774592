use crate::GameAppData;
use crate::news::{news_action, results_action};
use axum::Router;
use axum::routing::get;

pub fn news_routes() -> Router<GameAppData> {
    Router::new()
        .route("/api/news", get(news_action))
        .route("/api/results", get(results_action))
}
