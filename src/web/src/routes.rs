use crate::GameAppData;
use crate::advance::advance_routes;
use crate::common::default_handler::default_handler;
use crate::draft::draft_routes;
use crate::league::league_routes;
use crate::lines::lines_routes;
use crate::news::news_routes;
use crate::roster::roster_routes;
use crate::trades::trade_routes;
use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({"status": "ok"}))
}

pub struct ServerRoutes;

impl ServerRoutes {
    pub fn create() -> Router<GameAppData> {
        Router::<GameAppData>::new()
            .route("/api/health", get(health))
            .merge(league_routes())
            .merge(advance_routes())
            .merge(roster_routes())
            .merge(lines_routes())
            .merge(trade_routes())
            .merge(draft_routes())
            .merge(news_routes())
            .fallback(default_handler)
    }
}
