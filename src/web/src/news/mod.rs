pub mod routes;

pub use routes::news_routes;

use crate::{ApiResult, GameAppData};
use axum::Json;
use axum::extract::{Query, State};
use core::service::runtime::{DayResults, NewsItem};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    80
}

pub async fn news_action(
    State(state): State<GameAppData>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Json<Vec<NewsItem>>> {
    let service = state.service.lock().await;
    Ok(Json(service.news(query.limit)))
}

pub async fn results_action(State(state): State<GameAppData>) -> ApiResult<Json<Vec<DayResults>>> {
    let service = state.service.lock().await;
    Ok(Json(service.daily_results().to_vec()))
}
