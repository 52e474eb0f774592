use crate::GameAppData;
use crate::trades::{
    evaluate_trade_action, propose_trade_action, trade_block_action, update_trade_block_action,
};
use axum::Router;
use axum::routing::{get, post};

pub fn trade_routes() -> Router<GameAppData> {
    Router::new()
        .route("/api/trades/propose", post(propose_trade_action))
        .route("/api/trades/evaluate", post(evaluate_trade_action))
        .route("/api/trades/block", get(trade_block_action))
        .route("/api/trades/block/update", post(update_trade_block_action))
}
