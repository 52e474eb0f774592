use crate::GameAppData;
use crate::draft::{
    draft_state_action, make_draft_pick_action, set_draft_board_action, set_draft_focus_action,
    sim_to_user_pick_action,
};
use axum::Router;
use axum::routing::{get, post};

pub fn draft_routes() -> Router<GameAppData> {
    Router::new()
        .route("/api/draft/state", get(draft_state_action))
        .route("/api/draft/focus", post(set_draft_focus_action))
        .route("/api/draft/board", post(set_draft_board_action))
        .route("/api/draft/pick", post(make_draft_pick_action))
        .route("/api/draft/sim-to-pick", post(sim_to_user_pick_action))
}
