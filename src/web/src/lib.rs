mod advance;
mod common;
mod draft;
mod error;
mod league;
mod lines;
mod news;
mod roster;
mod routes;
mod trades;

pub use error::{ApiError, ApiResult};

use crate::routes::ServerRoutes;
use axum::response::IntoResponse;
use core::service::service::SimService;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

pub struct HockeySimulatorServer {
    data: GameAppData,
}

impl HockeySimulatorServer {
    pub fn new(data: GameAppData) -> Self {
        HockeySimulatorServer { data }
    }

    pub async fn run(&self) {
        let app = ServerRoutes::create()
            .layer(
                ServiceBuilder::new()
                    // Convert handler panics into 500s instead of killing the process.
                    .layer(CatchPanicLayer::custom(|_err| {
                        (
                            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal server error - handler panicked".to_string(),
                        )
                            .into_response()
                    })),
            )
            .with_state(self.data.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], 18000));

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to address {}: {}", addr, e);
                panic!("Cannot start server without binding to port");
            }
        };

        info!("listen at: http://localhost:18000");

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    }
}

/// All mutation flows through one exclusive async mutex: at most one
/// request is actively mutating the world at any instant, and read-only
/// projections take the same lock so they never observe a partial write.
pub struct GameAppData {
    pub service: Arc<Mutex<SimService>>,
}

impl Clone for GameAppData {
    fn clone(&self) -> Self {
        GameAppData {
            service: Arc::clone(&self.service),
        }
    }
}
