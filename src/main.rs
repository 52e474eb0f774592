use hockey_core::league::league::SimulatorSettings;
use hockey_core::utils::TimeEstimation;
use database::DatabaseLoader;
use env_logger::Env;
use log::info;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use web::{GameAppData, HockeySimulatorServer};

#[tokio::main]
async fn main() {
    color_eyre::install().unwrap();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let data_dir = env::var("HOCKEY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));
    std::fs::create_dir_all(&data_dir).expect("data directory must be writable");

    let seed = env::var("HOCKEY_WORLD_SEED")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(7);

    let (service, estimated) = TimeEstimation::estimate(|| {
        DatabaseLoader::load(&data_dir, seed, SimulatorSettings::default())
    });
    info!(
        "world ready: season {}, day {}/{} ({} ms)",
        service.sim.season_number,
        service.sim.current_day(),
        service.sim.total_days(),
        estimated
    );

    let data = GameAppData {
        service: Arc::new(Mutex::new(service)),
    };

    HockeySimulatorServer::new(data).run().await;
}
