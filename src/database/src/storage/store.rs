use crate::storage::career::{CareerHistory, save_career};
use crate::storage::hall_of_fame::save_hall_of_fame;
use crate::storage::history::save_history;
use crate::storage::runtime::save_runtime;
use crate::storage::state::save_state;
use core::league::history::{HallOfFameEntry, SeasonSummary};
use core::league::league::LeagueState;
use core::service::runtime::RuntimeState;
use core::service::store::LeagueStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical on-disk layout for one saved world.
#[derive(Debug, Clone)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    pub fn new(root: &Path) -> Self {
        StorePaths {
            root: root.to_path_buf(),
        }
    }

    pub fn league_state(&self) -> PathBuf {
        self.root.join("league_state.json")
    }

    pub fn season_history(&self) -> PathBuf {
        self.root.join("season_history.json")
    }

    pub fn career_history(&self) -> PathBuf {
        self.root.join("career_history.json")
    }

    pub fn hall_of_fame(&self) -> PathBuf {
        self.root.join("hall_of_fame.json")
    }

    pub fn runtime_state(&self) -> PathBuf {
        self.root.join("runtime_state.json")
    }

    fn all(&self) -> [PathBuf; 5] {
        [
            self.league_state(),
            self.season_history(),
            self.career_history(),
            self.hall_of_fame(),
            self.runtime_state(),
        ]
    }
}

/// JSON-file persistence. The live state and runtime autosave on every day
/// advance, so those writes skip the backup copy for throughput; the
/// slower-moving history files keep one.
pub struct FileStore {
    paths: StorePaths,
}

impl FileStore {
    pub fn new(paths: StorePaths) -> Self {
        FileStore { paths }
    }
}

impl LeagueStore for FileStore {
    fn save_state(&self, state: &LeagueState) -> Result<(), String> {
        save_state(&self.paths.league_state(), state, false)
    }

    fn save_history(&self, history: &[SeasonSummary]) -> Result<(), String> {
        save_history(&self.paths.season_history(), history, true)
    }

    fn save_career(&self, career: &CareerHistory) -> Result<(), String> {
        save_career(&self.paths.career_history(), career, true)
    }

    fn save_hall_of_fame(&self, entries: &[HallOfFameEntry]) -> Result<(), String> {
        save_hall_of_fame(&self.paths.hall_of_fame(), entries, true)
    }

    fn save_runtime(&self, runtime: &RuntimeState) -> Result<(), String> {
        save_runtime(&self.paths.runtime_state(), runtime, false)
    }

    fn wipe(&self) -> Result<(), String> {
        for path in self.paths.all() {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|error| format!("delete {}: {}", path.display(), error))?;
            }
        }
        Ok(())
    }
}
