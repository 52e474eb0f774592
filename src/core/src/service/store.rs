use crate::club::player::CareerSeason;
use crate::league::history::{HallOfFameEntry, SeasonSummary};
use crate::league::league::LeagueState;
use crate::service::runtime::RuntimeState;
use std::collections::BTreeMap;

/// Persistence seam between the simulation service and the storage layer.
/// Autosave callers swallow errors (logging only); explicit saves surface
/// them. Write order across files is state, then history, career, and hall
/// of fame, so the live state is always at least as advanced as the logs.
pub trait LeagueStore: Send {
    fn save_state(&self, state: &LeagueState) -> Result<(), String>;
    fn save_history(&self, history: &[SeasonSummary]) -> Result<(), String>;
    fn save_career(&self, career: &BTreeMap<String, Vec<CareerSeason>>) -> Result<(), String>;
    fn save_hall_of_fame(&self, entries: &[HallOfFameEntry]) -> Result<(), String>;
    fn save_runtime(&self, runtime: &RuntimeState) -> Result<(), String>;
    /// Delete every persisted file; used by the reset operation.
    fn wipe(&self) -> Result<(), String>;
}

/// In-memory stand-in used by tests and headless simulations.
pub struct NullStore;

impl LeagueStore for NullStore {
    fn save_state(&self, _state: &LeagueState) -> Result<(), String> {
        Ok(())
    }

    fn save_history(&self, _history: &[SeasonSummary]) -> Result<(), String> {
        Ok(())
    }

    fn save_career(&self, _career: &BTreeMap<String, Vec<CareerSeason>>) -> Result<(), String> {
        Ok(())
    }

    fn save_hall_of_fame(&self, _entries: &[HallOfFameEntry]) -> Result<(), String> {
        Ok(())
    }

    fn save_runtime(&self, _runtime: &RuntimeState) -> Result<(), String> {
        Ok(())
    }

    fn wipe(&self) -> Result<(), String> {
        Ok(())
    }
}
