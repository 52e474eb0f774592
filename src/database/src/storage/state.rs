use crate::storage::envelope::{envelope_version, read_json_value, write_json_with_backup};
use core::league::league::{LeagueState, SAVE_VERSION};
use serde::Serialize;
use std::path::Path;

/// `league_state.json`: the envelope carries `save_version` at the top
/// level next to the live-state payload keys.
#[derive(Serialize)]
struct LeagueStateFile<'a> {
    save_version: u32,
    #[serde(flatten)]
    state: &'a LeagueState,
}

pub fn save_state(path: &Path, state: &LeagueState, with_backup: bool) -> Result<(), String> {
    write_json_with_backup(
        path,
        &LeagueStateFile {
            save_version: SAVE_VERSION,
            state,
        },
        with_backup,
    )
}

/// Load the live state. Returns `(state, last_load_error)`; every failure
/// mode falls back to `None` so the caller can seed a fresh world.
pub fn load_state(path: &Path) -> (Option<LeagueState>, Option<String>) {
    let value = match read_json_value(path) {
        Ok(Some(value)) => value,
        Ok(None) => return (None, None),
        Err(error) => {
            return (
                None,
                Some(format!("{}; starting with defaults.", error)),
            );
        }
    };

    if !value.is_object() {
        return (
            None,
            Some(String::from(
                "League state file has invalid format; starting with defaults.",
            )),
        );
    }

    let version = envelope_version(&value);
    if version > SAVE_VERSION {
        return (
            None,
            Some(format!(
                "Unsupported league state version {}; app supports up to {}.",
                version, SAVE_VERSION
            )),
        );
    }

    match serde_json::from_value::<LeagueState>(value) {
        Ok(state) => (Some(state), None),
        Err(error) => (
            None,
            Some(format!(
                "Failed to load league state ({}); starting with defaults.",
                error
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::club::team::Team;
    use core::league::league::{LeagueSimulator, SimulatorSettings};
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("open-hockey-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn small_state() -> LeagueState {
        let teams = vec![
            Team::new("Aurora", "North", "Western"),
            Team::new("Glaciers", "North", "Western"),
        ];
        LeagueSimulator::new(teams, SimulatorSettings::default(), 5).to_state()
    }

    #[test]
    fn save_load_save_is_byte_stable() {
        let dir = scratch_dir("state-roundtrip");
        let path = dir.join("league_state.json");

        save_state(&path, &small_state(), false).unwrap();
        let first_bytes = fs::read(&path).unwrap();

        let (loaded, error) = load_state(&path);
        assert!(error.is_none());
        save_state(&path, &loaded.unwrap(), false).unwrap();
        let second_bytes = fs::read(&path).unwrap();

        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn newer_save_version_is_refused() {
        let dir = scratch_dir("state-version");
        let path = dir.join("league_state.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({"save_version": 999, "season_number": 3})).unwrap(),
        )
        .unwrap();

        let (state, error) = load_state(&path);
        assert!(state.is_none());
        assert!(error.unwrap().contains("Unsupported league state version 999"));
    }

    #[test]
    fn garbage_falls_back_to_defaults_with_error() {
        let dir = scratch_dir("state-garbage");
        let path = dir.join("league_state.json");
        fs::write(&path, "ceci n'est pas du json").unwrap();

        let (state, error) = load_state(&path);
        assert!(state.is_none());
        assert!(error.is_some());
    }

    #[test]
    fn missing_file_is_clean_default() {
        let dir = scratch_dir("state-missing");
        let (state, error) = load_state(&dir.join("league_state.json"));
        assert!(state.is_none());
        assert!(error.is_none());
    }
}
