use crate::storage::envelope::{envelope_version, read_json_value, write_json_with_backup};
use core::service::runtime::{RUNTIME_SAVE_VERSION, RuntimeState};
use core::trades::TradePreference;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

#[derive(Serialize)]
struct RuntimeFile<'a> {
    save_version: u32,
    runtime_state: &'a RuntimeState,
}

pub fn save_runtime(path: &Path, runtime: &RuntimeState, with_backup: bool) -> Result<(), String> {
    write_json_with_backup(
        path,
        &RuntimeFile {
            save_version: RUNTIME_SAVE_VERSION,
            runtime_state: runtime,
        },
        with_backup,
    )
}

/// Load the service runtime envelope. Carries one legacy migration: old
/// builds persisted `trade_block_by_team` as a plain name list per team,
/// which maps onto `shop` preferences.
pub fn load_runtime(path: &Path) -> (RuntimeState, Option<String>) {
    let value = match read_json_value(path) {
        Ok(Some(value)) => value,
        Ok(None) => return (RuntimeState::default(), None),
        Err(error) => {
            return (
                RuntimeState::default(),
                Some(format!("{}; using defaults.", error)),
            );
        }
    };

    let Value::Object(map) = value else {
        return (
            RuntimeState::default(),
            Some(String::from(
                "Runtime state has invalid format; using defaults.",
            )),
        );
    };

    let version = envelope_version(&Value::Object(map.clone()));
    if version > RUNTIME_SAVE_VERSION {
        return (
            RuntimeState::default(),
            Some(format!(
                "Unsupported runtime state version {}; app supports up to {}.",
                version, RUNTIME_SAVE_VERSION
            )),
        );
    }

    let payload = map
        .get("runtime_state")
        .cloned()
        .unwrap_or(Value::Object(map));
    let legacy_blocks = payload.get("trade_block_by_team").cloned();

    let mut runtime = match serde_json::from_value::<RuntimeState>(payload) {
        Ok(runtime) => runtime,
        Err(error) => {
            return (
                RuntimeState::default(),
                Some(format!(
                    "Runtime state payload is invalid ({}); using defaults.",
                    error
                )),
            );
        }
    };

    if let Some(Value::Object(blocks)) = legacy_blocks {
        for (team_name, names) in blocks {
            let Value::Array(names) = names else {
                continue;
            };
            let team_prefs = runtime
                .trade_preferences_by_team
                .entry(team_name)
                .or_default();
            for name in names.into_iter().filter_map(|n| match n {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            }) {
                team_prefs.entry(name).or_insert(TradePreference::Shop);
            }
        }
    }

    (runtime, None)
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn round_trip_preserves_settings() {
        let dir = scratch_dir("runtime-roundtrip");
        let path = dir.join("runtime_state.json");
        let mut runtime = RuntimeState::default();
        runtime.user_team_name = String::from("Aurora");
        runtime.auto_injury_moves = true;
        save_runtime(&path, &runtime, false).unwrap();

        let (loaded, error) = load_runtime(&path);
        assert!(error.is_none());
        assert_eq!(loaded.user_team_name, "Aurora");
        assert!(loaded.auto_injury_moves);
    }

    #[test]
    fn legacy_trade_block_becomes_shop_preferences() {
        let dir = scratch_dir("runtime-legacy");
        let path = dir.join("runtime_state.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({
                "save_version": 2,
                "runtime_state": {
                    "user_team_name": "Aurora",
                    "trade_block_by_team": {"Aurora": ["Veteran Winger", " "]}
                }
            }))
            .unwrap(),
        )
        .unwrap();

        let (runtime, error) = load_runtime(&path);
        assert!(error.is_none());
        let prefs = runtime.trade_preferences_by_team.get("Aurora").unwrap();
        assert_eq!(prefs.get("Veteran Winger"), Some(&TradePreference::Shop));
        assert_eq!(prefs.len(), 1);
    }

    #[test]
    fn future_runtime_version_uses_defaults() {
        let dir = scratch_dir("runtime-version");
        let path = dir.join("runtime_state.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({"save_version": 99, "runtime_state": {}})).unwrap(),
        )
        .unwrap();
        let (runtime, error) = load_runtime(&path);
        assert!(runtime.user_team_name.is_empty());
        assert!(error.unwrap().contains("Unsupported runtime state version"));
    }
}
