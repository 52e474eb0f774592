use crate::storage::envelope::{envelope_version, read_json_value, write_json_with_backup};
use core::league::history::SeasonSummary;
use core::league::league::SAVE_VERSION;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

#[derive(Serialize)]
struct SeasonHistoryFile<'a> {
    save_version: u32,
    season_history: &'a [SeasonSummary],
}

pub fn save_history(
    path: &Path,
    history: &[SeasonSummary],
    with_backup: bool,
) -> Result<(), String> {
    write_json_with_backup(
        path,
        &SeasonHistoryFile {
            save_version: SAVE_VERSION,
            season_history: history,
        },
        with_backup,
    )
}

/// Load the append-only season log. Accepts the enveloped shape and the
/// legacy bare-list shape; anything else falls back to empty with a
/// recorded reason.
pub fn load_history(path: &Path) -> (Vec<SeasonSummary>, Option<String>) {
    let value = match read_json_value(path) {
        Ok(Some(value)) => value,
        Ok(None) => return (Vec::new(), None),
        Err(error) => {
            return (
                Vec::new(),
                Some(format!("{}; starting with empty history.", error)),
            );
        }
    };

    match value {
        Value::Object(ref map) => {
            let version = envelope_version(&value);
            if version > SAVE_VERSION {
                return (
                    Vec::new(),
                    Some(format!(
                        "Unsupported season history version {}; app supports up to {}.",
                        version, SAVE_VERSION
                    )),
                );
            }
            let Some(payload) = map.get("season_history") else {
                return (
                    Vec::new(),
                    Some(String::from(
                        "Season history payload is invalid; starting with empty history.",
                    )),
                );
            };
            match serde_json::from_value::<Vec<SeasonSummary>>(payload.clone()) {
                Ok(history) => (history, None),
                Err(error) => (
                    Vec::new(),
                    Some(format!(
                        "Season history payload is invalid ({}); starting with empty history.",
                        error
                    )),
                ),
            }
        }
        // Legacy shape: a bare list of season rows, migrated in memory and
        // rewrapped in the envelope on the next save.
        Value::Array(_) => match serde_json::from_value::<Vec<SeasonSummary>>(value) {
            Ok(history) => (history, None),
            Err(error) => (
                Vec::new(),
                Some(format!(
                    "Failed to load season history ({}); starting with empty history.",
                    error
                )),
            ),
        },
        _ => (
            Vec::new(),
            Some(String::from(
                "Season history file has invalid format; starting with empty history.",
            )),
        ),
    }
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
    fn legacy_bare_list_is_migrated_without_error() {
        let dir = scratch_dir("history-legacy");
        let path = dir.join("season_history.json");
        fs::write(
            &path,
            serde_json::to_string(&json!([{"season": 1, "note": "legacy"}])).unwrap(),
        )
        .unwrap();

        let (history, error) = load_history(&path);
        assert!(error.is_none(), "unexpected error: {:?}", error);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].season, 1);
        // Migration writes the envelope shape back on the next save.
        save_history(&path, &history, true).unwrap();
        let (reloaded, error) = load_history(&path);
        assert!(error.is_none());
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn future_version_yields_empty_with_error() {
        let dir = scratch_dir("history-version");
        let path = dir.join("season_history.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({"save_version": 999, "season_history": [{"season": 1}]}))
                .unwrap(),
        )
        .unwrap();

        let (history, error) = load_history(&path);
        assert!(history.is_empty());
        assert!(
            error
                .unwrap()
                .contains("Unsupported season history version")
        );
    }

    #[test]
    fn invalid_payload_is_reported() {
        let dir = scratch_dir("history-invalid");
        let path = dir.join("season_history.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({"save_version": 2, "season_history": "oops"})).unwrap(),
        )
        .unwrap();

        let (history, error) = load_history(&path);
        assert!(history.is_empty());
        assert!(error.unwrap().contains("invalid"));
    }
}
