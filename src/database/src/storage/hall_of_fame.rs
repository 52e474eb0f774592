use crate::storage::envelope::{envelope_version, read_json_value, write_json_with_backup};
use core::league::history::HallOfFameEntry;
use core::league::league::SAVE_VERSION;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

#[derive(Serialize)]
struct HallOfFameFile<'a> {
    save_version: u32,
    hall_of_fame: &'a [HallOfFameEntry],
}

pub fn save_hall_of_fame(
    path: &Path,
    entries: &[HallOfFameEntry],
    with_backup: bool,
) -> Result<(), String> {
    write_json_with_backup(
        path,
        &HallOfFameFile {
            save_version: SAVE_VERSION,
            hall_of_fame: entries,
        },
        with_backup,
    )
}

pub fn load_hall_of_fame(path: &Path) -> (Vec<HallOfFameEntry>, Option<String>) {
    let value = match read_json_value(path) {
        Ok(Some(value)) => value,
        Ok(None) => return (Vec::new(), None),
        Err(error) => {
            return (Vec::new(), Some(format!("{}; starting empty.", error)));
        }
    };

    match value {
        Value::Object(ref map) => {
            let version = envelope_version(&value);
            if version > SAVE_VERSION {
                return (
                    Vec::new(),
                    Some(format!(
                        "Unsupported hall of fame version {}; app supports up to {}.",
                        version, SAVE_VERSION
                    )),
                );
            }
            let Some(payload) = map.get("hall_of_fame") else {
                return (
                    Vec::new(),
                    Some(String::from(
                        "Hall of fame payload is invalid; starting empty.",
                    )),
                );
            };
            match serde_json::from_value::<Vec<HallOfFameEntry>>(payload.clone()) {
                Ok(entries) => (entries, None),
                Err(error) => (
                    Vec::new(),
                    Some(format!(
                        "Hall of fame payload is invalid ({}); starting empty.",
                        error
                    )),
                ),
            }
        }
        // Legacy bare-list shape.
        Value::Array(_) => match serde_json::from_value::<Vec<HallOfFameEntry>>(value) {
            Ok(entries) => (entries, None),
            Err(error) => (
                Vec::new(),
                Some(format!(
                    "Failed to load hall of fame ({}); starting empty.",
                    error
                )),
            ),
        },
        _ => (
            Vec::new(),
            Some(String::from(
                "Hall of fame file has invalid format; starting empty.",
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
    fn legacy_list_is_accepted() {
        let dir = scratch_dir("hof-legacy");
        let path = dir.join("hall_of_fame.json");
        fs::write(
            &path,
            serde_json::to_string(&json!([{"player_id": "x", "name": "Old Legend"}])).unwrap(),
        )
        .unwrap();
        let (entries, error) = load_hall_of_fame(&path);
        assert!(error.is_none());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Old Legend");
    }

    #[test]
    fn future_version_is_refused() {
        let dir = scratch_dir("hof-version");
        let path = dir.join("hall_of_fame.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({"save_version": 3, "hall_of_fame": []})).unwrap(),
        )
        .unwrap();
        let (entries, error) = load_hall_of_fame(&path);
        assert!(entries.is_empty());
        assert!(error.unwrap().contains("Unsupported hall of fame version"));
    }
}
