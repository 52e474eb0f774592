use crate::storage::envelope::{envelope_version, read_json_value, write_json_with_backup};
use core::club::player::CareerSeason;
use core::league::league::SAVE_VERSION;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub type CareerHistory = BTreeMap<String, Vec<CareerSeason>>;

#[derive(Serialize)]
struct CareerHistoryFile<'a> {
    save_version: u32,
    career_history: &'a CareerHistory,
}

pub fn save_career(path: &Path, career: &CareerHistory, with_backup: bool) -> Result<(), String> {
    write_json_with_backup(
        path,
        &CareerHistoryFile {
            save_version: SAVE_VERSION,
            career_history: career,
        },
        with_backup,
    )
}

/// Load the per-player career log, keyed by stable player id. A legacy
/// save is a bare id-to-seasons map without the envelope.
pub fn load_career(path: &Path) -> (CareerHistory, Option<String>) {
    let value = match read_json_value(path) {
        Ok(Some(value)) => value,
        Ok(None) => return (CareerHistory::new(), None),
        Err(error) => {
            return (
                CareerHistory::new(),
                Some(format!("{}; starting empty.", error)),
            );
        }
    };

    let Value::Object(mut map) = value else {
        return (
            CareerHistory::new(),
            Some(String::from(
                "Career history file has invalid format; starting empty.",
            )),
        );
    };

    let version = envelope_version(&Value::Object(map.clone()));
    if version > SAVE_VERSION {
        return (
            CareerHistory::new(),
            Some(format!(
                "Unsupported career history version {}; app supports up to {}.",
                version, SAVE_VERSION
            )),
        );
    }

    let payload = match map.remove("career_history") {
        Some(payload) => payload,
        None => {
            // Legacy bare-map shape; drop any stray envelope key first.
            map.remove("save_version");
            Value::Object(map)
        }
    };

    match serde_json::from_value::<CareerHistory>(payload) {
        Ok(career) => (career, None),
        Err(error) => (
            CareerHistory::new(),
            Some(format!(
                "Career history payload is invalid ({}); starting empty.",
                error
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
    fn legacy_bare_map_is_accepted() {
        let dir = scratch_dir("career-legacy");
        let path = dir.join("career_history.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({
                "abc123": [{"season": 1, "team": "Aurora", "gp": 70, "g": 20, "a": 31}]
            }))
            .unwrap(),
        )
        .unwrap();

        let (career, error) = load_career(&path);
        assert!(error.is_none(), "unexpected error: {:?}", error);
        let seasons = career.get("abc123").unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].g, 20);
    }

    #[test]
    fn envelope_round_trip() {
        let dir = scratch_dir("career-roundtrip");
        let path = dir.join("career_history.json");
        let mut career = CareerHistory::new();
        career.insert(
            "pid-1".to_string(),
            vec![CareerSeason {
                season: 2,
                team: String::from("Aurora"),
                gp: 82,
                g: 40,
                a: 52,
                p: 92,
                ..Default::default()
            }],
        );
        save_career(&path, &career, true).unwrap();
        let (loaded, error) = load_career(&path);
        assert!(error.is_none());
        assert_eq!(loaded.get("pid-1").unwrap()[0].p, 92);
    }

    #[test]
    fn future_version_is_refused() {
        let dir = scratch_dir("career-version");
        let path = dir.join("career_history.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({"save_version": 9, "career_history": {}})).unwrap(),
        )
        .unwrap();
        let (career, error) = load_career(&path);
        assert!(career.is_empty());
        assert!(error.unwrap().contains("Unsupported career history version"));
    }
}
