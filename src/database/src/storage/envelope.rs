use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Write one persisted file: optional `.bak` copy of the current contents,
/// then an atomic replace via a temp file in the same directory.
pub fn write_json_with_backup<T: Serialize>(
    path: &Path,
    payload: &T,
    with_backup: bool,
) -> Result<(), String> {
    if with_backup && path.exists() {
        let backup = backup_path(path);
        if let Err(error) = fs::copy(path, &backup) {
            // A failed backup copy never blocks the save itself.
            warn!("backup copy to {} failed: {}", backup.display(), error);
        }
    }

    let text = serde_json::to_string_pretty(payload)
        .map_err(|error| format!("serialize {}: {}", path.display(), error))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &text).map_err(|error| format!("write {}: {}", tmp.display(), error))?;
    fs::rename(&tmp, path).map_err(|error| format!("replace {}: {}", path.display(), error))?;
    Ok(())
}

pub fn backup_path(path: &Path) -> std::path::PathBuf {
    path.with_extension("json.bak")
}

/// Read a persisted file into raw JSON. Missing files are not an error;
/// unreadable or unparsable files come back as a human-readable message.
pub fn read_json_value(path: &Path) -> Result<Option<Value>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .map_err(|error| format!("Failed to load {} ({})", path.display(), error))?;
    let value = serde_json::from_str(&text)
        .map_err(|error| format!("Failed to parse {} ({})", path.display(), error))?;
    Ok(Some(value))
}

/// `save_version` of an envelope object, defaulting to the pre-envelope 1.
pub fn envelope_version(value: &Value) -> u32 {
    value
        .get("save_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
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
    fn backup_keeps_previous_contents() {
        let dir = scratch_dir("envelope-backup");
        let path = dir.join("data.json");
        write_json_with_backup(&path, &json!({"v": 1}), true).unwrap();
        write_json_with_backup(&path, &json!({"v": 2}), true).unwrap();

        let backup = fs::read_to_string(backup_path(&path)).unwrap();
        assert!(backup.contains("1"));
        let current = fs::read_to_string(&path).unwrap();
        assert!(current.contains("2"));
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = scratch_dir("envelope-missing");
        assert_eq!(read_json_value(&dir.join("nope.json")).unwrap(), None);
    }

    #[test]
    fn parse_failure_is_reported() {
        let dir = scratch_dir("envelope-bad");
        let path = dir.join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(read_json_value(&path).is_err());
    }

    #[test]
    fn version_defaults_to_one() {
        assert_eq!(envelope_version(&json!({"a": 1})), 1);
        assert_eq!(envelope_version(&json!({"save_version": 5})), 5);
    }
}
