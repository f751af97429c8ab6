//! Write-temp-then-rename persistence, shared by the forced-conversion and
//! user-exception stores.

use std::path::Path;

use super::StoreError;

/// Serializes `value` to pretty JSON and atomically replaces the file at `path`.
///
/// The temp file lives next to `path` so the final rename stays on the same filesystem
/// (required for the rename to be atomic on Windows/NTFS).
pub fn write_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let tmp_path = tmp_path_for(path);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_round_trips_and_leaves_no_tmp_file() {
        let dir = std::env::temp_dir().join(format!("rsw-atomic-test-{}", std::process::id()));
        let path = dir.join("data.json");

        write_atomic(&path, &vec!["a".to_string(), "b".to_string()]).unwrap();
        let read_back: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read_back, vec!["a", "b"]);
        assert!(!path.with_file_name("data.json.tmp").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
