//! JSON file helpers used by the repositories
//!
//! A missing file reads as the empty household. Writes land in a sibling
//! `.tmp` file first and are renamed over the target once synced.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::SplitError;

fn storage_err(action: &str, path: &Path, err: impl Display) -> SplitError {
    SplitError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load `T` from `path`, or `T::default()` when nothing has been saved yet
pub fn read_json<T, P>(path: P) -> Result<T, SplitError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => serde_json::from_reader(BufReader::new(file))
            .map_err(|e| storage_err("parse", path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(storage_err("open", path, e)),
    }
}

/// Replace the contents of `path` with `data` as pretty JSON
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), SplitError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| storage_err("create directory", dir, e))?;
    }

    let temp = temp_path_for(path);
    let written = (|| {
        let mut writer =
            BufWriter::new(File::create(&temp).map_err(|e| storage_err("create", &temp, e))?);
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| storage_err("serialize", path, e))?;
        writer.flush().map_err(|e| storage_err("flush", &temp, e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| storage_err("sync", &temp, e))?;
        fs::rename(&temp, path).map_err(|e| storage_err("replace", path, e))
    })();

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize, Default)]
    struct Roster {
        names: Vec<String>,
    }

    fn roster() -> Roster {
        Roster {
            names: vec!["Alice".into(), "Bob".into()],
        }
    }

    #[test]
    fn test_missing_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();

        let loaded: Roster = read_json(temp_dir.path().join("people.json")).unwrap();
        assert_eq!(loaded, Roster::default());
    }

    #[test]
    fn test_round_trip_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("people.json");

        write_json_atomic(&path, &roster()).unwrap();

        assert_eq!(read_json::<Roster, _>(&path).unwrap(), roster());
        assert!(!temp_dir.path().join("people.json.tmp").exists());
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("people.json");

        write_json_atomic(&path, &roster()).unwrap();
        write_json_atomic(&path, &Roster::default()).unwrap();

        assert!(read_json::<Roster, _>(&path).unwrap().names.is_empty());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("people.json");

        write_json_atomic(&path, &roster()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("people.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<Roster, _>(&path).unwrap_err();
        assert!(matches!(err, SplitError::Storage(ref msg) if msg.contains("parse")));
    }
}
