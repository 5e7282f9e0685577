//! First-run setup of the data directory

use serde_json::json;

use crate::config::RoomsplitPaths;
use crate::error::SplitError;

use super::file_io::write_json_atomic;

/// Create the data directory and empty ledger files; existing files are kept
pub fn initialize_storage(paths: &RoomsplitPaths) -> Result<(), SplitError> {
    paths.ensure_directories()?;

    if !paths.people_file().exists() {
        write_json_atomic(paths.people_file(), &json!({ "people": [] }))?;
    }

    if !paths.expenses_file().exists() {
        write_json_atomic(paths.expenses_file(), &json!({ "expenses": [] }))?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &RoomsplitPaths) -> bool {
    !paths.people_file().exists() || !paths.expenses_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;
    use crate::storage::PersonRepository;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.people_file().exists());
        assert!(paths.expenses_file().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let repo = PersonRepository::new(paths.people_file());
        repo.load().unwrap();
        repo.upsert(Person::new("Alice")).unwrap();
        repo.save().unwrap();

        initialize_storage(&paths).unwrap();

        let reloaded = PersonRepository::new(paths.people_file());
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
    }
}
