//! Storage layer for roomsplit
//!
//! JSON file repositories with atomic writes, plus the audit log that
//! records every mutation made through the services.

pub mod expenses;
pub mod file_io;
pub mod init;
pub mod people;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use people::PersonRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::RoomsplitPaths;
use crate::error::SplitError;
use crate::models::{ExpenseRecord, Person};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: RoomsplitPaths,
    pub people: PersonRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: RoomsplitPaths) -> Result<Self, SplitError> {
        paths.ensure_directories()?;

        Ok(Self {
            people: PersonRepository::new(paths.people_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &RoomsplitPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SplitError> {
        self.people.load()?;
        self.expenses.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SplitError> {
        self.people.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (settings written by `init`)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    /// Current people (id order) and expenses (recorded order) for the engine
    pub fn snapshot(&self) -> Result<(Vec<Person>, Vec<ExpenseRecord>), SplitError> {
        Ok((self.people.get_all()?, self.expenses.get_all()?))
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), SplitError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update; the diff summary is computed from the serialized states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), SplitError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a deleted entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), SplitError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
