//! Person service
//!
//! Validation and audit logging for household members.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{SplitError, SplitResult};
use crate::models::{Person, PersonId, PersonUpdate};
use crate::storage::Storage;

use super::find_by_short_id;

/// Service for person management
pub struct PersonService<'a> {
    storage: &'a Storage,
}

impl<'a> PersonService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a person to the household
    pub fn create(
        &self,
        name: &str,
        email: Option<&str>,
        joined_on: Option<NaiveDate>,
    ) -> SplitResult<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::Validation("Person name cannot be empty".into()));
        }

        if self.storage.people.name_exists(name, None)? {
            return Err(SplitError::Duplicate {
                entity_type: "Person",
                identifier: name.to_string(),
            });
        }

        let mut person = Person::with_email(name, email.map(str::trim).unwrap_or_default());
        person.joined_on = joined_on;

        person
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.people.upsert(person.clone())?;
        self.save_or_revert(|| self.storage.people.delete(person.id).map(|_| ()))?;

        self.storage.log_create(
            EntityType::Person,
            person.id.to_string(),
            Some(person.name.clone()),
            &person,
        )?;

        info!(person = %person.id, name = %person.name, "person added");
        Ok(person)
    }

    pub fn get(&self, id: PersonId) -> SplitResult<Option<Person>> {
        self.storage.people.get(id)
    }

    /// Find a person by name, full id, or the short id shown in listings
    pub fn find(&self, identifier: &str) -> SplitResult<Option<Person>> {
        if let Some(person) = self.storage.people.get_by_name(identifier)? {
            return Ok(Some(person));
        }

        if let Ok(id) = identifier.trim().parse::<PersonId>() {
            return self.storage.people.get(id);
        }

        let people = self.storage.people.get_all()?;
        find_by_short_id(people, identifier, PersonId::PREFIX, |p| *p.id.as_uuid())
    }

    /// Like [`find`](Self::find) but a missing person is an error
    pub fn require(&self, identifier: &str) -> SplitResult<Person> {
        self.find(identifier)?
            .ok_or_else(|| SplitError::person_not_found(identifier))
    }

    /// All people, ordered by id
    pub fn list(&self) -> SplitResult<Vec<Person>> {
        self.storage.people.get_all()
    }

    /// Apply a partial update
    pub fn update(&self, id: PersonId, update: PersonUpdate) -> SplitResult<Person> {
        let mut person = self
            .storage
            .people
            .get(id)?
            .ok_or_else(|| SplitError::person_not_found(id.to_string()))?;

        if update.is_empty() {
            return Ok(person);
        }

        if let Some(name) = &update.name {
            if self.storage.people.name_exists(name.trim(), Some(id))? {
                return Err(SplitError::Duplicate {
                    entity_type: "Person",
                    identifier: name.trim().to_string(),
                });
            }
        }

        let before = person.clone();
        update.apply_to(&mut person);

        person
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        self.storage.people.upsert(person.clone())?;
        self.save_or_revert(|| self.storage.people.upsert(before.clone()))?;

        self.storage.log_update(
            EntityType::Person,
            person.id.to_string(),
            Some(person.name.clone()),
            &before,
            &person,
        )?;

        info!(person = %person.id, "person updated");
        Ok(person)
    }

    /// Remove a person; refused while any expense still references them
    pub fn delete(&self, id: PersonId) -> SplitResult<Person> {
        let person = self
            .storage
            .people
            .get(id)?
            .ok_or_else(|| SplitError::person_not_found(id.to_string()))?;

        if self.storage.expenses.references(id)? {
            return Err(SplitError::Validation(format!(
                "Cannot remove {}: still referenced by recorded expenses",
                person.name
            )));
        }

        self.storage.people.delete(id)?;
        self.save_or_revert(|| self.storage.people.upsert(person.clone()))?;

        self.storage.log_delete(
            EntityType::Person,
            person.id.to_string(),
            Some(person.name.clone()),
            &person,
        )?;

        info!(person = %person.id, "person removed");
        Ok(person)
    }

    pub fn count(&self) -> SplitResult<usize> {
        self.storage.people.count()
    }

    /// Write the people file, undoing the in-memory change if that fails
    fn save_or_revert(&self, revert: impl FnOnce() -> SplitResult<()>) -> SplitResult<()> {
        let Err(err) = self.storage.people.save() else {
            return Ok(());
        };
        if let Err(undo) = revert() {
            warn!(error = %undo, "could not roll back unsaved person change");
        }
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomsplitPaths;
    use crate::models::ExpenseRecord;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_person() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);

        let person = service
            .create("  Alice ", Some("alice@example.com"), None)
            .unwrap();

        assert_eq!(person.name, "Alice");
        assert_eq!(person.email, "alice@example.com");
        assert_eq!(service.count().unwrap(), 1);
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);

        assert!(service.create("   ", None, None).unwrap_err().is_validation());
        assert!(service
            .create("Bob", Some("not an email"), None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(&"x".repeat(101), None, None)
            .unwrap_err()
            .is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);

        service.create("Carol", None, None).unwrap();
        let err = service.create("carol", None, None).unwrap_err();

        assert!(matches!(err, SplitError::Duplicate { .. }));
    }

    #[test]
    fn test_find_by_name_and_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);

        let dave = service.create("Dave", None, None).unwrap();

        assert_eq!(service.find("DAVE").unwrap().unwrap().id, dave.id);
        assert_eq!(
            service.find(&dave.id.as_uuid().to_string()).unwrap().unwrap().id,
            dave.id
        );
        assert_eq!(
            service.find(&dave.id.to_string()).unwrap().unwrap().id,
            dave.id
        );
        assert!(service.find("nobody").unwrap().is_none());
        assert!(service.require("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);

        let erin = service.create("Erin", None, None).unwrap();
        service.create("Frank", None, None).unwrap();

        let updated = service
            .update(
                erin.id,
                PersonUpdate {
                    email: Some("erin@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.email, "erin@example.com");

        let clash = PersonUpdate {
            name: Some("Frank".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(erin.id, clash).unwrap_err(),
            SplitError::Duplicate { .. }
        ));

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[2]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("email"));
    }

    #[test]
    fn test_delete_refused_while_referenced() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);

        let gina = service.create("Gina", None, None).unwrap();
        let hal = service.create("Hal", None, None).unwrap();

        let expense = ExpenseRecord::new(
            20.0,
            gina.id,
            [gina.id],
            "Snacks",
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        );
        storage.expenses.upsert(expense).unwrap();

        assert!(service.delete(gina.id).unwrap_err().is_validation());

        service.delete(hal.id).unwrap();
        assert!(service.get(hal.id).unwrap().is_none());
        assert!(service.delete(hal.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_save_does_not_add_person() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PersonService::new(&storage);
        service.create("Alice", None, None).unwrap();

        let mut blocker = storage.paths().people_file().into_os_string();
        blocker.push(".tmp");
        std::fs::create_dir_all(&blocker).unwrap();

        assert!(service.create("Bob", None, None).is_err());
        assert!(service.find("Bob").unwrap().is_none());
        assert_eq!(service.count().unwrap(), 1);
    }
}
