//! Person repository backed by people.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{Person, PersonId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PeopleData {
    people: Vec<Person>,
}

/// Repository for person persistence
pub struct PersonRepository {
    path: PathBuf,
    data: RwLock<HashMap<PersonId, Person>>,
    /// Index: normalized name -> person_id
    by_name: RwLock<HashMap<String, PersonId>>,
}

impl PersonRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    /// Load people from disk and rebuild the name index
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: PeopleData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_name = self
            .by_name
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_name.clear();

        for person in file_data.people {
            by_name.insert(Person::normalize_name(&person.name), person.id);
            data.insert(person.id, person);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let people = self.get_all()?;
        write_json_atomic(&self.path, &PeopleData { people })
    }

    pub fn get(&self, id: PersonId) -> Result<Option<Person>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All people, ordered by id so the engine sees a stable sequence
    pub fn get_all(&self) -> Result<Vec<Person>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut people: Vec<_> = data.values().cloned().collect();
        people.sort_by_key(|p| p.id);
        Ok(people)
    }

    /// Look up a person by name (case-insensitive, surrounding whitespace ignored)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Person>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_name = self
            .by_name
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_name
            .get(&Person::normalize_name(name))
            .and_then(|id| data.get(id).cloned()))
    }

    /// Check whether a name is already taken by a different person
    pub fn name_exists(&self, name: &str, exclude: Option<PersonId>) -> Result<bool, SplitError> {
        Ok(self
            .get_by_name(name)?
            .is_some_and(|p| Some(p.id) != exclude))
    }

    /// Insert or update a person
    pub fn upsert(&self, person: Person) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_name = self
            .by_name
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&person.id) {
            by_name.remove(&Person::normalize_name(&old.name));
        }

        by_name.insert(Person::normalize_name(&person.name), person.id);
        data.insert(person.id, person);
        Ok(())
    }

    pub fn delete(&self, id: PersonId) -> Result<bool, SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_name = self
            .by_name
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match data.remove(&id) {
            Some(person) => {
                by_name.remove(&Person::normalize_name(&person.name));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
