//! Person model
//!
//! A member of the household who pays for and shares expenses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PersonId;

/// A person taking part in shared expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Display name
    pub name: String,

    /// Contact email (may be empty)
    #[serde(default)]
    pub email: String,

    /// Date the person joined the household
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_on: Option<NaiveDate>,

    /// When the person was created
    pub created_at: DateTime<Utc>,

    /// When the person was last modified
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a new person
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PersonId::new(),
            name: name.into(),
            email: String::new(),
            joined_on: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new person with a contact email
    pub fn with_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        let mut person = Self::new(name);
        person.email = email.into();
        person
    }

    /// Validate the person
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(PersonValidationError::NameTooLong(self.name.len()));
        }

        if !self.email.is_empty() && !is_plausible_email(&self.email) {
            return Err(PersonValidationError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }

    /// Normalize a name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check if this person matches a name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Optional-field update for a person; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

impl PersonUpdate {
    /// Whether the update would change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.joined_on.is_none()
    }

    /// Apply the provided fields to a person
    pub fn apply_to(&self, person: &mut Person) {
        if let Some(name) = &self.name {
            person.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            person.email = email.trim().to_string();
        }
        if let Some(joined_on) = self.joined_on {
            person.joined_on = Some(joined_on);
        }
        person.updated_at = Utc::now();
    }
}

/// `local@domain.tld` with no whitespace
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty() && !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

/// Validation errors for people
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidEmail(String),
}

impl fmt::Display for PersonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Person name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Person name too long ({} chars, max 100)", len)
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for PersonValidationError {}
