//! Service layer for roomsplit
//!
//! Services sit between the CLI and storage: they validate input, keep the
//! audit log, and hand storage snapshots to the balance engine.

pub mod expense;
pub mod import;
pub mod person;
pub mod seed;
pub mod settlement;

pub use expense::{CreateExpenseInput, ExpenseFilter, ExpenseService};
pub use import::{ImportOptions, ImportResult, ImportService};
pub use person::PersonService;
pub use seed::{seed_demo_data, RandomAssigner, SeedOptions, SeedSummary};
pub use settlement::{Settlement, SettlementService};

use uuid::Uuid;

use crate::error::{SplitError, SplitResult};

/// Match the short id shown in listings (`per-1a2b3c4d`) against full ids
///
/// At least four hex characters are needed; a prefix matching more than one
/// entity is an error rather than a guess.
pub(crate) fn find_by_short_id<T>(
    items: Vec<T>,
    identifier: &str,
    prefix: &str,
    uuid_of: impl Fn(&T) -> Uuid,
) -> SplitResult<Option<T>> {
    let trimmed = identifier.trim();
    let short = trimmed.strip_prefix(prefix).unwrap_or(trimmed).to_lowercase();

    if short.len() < 4 || !short.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Ok(None);
    }

    let mut matches = items
        .into_iter()
        .filter(|item| uuid_of(item).to_string().starts_with(&short));

    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(Some(item)),
        (Some(_), Some(_)) => Err(SplitError::Validation(format!(
            "Ambiguous id '{}', use more characters",
            identifier
        ))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_short_id() {
        let ids = vec![
            Uuid::from_u128(0x1234_5678_0000_0000_0000_0000_0000_0001),
            Uuid::from_u128(0x1234_9999_0000_0000_0000_0000_0000_0002),
        ];

        let found = find_by_short_id(ids.clone(), "per-12345678", "per-", |u| *u).unwrap();
        assert_eq!(found, Some(ids[0]));

        assert!(find_by_short_id(ids.clone(), "1234", "per-", |u| *u)
            .unwrap_err()
            .is_validation());
        assert_eq!(find_by_short_id(ids.clone(), "abc", "per-", |u| *u).unwrap(), None);
        assert_eq!(find_by_short_id(ids, "Alice", "per-", |u| *u).unwrap(), None);
    }
}
