//! Balance and settlement engine
//!
//! Pure, synchronous functions over an immutable snapshot of people and
//! expenses:
//!
//! - [`aggregate`]: expenses → net balance per person
//! - [`settle`]: balances → transfers (greedy largest-creditor/largest-debtor)
//! - [`summary`]: per-category and per-person totals
//!
//! Nothing here performs I/O or holds state between calls.

pub mod balance;
pub mod settlement;
pub mod summary;
pub mod tolerance;

pub use balance::{aggregate, BalanceVector};
pub use settlement::{apply_transfers, settle};
pub use summary::{
    check_consistency, is_consistent, personal_category_totals, total_contributions,
    total_fair_share, PersonTotals,
};

use std::collections::BTreeSet;

use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseRecord, Person, PersonId};

/// Collect the ids of a person listing into the set the engine expects
pub fn person_ids(people: &[Person]) -> BTreeSet<PersonId> {
    people.iter().map(|p| p.id).collect()
}

/// Reject records the engine cannot fold into balances
fn check_record(record: &ExpenseRecord, people: &BTreeSet<PersonId>) -> SplitResult<()> {
    if !record.amount.is_finite() || record.amount < 0.0 {
        return Err(SplitError::Validation(format!(
            "expense {} has invalid amount {}",
            record.id, record.amount
        )));
    }

    if !people.contains(&record.payer) {
        return Err(SplitError::unknown_person(record.payer));
    }

    if let Some(unknown) = record.participants.iter().find(|p| !people.contains(p)) {
        return Err(SplitError::unknown_person(unknown));
    }

    Ok(())
}
