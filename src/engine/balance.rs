//! Balance aggregation
//!
//! Reduces a ledger of expenses into one signed net balance per person.
//! Positive means the person has paid more than their fair share and is owed
//! money; negative means they owe.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check_record;
use super::tolerance::conservation_bound;
use crate::error::SplitResult;
use crate::models::{ExpenseRecord, PersonId};

/// Net balance per person, ordered by person id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceVector(BTreeMap<PersonId, f64>);

impl BalanceVector {
    /// Create an empty balance vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of one person, `None` if they are not part of the vector
    pub fn get(&self, person: PersonId) -> Option<f64> {
        self.0.get(&person).copied()
    }

    /// Iterate over `(person, balance)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, f64)> + '_ {
        self.0.iter().map(|(&id, &balance)| (id, balance))
    }

    /// Number of people in the vector
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no people
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances; zero up to rounding for a consistent ledger
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Largest absolute balance, zero for an empty vector
    pub fn max_abs(&self) -> f64 {
        self.0.values().fold(0.0_f64, |acc, b| acc.max(b.abs()))
    }

    pub(crate) fn entry_mut(&mut self, person: PersonId) -> &mut f64 {
        self.0.entry(person).or_insert(0.0)
    }

    /// Consume the vector and return the underlying map
    pub fn into_inner(self) -> BTreeMap<PersonId, f64> {
        self.0
    }
}

impl FromIterator<(PersonId, f64)> for BalanceVector {
    fn from_iter<I: IntoIterator<Item = (PersonId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<PersonId, f64>> for BalanceVector {
    fn from(map: BTreeMap<PersonId, f64>) -> Self {
        Self(map)
    }
}

impl IntoIterator for BalanceVector {
    type Item = (PersonId, f64);
    type IntoIter = btree_map::IntoIter<PersonId, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Compute every person's net balance from a ledger of expenses
///
/// Each record credits its payer with the full amount and debits every
/// participant an equal share. Records without participants are skipped
/// entirely. Any record that names someone outside `people`, or carries a
/// negative or non-finite amount, fails the whole aggregation.
///
/// An empty `people` set yields an empty vector.
pub fn aggregate(
    records: &[ExpenseRecord],
    people: &BTreeSet<PersonId>,
) -> SplitResult<BalanceVector> {
    if people.is_empty() {
        return Ok(BalanceVector::new());
    }

    let mut balances: BalanceVector = people.iter().map(|&id| (id, 0.0)).collect();
    let mut gross = 0.0;

    for record in records {
        check_record(record, people)?;

        let Some(share) = record.share() else {
            debug!(expense = %record.id, "skipping expense without participants");
            continue;
        };

        *balances.entry_mut(record.payer) += record.amount;
        for &participant in &record.participants {
            *balances.entry_mut(participant) -= share;
        }
        gross += record.amount;
    }

    debug_assert!(
        balances.total().abs() <= conservation_bound(gross),
        "balances drifted from zero: {}",
        balances.total()
    );

    debug!(
        records = records.len(),
        people = people.len(),
        "aggregated balances"
    );

    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitError;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn person(n: u128) -> PersonId {
        PersonId::from_uuid(Uuid::from_u128(n))
    }

    fn expense(amount: f64, payer: PersonId, participants: &[PersonId]) -> ExpenseRecord {
        ExpenseRecord::new(
            amount,
            payer,
            participants.iter().copied(),
            "General",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
    }

    fn group(ids: &[PersonId]) -> BTreeSet<PersonId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_single_expense_split_two_ways() {
        let (a, b) = (person(1), person(2));
        let balances = aggregate(&[expense(100.0, a, &[a, b])], &group(&[a, b])).unwrap();

        assert_eq!(balances.get(a), Some(50.0));
        assert_eq!(balances.get(b), Some(-50.0));
    }

    #[test]
    fn test_two_expenses_three_people() {
        let (a, b, c) = (person(1), person(2), person(3));
        let records = [expense(90.0, a, &[a, b, c]), expense(30.0, b, &[b, c])];

        let balances = aggregate(&records, &group(&[a, b, c])).unwrap();

        assert_eq!(balances.get(a), Some(60.0));
        assert_eq!(balances.get(b), Some(-15.0));
        assert_eq!(balances.get(c), Some(-45.0));
        assert!(balances.total().abs() < 1e-9);
    }

    #[test]
    fn test_self_paid_expense_nets_to_zero() {
        let a = person(1);
        let balances = aggregate(&[expense(42.5, a, &[a])], &group(&[a])).unwrap();
        assert_eq!(balances.get(a), Some(0.0));
    }

    #[test]
    fn test_people_without_expenses_start_at_zero() {
        let (a, b, c) = (person(1), person(2), person(3));
        let balances = aggregate(&[expense(10.0, a, &[a, b])], &group(&[a, b, c])).unwrap();

        assert_eq!(balances.len(), 3);
        assert_eq!(balances.get(c), Some(0.0));
    }

    #[test]
    fn test_empty_inputs() {
        let a = person(1);
        assert!(aggregate(&[], &BTreeSet::new()).unwrap().is_empty());
        assert!(aggregate(&[expense(10.0, a, &[a])], &BTreeSet::new())
            .unwrap()
            .is_empty());

        let balances = aggregate(&[], &group(&[a])).unwrap();
        assert_eq!(balances.get(a), Some(0.0));
    }

    #[test]
    fn test_no_participants_is_a_no_op() {
        let (a, b) = (person(1), person(2));
        let balances = aggregate(&[expense(80.0, a, &[])], &group(&[a, b])).unwrap();

        assert_eq!(balances.get(a), Some(0.0));
        assert_eq!(balances.get(b), Some(0.0));
    }

    #[test]
    fn test_unknown_participant_rejected() {
        let (a, b, stranger) = (person(1), person(2), person(99));
        let err = aggregate(&[expense(10.0, a, &[a, stranger])], &group(&[a, b])).unwrap_err();

        match err {
            SplitError::UnknownPerson { id } => assert_eq!(id, stranger.to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_payer_rejected() {
        let (a, stranger) = (person(1), person(99));
        let err = aggregate(&[expense(10.0, stranger, &[a])], &group(&[a])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let a = person(1);
        let err = aggregate(&[expense(-5.0, a, &[a])], &group(&[a])).unwrap_err();
        assert!(matches!(err, SplitError::Validation(_)));
    }

    #[test]
    fn test_thirds_conserve() {
        let (a, b, c) = (person(1), person(2), person(3));
        let records: Vec<_> = (0..100)
            .map(|i| expense(10.0 + i as f64 * 0.37, [a, b, c][i % 3], &[a, b, c]))
            .collect();

        let balances = aggregate(&records, &group(&[a, b, c])).unwrap();
        assert!(balances.total().abs() < 1e-6);
    }
}
