//! Spending summaries derived from the same ledger as the balances
//!
//! `total_fair_share[p] - total_contributions[p]` always equals
//! `-balance[p]`; [`check_consistency`] checks that identity.

use std::collections::{BTreeMap, BTreeSet};

use super::balance::BalanceVector;
use super::check_record;
use super::tolerance::approx_eq;
use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseRecord, Money, PersonId};

/// Unrounded per-person totals
pub type PersonTotals = BTreeMap<PersonId, f64>;

/// Total paid by `person`, per category (case-sensitive), rounded to cents
pub fn personal_category_totals(
    records: &[ExpenseRecord],
    person: PersonId,
) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for record in records.iter().filter(|r| r.payer == person) {
        *totals.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }

    totals
        .into_iter()
        .map(|(category, total)| (category, Money::from_amount(total)))
        .collect()
}

/// Total each person has paid out of pocket
///
/// Records without participants are left out, matching the balance
/// aggregation which ignores them entirely.
pub fn total_contributions(
    records: &[ExpenseRecord],
    people: &BTreeSet<PersonId>,
) -> SplitResult<PersonTotals> {
    let mut totals: PersonTotals = people.iter().map(|&id| (id, 0.0)).collect();
    if people.is_empty() {
        return Ok(totals);
    }

    for record in records {
        check_record(record, people)?;
        if record.participants.is_empty() {
            continue;
        }
        *totals.entry(record.payer).or_insert(0.0) += record.amount;
    }

    Ok(totals)
}

/// Total each person should have paid had every expense been split evenly
pub fn total_fair_share(
    records: &[ExpenseRecord],
    people: &BTreeSet<PersonId>,
) -> SplitResult<PersonTotals> {
    let mut totals: PersonTotals = people.iter().map(|&id| (id, 0.0)).collect();
    if people.is_empty() {
        return Ok(totals);
    }

    for record in records {
        check_record(record, people)?;
        let Some(share) = record.share() else {
            continue;
        };
        for &participant in &record.participants {
            *totals.entry(participant).or_insert(0.0) += share;
        }
    }

    Ok(totals)
}

/// Check `fair_share - contributions == -balance` for every person in `balances`
pub fn is_consistent(
    balances: &BalanceVector,
    contributions: &PersonTotals,
    fair_share: &PersonTotals,
) -> bool {
    balances.iter().all(|(person, balance)| {
        let paid = contributions.get(&person).copied().unwrap_or(0.0);
        let owed = fair_share.get(&person).copied().unwrap_or(0.0);
        approx_eq(owed - paid, -balance)
    })
}

/// Like [`is_consistent`] but names the first person whose totals disagree
pub fn check_consistency(
    balances: &BalanceVector,
    contributions: &PersonTotals,
    fair_share: &PersonTotals,
) -> SplitResult<()> {
    for (person, balance) in balances.iter() {
        let paid = contributions.get(&person).copied().unwrap_or(0.0);
        let owed = fair_share.get(&person).copied().unwrap_or(0.0);
        if !approx_eq(owed - paid, -balance) {
            return Err(SplitError::Validation(format!(
                "totals for {} disagree: paid {:.6}, owed {:.6}, balance {:.6}",
                person, paid, owed, balance
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn person(n: u128) -> PersonId {
        PersonId::from_uuid(Uuid::from_u128(n))
    }

    fn expense(
        amount: f64,
        payer: PersonId,
        participants: &[PersonId],
        category: &str,
    ) -> ExpenseRecord {
        ExpenseRecord::new(
            amount,
            payer,
            participants.iter().copied(),
            category,
            NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
        )
    }

    #[test]
    fn test_personal_category_totals() {
        let (a, b) = (person(1), person(2));
        let records = [
            expense(12.5, a, &[a, b], "Groceries"),
            expense(7.25, a, &[a], "Groceries"),
            expense(900.0, a, &[a, b], "Rent"),
            expense(40.0, b, &[a, b], "Groceries"),
            expense(3.0, a, &[a], "groceries"),
        ];

        let totals = personal_category_totals(&records, a);

        assert_eq!(totals.len(), 3);
        assert_eq!(totals["Groceries"], Money::from_cents(1975));
        assert_eq!(totals["Rent"], Money::from_cents(90000));
        assert_eq!(totals["groceries"], Money::from_cents(300));
        assert!(personal_category_totals(&records, person(3)).is_empty());
    }

    #[test]
    fn test_contributions_and_fair_share() {
        let (a, b, c) = (person(1), person(2), person(3));
        let people: BTreeSet<_> = [a, b, c].into_iter().collect();
        let records = [
            expense(90.0, a, &[a, b, c], "Utilities"),
            expense(30.0, b, &[b, c], "Snacks"),
        ];

        let paid = total_contributions(&records, &people).unwrap();
        let owed = total_fair_share(&records, &people).unwrap();

        assert_eq!(paid[&a], 90.0);
        assert_eq!(paid[&b], 30.0);
        assert_eq!(paid[&c], 0.0);
        assert_eq!(owed[&a], 30.0);
        assert_eq!(owed[&b], 45.0);
        assert_eq!(owed[&c], 45.0);

        let balances = aggregate(&records, &people).unwrap();
        assert!(is_consistent(&balances, &paid, &owed));
        assert!(check_consistency(&balances, &paid, &owed).is_ok());
    }

    #[test]
    fn test_inconsistent_totals_detected() {
        let (a, b) = (person(1), person(2));
        let balances: BalanceVector = [(a, 10.0), (b, -10.0)].into_iter().collect();
        let paid: PersonTotals = [(a, 20.0), (b, 0.0)].into_iter().collect();
        let owed: PersonTotals = [(a, 10.0), (b, 20.0)].into_iter().collect();

        assert!(!is_consistent(&balances, &paid, &owed));
        assert!(check_consistency(&balances, &paid, &owed)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_records_without_participants_skipped() {
        let (a, b) = (person(1), person(2));
        let people: BTreeSet<_> = [a, b].into_iter().collect();
        let records = [expense(50.0, a, &[], "Misc")];

        assert_eq!(total_contributions(&records, &people).unwrap()[&a], 0.0);
        assert_eq!(total_fair_share(&records, &people).unwrap()[&a], 0.0);
    }

    #[test]
    fn test_unknown_person_rejected() {
        let (a, stranger) = (person(1), person(9));
        let people: BTreeSet<_> = [a].into_iter().collect();
        let records = [expense(10.0, stranger, &[a], "Misc")];

        assert!(total_contributions(&records, &people).is_err());
        assert!(total_fair_share(&records, &people).is_err());
    }
}
