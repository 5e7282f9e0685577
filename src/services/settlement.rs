//! Settlement service
//!
//! Runs the balance engine over a snapshot of storage.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::engine::{self, BalanceVector, PersonTotals};
use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseRecord, Money, Person, PersonId, Transfer};
use crate::storage::Storage;

/// Balances and the transfers that settle them, computed from one snapshot
#[derive(Debug, Clone)]
pub struct Settlement {
    pub people: Vec<Person>,
    pub balances: BalanceVector,
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    /// Display name for a person in this settlement
    pub fn name_of(&self, id: PersonId) -> String {
        self.people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Whether everyone is already square
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Total money moved by the transfers
    pub fn total_transferred(&self) -> Money {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Service exposing the engine's computations over stored data
pub struct SettlementService<'a> {
    storage: &'a Storage,
}

impl<'a> SettlementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Net balance per person
    pub fn balances(&self) -> SplitResult<BalanceVector> {
        let (people, expenses) = self.storage.snapshot()?;
        engine::aggregate(&expenses, &engine::person_ids(&people))
    }

    /// Compute balances and the transfers that settle them
    pub fn settle(&self) -> SplitResult<Settlement> {
        let (people, expenses) = self.storage.snapshot()?;
        let balances = engine::aggregate(&expenses, &engine::person_ids(&people))?;
        let transfers = engine::settle(&balances);

        let residual = engine::apply_transfers(&balances, &transfers);
        debug!(residual = residual.max_abs(), "largest balance left after settlement");

        info!(
            people = people.len(),
            expenses = expenses.len(),
            transfers = transfers.len(),
            "settlement computed"
        );

        Ok(Settlement {
            people,
            balances,
            transfers,
        })
    }

    /// Amount each person has paid
    pub fn contributions(&self) -> SplitResult<PersonTotals> {
        let (people, expenses) = self.storage.snapshot()?;
        engine::total_contributions(&expenses, &engine::person_ids(&people))
    }

    /// Amount each person should have paid
    pub fn fair_shares(&self) -> SplitResult<PersonTotals> {
        let (people, expenses) = self.storage.snapshot()?;
        engine::total_fair_share(&expenses, &engine::person_ids(&people))
    }

    /// Per-category totals of what one person has paid
    pub fn personal_category_totals(&self, person: PersonId) -> SplitResult<BTreeMap<String, Money>> {
        if self.storage.people.get(person)?.is_none() {
            return Err(SplitError::person_not_found(person.to_string()));
        }

        let expenses: Vec<ExpenseRecord> = self.storage.expenses.get_by_payer(person)?;
        Ok(engine::personal_category_totals(&expenses, person))
    }

    /// Verify that contributions, fair shares and balances agree
    pub fn check_consistency(&self) -> SplitResult<()> {
        let (people, expenses) = self.storage.snapshot()?;
        let ids = engine::person_ids(&people);

        let balances = engine::aggregate(&expenses, &ids)?;
        let paid = engine::total_contributions(&expenses, &ids)?;
        let owed = engine::total_fair_share(&expenses, &ids)?;

        engine::check_consistency(&balances, &paid, &owed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomsplitPaths;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn person(storage: &Storage, name: &str) -> PersonId {
        let person = Person::new(name);
        let id = person.id;
        storage.people.upsert(person).unwrap();
        id
    }

    fn expense(storage: &Storage, amount: f64, payer: PersonId, participants: &[PersonId], category: &str) {
        let record = ExpenseRecord::new(
            amount,
            payer,
            participants.iter().copied(),
            category,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        storage.expenses.upsert(record).unwrap();
    }

    #[test]
    fn test_empty_household() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SettlementService::new(&storage);

        let settlement = service.settle().unwrap();
        assert!(settlement.balances.is_empty());
        assert!(settlement.is_settled());
    }

    #[test]
    fn test_three_way_split() {
        let (_temp_dir, storage) = create_test_storage();
        let a = person(&storage, "Alice");
        let b = person(&storage, "Bob");
        let c = person(&storage, "Carol");

        expense(&storage, 90.0, a, &[a, b, c], "Utilities");
        expense(&storage, 30.0, b, &[b, c], "Snacks");

        let service = SettlementService::new(&storage);
        let settlement = service.settle().unwrap();

        assert_eq!(settlement.balances.get(a), Some(60.0));
        assert_eq!(settlement.balances.get(b), Some(-15.0));
        assert_eq!(settlement.balances.get(c), Some(-45.0));
        assert_eq!(
            settlement.transfers,
            vec![
                Transfer::new(c, a, Money::from_cents(4500)),
                Transfer::new(b, a, Money::from_cents(1500)),
            ]
        );
        assert_eq!(settlement.total_transferred(), Money::from_cents(6000));
        assert_eq!(settlement.name_of(c), "Carol");

        service.check_consistency().unwrap();
    }

    #[test]
    fn test_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let a = person(&storage, "Alice");
        let b = person(&storage, "Bob");

        expense(&storage, 40.0, a, &[a, b], "Groceries");
        expense(&storage, 10.0, a, &[a], "Snacks");
        expense(&storage, 20.0, b, &[a, b], "Groceries");

        let service = SettlementService::new(&storage);

        let paid = service.contributions().unwrap();
        let owed = service.fair_shares().unwrap();
        assert_eq!(paid[&a], 50.0);
        assert_eq!(owed[&a], 40.0);
        assert_eq!(owed[&b], 30.0);

        let totals = service.personal_category_totals(a).unwrap();
        assert_eq!(totals["Groceries"], Money::from_cents(4000));
        assert_eq!(totals["Snacks"], Money::from_cents(1000));

        assert!(service
            .personal_category_totals(PersonId::new())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_dangling_reference_is_reported() {
        let (_temp_dir, storage) = create_test_storage();
        let a = person(&storage, "Alice");
        let gone = PersonId::new();

        expense(&storage, 12.0, a, &[a, gone], "Misc");

        let err = SettlementService::new(&storage).settle().unwrap_err();
        assert!(matches!(err, SplitError::UnknownPerson { .. }));
    }
}
