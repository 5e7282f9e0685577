//! Expense service
//!
//! The validation boundary for the ledger: every expense that reaches storage
//! has a valid amount, a category, at least one participant, and only
//! references people in the household.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseId, ExpenseRecord, ExpenseUpdate, PersonId};
use crate::storage::Storage;

use super::find_by_short_id;

/// Input for recording a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub amount: f64,
    pub payer: PersonId,
    pub participants: BTreeSet<PersonId>,
    /// Falls back to the configured default category when empty
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub account: Option<String>,
}

/// Filter options for listing expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub payer: Option<PersonId>,
    /// Exact, case-sensitive category
    pub category: Option<String>,
    /// Only expenses this person takes part in (as payer or participant)
    pub involving: Option<PersonId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payer(mut self, payer: PersonId) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn involving(mut self, person: PersonId) -> Self {
        self.involving = Some(person);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    default_category: String,
    require_payer_participation: bool,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            default_category: settings.default_category.clone(),
            require_payer_participation: settings.require_payer_participation,
        }
    }

    /// Record a new expense
    pub fn create(&self, input: CreateExpenseInput) -> SplitResult<ExpenseRecord> {
        let category = if input.category.trim().is_empty() {
            self.default_category.clone()
        } else {
            input.category.trim().to_string()
        };

        let mut expense = ExpenseRecord::new(
            input.amount,
            input.payer,
            input.participants,
            category,
            input.date,
        );
        expense.note = input.note.unwrap_or_default();
        expense.account = input.account.unwrap_or_default();

        self.add(expense)
    }

    /// Validate and store a fully built expense record
    pub fn add(&self, expense: ExpenseRecord) -> SplitResult<ExpenseRecord> {
        self.validate(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.save_or_revert(|| self.storage.expenses.delete(expense.id).map(|_| ()))?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;

        info!(expense = %expense.id, amount = expense.amount, payer = %expense.payer, "expense recorded");
        Ok(expense)
    }

    /// Check an expense against the household and the configured policy
    pub fn validate(&self, expense: &ExpenseRecord) -> SplitResult<()> {
        expense
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        if self.storage.people.get(expense.payer)?.is_none() {
            return Err(SplitError::unknown_person(expense.payer));
        }

        for &participant in &expense.participants {
            if self.storage.people.get(participant)?.is_none() {
                return Err(SplitError::unknown_person(participant));
            }
        }

        if self.require_payer_participation {
            expense
                .validate_payer_participates()
                .map_err(|e| SplitError::Validation(e.to_string()))?;
        }

        Ok(())
    }

    pub fn get(&self, id: ExpenseId) -> SplitResult<Option<ExpenseRecord>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by full id or the short id shown in listings
    pub fn find(&self, identifier: &str) -> SplitResult<Option<ExpenseRecord>> {
        if let Ok(id) = identifier.trim().parse::<ExpenseId>() {
            return self.storage.expenses.get(id);
        }

        let expenses = self.storage.expenses.get_all()?;
        find_by_short_id(expenses, identifier, ExpenseId::PREFIX, |e| *e.id.as_uuid())
    }

    /// Like [`find`](Self::find) but a missing expense is an error
    pub fn require(&self, identifier: &str) -> SplitResult<ExpenseRecord> {
        self.find(identifier)?
            .ok_or_else(|| SplitError::expense_not_found(identifier))
    }

    /// All expenses in recorded order
    pub fn list_all(&self) -> SplitResult<Vec<ExpenseRecord>> {
        self.storage.expenses.get_all()
    }

    /// List expenses matching a filter, in recorded order
    pub fn list(&self, filter: &ExpenseFilter) -> SplitResult<Vec<ExpenseRecord>> {
        let mut expenses = match filter.payer {
            Some(payer) => self.storage.expenses.get_by_payer(payer)?,
            None => self.storage.expenses.get_all()?,
        };

        if let Some(category) = &filter.category {
            expenses.retain(|e| &e.category == category);
        }
        if let Some(person) = filter.involving {
            expenses.retain(|e| e.involves(person));
        }
        if let Some(start) = filter.start_date {
            expenses.retain(|e| e.date >= start);
        }
        if let Some(end) = filter.end_date {
            expenses.retain(|e| e.date <= end);
        }
        if let Some(limit) = filter.limit {
            expenses.truncate(limit);
        }

        Ok(expenses)
    }

    pub fn list_by_payer(&self, payer: PersonId) -> SplitResult<Vec<ExpenseRecord>> {
        self.storage.expenses.get_by_payer(payer)
    }

    pub fn list_by_category(&self, category: &str) -> SplitResult<Vec<ExpenseRecord>> {
        self.storage.expenses.get_by_category(category)
    }

    /// Distinct categories in use, sorted
    pub fn categories(&self) -> SplitResult<Vec<String>> {
        let categories: BTreeSet<String> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .map(|e| e.category)
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Apply a partial update; the result is validated like a new expense
    pub fn update(&self, id: ExpenseId, update: ExpenseUpdate) -> SplitResult<ExpenseRecord> {
        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| SplitError::expense_not_found(id.to_string()))?;

        if update.is_empty() {
            return Ok(expense);
        }

        let before = expense.clone();
        update.apply_to(&mut expense);
        self.validate(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.save_or_revert(|| self.storage.expenses.upsert(before.clone()))?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &before,
            &expense,
        )?;

        info!(expense = %expense.id, "expense updated");
        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> SplitResult<ExpenseRecord> {
        let expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| SplitError::expense_not_found(id.to_string()))?;

        self.storage.expenses.delete(id)?;
        self.save_or_revert(|| self.storage.expenses.upsert(expense.clone()))?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;

        info!(expense = %expense.id, "expense deleted");
        Ok(expense)
    }

    pub fn count(&self) -> SplitResult<usize> {
        self.storage.expenses.count()
    }

    /// Write the expense file; if that fails, undo the in-memory change with
    /// `revert` so memory keeps matching what is on disk
    fn save_or_revert(&self, revert: impl FnOnce() -> SplitResult<()>) -> SplitResult<()> {
        let err = match self.storage.expenses.save() {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        if let Err(undo) = revert() {
            warn!(error = %undo, "could not roll back unsaved expense change");
        }
        Err(err)
    }
}
