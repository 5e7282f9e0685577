//! Expense repository backed by expenses.json
//!
//! Expenses keep the order in which they were recorded. That order is what
//! the balance engine folds over, and it survives save/load.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SplitError;
use crate::models::{ExpenseId, ExpenseRecord, PersonId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<ExpenseRecord>,
}

/// Repository for expense persistence with a payer index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, ExpenseRecord>>,
    /// Insertion order
    order: RwLock<Vec<ExpenseId>>,
    /// Index: payer -> expense_ids
    by_payer: RwLock<HashMap<PersonId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            by_payer: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build indexes
    pub fn load(&self) -> Result<(), SplitError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut order = self
            .order
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_payer = self
            .by_payer
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        order.clear();
        by_payer.clear();

        for expense in file_data.expenses {
            let id = expense.id;
            order.push(id);
            by_payer.entry(expense.payer).or_default().push(id);
            data.insert(id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SplitError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All expenses in the order they were recorded
    pub fn get_all(&self) -> Result<Vec<ExpenseRecord>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let order = self
            .order
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(order.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    /// Expenses paid by a person, in recorded order
    pub fn get_by_payer(&self, payer: PersonId) -> Result<Vec<ExpenseRecord>, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_payer = self
            .by_payer
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_payer
            .get(&payer)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    /// Expenses in a category (exact, case-sensitive match)
    pub fn get_by_category(&self, category: &str) -> Result<Vec<ExpenseRecord>, SplitError> {
        let mut expenses = self.get_all()?;
        expenses.retain(|e| e.category == category);
        Ok(expenses)
    }

    /// Whether any expense names the person as payer or participant
    pub fn references(&self, person: PersonId) -> Result<bool, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().any(|e| e.involves(person)))
    }

    /// Insert or update an expense; updates keep their original position
    pub fn upsert(&self, expense: ExpenseRecord) -> Result<(), SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut order = self
            .order
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_payer = self
            .by_payer
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = expense.id;
        match data.get(&id) {
            Some(old) => {
                if let Some(ids) = by_payer.get_mut(&old.payer) {
                    ids.retain(|&i| i != id);
                }
            }
            None => order.push(id),
        }

        by_payer.entry(expense.payer).or_default().push(id);
        data.insert(id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<bool, SplitError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut order = self
            .order
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_payer = self
            .by_payer
            .write()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let Some(expense) = data.remove(&id) else {
            return Ok(false);
        };

        order.retain(|&i| i != id);
        if let Some(ids) = by_payer.get_mut(&expense.payer) {
            ids.retain(|&i| i != id);
        }
        Ok(true)
    }

    pub fn count(&self) -> Result<usize, SplitError> {
        let data = self
            .data
            .read()
            .map_err(|e| SplitError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
