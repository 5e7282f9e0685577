//! JSON Export functionality
//!
//! Exports people, expenses and the derived settlement to JSON with schema
//! versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::BalanceVector;
use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseRecord, Person, Transfer};
use crate::services::SettlementService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All people
    pub people: Vec<Person>,

    /// All expenses, in the order they were recorded
    pub expenses: Vec<ExpenseRecord>,

    /// Net balance per person at export time
    pub balances: BalanceVector,

    /// Transfers that settle `balances`
    pub transfers: Vec<Transfer>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub person_count: usize,
    pub expense_count: usize,
    pub transfer_count: usize,

    /// Sum of all expense amounts
    pub total_expenses: f64,

    /// Date range of expenses (earliest)
    pub earliest_expense: Option<String>,

    /// Date range of expenses (latest)
    pub latest_expense: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> SplitResult<Self> {
        let settlement = SettlementService::new(storage).settle()?;
        let expenses = storage.expenses.get_all()?;

        let metadata = ExportMetadata {
            person_count: settlement.people.len(),
            expense_count: expenses.len(),
            transfer_count: settlement.transfers.len(),
            total_expenses: expenses.iter().map(|e| e.amount).sum(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            people: settlement.people,
            expenses,
            balances: settlement.balances,
            transfers: settlement.transfers,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let person_ids: HashSet<_> = self.people.iter().map(|p| p.id).collect();

        for expense in &self.expenses {
            if !person_ids.contains(&expense.payer) {
                return Err(format!(
                    "Expense {} references unknown payer {}",
                    expense.id, expense.payer
                ));
            }
            if let Some(unknown) = expense
                .participants
                .iter()
                .find(|p| !person_ids.contains(p))
            {
                return Err(format!(
                    "Expense {} references unknown participant {}",
                    expense.id, unknown
                ));
            }
        }

        for transfer in &self.transfers {
            if !person_ids.contains(&transfer.debtor) || !person_ids.contains(&transfer.creditor)
            {
                return Err(format!("Transfer {} references an unknown person", transfer));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> SplitResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a JSON export, checking its integrity
pub fn import_from_json(json_str: &str) -> SplitResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| SplitError::Import(e.to_string()))?;

    export.validate().map_err(SplitError::Import)?;

    Ok(export)
}
