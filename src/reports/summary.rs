//! Household Summary
//!
//! Totals for the whole household: what was spent, who paid it, and what
//! each person's fair share was.

use std::io::Write;

use crate::engine;
use crate::error::{SplitError, SplitResult};
use crate::export::escape_csv;
use crate::models::{Money, PersonId};
use crate::storage::Storage;

/// One person's row in the summary
#[derive(Debug, Clone)]
pub struct PersonSummaryRow {
    pub person: PersonId,
    pub name: String,
    pub contributed: Money,
    pub fair_share: Money,
    /// `contributed - fair_share`, computed before rounding
    pub balance: Money,
}

/// Household Summary
#[derive(Debug, Clone)]
pub struct HouseholdSummary {
    pub total_expenses: Money,
    pub expense_count: usize,
    pub category_count: usize,
    /// People in name order
    pub rows: Vec<PersonSummaryRow>,
    pub currency_symbol: String,
}

impl HouseholdSummary {
    pub fn generate(storage: &Storage) -> SplitResult<Self> {
        let (people, expenses) = storage.snapshot()?;
        let ids = engine::person_ids(&people);

        let balances = engine::aggregate(&expenses, &ids)?;
        let paid = engine::total_contributions(&expenses, &ids)?;
        let owed = engine::total_fair_share(&expenses, &ids)?;

        let mut rows: Vec<PersonSummaryRow> = people
            .iter()
            .map(|person| PersonSummaryRow {
                person: person.id,
                name: person.name.clone(),
                contributed: Money::from_amount(paid.get(&person.id).copied().unwrap_or(0.0)),
                fair_share: Money::from_amount(owed.get(&person.id).copied().unwrap_or(0.0)),
                balance: Money::from_amount(balances.get(person.id).unwrap_or(0.0)),
            })
            .collect();
        rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let categories: std::collections::BTreeSet<&str> =
            expenses.iter().map(|e| e.category.as_str()).collect();

        Ok(Self {
            total_expenses: Money::from_amount(total),
            expense_count: expenses.len(),
            category_count: categories.len(),
            rows,
            currency_symbol: "$".to_string(),
        })
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let symbol = self.currency_symbol.as_str();
        let mut output = String::new();

        output.push_str("Household Summary\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "Total Household Expenses: {}\n",
            self.total_expenses.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Expenses: {}   Categories: {}\n\n",
            self.expense_count, self.category_count
        ));

        output.push_str(&format!(
            "{:<22} {:>15} {:>15} {:>15}\n",
            "Person", "Contributed", "Fair Share", "Balance"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<22} {:>15} {:>15} {:>15}\n",
                row.name,
                row.contributed.format_with_symbol(symbol),
                row.fair_share.format_with_symbol(symbol),
                row.balance.format_with_symbol(symbol)
            ));
        }

        output
    }

    /// Export the per-person rows to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> SplitResult<()> {
        writeln!(writer, "Person,Contributed,Fair Share,Balance")
            .map_err(|e| SplitError::Export(e.to_string()))?;

        for row in &self.rows {
            writeln!(
                writer,
                "{},{:.2},{:.2},{:.2}",
                escape_csv(&row.name),
                row.contributed.as_f64(),
                row.fair_share.as_f64(),
                row.balance.as_f64()
            )
            .map_err(|e| SplitError::Export(e.to_string()))?;
        }

        writeln!(writer, "TOTAL,{:.2},,", self.total_expenses.as_f64())
            .map_err(|e| SplitError::Export(e.to_string()))?;

        Ok(())
    }
}
