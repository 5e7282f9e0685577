//! Personal Spending Report
//!
//! What one person has paid, broken down by category.

use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::export::escape_csv;
use crate::models::{Money, Person};
use crate::services::SettlementService;
use crate::storage::Storage;

/// Spending in one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    pub category: String,
    pub total: Money,
    /// Percentage of the person's total spending
    pub percentage: f64,
}

/// Personal Spending Report
#[derive(Debug, Clone)]
pub struct PersonalSpendingReport {
    pub person: Person,
    /// Largest category first
    pub categories: Vec<CategorySpending>,
    pub total: Money,
    pub currency_symbol: String,
}

impl PersonalSpendingReport {
    pub fn generate(storage: &Storage, person: &Person) -> SplitResult<Self> {
        let totals = SettlementService::new(storage).personal_category_totals(person.id)?;
        let total: Money = totals.values().copied().sum();

        let mut categories: Vec<CategorySpending> = totals
            .into_iter()
            .map(|(category, amount)| CategorySpending {
                category,
                total: amount,
                percentage: if total.is_zero() {
                    0.0
                } else {
                    amount.cents() as f64 / total.cents() as f64 * 100.0
                },
            })
            .collect();

        categories.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Ok(Self {
            person: person.clone(),
            categories,
            total,
            currency_symbol: "$".to_string(),
        })
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// The `limit` largest categories
    pub fn top_categories(&self, limit: usize) -> &[CategorySpending] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Personal Spending: {}\n", self.person.name));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.categories.is_empty() {
            output.push_str("No expenses paid.\n");
            return output;
        }

        output.push_str(&format!("{:<35} {:>14} {:>8}\n", "Category", "Amount", "%"));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<35} {:>14} {:>7.1}%\n",
                row.category,
                row.total.format_with_symbol(&self.currency_symbol),
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<35} {:>14}\n",
            "TOTAL",
            self.total.format_with_symbol(&self.currency_symbol)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> SplitResult<()> {
        writeln!(writer, "Person,Category,Amount,Percentage")
            .map_err(|e| SplitError::Export(e.to_string()))?;

        for row in &self.categories {
            writeln!(
                writer,
                "{},{},{:.2},{:.2}",
                escape_csv(&self.person.name),
                escape_csv(&row.category),
                row.total.as_f64(),
                row.percentage
            )
            .map_err(|e| SplitError::Export(e.to_string()))?;
        }

        Ok(())
    }
}
