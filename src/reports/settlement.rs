//! Settlement Report
//!
//! Who owes whom, plus each person's net balance.

use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::export::escape_csv;
use crate::models::{Money, PersonId};
use crate::services::{Settlement, SettlementService};
use crate::storage::Storage;

/// One payment that settles part of the household's debts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementLine {
    pub debtor: PersonId,
    pub debtor_name: String,
    pub creditor: PersonId,
    pub creditor_name: String,
    pub amount: Money,
}

/// A person's net position before settling
#[derive(Debug, Clone)]
pub struct BalanceLine {
    pub person: PersonId,
    pub name: String,
    /// Positive: owed money. Negative: owes money.
    pub balance: Money,
}

/// Settlement Report
#[derive(Debug, Clone)]
pub struct SettlementReport {
    pub lines: Vec<SettlementLine>,
    pub balances: Vec<BalanceLine>,
    pub total_transferred: Money,
    pub currency_symbol: String,
}

impl SettlementReport {
    /// Generate the report from current storage
    pub fn generate(storage: &Storage) -> SplitResult<Self> {
        let settlement = SettlementService::new(storage).settle()?;
        Ok(Self::from_settlement(&settlement))
    }

    /// Build the report from an already computed settlement
    pub fn from_settlement(settlement: &Settlement) -> Self {
        let lines = settlement
            .transfers
            .iter()
            .map(|t| SettlementLine {
                debtor: t.debtor,
                debtor_name: settlement.name_of(t.debtor),
                creditor: t.creditor,
                creditor_name: settlement.name_of(t.creditor),
                amount: t.amount,
            })
            .collect();

        let mut balances: Vec<BalanceLine> = settlement
            .balances
            .iter()
            .map(|(person, balance)| BalanceLine {
                person,
                name: settlement.name_of(person),
                balance: Money::from_amount(balance),
            })
            .collect();
        balances.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.name.cmp(&b.name)));

        Self {
            lines,
            balances,
            total_transferred: settlement.total_transferred(),
            currency_symbol: "$".to_string(),
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Settlement Report\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.lines.is_empty() {
            output.push_str("Everyone is settled up.\n");
        } else {
            output.push_str(&format!(
                "{:<20} {:<20} {:>15}\n",
                "Person Owing", "Owes To", "Amount"
            ));
            output.push_str(&"-".repeat(60));
            output.push('\n');

            for line in &self.lines {
                output.push_str(&format!(
                    "{:<20} {:<20} {:>15}\n",
                    line.debtor_name,
                    line.creditor_name,
                    self.money(line.amount)
                ));
            }

            output.push_str(&"-".repeat(60));
            output.push('\n');
            output.push_str(&format!(
                "{:<41} {:>15}\n",
                format!("{} transfer(s)", self.lines.len()),
                self.money(self.total_transferred)
            ));
        }

        if !self.balances.is_empty() {
            output.push_str("\nNet Balances\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for line in &self.balances {
                let status = if line.balance.is_positive() {
                    "is owed"
                } else if line.balance.is_negative() {
                    "owes"
                } else {
                    "settled"
                };
                output.push_str(&format!(
                    "{:<30} {:>15}  {}\n",
                    line.name,
                    self.money(line.balance),
                    status
                ));
            }
        }

        output
    }

    /// Export the transfers to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> SplitResult<()> {
        writeln!(writer, "Person Owing,Owes To,Amount")
            .map_err(|e| SplitError::Export(e.to_string()))?;

        for line in &self.lines {
            writeln!(
                writer,
                "{},{},{:.2}",
                escape_csv(&line.debtor_name),
                escape_csv(&line.creditor_name),
                line.amount.as_f64()
            )
            .map_err(|e| SplitError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomsplitPaths;
    use crate::models::{ExpenseRecord, Person};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_person(storage: &Storage, name: &str) -> PersonId {
        let person = Person::new(name);
        let id = person.id;
        storage.people.upsert(person).unwrap();
        id
    }

    #[test]
    fn test_generate_settlement_report() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = add_person(&storage, "Alice");
        let bob = add_person(&storage, "Bob");

        storage
            .expenses
            .upsert(ExpenseRecord::new(
                100.0,
                alice,
                [alice, bob],
                "Groceries",
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ))
            .unwrap();

        let report = SettlementReport::generate(&storage).unwrap();

        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].debtor_name, "Bob");
        assert_eq!(report.lines[0].creditor_name, "Alice");
        assert_eq!(report.lines[0].amount, Money::from_cents(5000));
        assert_eq!(report.balances[0].name, "Alice");
        assert_eq!(report.balances[1].balance, Money::from_cents(-5000));

        let text = report.format_terminal();
        assert!(text.contains("Person Owing"));
        assert!(text.contains("$50.00"));
        assert!(text.contains("owes"));

        let mut csv = Vec::new();
        report.export_csv(&mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert_eq!(csv, "Person Owing,Owes To,Amount\nBob,Alice,50.00\n");
    }

    #[test]
    fn test_settled_household() {
        let (_temp_dir, storage) = create_test_storage();
        add_person(&storage, "Alice");

        let report = SettlementReport::generate(&storage)
            .unwrap()
            .with_currency_symbol("€");

        assert!(report.lines.is_empty());
        assert!(report.format_terminal().contains("Everyone is settled up."));
    }
}
