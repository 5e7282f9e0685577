//! CSV Export functionality
//!
//! Exports expenses in the same column layout the importer reads, so an
//! exported file can be imported into another household.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::models::PersonId;
use crate::storage::Storage;

/// Export all expenses to CSV
///
/// Payer and participants are written as names; participants are joined
/// with `;`.
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: &mut W) -> SplitResult<()> {
    let names: HashMap<PersonId, String> = storage
        .people
        .get_all()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let name_of = |id: &PersonId| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    writeln!(writer, "ID,Date,Category,Amount,Payer,Participants,Note,Account")
        .map_err(|e| SplitError::Export(e.to_string()))?;

    for expense in storage.expenses.get_all()? {
        let participants = expense
            .participants
            .iter()
            .map(name_of)
            .collect::<Vec<_>>()
            .join(";");

        writeln!(
            writer,
            "{},{},{},{:.2},{},{},{},{}",
            expense.id,
            expense.date,
            escape_csv(&expense.category),
            expense.amount,
            escape_csv(&name_of(&expense.payer)),
            escape_csv(&participants),
            escape_csv(&expense.note),
            escape_csv(&expense.account)
        )
        .map_err(|e| SplitError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote or newline
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomsplitPaths;
    use crate::models::{ExpenseRecord, Person};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_export_expenses_csv() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let alice = Person::new("Alice");
        let bob = Person::new("Bob");
        storage.people.upsert(alice.clone()).unwrap();
        storage.people.upsert(bob.clone()).unwrap();

        let mut expense = ExpenseRecord::new(
            42.5,
            alice.id,
            [alice.id, bob.id],
            "Food, drink",
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        expense.note = "pizza night".to_string();
        storage.expenses.upsert(expense).unwrap();

        let mut output = Vec::new();
        export_expenses_csv(&storage, &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "ID,Date,Category,Amount,Payer,Participants,Note,Account");
        assert!(lines[1].contains(",2025-01-15,\"Food, drink\",42.50,Alice,"));
        assert!(lines[1].contains("Alice;Bob") || lines[1].contains("Bob;Alice"));
        assert!(lines[1].ends_with(",pizza night,"));
    }
}
