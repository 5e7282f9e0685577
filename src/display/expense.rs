//! Expense display formatting
//!
//! Expenses only carry person ids; these formatters resolve them to names
//! against the current list of people.

use std::collections::HashMap;

use crate::models::{ExpenseRecord, Money, Person, PersonId};

use super::truncate;

/// Id-to-name lookup for a household
pub struct NameLookup<'a> {
    names: HashMap<PersonId, &'a str>,
}

impl<'a> NameLookup<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        Self {
            names: people.iter().map(|p| (p.id, p.name.as_str())).collect(),
        }
    }

    /// Name for `id`, or its short id when the person is gone
    pub fn name(&self, id: PersonId) -> String {
        self.names
            .get(&id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Participant names joined with ", ", or "All" when everyone shares
    pub fn participants(&self, expense: &ExpenseRecord) -> String {
        let everyone = self.names.len() > 1
            && expense.participants.len() == self.names.len()
            && self.names.keys().all(|id| expense.participants.contains(id));
        if everyone {
            return "All".to_string();
        }

        let mut names: Vec<String> = expense.participants.iter().map(|&p| self.name(p)).collect();
        names.sort();
        names.join(", ")
    }
}

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[ExpenseRecord], people: &[Person]) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let lookup = NameLookup::new(people);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:10} {:16} {:>12} {:14} {}\n",
        "ID", "Date", "Category", "Amount", "Paid By", "Shared With"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format!(
            "{:<12} {} {} {:>12} {} {}\n",
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.category, 16),
            Money::from_amount(expense.amount),
            truncate(&lookup.name(expense.payer), 14),
            lookup.participants(expense)
        ));
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(90));
    output.push('\n');
    output.push_str(&format!(
        "{:<12} {:10} {:16} {:>12}\n",
        format!("{} expenses", expenses.len()),
        "",
        "",
        Money::from_amount(total)
    ));

    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &ExpenseRecord, people: &[Person]) -> String {
    let lookup = NameLookup::new(people);
    let mut output = String::new();

    output.push_str(&format!("Expense:      {}\n", expense.id));
    output.push_str(&format!("Date:         {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:       {}\n", Money::from_amount(expense.amount)));
    output.push_str(&format!("Category:     {}\n", expense.category));
    output.push_str(&format!("Paid By:      {}\n", lookup.name(expense.payer)));
    output.push_str(&format!("Shared With:  {}\n", lookup.participants(expense)));

    let shares = Money::from_amount(expense.amount).split_even(expense.participants.len());
    match (shares.first(), shares.last()) {
        (Some(first), Some(last)) if first == last => {
            output.push_str(&format!("Share Each:   {}\n", first));
        }
        (Some(first), Some(last)) => {
            output.push_str(&format!("Share Each:   {} to {}\n", last, first));
        }
        _ => {}
    }
    if !expense.account.is_empty() {
        output.push_str(&format!("Account:      {}\n", expense.account));
    }
    if !expense.note.is_empty() {
        output.push_str(&format!("Note:         {}\n", expense.note));
    }

    output
}
