//! Person display formatting
//!
//! Formats people for terminal output in table and detail views.

use crate::models::{Money, Person};

/// Format a list of people as a table, with their net balance when known
pub fn format_person_list(people: &[(Person, Option<Money>)]) -> String {
    if people.is_empty() {
        return "No people found.".to_string();
    }

    let name_width = people
        .iter()
        .map(|(p, _)| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<28}  {:>12}\n",
        "ID",
        "Name",
        "Email",
        "Balance",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<28}  {:->12}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (person, balance) in people {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<28}  {:>12}\n",
            person.id.to_string(),
            person.name,
            super::truncate(&person.email, 28),
            balance.map(|b| b.to_string()).unwrap_or_default(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single person's details
pub fn format_person_details(person: &Person, paid: Money, balance: Money) -> String {
    let mut output = String::new();

    output.push_str(&format!("Person: {}\n", person.name));
    output.push_str(&format!("  ID:       {}\n", person.id));
    if !person.email.is_empty() {
        output.push_str(&format!("  Email:    {}\n", person.email));
    }
    if let Some(joined) = person.joined_on {
        output.push_str(&format!("  Joined:   {}\n", joined));
    }
    output.push('\n');
    output.push_str(&format!("  Paid:     {}\n", paid));
    output.push_str(&format!("  Balance:  {}\n", balance));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        person.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        person.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_person_list() {
        let alice = Person::with_email("Alice", "alice@example.com");
        let bob = Person::new("Bob");

        let output = format_person_list(&[
            (alice, Some(Money::from_cents(2500))),
            (bob, Some(Money::from_cents(-2500))),
        ]);

        assert!(output.contains("Alice"));
        assert!(output.contains("alice@example.com"));
        assert!(output.contains("$25.00"));
        assert!(output.contains("-$25.00"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_person_list(&[]).contains("No people found"));
    }

    #[test]
    fn test_format_person_details() {
        let person = Person::new("Charlie");
        let output = format_person_details(&person, Money::from_cents(1000), Money::zero());

        assert!(output.contains("Person: Charlie"));
        assert!(output.contains("Paid:     $10.00"));
        assert!(!output.contains("Email"));
    }
}
