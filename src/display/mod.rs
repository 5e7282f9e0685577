//! Display formatting for terminal output
//!
//! Provides utilities for formatting people and expenses as tables and
//! detail views.

pub mod expense;
pub mod person;

pub use expense::{format_expense_details, format_expense_list, NameLookup};
pub use person::{format_person_details, format_person_list};

/// Pad or cut a string to exactly `width` characters
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short     ");
        let result = truncate("A very long string", 10);
        assert_eq!(result, "A very ...");
        assert_eq!(truncate("Café au lait", 8), "Café ...");
    }
}
