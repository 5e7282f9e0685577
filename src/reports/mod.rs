//! Reports module for roomsplit
//!
//! Each report is generated from storage, then rendered either as terminal
//! text (`format_terminal`) or CSV (`export_csv`).

pub mod personal;
pub mod settlement;
pub mod summary;

pub use personal::{CategorySpending, PersonalSpendingReport};
pub use settlement::{BalanceLine, SettlementLine, SettlementReport};
pub use summary::{HouseholdSummary, PersonSummaryRow};
