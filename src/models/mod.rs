//! Core data models for roomsplit
//!
//! This module contains the data structures that represent the shared-expense
//! domain: people, expenses and settlement transfers.

pub mod expense;
pub mod ids;
pub mod money;
pub mod person;
pub mod transfer;

pub use expense::{ExpenseRecord, ExpenseUpdate, ExpenseValidationError};
pub use ids::{ExpenseId, PersonId};
pub use money::Money;
pub use person::{Person, PersonUpdate, PersonValidationError};
pub use transfer::Transfer;
