//! roomsplit - shared expense tracking and debt settlement
//!
//! Records who paid for what in a shared household and works out the
//! smallest practical set of payments that settles everyone up.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `engine`: Pure balance aggregation and settlement algorithms
//! - `models`: People, expenses, transfers and money
//! - `storage`: JSON file storage layer
//! - `services`: Validation and business logic on top of storage
//! - `audit`: Audit logging of every change
//! - `reports`: Settlement, personal spending and household summaries
//! - `export`: JSON, YAML and CSV export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `roomsplit` binary
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use chrono::NaiveDate;
//! use roomsplit::engine::{aggregate, settle};
//! use roomsplit::models::{ExpenseRecord, Money, Person};
//!
//! let alice = Person::new("Alice");
//! let bob = Person::new("Bob");
//! let people: BTreeSet<_> = [alice.id, bob.id].into_iter().collect();
//!
//! let rent = ExpenseRecord::new(
//!     100.0,
//!     alice.id,
//!     [alice.id, bob.id],
//!     "Rent",
//!     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//! );
//!
//! let balances = aggregate(&[rent], &people).unwrap();
//! let transfers = settle(&balances);
//!
//! assert_eq!(transfers.len(), 1);
//! assert_eq!(transfers[0].debtor, bob.id);
//! assert_eq!(transfers[0].amount, Money::from_cents(5000));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{SplitError, SplitResult};
