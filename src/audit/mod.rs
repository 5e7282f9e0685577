//! Audit trail for people and expenses
//!
//! Every create, update and delete performed through the services is appended
//! to a JSONL file (`audit.log` in the data directory) together with the
//! entity's before/after state.
//!
//! ```rust,ignore
//! use roomsplit::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Person,
//!     person.id.to_string(),
//!     Some(person.name.clone()),
//!     &person,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
