//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod expense;
pub mod export;
pub mod import;
pub mod person;
pub mod report;
pub mod seed;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportArgs};
pub use person::{handle_person_command, PersonCommands};
pub use report::{handle_report_command, ReportCommands};
pub use seed::{handle_seed_command, SeedArgs};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{SplitError, SplitResult};
use crate::models::PersonId;
use crate::services::PersonService;

/// Parse a `YYYY-MM-DD` date given on the command line
pub(crate) fn parse_date_arg(value: &str) -> SplitResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SplitError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", value))
    })
}

/// Parse an amount given on the command line (`12.50`, `$12.50`)
pub(crate) fn parse_amount_arg(value: &str) -> SplitResult<f64> {
    let trimmed = value.trim();
    let amount: f64 = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .parse()
        .map_err(|_| SplitError::Validation(format!("Invalid amount: '{}'", value)))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(SplitError::Validation(format!(
            "Amount must be zero or positive, got '{}'",
            value
        )));
    }
    Ok(amount)
}

/// Resolve participant names or ids; `all` selects everyone
pub(crate) fn resolve_people(
    service: &PersonService,
    identifiers: &[String],
) -> SplitResult<BTreeSet<PersonId>> {
    if identifiers.is_empty()
        || identifiers
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case("all"))
    {
        return Ok(service.list()?.into_iter().map(|p| p.id).collect());
    }

    identifiers
        .iter()
        .map(|s| service.require(s).map(|p| p.id))
        .collect()
}

/// Open an output file for a report or export
pub(crate) fn create_output(path: &Path) -> SplitResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        SplitError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
