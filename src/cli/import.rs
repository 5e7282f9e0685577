//! CLI command handler for CSV import
//!
//! Rows that fail to parse or validate are reported by line number; the
//! remaining rows are still imported.

use std::fs::File;
use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::display::NameLookup;
use crate::error::{SplitError, SplitResult};
use crate::models::Money;
use crate::services::{ImportOptions, ImportService, PersonService};
use crate::storage::Storage;

/// Arguments for `roomsplit import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to CSV file
    pub file: PathBuf,

    /// Date format used in the file (strftime); ISO dates always work
    #[arg(long)]
    pub date_format: Option<String>,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Randomly assign payer/participants to rows without them, using this seed
    #[arg(long)]
    pub assign_seed: Option<u64>,

    /// Parse and report without storing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> SplitResult<()> {
    if !args.delimiter.is_ascii() {
        return Err(SplitError::Validation(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            args.delimiter
        )));
    }

    let mut options = ImportOptions::from_settings(settings);
    if let Some(format) = args.date_format {
        options.date_format = format;
    }
    options.delimiter = args.delimiter as u8;
    options.assign_seed = args.assign_seed;

    let service = ImportService::new(storage, settings);

    if args.dry_run {
        let file = File::open(&args.file).map_err(|e| {
            SplitError::Import(format!("Failed to open {}: {}", args.file.display(), e))
        })?;
        let rows = service.parse(file, &options)?;
        let people = PersonService::new(storage).list()?;
        let names = NameLookup::new(&people);

        println!("Import Preview for '{}'", args.file.display());
        println!("{}", "=".repeat(40));
        for row in &rows {
            match row {
                Ok(parsed) => println!(
                    "  Line {:>4}: {} {} {} paid by {}, shared by {}",
                    parsed.line,
                    parsed.expense.date,
                    parsed.expense.category,
                    Money::from_amount(parsed.expense.amount),
                    names.name(parsed.expense.payer),
                    names.participants(&parsed.expense)
                ),
                Err((line, message)) => println!("  Line {:>4}: ERROR {}", line, message),
            }
        }
        let ok = rows.iter().filter(|r| r.is_ok()).count();
        println!();
        println!("  Parsed:  {}", ok);
        println!("  Errors:  {}", rows.len() - ok);
        println!("Dry run: nothing was stored.");
        return Ok(());
    }

    let result = service.import_file(&args.file, &options)?;

    println!("Import Complete!");
    println!("  Imported:    {}", result.imported);
    if !result.is_clean() {
        println!("  Errors:      {}", result.error_count());
        for (line, message) in &result.errors {
            println!("    Line {}: {}", line, message);
        }
    }

    Ok(())
}
