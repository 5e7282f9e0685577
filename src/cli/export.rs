//! CLI commands for data export

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::error::SplitResult;
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

use super::create_output;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (expenses only)
    Csv,
    /// JSON format (full export)
    Json,
    /// YAML format (full export, human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export people, expenses and the current settlement
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export expenses to CSV
    Expenses {
        /// Output file path
        output: PathBuf,
    },

    /// Show export information without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> SplitResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Csv => {
                    csv::export_expenses_csv(storage, &mut writer)?;
                    println!("Expenses exported to: {}", output.display());
                    println!("Note: CSV format exports expenses only. Use JSON or YAML for a full export.");
                }
                ExportFormat::Json => {
                    json::export_full_json(storage, &mut writer, pretty)?;
                    println!("Full export written to: {}", output.display());
                }
                ExportFormat::Yaml => {
                    yaml::export_full_yaml(storage, &mut writer)?;
                    println!("Full export written to: {}", output.display());
                }
            }
        }

        ExportCommands::Expenses { output } => {
            let mut writer = create_output(&output)?;
            csv::export_expenses_csv(storage, &mut writer)?;
            println!("Expenses exported to: {}", output.display());
        }

        ExportCommands::Info => {
            let export = json::FullExport::from_storage(storage)?;

            println!("Export Information");
            println!("==================\n");
            println!("Schema Version: {}", export.schema_version);
            println!("App Version:    {}", export.app_version);
            println!();
            println!("Data Summary:");
            println!("  People:     {}", export.metadata.person_count);
            println!("  Expenses:   {}", export.metadata.expense_count);
            println!("  Transfers:  {}", export.metadata.transfer_count);

            if let (Some(earliest), Some(latest)) = (
                &export.metadata.earliest_expense,
                &export.metadata.latest_expense,
            ) {
                println!();
                println!("Expense Date Range:");
                println!("  Earliest: {}", earliest);
                println!("  Latest:   {}", latest);
            }
        }
    }

    Ok(())
}
