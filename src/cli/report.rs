//! CLI commands for reports
//!
//! Every report prints to the terminal, or to a CSV file with `--output`.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::SplitResult;
use crate::reports::{HouseholdSummary, PersonalSpendingReport, SettlementReport};
use crate::services::{ExpenseService, PersonService, SettlementService};
use crate::storage::Storage;

use super::create_output;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Who owes whom to settle all balances
    #[command(alias = "settlement")]
    Settle {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Net balance per person
    Balances,

    /// Household totals: contributions and fair shares per person
    Summary {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// What one person has paid, by category
    Personal {
        /// Person name or ID
        person: String,

        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recent changes from the audit log (`*` marks changes that move balances)
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Full history of one person or expense (name or ID)
        #[arg(short, long)]
        entity: Option<String>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> SplitResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Settle { output } => {
            let report = SettlementReport::generate(storage)?.with_currency_symbol(symbol);
            if let Some(path) = output {
                let mut writer = create_output(&path)?;
                report.export_csv(&mut writer)?;
                println!("Settlement exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::Balances => {
            let report = SettlementReport::generate(storage)?.with_currency_symbol(symbol);
            if report.balances.is_empty() {
                println!("No people found.");
            }
            for line in &report.balances {
                println!(
                    "{:<30} {:>15}",
                    line.name,
                    line.balance.format_with_symbol(symbol)
                );
            }
        }

        ReportCommands::Summary { output } => {
            SettlementService::new(storage).check_consistency()?;
            let summary = HouseholdSummary::generate(storage)?.with_currency_symbol(symbol);
            if let Some(path) = output {
                let mut writer = create_output(&path)?;
                summary.export_csv(&mut writer)?;
                println!("Summary exported to: {}", path.display());
            } else {
                println!("{}", summary.format_terminal());
            }
        }

        ReportCommands::Personal {
            person,
            top,
            output,
        } => {
            let person = PersonService::new(storage).require(&person)?;
            let mut report =
                PersonalSpendingReport::generate(storage, &person)?.with_currency_symbol(symbol);
            if let Some(limit) = top {
                report.categories = report.top_categories(limit).to_vec();
            }

            if let Some(path) = output {
                let mut writer = create_output(&path)?;
                report.export_csv(&mut writer)?;
                println!("Personal report exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal());
            }
        }

        ReportCommands::Audit { limit, entity } => {
            let entries = match entity {
                Some(identifier) => {
                    let entity_id = match PersonService::new(storage).find(&identifier)? {
                        Some(person) => person.id.to_string(),
                        None => ExpenseService::new(storage, settings)
                            .require(&identifier)?
                            .id
                            .to_string(),
                    };
                    storage.audit().history(&entity_id)?
                }
                None => storage.audit().read_recent(limit)?,
            };
            if entries.is_empty() {
                println!("Audit log is empty.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}
