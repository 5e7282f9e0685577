//! Person CLI commands
//!
//! Implements CLI commands for managing the people in the household.

use clap::Subcommand;

use crate::display::{format_person_details, format_person_list};
use crate::error::SplitResult;
use crate::models::{Money, PersonUpdate};
use crate::services::{PersonService, SettlementService};
use crate::storage::Storage;

use super::parse_date_arg;

/// Person subcommands
#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a person to the household
    Add {
        /// Display name (must be unique)
        name: String,
        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
        /// Date the person joined (YYYY-MM-DD)
        #[arg(short, long)]
        joined: Option<String>,
    },
    /// List everyone with their current balance
    List,
    /// Show a person's details
    Show {
        /// Person name or ID
        person: String,
    },
    /// Edit a person
    Edit {
        /// Person name or ID
        person: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New email
        #[arg(short, long)]
        email: Option<String>,
        /// New join date (YYYY-MM-DD)
        #[arg(short, long)]
        joined: Option<String>,
    },
    /// Remove a person who no longer appears on any expense
    #[command(alias = "rm")]
    Remove {
        /// Person name or ID
        person: String,
    },
}

/// Handle a person command
pub fn handle_person_command(storage: &Storage, cmd: PersonCommands) -> SplitResult<()> {
    let service = PersonService::new(storage);

    match cmd {
        PersonCommands::Add {
            name,
            email,
            joined,
        } => {
            let joined_on = joined.as_deref().map(parse_date_arg).transpose()?;
            let person = service.create(&name, email.as_deref(), joined_on)?;

            println!("Added person: {}", person.name);
            println!("  ID: {}", person.id);
        }

        PersonCommands::List => {
            let balances = SettlementService::new(storage).balances()?;
            let rows: Vec<_> = service
                .list()?
                .into_iter()
                .map(|p| {
                    let balance = balances.get(p.id).map(Money::from_amount);
                    (p, balance)
                })
                .collect();
            print!("{}", format_person_list(&rows));
        }

        PersonCommands::Show { person } => {
            let found = service.require(&person)?;
            let settlement = SettlementService::new(storage);

            let paid = settlement
                .contributions()?
                .get(&found.id)
                .copied()
                .unwrap_or(0.0);
            let balance = settlement.balances()?.get(found.id).unwrap_or(0.0);

            print!(
                "{}",
                format_person_details(&found, Money::from_amount(paid), Money::from_amount(balance))
            );
        }

        PersonCommands::Edit {
            person,
            name,
            email,
            joined,
        } => {
            let found = service.require(&person)?;
            let update = PersonUpdate {
                name,
                email,
                joined_on: joined.as_deref().map(parse_date_arg).transpose()?,
            };

            if update.is_empty() {
                println!("No changes specified. Use --name, --email or --joined.");
                return Ok(());
            }

            let updated = service.update(found.id, update)?;
            println!("Updated person: {}", updated.name);
        }

        PersonCommands::Remove { person } => {
            let found = service.require(&person)?;
            let removed = service.delete(found.id)?;
            println!("Removed person: {}", removed.name);
        }
    }

    Ok(())
}
