//! Expense CLI commands
//!
//! Payer and participants are given by name or id and resolved through the
//! person service before anything is stored.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::SplitResult;
use crate::models::ExpenseUpdate;
use crate::services::{CreateExpenseInput, ExpenseFilter, ExpenseService, PersonService};
use crate::storage::Storage;

use super::{parse_amount_arg, parse_date_arg, resolve_people};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount paid (e.g. "42.50")
        amount: String,
        /// Who paid (name or ID)
        #[arg(short, long)]
        payer: String,
        /// Who shares it, comma separated; defaults to everyone
        #[arg(short = 's', long = "split", value_delimiter = ',')]
        participants: Vec<String>,
        /// Spending category
        #[arg(short, long, default_value = "")]
        category: String,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
        /// Account or payment method
        #[arg(short, long)]
        account: Option<String>,
    },
    /// List expenses
    #[command(alias = "ls")]
    List {
        /// Only expenses paid by this person
        #[arg(short, long)]
        payer: Option<String>,
        /// Only expenses in this category (exact match)
        #[arg(short, long)]
        category: Option<String>,
        /// Only expenses this person pays for or shares
        #[arg(short, long)]
        involving: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Show at most this many expenses
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show expense details
    Show {
        /// Expense ID
        expense: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID
        expense: String,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        payer: Option<String>,
        #[arg(short = 's', long = "split", value_delimiter = ',')]
        participants: Option<Vec<String>>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID
        expense: String,
    },
    /// List the categories in use
    Categories,
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SplitResult<()> {
    let people = PersonService::new(storage);
    let service = ExpenseService::new(storage, settings);

    match cmd {
        ExpenseCommands::Add {
            amount,
            payer,
            participants,
            category,
            date,
            note,
            account,
        } => {
            let input = CreateExpenseInput {
                amount: parse_amount_arg(&amount)?,
                payer: people.require(&payer)?.id,
                participants: resolve_people(&people, &participants)?,
                category,
                date: match date {
                    Some(d) => parse_date_arg(&d)?,
                    None => chrono::Local::now().date_naive(),
                },
                note,
                account,
            };

            let expense = service.create(input)?;
            println!("Recorded expense: {}", expense);
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List {
            payer,
            category,
            involving,
            from,
            to,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();
            if let Some(payer) = payer {
                filter = filter.payer(people.require(&payer)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(person) = involving {
                filter = filter.involving(people.require(&person)?.id);
            }
            if from.is_some() || to.is_some() {
                let start = match from {
                    Some(d) => parse_date_arg(&d)?,
                    None => chrono::NaiveDate::MIN,
                };
                let end = match to {
                    Some(d) => parse_date_arg(&d)?,
                    None => chrono::NaiveDate::MAX,
                };
                filter = filter.date_range(start, end);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let expenses = service.list(&filter)?;
            print!("{}", format_expense_list(&expenses, &people.list()?));
        }

        ExpenseCommands::Show { expense } => {
            let found = service.require(&expense)?;
            print!("{}", format_expense_details(&found, &people.list()?));
        }

        ExpenseCommands::Edit {
            expense,
            amount,
            payer,
            participants,
            category,
            date,
            note,
            account,
        } => {
            let found = service.require(&expense)?;
            let update = ExpenseUpdate {
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                payer: payer.map(|p| people.require(&p).map(|p| p.id)).transpose()?,
                participants: participants
                    .map(|list| resolve_people(&people, &list))
                    .transpose()?,
                category,
                date: date.as_deref().map(parse_date_arg).transpose()?,
                note,
                account,
            };

            if update.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(found.id, update)?;
            println!("Updated expense: {}", updated);
        }

        ExpenseCommands::Delete { expense } => {
            let found = service.require(&expense)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted expense: {}", deleted);
        }

        ExpenseCommands::Categories => {
            let categories = service.categories()?;
            if categories.is_empty() {
                println!("No categories in use.");
            }
            for category in categories {
                println!("  {}", category);
            }
        }
    }

    Ok(())
}
