//! CLI command for generating a demo household

use clap::Args;

use crate::config::Settings;
use crate::error::SplitResult;
use crate::services::{seed_demo_data, SeedOptions};
use crate::storage::Storage;

use super::parse_date_arg;

/// Arguments for `roomsplit seed`
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// RNG seed; the same seed yields the same expenses
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of expenses to generate
    #[arg(short, long, default_value = "20")]
    pub expenses: usize,

    /// People to include, comma separated (existing people are reused)
    #[arg(short, long, value_delimiter = ',')]
    pub people: Vec<String>,

    /// First possible expense date (YYYY-MM-DD), defaults to 30 days ago
    #[arg(long)]
    pub start: Option<String>,

    /// Number of days the generated dates are spread over
    #[arg(long, default_value = "30")]
    pub days: u32,

    /// Largest generated amount
    #[arg(long, default_value = "200")]
    pub max_amount: f64,
}

/// Handle the seed command
pub fn handle_seed_command(storage: &Storage, settings: &Settings, args: SeedArgs) -> SplitResult<()> {
    let start = match args.start {
        Some(s) => parse_date_arg(&s)?,
        None => {
            let today = chrono::Local::now().date_naive();
            today
                .checked_sub_days(chrono::Days::new(u64::from(args.days)))
                .unwrap_or(today)
        }
    };

    let mut options = SeedOptions::new(args.seed, start);
    if !args.people.is_empty() {
        options.people = args.people;
    }
    options.expenses = args.expenses;
    options.days = args.days;
    options.max_amount = args.max_amount;

    let summary = seed_demo_data(storage, settings, &options)?;

    println!("Seeded demo data (seed {})", args.seed);
    println!("  People created:   {}", summary.people_created);
    println!("  People reused:    {}", summary.people_reused);
    println!("  Expenses created: {}", summary.expenses_created);
    println!();
    println!("Run 'roomsplit report settle' to see who owes whom.");

    Ok(())
}
