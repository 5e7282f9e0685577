use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use roomsplit::cli::{
    handle_expense_command, handle_export_command, handle_import_command, handle_person_command,
    handle_report_command, handle_seed_command, ExpenseCommands, ExportCommands, ImportArgs,
    PersonCommands, ReportCommands, SeedArgs,
};
use roomsplit::config::{RoomsplitPaths, Settings};
use roomsplit::storage::Storage;

#[derive(Parser)]
#[command(
    name = "roomsplit",
    version,
    about = "Shared expense tracker and debt settlement calculator",
    long_about = "roomsplit records who paid for what in a shared household, \
                  keeps a running balance for everyone, and works out who \
                  should pay whom to settle up."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new household
    Init,

    /// Show current configuration and paths
    Config,

    /// Manage people in the household
    #[command(subcommand)]
    Person(PersonCommands),

    /// Record and manage expenses
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Settlement, balance and spending reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Import expenses from CSV
    Import(ImportArgs),

    /// Export data as JSON, YAML or CSV
    #[command(subcommand)]
    Export(ExportCommands),

    /// Generate a demo household with random expenses
    Seed(SeedArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = RoomsplitPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing roomsplit at: {}", paths.data_dir().display());
            roomsplit::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  roomsplit person add Alice");
            println!("  roomsplit expense add 42.50 --payer Alice --split all");
            println!("  roomsplit report settle");
        }
        Some(Commands::Config) => {
            println!("roomsplit Configuration");
            println!("=======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:             {}", settings.currency_symbol);
            println!("  Date format:                 {}", settings.date_format);
            println!("  Default category:            {}", settings.default_category);
            println!(
                "  Payer must participate:      {}",
                settings.require_payer_participation
            );
        }
        Some(Commands::Person(cmd)) => handle_person_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Import(args)) => handle_import_command(&storage, &settings, args)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Seed(args)) => handle_seed_command(&storage, &settings, args)?,
        None => {
            println!("roomsplit - shared expense tracking and settlement");
            println!();
            println!("Run 'roomsplit --help' for usage information.");
        }
    }

    Ok(())
}
