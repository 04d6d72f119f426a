use clap::{Parser, Subcommand};
use colored::Colorize;
use royalbit_ledger::cli;
use royalbit_ledger::config::LedgerConfig;
use royalbit_ledger::error::LedgerResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(about = "Yearly income and expense ledger with Excel export.")]
#[command(long_about = "Ledger - monthly income and daily expenses, one year at a time

Income is tracked per month, split into online and cash.
Expenses are recorded one by one with a date and a shop name.
Years from five before to five after the current year are selectable.

COMMANDS:
  years    - List selectable years
  show     - Print the income and expense tables
  income   - Set a month's income
  expense  - Add an expense
  export   - Write a year to Income_Expenses_<year>.xlsx
  session  - Interactive dashboard on stdin

EXAMPLES:
  ledger income March 1200 80                  # Current year
  ledger expense 3 \"Corner Shop\" 19.99 --date 2024-04-02
  ledger show --year 2023 --hide-income
  ledger export --dir ~/Documents

ENVIRONMENT:
  LEDGER_DATA_FILE     Ledger file (default: <data dir>/royalbit-ledger/ledger.json)
  LEDGER_CURRENT_YEAR  Pretend the current year is this one
  LEDGER_LOG           Log filter, e.g. debug (default: warn)")]
#[command(version)]
struct Cli {
    /// JSON file holding the ledger
    #[arg(long, global = true, env = "LEDGER_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Override the current year (centre of the selectable window)
    #[arg(long, global = true, env = "LEDGER_CURRENT_YEAR")]
    current_year: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List selectable years
    Years,

    #[command(long_about = "Print the income and expense tables for a year.

The income table always has twelve rows, January to December.
Amounts are shown with two decimals.

EXAMPLES:
  ledger show
  ledger show --year 2023 --hide-expenses")]
    /// Print the income and expense tables
    Show {
        /// Year to show (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Collapse the income section
        #[arg(long)]
        hide_income: bool,

        /// Collapse the expense section
        #[arg(long)]
        hide_expenses: bool,
    },

    #[command(long_about = "Set the income of one month, replacing what was there.

MONTH may be a number from 0 (January) to 11 (December), a full month
name or a three-letter abbreviation. Amounts that are not numbers
count as zero.

EXAMPLES:
  ledger income 0 1500 200
  ledger income march 1200 80 --year 2023")]
    /// Set a month's income
    Income {
        /// Month (0-11, name or abbreviation)
        month: String,

        /// Online income
        #[arg(allow_hyphen_values = true)]
        online: String,

        /// Cash income
        #[arg(allow_hyphen_values = true)]
        cash: String,

        /// Year to update (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    #[command(long_about = "Add an expense to a month.

The shop name must not be empty. The date is free text and stored as
given.

EXAMPLES:
  ledger expense 5 Market 12.50
  ledger expense June \"Corner Shop\" 19.99 --date 2024-06-01")]
    /// Add an expense
    Expense {
        /// Month (0-11, name or abbreviation)
        month: String,

        /// Shop name
        shop: String,

        /// Expense amount
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Date of the expense
        #[arg(short, long)]
        date: Option<String>,

        /// Year to update (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    #[command(long_about = "Export a year to an Excel workbook.

Writes Income_Expenses_<year>.xlsx with two sheets:
  Income   Month, Online, Cash, Total (twelve rows)
  Expense  Month, Date, Shop Name, Expense Amount

Cells hold the same text the tables show.")]
    /// Export a year to Excel (.xlsx)
    Export {
        /// Year to export (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output directory (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    #[command(long_about = "Interactive dashboard.

Reads one command per line and redraws after every change.
Type 'help' inside the session for the command list.

EXAMPLES:
  ledger session
  printf 'income 0 10 5\\nexport\\n' | ledger session")]
    /// Interactive dashboard on stdin
    Session {
        /// Directory for 'export' (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LEDGER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> LedgerResult<()> {
    let config = LedgerConfig::resolve(cli.data_file, cli.current_year)?;

    match cli.command {
        Commands::Years => cli::years(&config),

        Commands::Show {
            year,
            hide_income,
            hide_expenses,
        } => cli::show(&config, year, hide_income, hide_expenses),

        Commands::Income {
            month,
            online,
            cash,
            year,
        } => cli::income(&config, year, month, online, cash),

        Commands::Expense {
            month,
            shop,
            amount,
            date,
            year,
        } => cli::expense(&config, year, month, shop, amount, date),

        Commands::Export { year, dir } => cli::export(&config, year, dir),

        Commands::Session { dir } => cli::session(&config, dir),
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
