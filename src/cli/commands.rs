use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::render::TextSurface;
use crate::session::Dashboard;
use crate::storage::{FileStore, KeyValueStore};
use crate::types::Month;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const SESSION_HELP: &str = "Commands:
  show                                   Redraw both tables
  year <year>                            Select a year
  years                                  List selectable years
  income <month> <online> <cash>         Set a month's income
  expense <month> <shop> <amount> [date] Add an expense (quote names with spaces)
  toggle income|expenses                 Collapse or expand a section
  export [dir]                           Write Income_Expenses_<year>.xlsx
  help                                   Show this help
  quit                                   Leave the session";

fn open(config: &LedgerConfig, year: Option<i32>) -> LedgerResult<Dashboard<FileStore>> {
    let mut dashboard = config.open_dashboard()?;
    if let Some(year) = year {
        dashboard.select_year(year)?;
    }
    Ok(dashboard)
}

fn draw<S: KeyValueStore>(dashboard: &Dashboard<S>) -> LedgerResult<String> {
    let mut surface = TextSurface::new();
    surface.set_title(format!("📒 Ledger {}", dashboard.selected_year()));
    dashboard.render(&mut surface)?;
    Ok(surface.to_colored_text())
}

fn require_month(raw: &str) -> LedgerResult<Month> {
    Month::parse(raw).ok_or_else(|| LedgerError::Validation(format!("'{raw}' is not a month")))
}

/// Execute the years command
pub fn years(config: &LedgerConfig) -> LedgerResult<()> {
    let dashboard = config.open_dashboard()?;
    let window = dashboard.window();

    println!("{}", "📅 Selectable years".bold().green());
    for year in window.years() {
        if year == window.current() {
            println!("   {} {}", year.to_string().bold(), "(current)".cyan());
        } else {
            println!("   {year}");
        }
    }

    let extra: Vec<String> = dashboard
        .store()
        .years()
        .into_iter()
        .filter(|y| !window.contains(*y))
        .map(|y| y.to_string())
        .collect();
    if !extra.is_empty() {
        println!("   Also stored: {}", extra.join(", ").dimmed());
    }
    Ok(())
}

/// Execute the show command
pub fn show(
    config: &LedgerConfig,
    year: Option<i32>,
    hide_income: bool,
    hide_expenses: bool,
) -> LedgerResult<()> {
    let mut dashboard = open(config, year)?;
    if hide_income {
        dashboard.toggle_income();
    }
    if hide_expenses {
        dashboard.toggle_expenses();
    }
    print!("{}", draw(&dashboard)?);
    Ok(())
}

/// Execute the income command
pub fn income(
    config: &LedgerConfig,
    year: Option<i32>,
    month: String,
    online: String,
    cash: String,
) -> LedgerResult<()> {
    let month = require_month(&month)?;
    let mut dashboard = open(config, year)?;
    dashboard.submit_income(&month.index().to_string(), &online, &cash)?;

    let entry = dashboard.store().income(dashboard.selected_year())?[month.index()];
    println!(
        "{} {} {}: online {}, cash {}",
        "✅".green(),
        month.name().bold(),
        dashboard.selected_year(),
        crate::render::format_amount(entry.online),
        crate::render::format_amount(entry.cash)
    );
    Ok(())
}

/// Execute the expense command
pub fn expense(
    config: &LedgerConfig,
    year: Option<i32>,
    month: String,
    shop: String,
    amount: String,
    date: Option<String>,
) -> LedgerResult<()> {
    let month = require_month(&month)?;
    if shop.trim().is_empty() {
        return Err(LedgerError::Validation("shop name is required".to_string()));
    }

    let mut dashboard = open(config, year)?;
    let date = date.unwrap_or_default();
    dashboard.submit_expense(&month.index().to_string(), &date, &shop, &amount)?;

    let expenses = dashboard.store().expenses(dashboard.selected_year())?;
    if let Some(added) = expenses.last() {
        println!(
            "{} {} {} at {}: {}",
            "✅".green(),
            month.name().bold(),
            dashboard.selected_year(),
            added.shop.bright_blue(),
            crate::render::format_amount(added.amount)
        );
    }
    Ok(())
}

/// Execute the export command
pub fn export(config: &LedgerConfig, year: Option<i32>, dir: Option<PathBuf>) -> LedgerResult<()> {
    let dashboard = open(config, year)?;
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let path = dashboard.export(&dir)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", path.display());
    Ok(())
}

/// Execute the session command on stdin/stdout
pub fn session(config: &LedgerConfig, export_dir: Option<PathBuf>) -> LedgerResult<()> {
    let mut dashboard = config.open_dashboard()?;
    let export_dir = export_dir.unwrap_or_else(|| PathBuf::from("."));
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(&mut dashboard, stdin.lock(), &mut stdout, &export_dir)
}

/// Read one command per line until `quit` or end of input.
///
/// Every state change is followed by a redraw, like the form handlers of a
/// page would. Bad input never ends the session.
pub fn run_session<S, R, W>(
    dashboard: &mut Dashboard<S>,
    input: R,
    out: &mut W,
    export_dir: &Path,
) -> LedgerResult<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", "📒 Ledger session. Type 'help' for commands.".bold().green())?;
    write!(out, "{}", draw(dashboard)?)?;

    for line in input.lines() {
        let line = line?;
        let args = match shell_words::split(&line) {
            Ok(args) => args,
            Err(e) => {
                writeln!(out, "{} {}", "⚠️".yellow(), e)?;
                continue;
            }
        };
        let Some((command, rest)) = args.split_first() else {
            continue;
        };

        let redraw = match (command.as_str(), rest) {
            ("quit" | "exit", _) => break,
            ("help", _) => {
                writeln!(out, "{SESSION_HELP}")?;
                false
            }
            ("show", _) => true,
            ("years", _) => {
                let window = dashboard.window();
                writeln!(out, "   {}-{}", window.first(), window.last())?;
                false
            }
            ("year", [year]) => match dashboard.select_year_input(year) {
                Ok(()) => true,
                Err(e) => {
                    writeln!(out, "{} {}", "⚠️".yellow(), e)?;
                    false
                }
            },
            ("income", [month, online, cash]) => dashboard.submit_income(month, online, cash)?,
            ("expense", [month, shop, amount]) => {
                dashboard.submit_expense(month, "", shop, amount)?
            }
            ("expense", [month, shop, amount, date]) => {
                dashboard.submit_expense(month, date, shop, amount)?
            }
            ("toggle", [section]) if section == "income" => {
                dashboard.toggle_income();
                true
            }
            ("toggle", [section]) if section == "expenses" => {
                dashboard.toggle_expenses();
                true
            }
            ("export", []) => {
                report_export(out, dashboard.export(export_dir))?;
                false
            }
            ("export", [dir]) => {
                report_export(out, dashboard.export(Path::new(dir)))?;
                false
            }
            _ => {
                writeln!(out, "{} Unknown command: {}", "⚠️".yellow(), line.trim())?;
                false
            }
        };

        if redraw {
            write!(out, "{}", draw(dashboard)?)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Export failures are reported and the session carries on
fn report_export<W: Write>(out: &mut W, result: LedgerResult<PathBuf>) -> LedgerResult<()> {
    match result {
        Ok(path) => writeln!(out, "{} {}", "✅ Exported".green(), path.display())?,
        Err(e) => writeln!(out, "{} {}", "❌".red(), e)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
