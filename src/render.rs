//! Table views over the store
//!
//! Rows are recomputed from the store on every render; nothing here caches
//! ledger data. Visibility is separate UI state ([`ViewState`]) handed to
//! the surface alongside the rows.

use crate::error::LedgerResult;
use crate::input::finite_or_zero;
use crate::storage::KeyValueStore;
use crate::store::Store;
use crate::types::{ExpenseRecord, IncomeRecord};
use colored::Colorize;
use rust_decimal::{Decimal, RoundingStrategy};

pub const INCOME_HEADERS: [&str; 4] = ["Month", "Online", "Cash", "Total"];
pub const EXPENSE_HEADERS: [&str; 4] = ["Month", "Date", "Shop Name", "Expense Amount"];

const INCOME_RIGHT_ALIGNED: [bool; 4] = [false, true, true, true];
const EXPENSE_RIGHT_ALIGNED: [bool; 4] = [false, false, false, true];

/// Format with exactly two decimals, the way `Number.prototype.toFixed(2)` does.
///
/// Rounds the exact binary value half away from zero, so `1.005` (stored as
/// 1.00499...) gives `"1.00"` while `0.125` gives `"0.13"`. Negative values
/// keep their sign even when they round to zero (`-0.001` gives `"-0.00"`);
/// negative zero itself prints as `"0.00"`.
pub fn format_amount(value: f64) -> String {
    let value = finite_or_zero(value);
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded = exact
                .abs()
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            if value < 0.0 {
                format!("-{rounded}")
            } else {
                rounded.to_string()
            }
        }
        // Beyond Decimal's range
        None => format!("{value:.2}"),
    }
}

/// Whether each section is collapsed. Not part of the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub income_hidden: bool,
    /// Covers the expense form and the expense table together
    pub expenses_hidden: bool,
}

impl ViewState {
    pub fn toggle_income(&mut self) {
        self.income_hidden = !self.income_hidden;
    }

    pub fn toggle_expenses(&mut self) {
        self.expenses_hidden = !self.expenses_hidden;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRow {
    pub month: String,
    pub online: String,
    pub cash: String,
    pub total: String,
}

impl IncomeRow {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.month.clone(),
            self.online.clone(),
            self.cash.clone(),
            self.total.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    pub month: String,
    pub date: String,
    pub shop: String,
    pub amount: String,
}

impl ExpenseRow {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.month.clone(),
            self.date.clone(),
            self.shop.clone(),
            self.amount.clone(),
        ]
    }
}

/// One row per month, January first
pub fn income_rows(record: &IncomeRecord) -> Vec<IncomeRow> {
    record
        .iter()
        .map(|(month, entry)| IncomeRow {
            month: month.name().to_string(),
            online: format_amount(entry.online),
            cash: format_amount(entry.cash),
            total: format_amount(entry.total()),
        })
        .collect()
}

/// One row per expense, in the order they were added
pub fn expense_rows(expenses: &[ExpenseRecord]) -> Vec<ExpenseRow> {
    expenses
        .iter()
        .map(|expense| ExpenseRow {
            month: expense.month_name().to_string(),
            date: expense.date.clone(),
            shop: expense.shop.clone(),
            amount: format_amount(expense.amount),
        })
        .collect()
}

/// Anything that can display the two tables
pub trait RenderSurface {
    /// Replace every income row
    fn replace_income(&mut self, rows: Vec<IncomeRow>);
    /// Replace every expense row
    fn replace_expenses(&mut self, rows: Vec<ExpenseRow>);
    fn apply_visibility(&mut self, view: ViewState);
}

pub fn render_income<S, T>(store: &Store<S>, year: i32, surface: &mut T) -> LedgerResult<()>
where
    S: KeyValueStore,
    T: RenderSurface + ?Sized,
{
    let rows = income_rows(store.income(year)?);
    surface.replace_income(rows);
    Ok(())
}

pub fn render_expenses<S, T>(store: &Store<S>, year: i32, surface: &mut T) -> LedgerResult<()>
where
    S: KeyValueStore,
    T: RenderSurface + ?Sized,
{
    let rows = expense_rows(store.expenses(year)?);
    surface.replace_expenses(rows);
    Ok(())
}

//==============================================================================
// Terminal surface
//==============================================================================

/// Plain-text tables for the terminal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSurface {
    title: Option<String>,
    income: Vec<IncomeRow>,
    expenses: Vec<ExpenseRow>,
    view: ViewState,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn income(&self) -> &[IncomeRow] {
        &self.income
    }

    pub fn expenses(&self) -> &[ExpenseRow] {
        &self.expenses
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Render the visible sections without colors
    pub fn to_text(&self) -> String {
        self.compose(|s| s.to_string())
    }

    /// Render the visible sections with colored section titles
    pub fn to_colored_text(&self) -> String {
        self.compose(|s| s.bold().cyan().to_string())
    }

    fn compose(&self, heading: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&heading(title));
            out.push_str("\n\n");
        }

        out.push_str(&heading("Income"));
        out.push('\n');
        if self.view.income_hidden {
            out.push_str("  (hidden)\n");
        } else {
            let rows: Vec<Vec<String>> = self.income.iter().map(IncomeRow::cells).collect();
            out.push_str(&layout_table(&INCOME_HEADERS, &INCOME_RIGHT_ALIGNED, &rows));
        }
        out.push('\n');

        out.push_str(&heading("Expenses"));
        out.push('\n');
        if self.view.expenses_hidden {
            out.push_str("  (hidden)\n");
        } else if self.expenses.is_empty() {
            out.push_str("  No expenses recorded\n");
        } else {
            let rows: Vec<Vec<String>> = self.expenses.iter().map(ExpenseRow::cells).collect();
            out.push_str(&layout_table(&EXPENSE_HEADERS, &EXPENSE_RIGHT_ALIGNED, &rows));
        }
        out
    }
}

impl RenderSurface for TextSurface {
    fn replace_income(&mut self, rows: Vec<IncomeRow>) {
        self.income = rows;
    }

    fn replace_expenses(&mut self, rows: Vec<ExpenseRow>) {
        self.expenses = rows;
    }

    fn apply_visibility(&mut self, view: ViewState) {
        self.view = view;
    }
}

fn layout_table(headers: &[&str], right_aligned: &[bool], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: &[String]| -> String {
        let mut line = String::from(" ");
        for (idx, cell) in cells.iter().enumerate() {
            let width = widths.get(idx).copied().unwrap_or(0);
            if right_aligned.get(idx).copied().unwrap_or(false) {
                line.push_str(&format!(" {cell:>width$}"));
            } else {
                line.push_str(&format!(" {cell:<width$}"));
            }
        }
        line.trim_end().to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = format_line(&header_cells);
    out.push('\n');
    let rule_width: usize = widths.iter().sum::<usize>() + widths.len();
    out.push_str(&format!("  {}\n", "─".repeat(rule_width.saturating_sub(1))));
    for row in rows {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    out
}
