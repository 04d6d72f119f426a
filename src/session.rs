//! Interactive dashboard state
//!
//! Ties the store to the UI: which year is selected, which sections are
//! collapsed, and how raw form input becomes store calls. Every handler runs
//! to completion (mutate, persist) before the caller re-renders.

use crate::error::{LedgerError, LedgerResult};
use crate::excel::ExcelExporter;
use crate::input::{parse_amount, parse_leading_int};
use crate::render::{render_expenses, render_income, RenderSurface, ViewState};
use crate::storage::KeyValueStore;
use crate::store::Store;
use crate::types::{Month, YearWindow};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Dashboard<S: KeyValueStore> {
    store: Store<S>,
    selected_year: i32,
    view: ViewState,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Starts on the current year with every section visible
    pub fn new(store: Store<S>) -> Self {
        let selected_year = store.window().current();
        Self {
            store,
            selected_year,
            view: ViewState::default(),
        }
    }

    pub fn open(storage: S, current_year: i32) -> LedgerResult<Self> {
        Ok(Self::new(Store::initialize(storage, current_year)?))
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn window(&self) -> YearWindow {
        self.store.window()
    }

    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Only years of the window can be selected
    pub fn select_year(&mut self, year: i32) -> LedgerResult<()> {
        let window = self.window();
        if !window.contains(year) {
            return Err(LedgerError::Validation(format!(
                "year {year} is outside {}-{}",
                window.first(),
                window.last()
            )));
        }
        self.selected_year = year;
        debug!(year, "year selected");
        Ok(())
    }

    pub fn select_year_input(&mut self, raw: &str) -> LedgerResult<()> {
        let year = parse_leading_int(raw)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| LedgerError::Validation(format!("'{}' is not a year", raw.trim())))?;
        self.select_year(year)
    }

    /// Income form submit. Amounts that are not numbers count as zero.
    ///
    /// Returns `false` when the month is invalid and nothing was saved.
    pub fn submit_income(
        &mut self,
        month_raw: &str,
        online_raw: &str,
        cash_raw: &str,
    ) -> LedgerResult<bool> {
        let month = month_index(month_raw);
        let result = self.store.set_income_month(
            self.selected_year,
            month,
            parse_amount(online_raw),
            parse_amount(cash_raw),
        );
        accept(result)
    }

    /// Expense form submit.
    ///
    /// Returns `false` (and changes nothing) for an empty shop name or a bad
    /// month. Section visibility is left exactly as it was.
    pub fn submit_expense(
        &mut self,
        month_raw: &str,
        date: &str,
        shop_raw: &str,
        amount_raw: &str,
    ) -> LedgerResult<bool> {
        let month = month_index(month_raw);
        let result = self.store.add_expense(
            self.selected_year,
            month,
            date,
            shop_raw,
            parse_amount(amount_raw),
        );
        accept(result)
    }

    pub fn toggle_income(&mut self) {
        self.view.toggle_income();
    }

    /// Collapses the expense form and table together
    pub fn toggle_expenses(&mut self) {
        self.view.toggle_expenses();
    }

    /// Redraw both tables for the selected year
    pub fn render<T: RenderSurface + ?Sized>(&self, surface: &mut T) -> LedgerResult<()> {
        render_income(&self.store, self.selected_year, surface)?;
        render_expenses(&self.store, self.selected_year, surface)?;
        surface.apply_visibility(self.view);
        Ok(())
    }

    /// Export the selected year into `dir`
    pub fn export(&self, dir: &Path) -> LedgerResult<PathBuf> {
        ExcelExporter::new(&self.store, self.selected_year)?.export(dir)
    }
}

/// Month from a form field; unparsable input maps to an index the store rejects
fn month_index(raw: &str) -> i64 {
    Month::parse(raw)
        .map(|m| m.index() as i64)
        .or_else(|| parse_leading_int(raw))
        .unwrap_or(-1)
}

/// Validation failures are swallowed: the form simply does not update
fn accept(result: LedgerResult<()>) -> LedgerResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(LedgerError::Validation(reason)) => {
            debug!(%reason, "form input rejected");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
