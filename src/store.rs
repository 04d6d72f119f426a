//! Year-indexed ledger store
//!
//! Holds every year's income and expenses in memory and rewrites the whole
//! ledger to the key-value backend after each mutation. There is no delta
//! persistence: data volumes are tiny and a mutation is not complete until
//! it is on disk.

use crate::error::{LedgerError, LedgerResult};
use crate::input::{finite_or_zero, parse_amount, parse_leading_int};
use crate::storage::{json_kind, KeyValueStore, EXPENSES_KEY, INCOME_KEY};
use crate::types::{
    ExpenseRecord, IncomeEntry, IncomeRecord, Month, YearData, YearWindow, YearlyLedger,
    MONTHS_PER_YEAR,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// In-memory ledger bound to a persistence backend
#[derive(Debug)]
pub struct Store<S: KeyValueStore> {
    storage: S,
    ledger: YearlyLedger,
    window: YearWindow,
}

impl<S: KeyValueStore> Store<S> {
    /// Load whatever is persisted and make sure every year of the window exists.
    ///
    /// Years outside the window that are already persisted are kept.
    pub fn initialize(storage: S, current_year: i32) -> LedgerResult<Self> {
        let window = YearWindow::new(current_year);
        let mut ledger = load_ledger(&storage)?;

        let mut filled = 0;
        for year in window.years() {
            if !ledger.contains_key(&year) {
                ledger.insert(year, YearData::default());
                filled += 1;
            }
        }
        if filled > 0 {
            info!(filled, first = window.first(), last = window.last(), "initialized empty years");
        }
        debug!(years = ledger.len(), "ledger ready");

        Ok(Self {
            storage,
            ledger,
            window,
        })
    }

    pub fn window(&self) -> YearWindow {
        self.window
    }

    /// Every year held, ascending (includes persisted years outside the window)
    pub fn years(&self) -> Vec<i32> {
        self.ledger.keys().copied().collect()
    }

    pub fn ledger(&self) -> &YearlyLedger {
        &self.ledger
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn year(&self, year: i32) -> LedgerResult<&YearData> {
        self.ledger.get(&year).ok_or(LedgerError::UnknownYear(year))
    }

    pub fn income(&self, year: i32) -> LedgerResult<&IncomeRecord> {
        self.year(year).map(|data| &data.income)
    }

    pub fn expenses(&self, year: i32) -> LedgerResult<&[ExpenseRecord]> {
        self.year(year).map(|data| data.expenses.as_slice())
    }

    /// Overwrite one month's income (not additive), then persist
    pub fn set_income_month(
        &mut self,
        year: i32,
        month_index: i64,
        online: f64,
        cash: f64,
    ) -> LedgerResult<()> {
        let month = Month::from_index(month_index).ok_or_else(|| {
            LedgerError::Validation(format!("month index {month_index} is not in 0-11"))
        })?;
        let data = self
            .ledger
            .get_mut(&year)
            .ok_or(LedgerError::UnknownYear(year))?;

        let entry = IncomeEntry::new(finite_or_zero(online), finite_or_zero(cash));
        let previous = data.income.get(month);
        data.income.set(month, entry);
        debug!(year, month = month.name(), online = entry.online, cash = entry.cash, "income set");

        self.save_or_undo(year, |data| data.income.set(month, previous))
    }

    /// Append an expense, then persist.
    ///
    /// The shop name is stored trimmed and must not be empty.
    pub fn add_expense(
        &mut self,
        year: i32,
        month_index: i64,
        date: &str,
        shop: &str,
        amount: f64,
    ) -> LedgerResult<()> {
        let shop = shop.trim();
        if shop.is_empty() {
            return Err(LedgerError::Validation("shop name is required".to_string()));
        }
        let month = Month::from_index(month_index).ok_or_else(|| {
            LedgerError::Validation(format!("month index {month_index} is not in 0-11"))
        })?;
        let data = self
            .ledger
            .get_mut(&year)
            .ok_or(LedgerError::UnknownYear(year))?;

        data.expenses
            .push(ExpenseRecord::new(month, date, shop, finite_or_zero(amount)));
        debug!(year, month = month.name(), shop, amount, "expense added");

        self.save_or_undo(year, |data| {
            data.expenses.pop();
        })
    }

    /// Rewrite both storage keys with the full ledger
    pub fn save(&mut self) -> LedgerResult<()> {
        let income: BTreeMap<i32, &IncomeRecord> = self
            .ledger
            .iter()
            .map(|(year, data)| (*year, &data.income))
            .collect();
        let expenses: BTreeMap<i32, &Vec<ExpenseRecord>> = self
            .ledger
            .iter()
            .map(|(year, data)| (*year, &data.expenses))
            .collect();

        self.storage
            .set(INCOME_KEY, serde_json::to_string(&income)?)?;
        self.storage
            .set(EXPENSES_KEY, serde_json::to_string(&expenses)?)?;
        debug!(years = self.ledger.len(), "ledger saved");
        Ok(())
    }

    /// Persist after a mutation; if that fails, `undo` restores the year in memory
    fn save_or_undo(
        &mut self,
        year: i32,
        undo: impl FnOnce(&mut YearData),
    ) -> LedgerResult<()> {
        let result = self.save();
        if let Err(e) = &result {
            if let Some(data) = self.ledger.get_mut(&year) {
                undo(data);
            }
            warn!(year, error = %e, "save failed, change rolled back");
        }
        result
    }

    /// Replace the in-memory ledger with what is persisted (window years are re-filled)
    pub fn reload(&mut self) -> LedgerResult<()> {
        let mut ledger = load_ledger(&self.storage)?;
        for year in self.window.years() {
            ledger.entry(year).or_default();
        }
        self.ledger = ledger;
        Ok(())
    }
}

//==============================================================================
// Loading
//==============================================================================

/// Read both keys into a ledger.
///
/// Unparsable documents and non-integer year keys fail with
/// [`LedgerError::Corrupt`] so that bad data is never silently overwritten.
/// Inside a readable document, missing or odd fields are default-filled.
pub fn load_ledger<S: KeyValueStore + ?Sized>(storage: &S) -> LedgerResult<YearlyLedger> {
    let mut ledger = YearlyLedger::new();

    for (year, value) in read_document(storage, INCOME_KEY)? {
        ledger.entry(year).or_default().income = income_from_value(year, &value);
    }
    for (year, value) in read_document(storage, EXPENSES_KEY)? {
        ledger.entry(year).or_default().expenses = expenses_from_value(year, &value);
    }

    debug!(years = ledger.len(), "ledger loaded");
    Ok(ledger)
}

fn read_document<S: KeyValueStore + ?Sized>(
    storage: &S,
    key: &str,
) -> LedgerResult<Vec<(i32, Value)>> {
    let Some(raw) = storage.get(key)? else {
        return Ok(Vec::new());
    };

    let document: Value =
        serde_json::from_str(&raw).map_err(|e| LedgerError::corrupt(key, e.to_string()))?;
    let map: Map<String, Value> = match document {
        Value::Object(map) => map,
        Value::Null => {
            warn!(key, "stored document is null, treating as empty");
            return Ok(Vec::new());
        }
        other => {
            return Err(LedgerError::corrupt(
                key,
                format!("expected an object keyed by year, found {}", json_kind(&other)),
            ))
        }
    };

    let mut years = Vec::with_capacity(map.len());
    for (year_key, value) in map {
        let year: i32 = year_key
            .trim()
            .parse()
            .map_err(|_| LedgerError::corrupt(key, format!("'{year_key}' is not a year")))?;
        if value.is_null() {
            continue;
        }
        years.push((year, value));
    }
    Ok(years)
}

fn income_from_value(year: i32, value: &Value) -> IncomeRecord {
    let Some(months) = value.as_array() else {
        warn!(year, found = json_kind(value), "income is not an array, using zeros");
        return IncomeRecord::new();
    };
    if months.len() != MONTHS_PER_YEAR {
        warn!(year, months = months.len(), "income does not have 12 months, padding/truncating");
    }
    IncomeRecord::from_entries(months.iter().map(|month| IncomeEntry {
        online: number_field(month, "online"),
        cash: number_field(month, "cash"),
    }))
}

fn expenses_from_value(year: i32, value: &Value) -> Vec<ExpenseRecord> {
    let Some(items) = value.as_array() else {
        warn!(year, found = json_kind(value), "expenses are not an array, using none");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            if !item.is_object() {
                warn!(year, found = json_kind(item), "skipping expense that is not an object");
                return None;
            }
            Some(ExpenseRecord {
                month: month_field(year, item),
                date: text_field(item, "date"),
                shop: text_field(item, "shop"),
                amount: number_field(item, "amount"),
            })
        })
        .collect()
}

fn number_field(item: &Value, field: &str) -> f64 {
    match item.get(field) {
        Some(Value::Number(n)) => n.as_f64().map(finite_or_zero).unwrap_or(0.0),
        Some(Value::String(s)) => parse_amount(s),
        _ => 0.0,
    }
}

fn text_field(item: &Value, field: &str) -> String {
    match item.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Non-negative integers are kept even when out of range; anything else becomes January
fn month_field(year: i32, item: &Value) -> u32 {
    let parsed = match item.get("month") {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => parse_leading_int(s),
        _ => None,
    };
    match parsed.and_then(|m| u32::try_from(m).ok()) {
        Some(month) => month,
        None => {
            warn!(year, "expense month unreadable, defaulting to January");
            0
        }
    }
}
