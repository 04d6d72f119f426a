use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

//==============================================================================
// Months
//==============================================================================

pub const MONTHS_PER_YEAR: usize = 12;

pub const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month as a zero-based index (January = 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    /// Returns `None` unless `index` is 0-11
    pub fn from_index(index: i64) -> Option<Self> {
        if (0..MONTHS_PER_YEAR as i64).contains(&index) {
            Some(Month(index as u8))
        } else {
            None
        }
    }

    /// Parse form input.
    ///
    /// Accepts a leading integer (`"3"`, `" 3rd"`), a full month name
    /// or a three-letter abbreviation, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(index) = crate::input::parse_leading_int(raw) {
            return Self::from_index(index);
        }

        let needle = raw.trim().to_lowercase();
        if needle.len() < 3 {
            return None;
        }
        MONTH_NAMES
            .iter()
            .position(|name| {
                let name = name.to_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .and_then(|idx| Self::from_index(idx as i64))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.index()]
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (0..MONTHS_PER_YEAR as u8).map(Month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Month name for a stored index; empty when the index is out of range
pub fn month_name(index: u32) -> &'static str {
    MONTH_NAMES.get(index as usize).copied().unwrap_or("")
}

//==============================================================================
// Income
//==============================================================================

/// Income for one month, split by how it was received
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub online: f64,
    pub cash: f64,
}

impl IncomeEntry {
    pub fn new(online: f64, cash: f64) -> Self {
        Self { online, cash }
    }

    /// Derived, never stored
    pub fn total(&self) -> f64 {
        self.online + self.cash
    }
}

/// Twelve monthly income entries, January first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomeRecord {
    months: [IncomeEntry; MONTHS_PER_YEAR],
}

impl IncomeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any number of entries: missing months are zero, extras are dropped
    pub fn from_entries<I: IntoIterator<Item = IncomeEntry>>(entries: I) -> Self {
        let mut record = Self::default();
        for (slot, entry) in record.months.iter_mut().zip(entries) {
            *slot = entry;
        }
        record
    }

    pub fn get(&self, month: Month) -> IncomeEntry {
        self.months[month.index()]
    }

    pub fn set(&mut self, month: Month, entry: IncomeEntry) {
        self.months[month.index()] = entry;
    }

    pub fn entries(&self) -> &[IncomeEntry; MONTHS_PER_YEAR] {
        &self.months
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, &IncomeEntry)> {
        Month::all().zip(self.months.iter())
    }
}

impl std::ops::Index<usize> for IncomeRecord {
    type Output = IncomeEntry;

    fn index(&self, index: usize) -> &IncomeEntry {
        &self.months[index]
    }
}

//==============================================================================
// Expenses
//==============================================================================

/// A single expense; `date` is free-form text and may be empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub month: u32,
    pub date: String,
    pub shop: String,
    pub amount: f64,
}

impl ExpenseRecord {
    pub fn new(month: Month, date: impl Into<String>, shop: impl Into<String>, amount: f64) -> Self {
        Self {
            month: month.index() as u32,
            date: date.into(),
            shop: shop.into(),
            amount,
        }
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

//==============================================================================
// Ledger
//==============================================================================

/// Everything recorded for one year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearData {
    pub income: IncomeRecord,
    pub expenses: Vec<ExpenseRecord>,
}

/// All years, ordered by year
pub type YearlyLedger = BTreeMap<i32, YearData>;

/// The 11 selectable years: five back, the current year, five forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    current: i32,
}

impl YearWindow {
    pub const RADIUS: i32 = 5;

    pub fn new(current: i32) -> Self {
        Self { current }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn first(&self) -> i32 {
        self.current - Self::RADIUS
    }

    pub fn last(&self) -> i32 {
        self.current + Self::RADIUS
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.first()..=self.last()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years().contains(&year)
    }
}
