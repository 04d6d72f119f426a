//! Ledger - yearly income and expense tracker
//!
//! Records monthly income (split into online and cash) and ad-hoc expenses
//! per year, renders them as tables, keeps them in a local key-value store
//! and exports a year to a two-sheet Excel workbook.
//!
//! # Example
//!
//! ```no_run
//! use royalbit_ledger::session::Dashboard;
//! use royalbit_ledger::storage::FileStore;
//! use royalbit_ledger::render::TextSurface;
//! use std::path::Path;
//!
//! let mut dashboard = Dashboard::open(FileStore::new("ledger.json"), 2024)?;
//! dashboard.submit_income("March", "1200", "80")?;
//! dashboard.submit_expense("3", "2024-04-02", "Corner Shop", "19.99")?;
//!
//! let mut surface = TextSurface::new();
//! dashboard.render(&mut surface)?;
//! println!("{}", surface.to_text());
//!
//! dashboard.export(Path::new("."))?;
//! # Ok::<(), royalbit_ledger::error::LedgerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod input;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{LedgerError, LedgerResult};
pub use store::Store;
pub use types::{ExpenseRecord, IncomeEntry, IncomeRecord, Month, YearData, YearWindow, YearlyLedger};
