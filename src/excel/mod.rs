//! Excel export module
//!
//! Flattens one year of the ledger into an "Income" and an "Expense"
//! worksheet and writes them as a single .xlsx workbook.

mod exporter;

pub use exporter::{file_name, ExcelExporter, SheetData, EXPENSE_SHEET, INCOME_SHEET};
