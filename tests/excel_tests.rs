//! Excel export tests
//!
//! Workbooks are written to a temp dir and read back with calamine.

use calamine::{open_workbook, Data, Reader, Xlsx};
use pretty_assertions::assert_eq;
use royalbit_ledger::excel::{ExcelExporter, EXPENSE_SHEET, INCOME_SHEET};
use royalbit_ledger::storage::MemoryStore;
use royalbit_ledger::Store;
use std::path::Path;
use tempfile::TempDir;

fn read_sheet(path: &Path, name: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(name).unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

fn text(rows: &[Vec<Data>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn sample_store() -> Store<MemoryStore> {
    let mut store = Store::initialize(MemoryStore::new(), 2024).unwrap();
    store.set_income_month(2024, 0, 1000.0, 250.5).unwrap();
    store.set_income_month(2024, 11, 0.1, 0.2).unwrap();
    store
        .add_expense(2024, 3, "2024-04-02", "Corner Shop", 19.999)
        .unwrap();
    store.add_expense(2024, 0, "", "Market", 1.005).unwrap();
    store
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKBOOK LAYOUT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_two_named_sheets() {
    let store = sample_store();
    let dir = TempDir::new().unwrap();

    let path = ExcelExporter::new(&store, 2024)
        .unwrap()
        .export(dir.path())
        .unwrap();
    assert_eq!(path, dir.path().join("Income_Expenses_2024.xlsx"));

    let workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec![INCOME_SHEET.to_string(), EXPENSE_SHEET.to_string()]
    );
}

#[test]
fn test_income_sheet_contents() {
    let store = sample_store();
    let dir = TempDir::new().unwrap();
    let path = ExcelExporter::new(&store, 2024)
        .unwrap()
        .export(dir.path())
        .unwrap();

    let rows = read_sheet(&path, INCOME_SHEET);
    assert_eq!(rows.len(), 13);

    let rows = text(&rows);
    assert_eq!(rows[0], vec!["Month", "Online", "Cash", "Total"]);
    assert_eq!(rows[1], vec!["January", "1000.00", "250.50", "1250.50"]);
    assert_eq!(rows[2], vec!["February", "0.00", "0.00", "0.00"]);
    assert_eq!(rows[12], vec!["December", "0.10", "0.20", "0.30"]);
}

#[test]
fn test_expense_sheet_keeps_insertion_order() {
    let store = sample_store();
    let dir = TempDir::new().unwrap();
    let path = ExcelExporter::new(&store, 2024)
        .unwrap()
        .export(dir.path())
        .unwrap();

    let rows = text(&read_sheet(&path, EXPENSE_SHEET));
    assert_eq!(
        rows,
        vec![
            vec!["Month", "Date", "Shop Name", "Expense Amount"],
            vec!["April", "2024-04-02", "Corner Shop", "20.00"],
            vec!["January", "", "Market", "1.00"],
        ]
    );
}

#[test]
fn test_cells_are_strings() {
    let store = sample_store();
    let dir = TempDir::new().unwrap();
    let path = ExcelExporter::new(&store, 2024)
        .unwrap()
        .export(dir.path())
        .unwrap();

    let rows = read_sheet(&path, INCOME_SHEET);
    assert!(matches!(&rows[1][1], Data::String(s) if s == "1000.00"));
}

#[test]
fn test_empty_year_exports_header_only_expenses() {
    let store = Store::initialize(MemoryStore::new(), 2024).unwrap();
    let dir = TempDir::new().unwrap();
    let path = ExcelExporter::new(&store, 2027)
        .unwrap()
        .export(dir.path())
        .unwrap();

    assert!(path.ends_with("Income_Expenses_2027.xlsx"));
    let rows = text(&read_sheet(&path, EXPENSE_SHEET));
    assert_eq!(rows, vec![vec!["Month", "Date", "Shop Name", "Expense Amount"]]);
}

#[test]
fn test_export_leaves_store_untouched() {
    let store = sample_store();
    let writes = store.storage().writes();
    let before = store.ledger().clone();

    let dir = TempDir::new().unwrap();
    ExcelExporter::new(&store, 2024)
        .unwrap()
        .export(dir.path())
        .unwrap();

    assert_eq!(store.storage().writes(), writes);
    assert_eq!(store.ledger(), &before);
}

#[test]
fn test_export_into_missing_dir_fails() {
    let store = sample_store();
    let dir = TempDir::new().unwrap();
    let err = ExcelExporter::new(&store, 2024)
        .unwrap()
        .export(&dir.path().join("missing"))
        .unwrap_err();
    assert!(err.to_string().starts_with("Export error"));
}
