//! Excel exporter implementation

use crate::error::{LedgerError, LedgerResult};
use crate::render::{expense_rows, income_rows, EXPENSE_HEADERS, INCOME_HEADERS};
use crate::storage::KeyValueStore;
use crate::store::Store;
use crate::types::{ExpenseRecord, IncomeRecord};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::info;

pub const INCOME_SHEET: &str = "Income";
pub const EXPENSE_SHEET: &str = "Expense";

/// One worksheet as rows of cells, header row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: vec![headers.iter().map(|h| h.to_string()).collect()],
        }
    }

    /// Rows after the header
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Default file name for a year's workbook
pub fn file_name(year: i32) -> String {
    format!("Income_Expenses_{year}.xlsx")
}

/// Exports one year of the ledger to a two-sheet workbook.
///
/// Holds shared borrows only, so exporting can never change the store.
pub struct ExcelExporter<'a> {
    year: i32,
    income: &'a IncomeRecord,
    expenses: &'a [ExpenseRecord],
}

impl<'a> ExcelExporter<'a> {
    /// Fails with `UnknownYear` if the store has no such year
    pub fn new<S: KeyValueStore>(store: &'a Store<S>, year: i32) -> LedgerResult<Self> {
        Ok(Self {
            year,
            income: store.income(year)?,
            expenses: store.expenses(year)?,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn file_name(&self) -> String {
        file_name(self.year)
    }

    /// The "Income" and "Expense" sheets, in that order.
    ///
    /// Cells are formatted exactly like the rendered tables.
    pub fn sheets(&self) -> Vec<SheetData> {
        let mut income = SheetData::new(INCOME_SHEET, &INCOME_HEADERS);
        income
            .rows
            .extend(income_rows(self.income).iter().map(|row| row.cells()));

        let mut expenses = SheetData::new(EXPENSE_SHEET, &EXPENSE_HEADERS);
        expenses
            .rows
            .extend(expense_rows(self.expenses).iter().map(|row| row.cells()));

        vec![income, expenses]
    }

    /// Write `Income_Expenses_<year>.xlsx` into `dir` and return its path
    pub fn export(&self, dir: &Path) -> LedgerResult<PathBuf> {
        let path = dir.join(self.file_name());
        self.export_to(&path)?;
        Ok(path)
    }

    /// Write the workbook to an explicit path
    pub fn export_to(&self, output_path: &Path) -> LedgerResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| LedgerError::Export(format!("Failed to save Excel file: {}", e)))?;
        info!(year = self.year, path = %output_path.display(), "workbook exported");
        Ok(())
    }

    /// Serialize the workbook in memory
    pub fn to_buffer(&self) -> LedgerResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save_to_buffer()
            .map_err(|e| LedgerError::Export(format!("Failed to serialize workbook: {}", e)))
    }

    fn build_workbook(&self) -> LedgerResult<Workbook> {
        let mut workbook = Workbook::new();
        for sheet in self.sheets() {
            let worksheet = workbook.add_worksheet();
            Self::write_sheet(worksheet, &sheet)?;
        }
        Ok(workbook)
    }

    /// Every cell is written as text, header row at row 0
    fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetData) -> LedgerResult<()> {
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| LedgerError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, cell)
                    .map_err(|e| LedgerError::Export(format!("Failed to write cell: {}", e)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_store() -> Store<MemoryStore> {
        let mut store = Store::initialize(MemoryStore::new(), 2024).unwrap();
        for month in 0..12 {
            store.set_income_month(2024, month, 10.0, 5.0).unwrap();
        }
        store.add_expense(2024, 0, "2024-01-02", "X", 3.0).unwrap();
        store
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(2024), "Income_Expenses_2024.xlsx");
    }

    #[test]
    fn test_sheets_layout() {
        let store = sample_store();
        let exporter = ExcelExporter::new(&store, 2024).unwrap();
        let sheets = exporter.sheets();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Income");
        assert_eq!(sheets[0].rows[0], vec!["Month", "Online", "Cash", "Total"]);
        assert_eq!(sheets[0].data_rows().len(), 12);
        assert_eq!(
            sheets[0].data_rows()[0],
            vec!["January", "10.00", "5.00", "15.00"]
        );

        assert_eq!(sheets[1].name, "Expense");
        assert_eq!(
            sheets[1].rows[0],
            vec!["Month", "Date", "Shop Name", "Expense Amount"]
        );
        assert_eq!(sheets[1].data_rows().len(), 1);
        assert_eq!(
            sheets[1].data_rows()[0],
            vec!["January", "2024-01-02", "X", "3.00"]
        );
    }

    #[test]
    fn test_empty_year_has_header_only_expense_sheet() {
        let store = Store::initialize(MemoryStore::new(), 2024).unwrap();
        let exporter = ExcelExporter::new(&store, 2020).unwrap();
        let sheets = exporter.sheets();
        assert_eq!(sheets[1].rows.len(), 1);
        assert!(sheets[1].data_rows().is_empty());
        assert_eq!(sheets[0].data_rows()[5], vec!["June", "0.00", "0.00", "0.00"]);
    }

    #[test]
    fn test_unknown_year_fails() {
        let store = Store::initialize(MemoryStore::new(), 2024).unwrap();
        assert!(ExcelExporter::new(&store, 1999).is_err());
    }

    #[test]
    fn test_export_writes_named_file() {
        let store = sample_store();
        let dir = TempDir::new().unwrap();

        let path = ExcelExporter::new(&store, 2024)
            .unwrap()
            .export(dir.path())
            .unwrap();

        assert_eq!(path, dir.path().join("Income_Expenses_2024.xlsx"));
        assert!(path.exists());
    }

    #[test]
    fn test_export_does_not_touch_storage() {
        let store = sample_store();
        let writes_before = store.storage().writes();
        let exporter = ExcelExporter::new(&store, 2024).unwrap();
        let buffer = exporter.to_buffer().unwrap();
        assert!(!buffer.is_empty());
        assert_eq!(store.storage().writes(), writes_before);
    }

    #[test]
    fn test_export_to_nonexistent_directory_fails() {
        let store = sample_store();
        let exporter = ExcelExporter::new(&store, 2024).unwrap();
        let result = exporter.export(Path::new("/nonexistent/dir"));
        assert!(matches!(result, Err(LedgerError::Export(_))));
    }
}
