//! Runtime configuration
//!
//! Values come from CLI flags, then environment variables (both via clap),
//! then the defaults below.

use crate::error::{LedgerError, LedgerResult};
use crate::session::Dashboard;
use crate::storage::FileStore;
use chrono::Datelike;
use std::path::PathBuf;

const APP_DIR: &str = "royalbit-ledger";
const DATA_FILE: &str = "ledger.json";

/// Years the clock override may be set to
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1000..=9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// JSON file backing the key-value store
    pub data_file: PathBuf,
    /// Centre of the year window
    pub current_year: i32,
}

impl LedgerConfig {
    pub fn resolve(data_file: Option<PathBuf>, current_year: Option<i32>) -> LedgerResult<Self> {
        let current_year = match current_year {
            Some(year) if !YEAR_RANGE.contains(&year) => {
                return Err(LedgerError::Config(format!(
                    "current year {year} is outside {}-{}",
                    YEAR_RANGE.start(),
                    YEAR_RANGE.end()
                )))
            }
            Some(year) => year,
            None => chrono::Local::now().year(),
        };

        Ok(Self {
            data_file: data_file.unwrap_or_else(Self::default_data_file),
            current_year,
        })
    }

    /// `<data dir>/royalbit-ledger/ledger.json`, or `./ledger.json` without a data dir
    pub fn default_data_file() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(DATA_FILE))
            .unwrap_or_else(|| PathBuf::from(DATA_FILE))
    }

    pub fn open_dashboard(&self) -> LedgerResult<Dashboard<FileStore>> {
        Dashboard::open(FileStore::new(&self.data_file), self.current_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_values() {
        let config =
            LedgerConfig::resolve(Some(PathBuf::from("/tmp/x.json")), Some(2024)).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.current_year, 2024);
    }

    #[test]
    fn test_resolve_defaults_to_clock_year() {
        let config = LedgerConfig::resolve(None, None).unwrap();
        assert_eq!(config.current_year, chrono::Local::now().year());
        assert!(config.data_file.ends_with(DATA_FILE));
    }

    #[test]
    fn test_resolve_rejects_silly_years() {
        let err = LedgerConfig::resolve(None, Some(12)).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_open_dashboard_creates_nothing_until_first_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sub").join("ledger.json");
        let config = LedgerConfig::resolve(Some(path.clone()), Some(2024)).unwrap();

        let mut dash = config.open_dashboard().unwrap();
        assert!(!path.exists());

        dash.submit_income("0", "1", "1").unwrap();
        assert!(path.exists());
    }
}
