use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A year was requested that the ledger does not hold.
    /// Callers only ask for years in the window, so this is a programming error.
    #[error("Year {0} is not in the ledger")]
    UnknownYear(i32),

    #[error("Stored data under '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn corrupt(key: &str, reason: impl Into<String>) -> Self {
        LedgerError::Corrupt {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True for input the user can correct (bad month, empty shop, ...).
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_message_names_key() {
        let err = LedgerError::corrupt("allIncomeData", "expected object");
        assert_eq!(
            err.to_string(),
            "Stored data under 'allIncomeData' is corrupt: expected object"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(LedgerError::Validation("shop".into()).is_validation());
        assert!(!LedgerError::UnknownYear(1990).is_validation());
    }
}
