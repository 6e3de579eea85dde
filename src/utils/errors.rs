use thiserror::Error;

/// Main error type for the directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DirectoryError {
    /// True for the two failures that abort a dataset load
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::FetchError(_) | Self::ParseError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = DirectoryError::FetchError("HTTP 404 Not Found".to_string());
        assert_eq!(err.to_string(), "Fetch error: HTTP 404 Not Found");

        let err = DirectoryError::ParseError("row 3: unequal lengths".to_string());
        assert_eq!(err.to_string(), "Parse error: row 3: unequal lengths");
    }

    #[test]
    fn test_load_failure_classification() {
        assert!(DirectoryError::FetchError(String::new()).is_load_failure());
        assert!(DirectoryError::ParseError(String::new()).is_load_failure());
        assert!(!DirectoryError::ConfigError(String::new()).is_load_failure());
    }
}
