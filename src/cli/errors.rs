//! CLI-specific error types

use std::fmt;
use std::io;

use crate::backing::BackingError;
use crate::shared_data::SharedDataError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, image file)
    IoError,
    /// Append or read of the shared area failed
    AreaError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "BOOTSHARE_CLI_CONFIG_ERROR",
            Self::IoError => "BOOTSHARE_CLI_IO_ERROR",
            Self::AreaError => "BOOTSHARE_CLI_AREA_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<BackingError> for CliError {
    fn from(e: BackingError) -> Self {
        Self::io_error(format!("Image file error: {}", e))
    }
}

impl From<SharedDataError> for CliError {
    fn from(e: SharedDataError) -> Self {
        Self::new(CliErrorCode::AreaError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_code() {
        let err = CliError::config_error("capacity_bytes must be > 8");
        assert_eq!(
            err.to_string(),
            "BOOTSHARE_CLI_CONFIG_ERROR: capacity_bytes must be > 8"
        );
    }

    #[test]
    fn test_area_error_keeps_shared_code() {
        let err: CliError = SharedDataError::overflow(40, 32).into();
        assert_eq!(err.code(), &CliErrorCode::AreaError);
        assert!(err.message().contains("SHARED_MEMORY_OVERFLOW"));
    }
}
