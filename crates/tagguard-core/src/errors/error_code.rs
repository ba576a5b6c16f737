//! Stable error codes for logs and outcome reports.

/// Maps an error to a stable, machine-readable code.
/// Every error enum implements this so reports can carry a code that does
/// not change when the human-readable message does.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "LIMIT_EXCEEDED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const THROTTLED: &str = "THROTTLED";
pub const TIMEOUT: &str = "TIMEOUT";
pub const TRANSIENT: &str = "TRANSIENT";
pub const LIMIT_EXCEEDED: &str = "LIMIT_EXCEEDED";
pub const INVALID_TAG: &str = "INVALID_TAG";
pub const UNSUPPORTED: &str = "UNSUPPORTED";
pub const PROTOCOL_ERROR: &str = "PROTOCOL_ERROR";
pub const UNEXPECTED_SHAPE: &str = "UNEXPECTED_SHAPE";
pub const BACKEND_ERROR: &str = "BACKEND_ERROR";
pub const SETUP_ERROR: &str = "SETUP_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
