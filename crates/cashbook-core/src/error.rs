//! Error types for cashbook-core
//!
//! Error codes, severities and detail payloads shared by the service layer
//! and the HTTP envelope.

use cashbook_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Transaction not found
    TransactionNotFound,
    /// No profile for the authenticated user
    ProfileNotFound,
    /// Validation error
    ValidationError,
    /// No valid session
    Unauthenticated,
    /// Role does not allow the operation
    Forbidden,
    /// Backing store failed
    StoreError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ProfileNotFound => write!(f, "PROFILE_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            ErrorCode::Forbidden => write!(f, "FORBIDDEN"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - the request was rejected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for cashbook-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Profile not found: {id}")]
    ProfileNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::ProfileNotFound { .. } => ErrorCode::ProfileNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::Unauthenticated => ErrorCode::Unauthenticated,
            CoreError::Forbidden { .. } => ErrorCode::Forbidden,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::ProfileNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::Unauthenticated => ErrorSeverity::Warning,
            CoreError::Forbidden { .. } => ErrorSeverity::Warning,
            CoreError::StoreError { .. } => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::TransactionNotFound { .. } => {
                details = details
                    .with_suggestion("Check if the transaction ID is correct.".to_string())
                    .with_suggestion(
                        "Use the /api/transactions endpoint to list all transactions.".to_string(),
                    );
            }
            CoreError::ProfileNotFound { .. } => {
                details = details.with_suggestion(
                    "Ask an operator to add your user to the auth configuration.".to_string(),
                );
            }
            CoreError::ValidationError { message } => {
                details = details
                    .with_detail(serde_json::json!({ "validation_message": message }));
            }
            CoreError::Unauthenticated => {
                details = details.with_suggestion(
                    "Send a valid 'Authorization: Bearer <token>' header.".to_string(),
                );
            }
            CoreError::Forbidden { .. } => {
                details = details.with_suggestion(
                    "Only the operator role can change transactions.".to_string(),
                );
            }
            CoreError::StoreError { .. } => {
                // store internals stay in the log
                details.message = "Failed to access the transaction store".to_string();
            }
            CoreError::InternalError { .. } => {
                details.message = "Internal server error".to_string();
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        CoreError::StoreError {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// User ID (if authenticated)
    pub user_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            user_id: None,
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add user ID
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "cashbook::error",
                "ERROR [{}] {} - Operation: {} - User: {:?} - Data: {}",
                error.code(),
                error,
                context.operation,
                context.user_id,
                context.data
            ),
            _ => log::debug!(
                target: "cashbook::error",
                "REJECTED [{}] {} - Operation: {} - User: {:?}",
                error.code(),
                error,
                context.operation,
                context.user_id
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "cashbook::error",
            "WARNING: {} - Operation: {} - Data: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::TransactionNotFound.to_string(), "TRANSACTION_NOT_FOUND");
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::StoreError.to_string(), "STORE_ERROR");
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::validation("bad").severity(), ErrorSeverity::Warning);
        assert_eq!(
            CoreError::StoreError { message: "x".to_string() }.severity(),
            ErrorSeverity::Error
        );
        assert_eq!(
            CoreError::InternalError { message: "x".to_string() }.severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let unavailable: CoreError = StoreError::Unavailable {
            message: "down".to_string(),
        }
        .into();
        assert_eq!(unavailable.code(), ErrorCode::StoreError);
    }

    #[test]
    fn test_store_details_hide_internals() {
        let error = CoreError::StoreError {
            message: "IO error: /var/lib/secret".to_string(),
        };
        let details = error.to_details();
        assert!(!details.message.contains("/var/lib/secret"));
    }

    #[test]
    fn test_validation_details() {
        let details = CoreError::validation("Invalid month. Must be 1-12").to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert!(details.details.is_some());
        assert!(details.message.contains("Invalid month"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("balance_sheet")
            .with_user_id("user-456")
            .with_data("year", serde_json::json!(2025));

        assert_eq!(context.operation, "balance_sheet");
        assert_eq!(context.user_id.as_deref(), Some("user-456"));
        assert_eq!(context.data["year"], 2025);
    }
}
