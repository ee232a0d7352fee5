//! Typed error handling for the invoice service
//!
//! Every fallible operation in the crate returns [`InvoiceError`], so handlers
//! can map failures onto HTTP responses without inspecting strings.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: submitted form data is missing or malformed
//! - [`InvoiceError::NotFound`]: no invoice with the requested id
//! - [`InvoiceError::DuplicateInvoiceNumber`]: the `invoice_no` uniqueness
//!   constraint rejected an insert
//! - [`RenderingError`]: template rendering or HTML to PDF conversion failed
//! - [`StorageError`]: the storage backend failed
//! - [`ConfigError`]: configuration could not be loaded or is invalid
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(id).await {
//!     Ok(invoice) => println!("{}", invoice.invoice_no),
//!     Err(InvoiceError::NotFound { id }) => println!("invoice {} not found", id),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the invoice service
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Submitted data failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No invoice has the requested id
    #[error("Invoice with id '{id}' not found")]
    NotFound { id: i64 },

    /// The invoice number is already taken
    #[error("Invoice number '{invoice_no}' already exists")]
    DuplicateInvoiceNumber { invoice_no: String },

    /// Template or PDF rendering failed
    #[error(transparent)]
    Rendering(#[from] RenderingError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InvoiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            InvoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InvoiceError::DuplicateInvoiceNumber { .. } => StatusCode::CONFLICT,
            InvoiceError::Rendering(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::Validation(_) => "VALIDATION_ERROR",
            InvoiceError::NotFound { .. } => "INVOICE_NOT_FOUND",
            InvoiceError::DuplicateInvoiceNumber { .. } => "DUPLICATE_INVOICE_NUMBER",
            InvoiceError::Rendering(_) => "RENDERING_ERROR",
            InvoiceError::Storage(_) => "STORAGE_ERROR",
            InvoiceError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InvoiceError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            InvoiceError::DuplicateInvoiceNumber { invoice_no } => {
                Some(serde_json::json!({ "invoice_no": invoice_no }))
            }
            InvoiceError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Field errors as a slice, in the order they were reported
    pub fn fields(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::FieldErrors(errors) => errors,
        }
    }

    /// Messages reported for one field
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.fields()
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

// =============================================================================
// Rendering Errors
// =============================================================================

/// Errors raised while producing the invoice document
#[derive(Debug, Error)]
pub enum RenderingError {
    /// Tera failed to render a template
    #[error("Failed to render template '{template}': {message}")]
    Template { template: String, message: String },

    /// The PDF converter could not be started
    #[error("Failed to launch PDF converter '{program}': {message}")]
    Spawn { program: String, message: String },

    /// The PDF converter exited unsuccessfully
    #[error("PDF converter exited with {status}: {stderr}")]
    ConverterFailed { status: String, stderr: String },

    /// The PDF converter did not finish in time
    #[error("PDF conversion timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The PDF converter produced no output
    #[error("PDF converter produced no output")]
    EmptyOutput,
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// A stored row could not be decoded into an invoice
    #[error("Data integrity error: {message}")]
    IntegrityError { message: String },

    /// Lock poisoned in an in-process store
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse config{}: {}", file_suffix(.file), .message)]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("Failed to read config file '{path}': {message}")]
    IoError { path: String, message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = InvoiceError::NotFound { id: 7 };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "INVOICE_NOT_FOUND");
        assert!(err.to_string().contains("'7'"));
    }

    #[test]
    fn test_duplicate_number_maps_to_409() {
        let err = InvoiceError::DuplicateInvoiceNumber {
            invoice_no: "INV0001".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let response = err.to_response();
        assert_eq!(response.details.unwrap()["invoice_no"], "INV0001");
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError::new("client_name", "This field is required."),
            FieldValidationError::new("amount", "Not a valid decimal value."),
        ]);
        let display = err.to_string();
        assert!(display.contains("client_name"));
        assert!(display.contains("amount"));
        assert_eq!(err.messages_for("amount"), vec!["Not a valid decimal value."]);
        assert!(err.messages_for("client_address").is_empty());
    }

    #[test]
    fn test_rendering_error_is_server_error() {
        let err: InvoiceError = RenderingError::Timeout { seconds: 30 }.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "RENDERING_ERROR");
    }

    #[test]
    fn test_config_parse_error_mentions_file() {
        let err = ConfigError::ParseError {
            file: Some("invoice.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert!(err.to_string().contains("invoice.yaml"));

        let err = ConfigError::ParseError {
            file: None,
            message: "bad indent".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse config: bad indent");
    }
}
