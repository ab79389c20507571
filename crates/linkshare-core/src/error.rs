//! Unified application error types for LinkShare.
//!
//! The transport, the entity layer and the controller all report failures as
//! [`AppError`], so the `?` operator works across crate boundaries and the
//! controller can classify an outcome by its [`ErrorKind`] alone.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Link sharing is disabled or the caller lacks re-share rights.
    /// Fatal for the whole shared path; never retried.
    PreconditionDenied,
    /// The server refused to create a link without a password.
    PasswordRequired,
    /// The share already has an operation in flight.
    Busy,
    /// The remote share service rejected the request.
    Server,
    /// Input validation failed before anything reached the transport.
    Validation,
    /// The referenced share is not part of the current collection.
    NotFound,
    /// The request conflicts with current state (e.g. a second link on a
    /// single-link server).
    Conflict,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A local I/O error occurred.
    Storage,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreconditionDenied => write!(f, "PRECONDITION_DENIED"),
            Self::PasswordRequired => write!(f, "PASSWORD_REQUIRED"),
            Self::Busy => write!(f, "BUSY"),
            Self::Server => write!(f, "SERVER"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout LinkShare.
///
/// Server failures carry the numeric status code reported by the remote
/// service in `code`; locally raised errors leave it empty.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Status code reported by the remote service, if any.
    pub code: Option<i32>,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a precondition-denied error.
    pub fn precondition_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PreconditionDenied, message)
    }

    /// Create a password-required error carrying the server's message.
    pub fn password_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PasswordRequired, message)
    }

    /// Create a busy error.
    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Busy, message)
    }

    /// Create a server error with the remote status code.
    pub fn server(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            ..Self::new(ErrorKind::Server, message)
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error was raised locally and never reached the transport.
    pub fn is_local(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Busy | ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Conflict
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            code: self.code,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
