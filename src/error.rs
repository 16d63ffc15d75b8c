// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Engine error types with consistent user-facing notifications.

use crate::services::notifications::{Notification, Severity};

/// Application error type that converts to UI notifications.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Identity assertion could not be decoded: {0}")]
    InvalidAssertion(String),

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Rate limit exceeded for action '{action}'")]
    RateLimited { action: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Nothing to import: {0}")]
    NothingToImport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Failure categories surfaced to the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DecodeFailure,
    AuthorizationRequired,
    RateLimitExceeded,
    ValidationFailure,
    PersistenceFailure,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidAssertion(_) | AppError::MalformedJson(_) => ErrorKind::DecodeFailure,
            AppError::Unauthorized => ErrorKind::AuthorizationRequired,
            AppError::RateLimited { .. } => ErrorKind::RateLimitExceeded,
            AppError::BadRequest(_) | AppError::NothingToImport(_) => ErrorKind::ValidationFailure,
            AppError::Storage(_) => ErrorKind::PersistenceFailure,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AppError::Unauthorized
            | AppError::RateLimited { .. }
            | AppError::NothingToImport(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Build the notification shown to the user for this error.
    ///
    /// Storage and internal failures are logged here; their details never
    /// reach the notification text.
    pub fn to_notification(&self) -> Notification {
        let message = match self {
            AppError::InvalidAssertion(_) => "Authentication failed. Please try again.".to_string(),
            AppError::MalformedJson(_) => "Invalid JSON file format".to_string(),
            AppError::Unauthorized => "Please sign in to access this feature".to_string(),
            AppError::RateLimited { action } => format!(
                "Rate limit exceeded. Please wait before {} again.",
                rate_limited_activity(action)
            ),
            AppError::BadRequest(msg) | AppError::NothingToImport(msg) => msg.clone(),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                "Could not access local storage".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                "Something went wrong. Please try again.".to_string()
            }
        };

        Notification::new(message, self.severity())
    }
}

fn rate_limited_activity(action: &str) -> &'static str {
    match action {
        "search" => "searching",
        "rating" => "rating",
        "import" => "importing",
        _ => "trying",
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AppError>;
