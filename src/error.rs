// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types and how they surface to the user.

use crate::storage::StorageError;

/// Application error type shared by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// How an error is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Modal alert the user has to dismiss (login/signup failures).
    Blocking(String),
    /// Static text rendered in place of the content that failed to load.
    Inline(String),
    /// Nothing to show; the view simply stays as it was.
    Silent,
}

impl AppError {
    /// True for failures caused by bad credentials or a missing session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::InvalidCredentials | AppError::Unauthorized)
    }

    /// True when the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::Api { status: 404, .. })
    }

    /// Map the error to its user-visible form.
    ///
    /// `what` names the content being loaded, e.g. "feed" or "city data".
    pub fn presentation(&self, what: &str) -> Presentation {
        match self {
            AppError::InvalidCredentials => Presentation::Blocking(
                "Login failed. Please check your username and password.".to_string(),
            ),
            AppError::Unauthorized => {
                Presentation::Blocking("Please log in to continue.".to_string())
            }
            AppError::Validation(msg) => Presentation::Blocking(msg.clone()),
            AppError::Cancelled => Presentation::Silent,
            e if e.is_not_found() => Presentation::Inline(format!("{} not found", what)),
            _ => Presentation::Inline(format!(
                "Failed to load {}. Please try again later.",
                what
            )),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
