use thiserror::Error;

use crate::services::gemini::GeminiError;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum MailDraftError {
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },
}

impl MailDraftError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn as_gemini(&self) -> Option<&GeminiError> {
        match self {
            MailDraftError::Gemini(e) => Some(e),
            _ => None,
        }
    }

    /// Message safe to show to the end user verbatim.
    pub fn user_message(&self) -> String {
        match self {
            MailDraftError::Gemini(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            MailDraftError::Gemini(_) => "gemini",
            MailDraftError::InvalidConfig { .. } => "config",
            MailDraftError::Validation { .. } => "validation",
        }
    }
}

/// Result type alias for maildraft
pub type Result<T> = std::result::Result<T, MailDraftError>;
