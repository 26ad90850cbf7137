use std::time::Duration;

use thiserror::Error;

use super::models::ApiVersion;
use super::retry::is_retriable_status;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("No Gemini model supporting generateContent is available")]
    NoModelsAvailable,

    #[error("ListModels {version} error {status}")]
    ListModelsFailed { version: ApiVersion, status: u16 },

    #[error("Gemini {version}/{model} error {status}: {body}")]
    HttpStatus {
        version: ApiVersion,
        model: String,
        status: u16,
        body: String,
    },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Gemini generation failed. Attempts: {}", .attempts.join(" | "))]
    AllCandidatesFailed { attempts: Vec<String> },
}

impl GeminiError {
    /// Rate limiting and temporary unavailability; everything else is final
    /// for the candidate that produced it.
    pub fn is_transient(&self) -> bool {
        self.status().is_some_and(is_retriable_status)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GeminiError::HttpStatus { status, .. } | GeminiError::ListModelsFailed { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, GeminiError::ConfigurationError { .. })
    }

    pub fn is_no_models_available(&self) -> bool {
        matches!(self, GeminiError::NoModelsAvailable)
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, GeminiError::ParseError { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GeminiError::Cancelled)
    }

    pub fn user_message(&self) -> String {
        match self {
            GeminiError::ConfigurationError { message } => {
                format!("Configuration error: {message}")
            }
            GeminiError::NoModelsAvailable => {
                "No Gemini model that supports generateContent is available for this API key."
                    .to_string()
            }
            GeminiError::HttpStatus { status: 429, .. } => {
                "Gemini API rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            GeminiError::HttpStatus { status: 503, .. } => {
                "Gemini service is temporarily unavailable. Please try again later.".to_string()
            }
            GeminiError::ListModelsFailed { .. } | GeminiError::HttpStatus { .. } => {
                self.to_string()
            }
            GeminiError::Timeout { .. } => {
                "Request timed out. Please try again.".to_string()
            }
            GeminiError::NetworkError { .. } => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            GeminiError::Cancelled => "Email generation was cancelled.".to_string(),
            GeminiError::ParseError { .. } => {
                "Gemini returned a response that is not an email draft. Please try again."
                    .to_string()
            }
            GeminiError::AllCandidatesFailed { .. } => self.to_string(),
        }
    }

    /// Transport failures carry no HTTP status. The URL is dropped because it
    /// holds the API key in its query string.
    pub fn from_reqwest_error(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            GeminiError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            GeminiError::NetworkError {
                message: error.without_url().to_string(),
            }
        }
    }
}
