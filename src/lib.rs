pub mod cli;
pub mod config;
pub mod models;
pub mod services;

pub mod env;
pub mod error;
pub mod logging;

pub use error::{MailDraftError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use models::{DraftLanguage, EmailDraft, EmailRequest, GenerationBackend};
pub use services::{create_generator, EmailGenerator, GeminiClient, GeminiConfig, GeminiError};
