pub mod gemini;
pub mod generator;

pub use gemini::{GeminiClient, GeminiConfig, GeminiError};
pub use generator::{
    create_generator, EmailGenerator, GeminiEmailGenerator, OfflineEmailGenerator,
};
