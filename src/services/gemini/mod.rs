pub mod api;
pub mod client;
pub mod errors;
pub mod models;
pub mod parse;
pub mod prompt;
pub mod resolver;
pub mod retry;

pub use api::GeminiApi;
pub use client::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL};
pub use errors::GeminiError;
pub use models::{ApiVersion, ModelDescriptor, ResolvedCandidate, GENERATE_CONTENT};
pub use parse::{parse_email_draft, strip_code_fence};
pub use prompt::build_email_prompt;
pub use resolver::{
    is_stable_model_name, normalize_model_name, rank_candidates, ModelResolver, DEFAULT_MODEL,
    PREFERRED_MODELS,
};
pub use retry::{RetryPolicy, RetryState};
