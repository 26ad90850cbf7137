pub mod backend;
pub mod email;

pub use backend::GenerationBackend;
pub use email::{DraftLanguage, EmailDraft, EmailRequest};
