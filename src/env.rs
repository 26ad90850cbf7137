//! Environment variable constants used throughout the application
//!
//! Only the configuration loader and the logging setup read these; library
//! clients receive their settings through explicit config structs.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "MAILDRAFT_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "MAILDRAFT_LOG_FILE";

    /// Emit logs as JSON lines
    pub const LOG_JSON: &str = "MAILDRAFT_LOG_JSON";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// External API configuration
pub mod apis {
    /// Gemini API key used for drafting
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

    /// Desired Gemini model (optional, aliases are normalized)
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

    /// Override for the Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
}

/// Generation configuration
pub mod generation {
    /// Backend selection: "gemini" or "offline"
    pub const BACKEND: &str = "MAILDRAFT_BACKEND";

    /// Per-request timeout in seconds
    pub const TIMEOUT: &str = "MAILDRAFT_TIMEOUT";
}
