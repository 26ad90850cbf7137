use serde::{Deserialize, Serialize};

/// Which generator answers a drafting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationBackend {
    /// Gemini REST API with model discovery and fallback
    #[default]
    Gemini,
    /// Local template draft, no network access
    Offline,
}

impl std::str::FromStr for GenerationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "gemini" | "gemini-api" | "google" | "true" => Ok(GenerationBackend::Gemini),
            "offline" | "template" | "local" | "false" => Ok(GenerationBackend::Offline),
            _ => Err(format!(
                "Unknown generation backend: {s}. Valid options: gemini, offline"
            )),
        }
    }
}

impl std::fmt::Display for GenerationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationBackend::Gemini => write!(f, "gemini"),
            GenerationBackend::Offline => write!(f, "offline"),
        }
    }
}
