use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Capability a registry entry must advertise to be used for drafting.
pub const GENERATE_CONTENT: &str = "generateContent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    V1Beta,
}

impl ApiVersion {
    /// Resolution order: the stable API first, then the beta surface.
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V1, ApiVersion::V1Beta];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V1Beta => "v1beta",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" => Ok(ApiVersion::V1),
            "v1beta" => Ok(ApiVersion::V1Beta),
            _ => Err(format!("Unknown Gemini API version: {s}. Valid options: v1, v1beta")),
        }
    }
}

/// One entry of a provider model registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub name: String,
    pub supported_operations: HashSet<String>,
}

impl ModelDescriptor {
    pub fn new<I, S>(name: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            supported_operations: operations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn supports_generation(&self) -> bool {
        self.supported_operations.contains(GENERATE_CONTENT)
    }
}

/// A (version, model) pair eligible for a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedCandidate {
    pub api_version: ApiVersion,
    pub model_name: String,
}

impl ResolvedCandidate {
    pub fn new(api_version: ApiVersion, model_name: impl Into<String>) -> Self {
        Self {
            api_version,
            model_name: model_name.into(),
        }
    }
}

impl fmt::Display for ResolvedCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version, self.model_name)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<RegistryModel>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegistryModel {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}

impl From<RegistryModel> for ModelDescriptor {
    fn from(model: RegistryModel) -> Self {
        let name = model
            .name
            .strip_prefix("models/")
            .unwrap_or(&model.name)
            .to_string();
        ModelDescriptor::new(name, model.supported_generation_methods)
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Clone)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Clone)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseCandidate {
    pub content: Option<ResponseContent>,
    pub output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate, falling back to
    /// the legacy `output` field when the candidate carries no parts at all.
    pub fn extract_text(&self) -> String {
        let Some(candidate) = self.candidates.first() else {
            return String::new();
        };

        match candidate.content.as_ref().and_then(|c| c.parts.as_ref()) {
            Some(parts) => parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>(),
            None => candidate.output.clone().unwrap_or_default(),
        }
    }
}
