use serde::{Deserialize, Serialize};

/// Language the drafted email is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DraftLanguage {
    #[default]
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "en")]
    English,
}

impl std::str::FromStr for DraftLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Ok(DraftLanguage::Japanese),
            "en" | "english" => Ok(DraftLanguage::English),
            _ => Err(format!("Unknown language: {s}. Valid options: ja, en")),
        }
    }
}

impl std::fmt::Display for DraftLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftLanguage::Japanese => write!(f, "ja"),
            DraftLanguage::English => write!(f, "en"),
        }
    }
}

/// Input for drafting: ordered keywords plus an optional recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default)]
    pub language: DraftLanguage,
}

impl EmailRequest {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            recipient: None,
            language: DraftLanguage::default(),
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_language(mut self, language: DraftLanguage) -> Self {
        self.language = language;
        self
    }

    /// Keywords as they appear in the prompt.
    pub fn keyword_line(&self) -> String {
        self.keywords.join(", ")
    }

    /// Recipient with blank values treated as absent.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// A drafted email. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}
