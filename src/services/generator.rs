//! Email generator abstraction
//!
//! The UI-facing contract: take keywords and an optional recipient, return a
//! subject and body, or an error whose message can be shown as-is. The
//! configured backend decides which implementation answers.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::gemini::{GeminiClient, GeminiConfig};
use crate::error::Result;
use crate::models::{DraftLanguage, EmailDraft, EmailRequest, GenerationBackend};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailGenerator: Send + Sync {
    /// Draft an email for the given keywords.
    async fn generate(&self, request: EmailRequest) -> Result<EmailDraft>;

    /// Draft an email, aborting in-flight provider calls once `cancel` fires.
    async fn generate_with_cancel(
        &self,
        request: EmailRequest,
        cancel: CancellationToken,
    ) -> Result<EmailDraft>;

    fn backend(&self) -> GenerationBackend;
}

pub struct GeminiEmailGenerator {
    client: GeminiClient,
}

impl GeminiEmailGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: GeminiClient::new(config)?,
        })
    }
}

#[async_trait]
impl EmailGenerator for GeminiEmailGenerator {
    async fn generate(&self, request: EmailRequest) -> Result<EmailDraft> {
        Ok(self.client.generate(&request).await?)
    }

    async fn generate_with_cancel(
        &self,
        request: EmailRequest,
        cancel: CancellationToken,
    ) -> Result<EmailDraft> {
        Ok(self.client.generate_with_cancel(&request, &cancel).await?)
    }

    fn backend(&self) -> GenerationBackend {
        GenerationBackend::Gemini
    }
}

/// Deterministic template drafts for working without an API key.
#[derive(Debug, Default, Clone)]
pub struct OfflineEmailGenerator;

impl OfflineEmailGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn draft(&self, request: &EmailRequest) -> EmailDraft {
        match request.language {
            DraftLanguage::Japanese => Self::japanese_draft(request),
            DraftLanguage::English => Self::english_draft(request),
        }
    }

    fn japanese_draft(request: &EmailRequest) -> EmailDraft {
        let topic = if request.keywords.is_empty() {
            "ご連絡".to_string()
        } else {
            request.keywords.join("・")
        };
        let greeting = request
            .recipient()
            .map(|r| format!("{r} 様\n\n"))
            .unwrap_or_default();
        let items = request
            .keywords
            .iter()
            .map(|k| format!("- {k}"))
            .collect::<Vec<_>>()
            .join("\n");

        EmailDraft {
            subject: format!("{topic} の件"),
            body: format!(
                "{greeting}いつもお世話になっております。\n\n下記の件につきましてご連絡いたします。\n{items}\n\nご確認のほど、よろしくお願いいたします。"
            ),
        }
    }

    fn english_draft(request: &EmailRequest) -> EmailDraft {
        let topic = if request.keywords.is_empty() {
            "Follow-up".to_string()
        } else {
            request.keyword_line()
        };
        let greeting = request
            .recipient()
            .map(|r| format!("Dear {r},"))
            .unwrap_or_else(|| "Hello,".to_string());
        let items = request
            .keywords
            .iter()
            .map(|k| format!("- {k}"))
            .collect::<Vec<_>>()
            .join("\n");

        EmailDraft {
            subject: format!("Regarding: {topic}"),
            body: format!(
                "{greeting}\n\nI am writing to you about the following:\n{items}\n\nThank you for your time.\n\nBest regards,"
            ),
        }
    }
}

#[async_trait]
impl EmailGenerator for OfflineEmailGenerator {
    async fn generate(&self, request: EmailRequest) -> Result<EmailDraft> {
        Ok(self.draft(&request))
    }

    async fn generate_with_cancel(
        &self,
        request: EmailRequest,
        _cancel: CancellationToken,
    ) -> Result<EmailDraft> {
        Ok(self.draft(&request))
    }

    fn backend(&self) -> GenerationBackend {
        GenerationBackend::Offline
    }
}

/// Picks the generator named by `config.backend`.
pub fn create_generator(config: GeminiConfig) -> Result<Arc<dyn EmailGenerator>> {
    match config.backend {
        GenerationBackend::Gemini => Ok(Arc::new(GeminiEmailGenerator::new(config)?)),
        GenerationBackend::Offline => Ok(Arc::new(OfflineEmailGenerator::new())),
    }
}
