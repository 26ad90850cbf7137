use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::api::GeminiApi;
use super::errors::GeminiError;
use super::models::{ApiVersion, ResolvedCandidate};
use super::parse::parse_email_draft;
use super::prompt::build_email_prompt;
use super::resolver::{normalize_model_name, ModelResolver};
use super::retry::{RetryPolicy, RetryState};
use crate::models::{EmailDraft, EmailRequest, GenerationBackend};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Everything the client needs, passed in explicitly. The client itself never
/// reads the environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub backend: GenerationBackend,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            backend: GenerationBackend::Gemini,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_backend(mut self, backend: GenerationBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Model to resolve, after alias and default handling.
    pub fn desired_model(&self) -> String {
        normalize_model_name(self.model.as_deref())
    }

    pub fn api_key(&self) -> Result<&str, GeminiError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GeminiError::ConfigurationError {
                message: "Gemini API key is not set".to_string(),
            })
    }

    pub fn validate(&self) -> Result<(), GeminiError> {
        self.api_key()?;

        if self.base_url.trim().is_empty() {
            return Err(GeminiError::ConfigurationError {
                message: "Base URL cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Builds the HTTP client only. Credentials are checked per call so a
    /// missing key surfaces as a configuration error from `generate`.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeminiError::ConfigurationError {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api(&self) -> Result<GeminiApi, GeminiError> {
        self.config.validate()?;
        let api_key = self.config.api_key()?.to_string();

        Ok(GeminiApi::new(
            self.client.clone(),
            &self.config.base_url,
            api_key,
            self.config.timeout,
        ))
    }

    /// Ranked (version, model) pairs for the configured model.
    pub async fn resolve_candidates(&self) -> Result<Vec<ResolvedCandidate>, GeminiError> {
        let api = self.api()?;
        Ok(ModelResolver::new(&api)
            .resolve_candidates(&self.config.desired_model())
            .await)
    }

    pub async fn resolve_model(&self) -> Result<ResolvedCandidate, GeminiError> {
        let api = self.api()?;
        ModelResolver::new(&api)
            .resolve_model(&self.config.desired_model())
            .await
    }

    pub async fn generate(&self, request: &EmailRequest) -> Result<EmailDraft, GeminiError> {
        self.generate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Drafts an email, walking the ranked candidates in order.
    ///
    /// Each candidate gets up to `retry.max_attempts` attempts. Only 429 and
    /// 503 are retried on the same candidate; any other failure, including
    /// unparseable output and cancellation, moves on to the next one. When
    /// every candidate is exhausted the per-candidate messages are returned
    /// together in attempt order.
    pub async fn generate_with_cancel(
        &self,
        request: &EmailRequest,
        cancel: &CancellationToken,
    ) -> Result<EmailDraft, GeminiError> {
        let api = self.api()?;
        let desired = self.config.desired_model();
        let prompt = build_email_prompt(request);

        let candidates = ModelResolver::new(&api)
            .resolve_candidates(&desired)
            .await;
        if candidates.is_empty() {
            return Err(GeminiError::NoModelsAvailable);
        }

        let mut failures = Vec::new();

        for candidate in &candidates {
            let mut state = RetryState::new(&self.config.retry);

            loop {
                let attempt = state.begin_attempt();

                match self.attempt(&api, candidate, &prompt, cancel).await {
                    Ok(draft) => {
                        info!(
                            version = %candidate.api_version,
                            model = %candidate.model_name,
                            attempt,
                            "Email draft generated"
                        );
                        return Ok(draft);
                    }
                    Err(error) => {
                        if let Some(delay) = state.next_delay(&error) {
                            warn!(
                                version = %candidate.api_version,
                                model = %candidate.model_name,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %error,
                                "Transient Gemini error, retrying"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }

                        if error.is_cancelled() {
                            info!(
                                version = %candidate.api_version,
                                model = %candidate.model_name,
                                attempt,
                                "Attempt cancelled, moving to next candidate"
                            );
                        } else {
                            warn!(
                                version = %candidate.api_version,
                                model = %candidate.model_name,
                                attempt,
                                error = %error,
                                "Abandoning candidate"
                            );
                        }
                        let reason = state.last_error().unwrap_or_default();
                        failures.push(format!("{candidate}: {reason}"));
                        break;
                    }
                }
            }
        }

        Err(GeminiError::AllCandidatesFailed { attempts: failures })
    }

    async fn attempt(
        &self,
        api: &GeminiApi,
        candidate: &ResolvedCandidate,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<EmailDraft, GeminiError> {
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GeminiError::Cancelled),
            result = api.generate_content(candidate, prompt) => result?,
        };

        parse_email_draft(&text)
    }

    /// Sends a single request to a fixed (version, model) pair, bypassing
    /// resolution and retries.
    pub async fn generate_with_model(
        &self,
        version: ApiVersion,
        model: &str,
        request: &EmailRequest,
    ) -> Result<EmailDraft, GeminiError> {
        let api = self.api()?;
        let candidate = ResolvedCandidate::new(version, model);
        self.attempt(
            &api,
            &candidate,
            &build_email_prompt(request),
            &CancellationToken::new(),
        )
        .await
    }
}
