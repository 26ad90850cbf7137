use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use super::errors::GeminiError;
use super::models::{
    ApiVersion, GenerateContentRequest, GenerateContentResponse, ListModelsResponse,
    ModelDescriptor, ResolvedCandidate,
};

/// Upper bound on registry pages fetched per API version.
const MAX_LIST_PAGES: usize = 10;

/// Authenticated access to the Gemini REST surface. The key travels in the
/// query string, as the API expects.
#[derive(Clone)]
pub struct GeminiApi {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiApi {
    pub fn new(client: Client, base_url: &str, api_key: String, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        }
    }

    pub async fn list_models(
        &self,
        version: ApiVersion,
    ) -> Result<Vec<ModelDescriptor>, GeminiError> {
        let url = format!("{}/{}/models", self.base_url, version);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let mut request = self.client.get(&url).query(&[("key", &self.api_key)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| GeminiError::from_reqwest_error(e, self.timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(GeminiError::ListModelsFailed {
                    version,
                    status: status.as_u16(),
                });
            }

            let page: ListModelsResponse =
                response.json().await.map_err(|e| GeminiError::ParseError {
                    message: format!("Failed to parse {version} model list: {}", e.without_url()),
                })?;

            models.extend(page.models.into_iter().map(ModelDescriptor::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(%version, count = models.len(), "Fetched model registry");
        Ok(models)
    }

    /// Sends one generation request and returns the raw generated text.
    pub async fn generate_content(
        &self,
        candidate: &ResolvedCandidate,
        prompt: &str,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, candidate.api_version, candidate.model_name
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .header("Content-Type", "application/json")
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await
            .map_err(|e| GeminiError::from_reqwest_error(e, self.timeout))?;

        self.handle_response(candidate, response).await
    }

    async fn handle_response(
        &self,
        candidate: &ResolvedCandidate,
        response: Response,
    ) -> Result<String, GeminiError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::HttpStatus {
                version: candidate.api_version,
                model: candidate.model_name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| GeminiError::from_reqwest_error(e, self.timeout))?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| GeminiError::ParseError {
                message: format!("Failed to parse response: {e}"),
            })?;

        Ok(parsed.extract_text())
    }
}
