//! Google Gemini translation provider.
//!
//! Grounded in the same HTTP-provider idiom as [`crate::anthropic`] and
//! [`crate::openai`]; Gemini has no chat-completions history so each call is
//! a single `generateContent` request with the API key carried as a query
//! parameter rather than a header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderConfig, TranslationProvider};
use crate::resilience::ResilienceGuard;
use crate::types::{ProviderCapabilities, ProviderStatus, TranslationOptions, TranslationOutcome};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const CONFIDENCE: f64 = 0.93;

/// Translates and explains code via Gemini's `generateContent` REST endpoint.
pub struct GoogleProvider {
    client: Client,
    config: ProviderConfig,
    resilience: ResilienceGuard,
}

impl GoogleProvider {
    /// Build a provider from `config`.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self { client: Client::new(), resilience: ResilienceGuard::new("google", 5.0, 10.0), config }
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{base}/{}:generateContent", self.config.model)
    }

    fn build_request(&self, system: &str, user_prompt: &str) -> Value {
        serde_json::json!({
            "system_instruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            },
        })
    }

    async fn call(&self, system: &str, user_prompt: &str) -> ProviderResult<String> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotConfigured { provider: "google".to_string() });
        }

        let request_body = self.build_request(system, user_prompt);
        debug!(model = self.config.model, "sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.config.api_key)])
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Gemini API error");
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimitExceeded { retry_after_secs: 60 });
            }
            return Err(ProviderError::ApiRequestFailed(format!("status {status}: {body}")));
        }

        let parsed: ApiResponse =
            response.json().await.map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ProviderError::InvalidResponse("no candidates in response".to_string()))?;
        Ok(text)
    }
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn initialize(&self) -> ProviderResult<()> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotConfigured { provider: "google".to_string() });
        }
        Ok(())
    }

    async fn translate(
        &self,
        code: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslationOptions,
    ) -> ProviderResult<TranslationOutcome> {
        let system = "You translate source code between programming languages. \
            Respond with only the translated code, no commentary.";
        let style = options.style.as_deref().unwrap_or("idiomatic");
        let prompt = format!(
            "Translate the following {source_lang} code to {target_lang}, in an {style} style:\n\n{code}"
        );
        let text = self.resilience.execute(|| self.call(system, &prompt)).await?;
        Ok(TranslationOutcome::new(text, CONFIDENCE))
    }

    async fn explain(&self, code: &str, language: &str, line_by_line: bool) -> ProviderResult<String> {
        let system = "You explain source code clearly and concisely.";
        let prompt = if line_by_line {
            format!("Explain the following {language} code line by line:\n\n{code}")
        } else {
            format!("Explain what the following {language} code does:\n\n{code}")
        };
        self.resilience.execute(|| self.call(system, &prompt)).await
    }

    async fn health_probe(&self) -> ProviderResult<ProviderStatus> {
        if self.config.api_key.is_empty() {
            return Ok(ProviderStatus::Unhealthy);
        }
        Ok(ProviderStatus::Healthy)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supported_pairs: Vec::new(),
            max_input_chars: 800_000,
            supports_explain: true,
            requires_network: true,
        }
    }

    fn metrics(&self) -> crate::types::ProviderMetrics {
        self.resilience.metrics()
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_rejects_translate() {
        let provider = GoogleProvider::new(ProviderConfig::new("", "gemini-1.5-pro"));
        let result = provider.translate("x=1", "python", "java", &TranslationOptions::default()).await;
        assert!(matches!(result, Err(ProviderError::ApiKeyNotConfigured { .. })));
    }

    #[test]
    fn endpoint_includes_model_name() {
        let provider = GoogleProvider::new(ProviderConfig::new("key", "gemini-1.5-pro"));
        assert!(provider.endpoint().ends_with("gemini-1.5-pro:generateContent"));
    }
}
