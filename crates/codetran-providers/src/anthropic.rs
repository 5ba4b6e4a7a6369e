//! Anthropic Claude translation provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderConfig, TranslationProvider};
use crate::resilience::ResilienceGuard;
use crate::types::{ProviderCapabilities, ProviderStatus, TranslationOptions, TranslationOutcome};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const CONFIDENCE: f64 = 0.97;

/// Translates and explains code via the Anthropic Messages API.
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
    resilience: ResilienceGuard,
}

impl AnthropicProvider {
    /// Build a provider from `config`.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            resilience: ResilienceGuard::new("anthropic", 5.0, 10.0),
            config,
        }
    }

    fn build_request(&self, system: &str, user_prompt: &str) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system,
            "messages": [{"role": "user", "content": user_prompt}],
        })
    }

    async fn call(&self, system: &str, user_prompt: &str) -> ProviderResult<String> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotConfigured { provider: "anthropic".to_string() });
        }

        let request_body = self.build_request(system, user_prompt);
        let url = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);

        let mut api_key_header = reqwest::header::HeaderValue::try_from(&self.config.api_key)
            .map_err(|e| ProviderError::Config(format!("invalid API key characters: {e}")))?;
        api_key_header.set_sensitive(true);

        debug!(model = self.config.model, "sending Anthropic request");

        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key_header)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Anthropic API error");
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimitExceeded { retry_after_secs: 60 });
            }
            return Err(ProviderError::ApiRequestFailed(format!("status {status}: {body}")));
        }

        let parsed: ApiResponse =
            response.json().await.map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let text = parsed.content.into_iter().map(|block| block.text).collect::<Vec<_>>().join("");
        Ok(text)
    }
}

#[async_trait]
impl TranslationProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn initialize(&self) -> ProviderResult<()> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotConfigured { provider: "anthropic".to_string() });
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
            max_input_chars: 600_000,
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
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_rejects_translate() {
        let provider = AnthropicProvider::new(ProviderConfig::new("", "claude-sonnet-4-20250514"));
        let result = provider.translate("print(1)", "python", "javascript", &TranslationOptions::default()).await;
        assert!(matches!(result, Err(ProviderError::ApiKeyNotConfigured { .. })));
    }

    #[tokio::test]
    async fn missing_api_key_reports_unhealthy() {
        let provider = AnthropicProvider::new(ProviderConfig::new("", "claude-sonnet-4-20250514"));
        assert_eq!(provider.health_probe().await.unwrap(), ProviderStatus::Unhealthy);
    }

    #[test]
    fn build_request_includes_model_and_system() {
        let provider = AnthropicProvider::new(ProviderConfig::new("test-key", "claude-sonnet-4-20250514"));
        let request = provider.build_request("be terse", "translate this");
        assert_eq!(request["model"], "claude-sonnet-4-20250514");
        assert_eq!(request["system"], "be terse");
    }
}
