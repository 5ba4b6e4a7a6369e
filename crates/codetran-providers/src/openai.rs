//! OpenAI and OpenAI-compatible translation provider.
//!
//! Works against the official OpenAI chat-completions endpoint as well as
//! any compatible local server (LM Studio, vLLM, Ollama's OpenAI shim).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderConfig, TranslationProvider};
use crate::resilience::ResilienceGuard;
use crate::types::{ProviderCapabilities, ProviderStatus, TranslationOptions, TranslationOutcome};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_LOCAL_URL: &str = "http://localhost:1234/v1/chat/completions";
const CONFIDENCE: f64 = 0.95;

/// Translates and explains code via an OpenAI-shaped chat-completions endpoint.
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
    resilience: ResilienceGuard,
    /// `true` when talking to a local server without API-key authentication
    /// (LM Studio, vLLM). Set at construction from which constructor is used,
    /// normalizing the legacy-vs-current auth shape the way a local endpoint
    /// and the hosted API diverge.
    local: bool,
}

impl OpenAiProvider {
    /// Build a provider against the hosted OpenAI API.
    #[must_use]
    pub fn openai(config: ProviderConfig) -> Self {
        Self { client: Client::new(), resilience: ResilienceGuard::new("openai", 10.0, 20.0), config, local: false }
    }

    /// Build a provider against a local OpenAI-compatible server
    /// (defaults to LM Studio's port if `config.base_url` is unset).
    #[must_use]
    pub fn local(mut config: ProviderConfig) -> Self {
        if config.base_url.is_none() {
            config.base_url = Some(DEFAULT_LOCAL_URL.to_string());
        }
        Self { client: Client::new(), resilience: ResilienceGuard::new("openai-local", 20.0, 40.0), config, local: true }
    }

    fn endpoint(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_URL)
    }

    fn build_request(&self, system: &str, user_prompt: &str) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user_prompt},
            ],
        })
    }

    async fn call(&self, system: &str, user_prompt: &str) -> ProviderResult<String> {
        if !self.local && self.config.api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotConfigured { provider: "openai".to_string() });
        }

        let request_body = self.build_request(system, user_prompt);
        debug!(model = self.config.model, local = self.local, "sending OpenAI-compatible request");

        let mut request = self.client.post(self.endpoint()).json(&request_body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "OpenAI-compatible API error");
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimitExceeded { retry_after_secs: 60 });
            }
            return Err(ProviderError::ApiRequestFailed(format!("status {status}: {body}")));
        }

        let parsed: ApiResponse =
            response.json().await.map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("no choices in response".to_string()))?;
        Ok(text)
    }
}

#[async_trait]
impl TranslationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        if self.local { "openai-local" } else { "openai" }
    }

    async fn initialize(&self) -> ProviderResult<()> {
        if !self.local && self.config.api_key.is_empty() {
            return Err(ProviderError::ApiKeyNotConfigured { provider: "openai".to_string() });
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
        if !self.local && self.config.api_key.is_empty() {
            return Ok(ProviderStatus::Unhealthy);
        }
        Ok(ProviderStatus::Healthy)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supported_pairs: Vec::new(),
            max_input_chars: 400_000,
            supports_explain: true,
            requires_network: !self.local,
        }
    }

    fn metrics(&self) -> crate::types::ProviderMetrics {
        self.resilience.metrics()
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hosted_provider_requires_api_key() {
        let provider = OpenAiProvider::openai(ProviderConfig::new("", "gpt-4o"));
        let result = provider.translate("1+1", "python", "java", &TranslationOptions::default()).await;
        assert!(matches!(result, Err(ProviderError::ApiKeyNotConfigured { .. })));
    }

    #[tokio::test]
    async fn local_provider_does_not_require_api_key() {
        let provider = OpenAiProvider::local(ProviderConfig::new("", "local-model"));
        provider.initialize().await.unwrap();
        assert_eq!(provider.health_probe().await.unwrap(), ProviderStatus::Healthy);
    }

    #[test]
    fn local_defaults_to_lm_studio_url() {
        let provider = OpenAiProvider::local(ProviderConfig::new("", "local-model"));
        assert_eq!(provider.endpoint(), DEFAULT_LOCAL_URL);
    }
}
