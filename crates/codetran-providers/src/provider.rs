//! The translation provider trait.
//!
//! Defines the interface every concrete translator (model-backed or
//! offline) must implement.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::types::{
    ProviderCapabilities, ProviderMetrics, ProviderStatus, TranslationOptions, TranslationOutcome,
};

/// A source of code translation and explanation.
///
/// Implementors are expected to be cheap to clone behind an `Arc` and to
/// perform their own resilience wrapping (rate limiting, circuit breaking)
/// internally, via [`crate::resilience::ResilienceGuard`].
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Stable provider name, used as the registry key.
    fn name(&self) -> &str;

    /// One-shot, idempotent setup (e.g. validating credentials). Safe to
    /// call more than once; subsequent calls are no-ops.
    async fn initialize(&self) -> ProviderResult<()>;

    /// Translate `code` from `source_lang` to `target_lang`.
    async fn translate(
        &self,
        code: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslationOptions,
    ) -> ProviderResult<TranslationOutcome>;

    /// Produce a natural-language explanation of `code`.
    async fn explain(&self, code: &str, language: &str, line_by_line: bool) -> ProviderResult<String>;

    /// Check current health without relying on cached state.
    async fn health_probe(&self) -> ProviderResult<ProviderStatus>;

    /// Declared capabilities.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Running performance counters, for chain reordering and load-balancer
    /// strategies. Providers with no call history report the default.
    fn metrics(&self) -> ProviderMetrics {
        ProviderMetrics::default()
    }
}

/// Blanket implementation so `Box<dyn TranslationProvider>` and
/// `Arc<dyn TranslationProvider>` satisfy `P: TranslationProvider` wherever
/// generic dispatch is needed.
#[async_trait]
impl TranslationProvider for Box<dyn TranslationProvider> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn initialize(&self) -> ProviderResult<()> {
        (**self).initialize().await
    }

    async fn translate(
        &self,
        code: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslationOptions,
    ) -> ProviderResult<TranslationOutcome> {
        (**self).translate(code, source_lang, target_lang, options).await
    }

    async fn explain(&self, code: &str, language: &str, line_by_line: bool) -> ProviderResult<String> {
        (**self).explain(code, language, line_by_line).await
    }

    async fn health_probe(&self) -> ProviderResult<ProviderStatus> {
        (**self).health_probe().await
    }

    fn capabilities(&self) -> ProviderCapabilities {
        (**self).capabilities()
    }

    fn metrics(&self) -> ProviderMetrics {
        (**self).metrics()
    }
}

/// Configuration shared by the HTTP-backed providers.
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key. Empty for providers that don't require one.
    pub api_key: String,
    /// Model name/identifier.
    pub model: String,
    /// Maximum tokens the provider should generate per call.
    pub max_tokens: usize,
    /// Sampling temperature, `0.0`-`1.0`.
    pub temperature: f64,
    /// Override of the provider's default endpoint.
    pub base_url: Option<String>,
    /// Per-call timeout, in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("has_api_key", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("has_base_url", &self.base_url.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Build a config for `model`, with `api_key` (may be empty).
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
            temperature: 0.2,
            base_url: None,
            timeout_secs: 30,
        }
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
