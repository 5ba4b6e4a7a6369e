//! Ordered fallback across multiple providers.
//!
//! Grounded in `ProviderChain`: try providers in order, skip ones already
//! known unhealthy, fall through to the next on failure, and collect every
//! failure reason so a caller can see why the whole chain was exhausted.

use std::sync::Arc;

use tracing::warn;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::TranslationProvider;
use crate::types::{ProviderStatus, TranslationOptions, TranslationOutcome};

/// An ordered list of providers tried in sequence until one succeeds.
pub struct ProviderChain {
    providers: Vec<Arc<dyn TranslationProvider>>,
}

impl ProviderChain {
    /// Build a chain trying `providers` in the given order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn TranslationProvider>>) -> Self {
        Self { providers }
    }

    /// Translate `code`, trying each provider in order until one succeeds.
    ///
    /// # Errors
    /// Returns [`ProviderError::AllProvidersFailed`] with every provider's
    /// failure reason if none succeed, or [`ProviderError::NoHealthyProvider`]
    /// if the chain is empty.
    pub async fn execute(
        &self,
        code: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslationOptions,
    ) -> ProviderResult<TranslationOutcome> {
        if self.providers.is_empty() {
            return Err(ProviderError::NoHealthyProvider);
        }

        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.translate(code, source_lang, target_lang, options).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                    failures.push((provider.name().to_string(), e.to_string()));
                },
            }
        }
        Err(ProviderError::AllProvidersFailed(failures))
    }

    /// Re-sort providers by a composite performance score, best first:
    /// `0.7 * success_rate + 0.3 * latency_score`, where
    /// `latency_score = 1 / (1 + average_latency_ms)` rewards lower latency
    /// without letting a single slow outlier dominate the ranking.
    pub fn reorder_by_performance(&mut self) {
        self.providers.sort_by(|a, b| {
            score(&b.metrics()).total_cmp(&score(&a.metrics()))
        });
    }

    /// Providers currently in the chain, in try order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn TranslationProvider>] {
        &self.providers
    }
}

fn score(metrics: &crate::types::ProviderMetrics) -> f64 {
    let latency_score = 1.0 / (1.0 + metrics.average_latency_ms());
    0.7 * metrics.success_rate() + 0.3 * latency_score
}

/// Filter `providers` down to those last reporting [`ProviderStatus::Healthy`]
/// or [`ProviderStatus::Degraded`], preserving order.
#[must_use]
pub async fn filter_usable(providers: &[Arc<dyn TranslationProvider>]) -> Vec<Arc<dyn TranslationProvider>> {
    let mut usable = Vec::with_capacity(providers.len());
    for provider in providers {
        let status = provider.health_probe().await.unwrap_or(ProviderStatus::Unknown);
        if matches!(status, ProviderStatus::Healthy | ProviderStatus::Degraded | ProviderStatus::Unknown) {
            usable.push(Arc::clone(provider));
        }
    }
    usable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::OfflineProvider;
    use crate::provider::ProviderConfig;
    use crate::google::GoogleProvider;

    #[tokio::test]
    async fn empty_chain_reports_no_healthy_provider() {
        let chain = ProviderChain::new(Vec::new());
        let result = chain.execute("x", "python", "java", &TranslationOptions::default()).await;
        assert!(matches!(result, Err(ProviderError::NoHealthyProvider)));
    }

    #[tokio::test]
    async fn falls_through_failing_provider_to_offline() {
        let failing = Arc::new(GoogleProvider::new(ProviderConfig::new("", "gemini-1.5-pro")));
        let chain = ProviderChain::new(vec![failing, Arc::new(OfflineProvider)]);
        let outcome = chain
            .execute("def f(): pass", "python", "javascript", &TranslationOptions::default())
            .await
            .unwrap();
        assert!(!outcome.text.is_empty());
    }

    #[tokio::test]
    async fn all_failing_collects_every_reason() {
        let a = Arc::new(GoogleProvider::new(ProviderConfig::new("", "gemini-1.5-pro")));
        let b = Arc::new(GoogleProvider::new(ProviderConfig::new("", "gemini-1.5-flash")));
        let chain = ProviderChain::new(vec![a, b]);
        let result = chain.execute("x", "python", "java", &TranslationOptions::default()).await;
        match result {
            Err(ProviderError::AllProvidersFailed(failures)) => assert_eq!(failures.len(), 2),
            other => panic!("expected AllProvidersFailed, got {other:?}"),
        }
    }
}
