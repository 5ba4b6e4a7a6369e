//! Load distribution across several equally-capable providers.
//!
//! Grounded in `LoadBalancer`'s three strategies: round-robin, least-loaded,
//! and best-performance. Unlike [`crate::chain::ProviderChain`], the balancer
//! picks exactly one provider and does not retry against the others on
//! failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::TranslationProvider;

/// Strategy used by [`LoadBalancer::pick`] to select among registered providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStrategy {
    /// Cycle through providers in registration order.
    RoundRobin,
    /// Pick the provider with the fewest total requests so far.
    LeastLoaded,
    /// Pick the provider with the highest `success_rate - avg_latency_ms / 10`.
    BestPerformance,
}

/// Distributes requests across a fixed set of providers.
pub struct LoadBalancer {
    providers: Vec<Arc<dyn TranslationProvider>>,
    strategy: BalanceStrategy,
    cursor: AtomicUsize,
}

impl LoadBalancer {
    /// Build a balancer over `providers` using `strategy`.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn TranslationProvider>>, strategy: BalanceStrategy) -> Self {
        Self { providers, strategy, cursor: AtomicUsize::new(0) }
    }

    /// Select the next provider according to the configured strategy.
    ///
    /// # Errors
    /// Returns [`ProviderError::NoHealthyProvider`] if no providers are registered.
    pub fn pick(&self) -> ProviderResult<Arc<dyn TranslationProvider>> {
        if self.providers.is_empty() {
            return Err(ProviderError::NoHealthyProvider);
        }
        let provider = match self.strategy {
            BalanceStrategy::RoundRobin => self.pick_round_robin(),
            BalanceStrategy::LeastLoaded => self.pick_least_loaded(),
            BalanceStrategy::BestPerformance => self.pick_best_performance(),
        };
        Ok(provider)
    }

    fn pick_round_robin(&self) -> Arc<dyn TranslationProvider> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.providers.len();
        Arc::clone(&self.providers[index])
    }

    fn pick_least_loaded(&self) -> Arc<dyn TranslationProvider> {
        self.providers
            .iter()
            .min_by_key(|p| p.metrics().total_requests)
            .map(Arc::clone)
            .expect("providers checked non-empty by pick()")
    }

    fn pick_best_performance(&self) -> Arc<dyn TranslationProvider> {
        self.providers
            .iter()
            .max_by(|a, b| performance_score(a).total_cmp(&performance_score(b)))
            .map(Arc::clone)
            .expect("providers checked non-empty by pick()")
    }
}

fn performance_score(provider: &Arc<dyn TranslationProvider>) -> f64 {
    let metrics = provider.metrics();
    metrics.success_rate() - metrics.average_latency_ms() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::OfflineProvider;

    #[test]
    fn empty_balancer_reports_no_healthy_provider() {
        let balancer = LoadBalancer::new(Vec::new(), BalanceStrategy::RoundRobin);
        assert!(matches!(balancer.pick(), Err(ProviderError::NoHealthyProvider)));
    }

    #[test]
    fn round_robin_wraps_back_to_the_first_index() {
        let providers: Vec<Arc<dyn TranslationProvider>> =
            vec![Arc::new(OfflineProvider), Arc::new(OfflineProvider)];
        let balancer = LoadBalancer::new(providers, BalanceStrategy::RoundRobin);
        assert_eq!(balancer.cursor.load(Ordering::SeqCst), 0);
        balancer.pick().unwrap();
        balancer.pick().unwrap();
        assert_eq!(balancer.cursor.load(Ordering::SeqCst), 2);
        balancer.pick().unwrap();
        assert_eq!(balancer.cursor.load(Ordering::SeqCst) % 2, 1);
    }

    #[test]
    fn least_loaded_picks_a_provider_when_all_tied() {
        let providers: Vec<Arc<dyn TranslationProvider>> =
            vec![Arc::new(OfflineProvider), Arc::new(OfflineProvider)];
        let balancer = LoadBalancer::new(providers, BalanceStrategy::LeastLoaded);
        assert!(balancer.pick().is_ok());
    }
}
