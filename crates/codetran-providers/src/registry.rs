//! Provider registry: holds initialized provider instances plus their
//! last-known health, with lock-free reads via `dashmap`.
//!
//! Grounded in `ProviderRegistry`, but constructed as an explicit value
//! rather than a process-wide singleton, so a caller can run several
//! independently-configured registries (e.g. in tests) in the same process.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::{info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::TranslationProvider;
use crate::types::ProviderStatus;

struct Instance {
    provider: Arc<dyn TranslationProvider>,
    status: ProviderStatus,
    /// Bumped on every probe completion so a stale in-flight probe can
    /// detect it has been superseded and discard its own result.
    probe_sequence: u64,
}

/// A named collection of initialized translation providers.
#[derive(Default)]
pub struct ProviderRegistry {
    instances: DashMap<String, Instance>,
    probe_counter: AtomicU64,
}

impl ProviderRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize `provider` and register it under `provider.name()`.
    ///
    /// # Errors
    /// Propagates the provider's own `initialize()` failure.
    pub async fn register(&self, provider: Arc<dyn TranslationProvider>) -> ProviderResult<()> {
        provider.initialize().await?;
        let name = provider.name().to_string();
        let status = provider.health_probe().await.unwrap_or(ProviderStatus::Unknown);
        info!(provider = %name, "registered provider");
        self.instances.insert(name, Instance { provider, status, probe_sequence: 0 });
        Ok(())
    }

    /// Fetch a provider by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn TranslationProvider>> {
        self.instances.get(name).map(|entry| Arc::clone(&entry.provider))
    }

    /// All registered providers.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn TranslationProvider>> {
        self.instances.iter().map(|entry| Arc::clone(&entry.provider)).collect()
    }

    /// Registered providers whose last probe reported [`ProviderStatus::Healthy`].
    #[must_use]
    pub fn healthy(&self) -> Vec<Arc<dyn TranslationProvider>> {
        self.instances
            .iter()
            .filter(|entry| entry.status == ProviderStatus::Healthy)
            .map(|entry| Arc::clone(&entry.provider))
            .collect()
    }

    /// Run a fresh probe for `name` and update its stored status, discarding
    /// the result if a newer probe for the same provider has completed
    /// since this one started.
    ///
    /// # Errors
    /// Returns [`ProviderError::UnknownProvider`] if `name` isn't registered.
    pub async fn probe(&self, name: &str) -> ProviderResult<ProviderStatus> {
        let provider = self.get(name).ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))?;
        let sequence = self.probe_counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1);

        let status = match provider.health_probe().await {
            Ok(status) => status,
            Err(e) => {
                warn!(provider = %name, error = %e, "health probe failed");
                ProviderStatus::Unhealthy
            },
        };

        if let Some(mut entry) = self.instances.get_mut(name) {
            if sequence >= entry.probe_sequence {
                entry.status = status;
                entry.probe_sequence = sequence;
            }
        }
        Ok(status)
    }

    /// Drop every registered provider.
    pub fn shutdown(&self) {
        self.instances.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::OfflineProvider;

    #[tokio::test]
    async fn register_and_fetch() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(OfflineProvider)).await.unwrap();
        assert!(registry.get("offline").is_some());
        assert_eq!(registry.healthy().len(), 1);
    }

    #[tokio::test]
    async fn unknown_provider_probe_errors() {
        let registry = ProviderRegistry::new();
        let result = registry.probe("nonexistent").await;
        assert!(matches!(result, Err(ProviderError::UnknownProvider(_))));
    }

    #[tokio::test]
    async fn shutdown_clears_all_instances() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(OfflineProvider)).await.unwrap();
        registry.shutdown();
        assert!(registry.all().is_empty());
    }

    #[tokio::test]
    async fn registering_the_same_name_twice_leaves_the_registry_identical() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(OfflineProvider)).await.unwrap();
        registry.register(Arc::new(OfflineProvider)).await.unwrap();
        assert_eq!(registry.all().len(), 1);
        assert_eq!(registry.healthy().len(), 1);
    }
}
