//! Graceful degradation: mark a feature as impaired and route callers to an alternative.

use std::collections::HashMap;
use std::sync::Mutex;

/// Tracks which named features are currently degraded and what to use instead.
#[derive(Debug, Default)]
pub struct GracefulDegradation {
    degraded: Mutex<HashMap<String, DegradedEntry>>,
}

#[derive(Debug, Clone)]
struct DegradedEntry {
    reason: String,
    alternative: Option<String>,
}

impl GracefulDegradation {
    /// Create an empty registry; no feature starts degraded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `feature` as degraded, recording why and what to use instead.
    pub fn degrade(&self, feature: &str, reason: &str, alternative: Option<&str>) {
        let mut map = self.degraded.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(
            feature.to_string(),
            DegradedEntry {
                reason: reason.to_string(),
                alternative: alternative.map(ToString::to_string),
            },
        );
    }

    /// Clear a feature's degraded status.
    pub fn restore(&self, feature: &str) {
        let mut map = self.degraded.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(feature);
    }

    /// Whether `feature` is currently degraded.
    #[must_use]
    pub fn is_degraded(&self, feature: &str) -> bool {
        let map = self.degraded.lock().unwrap_or_else(|e| e.into_inner());
        map.contains_key(feature)
    }

    /// The registered alternative for `feature`, if degraded and one was given.
    #[must_use]
    pub fn alternative_for(&self, feature: &str) -> Option<String> {
        let map = self.degraded.lock().unwrap_or_else(|e| e.into_inner());
        map.get(feature).and_then(|e| e.alternative.clone())
    }

    /// The reason `feature` was degraded, if it is.
    #[must_use]
    pub fn reason_for(&self, feature: &str) -> Option<String> {
        let map = self.degraded.lock().unwrap_or_else(|e| e.into_inner());
        map.get(feature).map(|e| e.reason.clone())
    }

    /// Enter a scope that resolves to either `feature` or its alternative.
    #[must_use]
    pub fn feature_fallback(&self, feature: &str) -> FeatureFallbackGuard {
        let target = self.alternative_for(feature).unwrap_or_else(|| feature.to_string());
        FeatureFallbackGuard {
            requested: feature.to_string(),
            resolved: target,
        }
    }
}

/// The resolved target of a [`GracefulDegradation::feature_fallback`] call.
#[derive(Debug, Clone)]
pub struct FeatureFallbackGuard {
    requested: String,
    resolved: String,
}

impl FeatureFallbackGuard {
    /// The feature name that was actually requested.
    #[must_use]
    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// The feature name to actually use (the alternative, if degraded).
    #[must_use]
    pub fn resolved(&self) -> &str {
        &self.resolved
    }

    /// Whether degradation caused a reroute.
    #[must_use]
    pub fn is_rerouted(&self) -> bool {
        self.requested != self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrade_then_restore() {
        let gd = GracefulDegradation::new();
        assert!(!gd.is_degraded("openai"));
        gd.degrade("openai", "circuit open", Some("offline"));
        assert!(gd.is_degraded("openai"));
        assert_eq!(gd.alternative_for("openai").as_deref(), Some("offline"));

        let guard = gd.feature_fallback("openai");
        assert!(guard.is_rerouted());
        assert_eq!(guard.resolved(), "offline");

        gd.restore("openai");
        assert!(!gd.is_degraded("openai"));
        let guard = gd.feature_fallback("openai");
        assert!(!guard.is_rerouted());
    }
}
