//! Commonly used types, re-exported for a single `use` line.

pub use crate::anthropic::AnthropicProvider;
pub use crate::balancer::{BalanceStrategy, LoadBalancer};
pub use crate::chain::ProviderChain;
pub use crate::error::{ProviderError, ProviderResult};
pub use crate::google::GoogleProvider;
pub use crate::offline::OfflineProvider;
pub use crate::openai::OpenAiProvider;
pub use crate::provider::{ProviderConfig, TranslationProvider};
pub use crate::registry::ProviderRegistry;
pub use crate::types::{
    ProviderCapabilities, ProviderMetrics, ProviderStatus, TranslationOptions, TranslationOutcome,
};
