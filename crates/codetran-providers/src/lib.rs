//! Translation provider abstraction, registry, and dispatch.
//!
//! A [`provider::TranslationProvider`] wraps one way to turn source code in
//! one language into source code in another: a hosted model API
//! ([`anthropic`], [`openai`], [`google`]), or the network-free
//! [`offline::OfflineProvider`]. [`registry::ProviderRegistry`] tracks live
//! instances and their health; [`chain::ProviderChain`] and
//! [`balancer::LoadBalancer`] build dispatch policy on top.
//!
//! ```no_run
//! use std::sync::Arc;
//! use codetran_providers::prelude::*;
//!
//! # async fn run() -> ProviderResult<()> {
//! let offline: Arc<dyn TranslationProvider> = Arc::new(OfflineProvider);
//! let chain = ProviderChain::new(vec![offline]);
//! let outcome = chain
//!     .execute("def f(x): return x + 1", "python", "javascript", &TranslationOptions::default())
//!     .await?;
//! println!("{}", outcome.text);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all)]

mod anthropic;
mod balancer;
mod chain;
mod error;
mod google;
mod offline;
mod openai;
mod provider;
mod registry;
mod resilience;
mod types;

pub mod prelude;

pub use anthropic::AnthropicProvider;
pub use balancer::{BalanceStrategy, LoadBalancer};
pub use chain::{filter_usable, ProviderChain};
pub use error::{ProviderError, ProviderResult};
pub use google::GoogleProvider;
pub use offline::OfflineProvider;
pub use openai::OpenAiProvider;
pub use provider::{ProviderConfig, TranslationProvider};
pub use registry::ProviderRegistry;
pub use resilience::ResilienceGuard;
pub use types::{
    ProviderCapabilities, ProviderMetrics, ProviderStatus, TranslationOptions, TranslationOutcome,
};
