//! Translation facade: the single entry point codetran's CLI and HTTP
//! surfaces both call through. Wires the provider chain, the static
//! analysis engines, and a bounded LRU cache behind five operations.
//!
//! ```no_run
//! # use std::sync::Arc;
//! use codetran_core::prelude::*;
//! use codetran_providers::{OfflineProvider, ProviderChain};
//!
//! # async fn run() {
//! let facade = TranslationFacade::new(ProviderChain::new(Vec::new()), Arc::new(OfflineProvider), DEFAULT_CACHE_CAPACITY);
//! let (text, _confidence) = facade
//!     .translate("print('hi')", Some("Python"), "JavaScript", &Default::default())
//!     .await
//!     .unwrap();
//! assert!(!text.is_empty());
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod error;
mod facade;
mod key;

pub mod prelude;

pub use error::{CoreError, CoreResult};
pub use facade::{TranslationFacade, DEFAULT_CACHE_CAPACITY};
pub use key::CacheKey;
