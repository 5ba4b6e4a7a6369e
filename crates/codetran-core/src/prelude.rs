//! Common imports for consumers of `codetran-core`.

pub use crate::{CacheKey, CoreError, CoreResult, TranslationFacade, DEFAULT_CACHE_CAPACITY};
