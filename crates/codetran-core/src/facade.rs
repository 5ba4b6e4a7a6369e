//! The translation facade: the single entry point orchestrating detection,
//! provider dispatch, caching, and static analysis.
//!
//! Grounded in `TranslatorEngine`: `_select_best_provider`'s priority-order
//! dispatch becomes the injected [`codetran_providers::ProviderChain`]'s try
//! order, and the single-retry-with-offline behavior on failure is
//! reproduced explicitly here rather than folded into the chain, since the
//! chain itself has no notion of "the offline provider" as distinct from any
//! other member.

use std::sync::Arc;
use std::sync::Mutex;

use codetran_analysis::{
    analyze as analyze_code, detect_language, extract_functions, generate_tests as render_tests,
    CANDIDATE_LANGUAGES,
};
use codetran_providers::{ProviderChain, TranslationOptions, TranslationProvider};
use tracing::warn;

use crate::cache::LruCache;
use crate::error::{CoreError, CoreResult};
use crate::key::CacheKey;

/// Default LRU cache capacity when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

struct CachedTranslation {
    text: String,
}

/// Orchestrates `translate`/`detect`/`explain`/`analyze`/`generate_tests`
/// over a provider chain and the static-analysis engines, with a bounded LRU
/// cache in front of translation calls.
pub struct TranslationFacade {
    chain: ProviderChain,
    offline: Arc<dyn TranslationProvider>,
    cache: Mutex<LruCache<CacheKey, CachedTranslation>>,
}

impl TranslationFacade {
    /// Build a facade dispatching through `chain`, retrying with `offline`
    /// on total chain failure, caching up to `cache_capacity` translations.
    #[must_use]
    pub fn new(chain: ProviderChain, offline: Arc<dyn TranslationProvider>, cache_capacity: usize) -> Self {
        Self { chain, offline, cache: Mutex::new(LruCache::new(cache_capacity)) }
    }

    /// Translate `code` from `source_lang` (or auto-detected) to
    /// `target_lang`, returning the translated text and a confidence score.
    ///
    /// # Errors
    /// [`CoreError::UnsupportedLanguage`] if either language is outside the
    /// supported set, [`CoreError::LanguageUndetected`] if `source_lang` is
    /// `None` and detection fails, or [`CoreError::AllProvidersFailed`] if
    /// every provider — including the offline retry — fails.
    pub async fn translate(
        &self,
        code: &str,
        source_lang: Option<&str>,
        target_lang: &str,
        options: &TranslationOptions,
    ) -> CoreResult<(String, f64)> {
        let target_lang = validate_language(target_lang)?;
        let source_lang = match source_lang {
            Some(lang) => validate_language(lang)?,
            None => detect_language(code).ok_or(CoreError::LanguageUndetected)?.to_string(),
        };

        let key = CacheKey::new(&source_lang, &target_lang, code);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return Ok((cached.text.clone(), 1.0));
            }
        }

        let outcome = match self.chain.execute(code, &source_lang, &target_lang, options).await {
            Ok(outcome) => outcome,
            Err(primary_failure) => {
                warn!(error = %primary_failure, "primary chain exhausted, retrying with offline provider");
                self.offline
                    .translate(code, &source_lang, &target_lang, options)
                    .await
                    .map_err(|offline_failure| {
                        CoreError::AllProvidersFailed(format!(
                            "{primary_failure}; offline retry also failed: {offline_failure}"
                        ))
                    })?
            },
        };

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, CachedTranslation { text: outcome.text.clone() });
        }

        Ok((outcome.text, outcome.confidence))
    }

    /// Detect the source language of `code`, or `None` if undetected.
    #[must_use]
    pub fn detect(&self, code: &str) -> Option<&'static str> {
        detect_language(code)
    }

    /// Produce a natural-language explanation of `code` under `language` (or
    /// auto-detected), trying providers in chain order before falling back
    /// to the offline explainer.
    ///
    /// # Errors
    /// [`CoreError::LanguageUndetected`] if `language` is `None` and
    /// detection fails.
    pub async fn explain(&self, code: &str, language: Option<&str>, line_by_line: bool) -> CoreResult<String> {
        let language = resolve_language(code, language)?;
        for provider in self.chain.providers() {
            if let Ok(text) = provider.explain(code, &language, line_by_line).await {
                return Ok(text);
            }
        }
        Ok(self.offline.explain(code, &language, line_by_line).await?)
    }

    /// Run complexity/Big-O analysis of `code` under `language` (or
    /// auto-detected).
    ///
    /// # Errors
    /// [`CoreError::LanguageUndetected`] if `language` is `None` and
    /// detection fails.
    pub fn analyze(&self, code: &str, language: Option<&str>) -> CoreResult<codetran_analysis::CodeAnalysis> {
        let language = resolve_language(code, language)?;
        Ok(analyze_code(code, &language))
    }

    /// Generate a test skeleton for `code` under `language` (or
    /// auto-detected) and `framework` (or the language's conventional
    /// default).
    ///
    /// # Errors
    /// [`CoreError::LanguageUndetected`] if `language` is `None` and
    /// detection fails.
    pub fn generate_tests(
        &self,
        code: &str,
        language: Option<&str>,
        framework: Option<codetran_analysis::TestFramework>,
    ) -> CoreResult<String> {
        let language = resolve_language(code, language)?;
        let functions = extract_functions(code, &language);
        let framework = framework
            .or_else(|| codetran_analysis::TestFramework::default_for(&language))
            .unwrap_or(codetran_analysis::TestFramework::Pytest);
        Ok(render_tests(&functions, framework))
    }
}

fn resolve_language(code: &str, language: Option<&str>) -> CoreResult<String> {
    match language {
        Some(lang) => validate_language(lang),
        None => detect_language(code).ok_or(CoreError::LanguageUndetected).map(str::to_string),
    }
}

fn validate_language(language: &str) -> CoreResult<String> {
    CANDIDATE_LANGUAGES
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(language))
        .map(|canonical| (*canonical).to_string())
        .ok_or_else(|| CoreError::UnsupportedLanguage(language.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetran_providers::OfflineProvider;

    fn offline_only_facade() -> TranslationFacade {
        let offline: Arc<dyn TranslationProvider> = Arc::new(OfflineProvider);
        TranslationFacade::new(ProviderChain::new(Vec::new()), offline, DEFAULT_CACHE_CAPACITY)
    }

    #[tokio::test]
    async fn translate_falls_back_to_offline_when_chain_is_empty() {
        let facade = offline_only_facade();
        let (text, confidence) = facade
            .translate("def add(a, b):\n    return a + b\n", Some("Python"), "JavaScript", &TranslationOptions::default())
            .await
            .unwrap();
        assert!(!text.is_empty());
        assert!(confidence > 0.0);
    }

    #[tokio::test]
    async fn translate_rejects_unsupported_target_language() {
        let facade = offline_only_facade();
        let result = facade
            .translate("x = 1", Some("Python"), "Cobol", &TranslationOptions::default())
            .await;
        assert!(matches!(result, Err(CoreError::UnsupportedLanguage(_))));
    }

    #[tokio::test]
    async fn translate_caches_repeat_requests_at_full_confidence() {
        let facade = offline_only_facade();
        let options = TranslationOptions::default();
        facade.translate("x = 1", Some("Python"), "JavaScript", &options).await.unwrap();
        let (_, confidence) = facade.translate("x = 1", Some("Python"), "JavaScript", &options).await.unwrap();
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn detect_delegates_to_the_analysis_crate() {
        let facade = offline_only_facade();
        assert_eq!(facade.detect("def f():\n    pass\n"), Some("Python"));
    }

    #[test]
    fn analyze_with_explicit_language_bypasses_detection() {
        let facade = offline_only_facade();
        let analysis = facade.analyze("def f():\n    pass\n", Some("Python")).unwrap();
        assert_eq!(analysis.language, "Python");
    }

    #[test]
    fn analyze_with_undetectable_code_reports_undetected() {
        let facade = offline_only_facade();
        let result = facade.analyze("???", None);
        assert!(matches!(result, Err(CoreError::LanguageUndetected)));
    }

    #[test]
    fn generate_tests_falls_back_to_placeholder_for_unparsed_language() {
        let facade = offline_only_facade();
        let rendered = facade.generate_tests("fn main() {}", Some("Rust"), None).unwrap();
        assert!(rendered.contains("TODO"));
    }
}
