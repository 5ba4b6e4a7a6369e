//! Facade-level error types.

use codetran_errors::Classifiable;
use thiserror::Error;

/// Errors raised by the translation facade.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `source_lang`/`target_lang` named a language outside the supported set.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// `source_lang` was `auto` and the detector returned undetected.
    #[error("language undetected: cannot translate without a known source language")]
    LanguageUndetected,

    /// Every provider failed, including the offline retry.
    #[error("all providers failed: {0}")]
    AllProvidersFailed(String),

    /// A provider-layer error not covered by a more specific variant.
    #[error("provider error: {0}")]
    Provider(#[from] codetran_providers::ProviderError),

    /// An analysis-layer error not covered by a more specific variant.
    #[error("analysis error: {0}")]
    Analysis(#[from] codetran_analysis::AnalysisError),
}

/// Result type for facade operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl Classifiable for CoreError {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "ValueError",
            Self::LanguageUndetected => "undetected",
            Self::AllProvidersFailed(_) => "AllProvidersFailed",
            Self::Provider(_) => "ProviderError",
            Self::Analysis(_) => "AnalysisError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetran_errors::{classify, ErrorCategory};

    #[test]
    fn language_undetected_classifies_as_validation() {
        let error = CoreError::LanguageUndetected;
        let (category, _) = classify(error.kind_name(), &error.to_string());
        assert_eq!(category, ErrorCategory::Validation);
    }

    #[test]
    fn all_providers_failed_classifies_as_provider() {
        let error = CoreError::AllProvidersFailed("offline: disk full".to_string());
        let (category, _) = classify(error.kind_name(), &error.to_string());
        assert_eq!(category, ErrorCategory::Provider);
    }
}
