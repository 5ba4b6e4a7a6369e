//! Analysis-engine error types.

use codetran_errors::Classifiable;
use thiserror::Error;

/// Errors raised by the static-analysis engines.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// `detect_language` found no pattern match above the confidence threshold.
    #[error("language undetected: no supported pattern matched with sufficient margin")]
    LanguageUndetected,

    /// The caller named a language outside the supported candidate set.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The input could not be parsed as notebook JSON.
    #[error("invalid notebook document: {0}")]
    InvalidNotebook(String),

    /// `serde_json` failed to (de)serialize a notebook.
    #[error("notebook JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl Classifiable for AnalysisError {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::LanguageUndetected => "undetected",
            Self::UnsupportedLanguage(_) => "ValueError",
            Self::InvalidNotebook(_) => "InvalidNotebook",
            Self::Json(_) => "InvalidNotebook",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetran_errors::{classify, ErrorCategory};

    #[test]
    fn language_undetected_classifies_as_validation() {
        let error = AnalysisError::LanguageUndetected;
        let (category, _) = classify(error.kind_name(), &error.to_string());
        assert_eq!(category, ErrorCategory::Validation);
    }
}
