//! Category-keyed, end-user-safe message formatting.

use crate::record::ErrorCategory;

/// Renders a plain-language message for a category, with recovery hints appended.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserMessageFormatter;

impl UserMessageFormatter {
    fn template(category: ErrorCategory) -> &'static str {
        match category {
            ErrorCategory::Network => {
                "Network connection issue. Please check your internet connection and try again."
            },
            ErrorCategory::Authentication => {
                "Authentication failed. Please check your API credentials."
            },
            ErrorCategory::RateLimit => "Rate limit reached. Please wait a moment and try again.",
            ErrorCategory::Configuration => {
                "Configuration problem detected. Please check your settings."
            },
            ErrorCategory::Validation => "The provided input could not be validated.",
            ErrorCategory::Provider => "The translation provider could not complete the request.",
            ErrorCategory::System => "An internal system error occurred.",
            ErrorCategory::UserInput => "The request could not be understood.",
            ErrorCategory::Unknown => "An unexpected error occurred.",
        }
    }

    /// Build the full user-facing message: the category template followed by a
    /// bulleted list of `hints`, when any are given.
    #[must_use]
    pub fn format(category: ErrorCategory, hints: &[String]) -> String {
        let mut message = Self::template(category).to_string();
        if !hints.is_empty() {
            message.push_str("\n\nSuggestions:");
            for hint in hints {
                message.push_str("\n  - ");
                message.push_str(hint);
            }
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_hints() {
        let msg = UserMessageFormatter::format(
            ErrorCategory::Network,
            &["Check your connection".to_string()],
        );
        assert!(msg.contains("Network connection issue"));
        assert!(msg.contains("Check your connection"));
    }

    #[test]
    fn no_hints_is_bare_template() {
        let msg = UserMessageFormatter::format(ErrorCategory::Unknown, &[]);
        assert_eq!(msg, "An unexpected error occurred.");
    }
}
