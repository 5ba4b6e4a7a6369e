//! Rule-based classification of a raw error kind/message into a category and severity.
//!
//! Mirrors a fixed, ordered list of substring rules: the first rule whose
//! condition matches wins. Falls back to [`ErrorCategory::Unknown`].

use crate::record::{ErrorCategory, ErrorSeverity};

type Rule = (fn(&str, &str) -> bool, ErrorCategory);

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

const RULES: &[Rule] = &[
    (
        |_kind, msg| contains_any(msg, &["timeout", "timed out", "connection refused", "dns"]),
        ErrorCategory::Network,
    ),
    (
        |_kind, msg| contains_any(msg, &["unauthorized", "401", "403", "forbidden", "invalid api key", "authentication"]),
        ErrorCategory::Authentication,
    ),
    (
        |_kind, msg| contains_any(msg, &["rate limit", "429", "too many requests"]),
        ErrorCategory::RateLimit,
    ),
    (
        |_kind, msg| contains_any(msg, &["config", "missing field", "invalid value", "schema"]),
        ErrorCategory::Configuration,
    ),
    (
        |kind, msg| {
            contains_any(kind, &["validation", "valueerror", "typeerror"])
                || contains_any(msg, &["unsupported language", "undetected"])
        },
        ErrorCategory::Validation,
    ),
    (
        |kind, msg| contains_any(kind, &["system", "ioerror", "oserror", "memoryerror"]) || msg.contains("disk"),
        ErrorCategory::System,
    ),
    (
        |kind, _msg| contains_any(kind, &["provider", "breaker", "allproviders"]),
        ErrorCategory::Provider,
    ),
];

/// Classify a raw `(kind, message)` pair, lowercasing both before matching.
#[must_use]
pub fn classify(kind: &str, message: &str) -> (ErrorCategory, ErrorSeverity) {
    let kind_lower = kind.to_lowercase();
    let msg_lower = message.to_lowercase();
    for (predicate, category) in RULES {
        if predicate(&kind_lower, &msg_lower) {
            return (*category, category.default_severity());
        }
    }
    (ErrorCategory::Unknown, ErrorSeverity::Medium)
}

/// Implemented by error types that know their own kind name, so they can be
/// classified without the caller re-deriving a string by hand.
pub trait Classifiable {
    /// The discriminant name used for classification (e.g. the enum variant name).
    fn kind_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_network_timeout() {
        let (cat, sev) = classify("HttpError", "request timed out after 30s");
        assert_eq!(cat, ErrorCategory::Network);
        assert_eq!(sev, ErrorSeverity::Medium);
    }

    #[test]
    fn classifies_rate_limit() {
        let (cat, sev) = classify("ApiRequestFailed", "HTTP 429: rate limit exceeded");
        assert_eq!(cat, ErrorCategory::RateLimit);
        assert_eq!(sev, ErrorSeverity::Low);
    }

    #[test]
    fn classifies_auth() {
        let (cat, _) = classify("ApiRequestFailed", "HTTP 401: unauthorized");
        assert_eq!(cat, ErrorCategory::Authentication);
    }

    #[test]
    fn falls_back_to_unknown() {
        let (cat, sev) = classify("Mystery", "something odd happened");
        assert_eq!(cat, ErrorCategory::Unknown);
        assert_eq!(sev, ErrorSeverity::Medium);
    }
}
