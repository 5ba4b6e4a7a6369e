//! Request-scoped correlation context, threaded through `tracing` spans.

use tracing::Span;
use uuid::Uuid;

/// Correlates everything logged during one logical operation (a CLI
/// invocation, an HTTP request, a façade call) under a single `tracing` span.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: Uuid,
    component: String,
    operation: Option<String>,
}

impl RequestContext {
    /// Start a context for `component` with a freshly generated correlation id.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            component: component.into(),
            operation: None,
        }
    }

    /// Record which operation this context covers.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// The correlation id threaded through every log line and error record.
    #[must_use]
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Build (but do not enter) the `tracing` span for this context.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "request",
            correlation_id = %self.correlation_id,
            component = %self.component,
            operation = self.operation.as_deref().unwrap_or("-"),
        )
    }

    /// Enter the span for the remainder of the current scope.
    #[must_use]
    pub fn enter(&self) -> RequestGuard {
        RequestGuard { _entered: self.span().entered() }
    }
}

/// RAII guard keeping a [`RequestContext`]'s span entered.
pub struct RequestGuard {
    _entered: tracing::span::EnteredSpan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_has_stable_correlation_id() {
        let ctx = RequestContext::new("facade").with_operation("translate");
        let id = ctx.correlation_id();
        assert_eq!(ctx.correlation_id(), id);
    }
}
