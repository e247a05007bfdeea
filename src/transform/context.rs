//! Per-file transformation state.
//!
//! A context lives for exactly one file's traversal and is passed
//! explicitly to every engine call. It holds the expected macro
//! identifier (renamed imports) and the pending-interpolation registry,
//! which must drain to empty before the file is finished.

use crate::diagnostics::{NameofError, SourceSpan};

/// Caller-facing configuration for one transformation run.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// The identifier the macro is bound to (`import myNameof from …`).
    pub macro_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            macro_name: "nameof".to_string(),
        }
    }
}

impl TransformOptions {
    pub fn with_macro_name(macro_name: &str) -> Self {
        Self {
            macro_name: macro_name.to_string(),
        }
    }
}

/// An `interpolate` call waiting to be consumed by an enclosing call.
#[derive(Debug, Clone)]
struct PendingInterpolation {
    span: SourceSpan,
    source_text: String,
}

/// Mutable state scoped to one file's traversal.
#[derive(Debug)]
pub struct TransformContext {
    macro_name: String,
    pending: Vec<PendingInterpolation>,
}

impl TransformContext {
    pub fn new(options: &TransformOptions) -> Self {
        Self {
            macro_name: options.macro_name.clone(),
            pending: Vec::new(),
        }
    }

    /// The identifier name a call site's callee must match.
    pub fn macro_name(&self) -> &str {
        &self.macro_name
    }

    /// Register a standalone `interpolate` call discovered during
    /// traversal. It must later be consumed by an enclosing `nameof`.
    pub fn register_interpolation(&mut self, span: SourceSpan, source_text: String) {
        if !self.pending.iter().any(|p| p.span == span) {
            self.pending.push(PendingInterpolation { span, source_text });
        }
    }

    /// Mark the `interpolate` call at `span` as consumed.
    pub fn consume_interpolation(&mut self, span: SourceSpan) {
        self.pending.retain(|p| p.span != span);
    }

    /// Finish the file: every pending entry left over is an
    /// `interpolate` call that no `nameof` ever consumed.
    pub fn drain(&mut self) -> Vec<NameofError> {
        self.pending
            .drain(..)
            .map(|p| NameofError::unused_interpolation(&p.source_text, p.span))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    #[test]
    fn test_consumed_interpolation_does_not_report() {
        let mut ctx = TransformContext::new(&TransformOptions::default());
        let span = SourceSpan::new(4, 28);
        ctx.register_interpolation(span, "nameof.interpolate(x)".to_string());
        ctx.consume_interpolation(span);
        assert!(ctx.drain().is_empty());
    }

    #[test]
    fn test_unconsumed_interpolation_reports() {
        let mut ctx = TransformContext::new(&TransformOptions::default());
        ctx.register_interpolation(SourceSpan::new(0, 21), "nameof.interpolate(x)".to_string());
        let errors = ctx.drain();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::UnusedInterpolation);
        assert!(ctx.drain().is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut ctx = TransformContext::new(&TransformOptions::default());
        let span = SourceSpan::new(0, 21);
        ctx.register_interpolation(span, "nameof.interpolate(x)".to_string());
        ctx.register_interpolation(span, "nameof.interpolate(x)".to_string());
        assert_eq!(ctx.drain().len(), 1);
    }
}
