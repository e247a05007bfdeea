//! Typed diagnostics for malformed `nameof` calls.
//!
//! Errors are values, not control flow: the engine returns them, and the
//! host integration decides through an [`ErrorHandler`] whether a bad call
//! site aborts the unit or is recorded while processing continues.

pub mod handler;

pub use handler::{Collecting, ErrorHandler, FailFast};

use std::fmt;

/// Byte-offset range of a node within its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &SourceSpan) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// The closed set of grammar/shape violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidDefaultCall,
    InvalidInterpolateCall,
    MissingPropertyAccess,
    MissingImportTypeQualifier,
    NestedNameof,
    NoReturnExpression,
    UnsupportedAccessorType,
    UnsupportedNode,
    UnsupportedScenario,
    UnusedInterpolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidDefaultCall => write!(f, "invalid-default-call"),
            ErrorKind::InvalidInterpolateCall => write!(f, "invalid-interpolate-call"),
            ErrorKind::MissingPropertyAccess => write!(f, "missing-property-access"),
            ErrorKind::MissingImportTypeQualifier => write!(f, "missing-import-type-qualifier"),
            ErrorKind::NestedNameof => write!(f, "nested-nameof"),
            ErrorKind::NoReturnExpression => write!(f, "no-return-expression"),
            ErrorKind::UnsupportedAccessorType => write!(f, "unsupported-accessor-type"),
            ErrorKind::UnsupportedNode => write!(f, "unsupported-node"),
            ErrorKind::UnsupportedScenario => write!(f, "unsupported-scenario"),
            ErrorKind::UnusedInterpolation => write!(f, "unused-interpolation"),
        }
    }
}

/// A diagnostic raised while parsing or validating one call site.
///
/// Carries the offending node's original text and span so reports can
/// point at the exact source location.
#[derive(Debug, Clone, PartialEq)]
pub struct NameofError {
    pub kind: ErrorKind,
    pub message: String,
    pub source_text: String,
    pub span: SourceSpan,
}

impl NameofError {
    pub fn new(kind: ErrorKind, message: String, source_text: &str, span: SourceSpan) -> Self {
        Self {
            kind,
            message,
            source_text: source_text.to_string(),
            span,
        }
    }

    pub fn invalid_default_call(argument_count: usize, text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::InvalidDefaultCall,
            format!(
                "Expected 1 argument or type argument for the `nameof` call, but got {}.",
                argument_count
            ),
            text,
            span,
        )
    }

    pub fn invalid_interpolate_call(argument_count: usize, text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::InvalidInterpolateCall,
            format!(
                "Expected 1 argument for the `interpolate` call, but got {}.",
                argument_count
            ),
            text,
            span,
        )
    }

    pub fn missing_property_access(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::MissingPropertyAccess,
            format!(
                "A property must be accessed on the function parameter: `{}`.",
                text
            ),
            text,
            span,
        )
    }

    pub fn missing_import_type_qualifier(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::MissingImportTypeQualifier,
            format!("Expected a property access on the import type `{}`.", text),
            text,
            span,
        )
    }

    pub fn nested_nameof(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::NestedNameof,
            format!("Cannot nest `nameof` calls: `{}`.", text),
            text,
            span,
        )
    }

    pub fn no_return_expression(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::NoReturnExpression,
            format!("The function `{}` has no returned expression.", text),
            text,
            span,
        )
    }

    pub fn unsupported_accessor_type(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::UnsupportedAccessorType,
            format!("Unsupported index accessor expression: `{}`.", text),
            text,
            span,
        )
    }

    pub fn unsupported_node(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::UnsupportedNode,
            format!("The expression `{}` is not supported here.", text),
            text,
            span,
        )
    }

    pub fn unsupported_scenario(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::UnsupportedScenario,
            format!("`interpolate` calls are not supported here: `{}`.", text),
            text,
            span,
        )
    }

    pub fn unused_interpolation(text: &str, span: SourceSpan) -> Self {
        Self::new(
            ErrorKind::UnusedInterpolation,
            format!(
                "The `interpolate` call `{}` is not used inside a `nameof` call.",
                text
            ),
            text,
            span,
        )
    }
}

impl fmt::Display for NameofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for NameofError {}
