//! Pluggable error-handling strategy.
//!
//! Strict integrations (compile-style) fail the unit on the first bad
//! call site; batch integrations record the error and keep going so one
//! malformed call does not block the rest of the file.

use super::NameofError;

/// Decides what happens to a diagnostic raised for one call site.
///
/// Returning `Ok(())` means processing continues with the remaining call
/// sites; returning `Err` aborts the current unit.
pub trait ErrorHandler {
    fn handle(&mut self, error: NameofError) -> Result<(), NameofError>;
}

/// Abort the unit on the first error. The default strategy.
#[derive(Debug, Default)]
pub struct FailFast;

impl ErrorHandler for FailFast {
    fn handle(&mut self, error: NameofError) -> Result<(), NameofError> {
        Err(error)
    }
}

/// Record every error and keep processing independent call sites.
#[derive(Debug, Default)]
pub struct Collecting {
    pub errors: Vec<NameofError>,
}

impl Collecting {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorHandler for Collecting {
    fn handle(&mut self, error: NameofError) -> Result<(), NameofError> {
        self.errors.push(error);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SourceSpan;

    #[test]
    fn test_fail_fast_returns_the_error() {
        let error = NameofError::unsupported_node("5", SourceSpan::new(0, 1));
        let mut handler = FailFast;
        assert_eq!(handler.handle(error.clone()), Err(error));
    }

    #[test]
    fn test_collecting_accumulates() {
        let mut handler = Collecting::new();
        for text in ["5", "\"x\""] {
            let error = NameofError::unsupported_node(text, SourceSpan::new(0, text.len()));
            assert!(handler.handle(error).is_ok());
        }
        assert_eq!(handler.errors.len(), 2);
    }
}
