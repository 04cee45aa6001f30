//! The hard parse error.

/// A committed parse step failed to match.
///
/// Raised by `a > b` when `a` matched and `b` did not. Unlike an ordinary
/// failure, it is never absorbed by an enclosing alternative, repeat or
/// optional: it unwinds to the top-level driver.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}")]
pub struct ParseError {
    /// Byte offset where the expected parser was tried.
    pub position: usize,
    /// Printed form of the parser that failed to match.
    pub expected: String,
}

impl ParseError {
    #[cold]
    pub fn new(position: usize, expected: impl Into<String>) -> Self {
        ParseError {
            position,
            expected: expected.into(),
        }
    }
}
