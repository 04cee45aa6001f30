//! Error reporting for weft parses.
//!
//! A parse fails in one of two ways. Ordinary failures are silent: the
//! parse simply did not match. Hard failures, raised when a committed
//! sequence step (`a > b`) does not match, carry a [`ParseError`] up to the
//! top-level driver, which hands it to an [`ErrorHandler`]. The handler
//! reports it and decides whether the driver returns a failed result or
//! passes the error on to its caller.
//!
//! Handlers also receive diagnostics raised from semantic actions.
//!
//! [`position`] turns byte offsets into line/column positions and renders
//! the `file:line:col: message` format with the offending line and a caret.

mod error;
pub mod handler;
pub mod position;

pub use error::ParseError;
pub use handler::{
    CallbackErrorHandler, DefaultErrorHandler, DiagnosticKind, ErrorHandler, ErrorHandlerResult,
    RethrowErrorHandler, StreamErrorHandler,
};
pub use position::{
    find_line_end, find_line_position, format_expectation_failure, format_message, LinePosition,
    MessageFormat,
};
