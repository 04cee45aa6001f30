//! Error handlers.
//!
//! The top-level driver passes every hard [`ParseError`] to the active
//! handler. Semantic actions report warnings and errors through the same
//! handler with [`ErrorHandler::diagnose`].

use std::fmt;
use std::io::Write;

use parking_lot::Mutex;

use crate::position::{format_expectation_failure, format_message};
use crate::ParseError;

/// What the driver does after the handler has seen a hard error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorHandlerResult {
    /// Turn the error into an ordinary failed parse.
    Fail,
    /// Return the error to the caller of the parse.
    Rethrow,
}

/// Severity of a diagnostic reported from a semantic action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Error => f.write_str("error"),
            DiagnosticKind::Warning => f.write_str("warning"),
        }
    }
}

/// Receives hard parse errors and action diagnostics.
pub trait ErrorHandler {
    /// Handle a hard parse error raised while parsing `input`.
    fn on_error(&self, input: &str, error: &ParseError) -> ErrorHandlerResult;

    /// Report `message` at byte offset `position` of `input`.
    fn diagnose(&self, kind: DiagnosticKind, message: &str, input: &str, position: usize);
}

/// Logs errors and diagnostics through `tracing` and fails the parse.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn on_error(&self, input: &str, error: &ParseError) -> ErrorHandlerResult {
        let rendered = format_expectation_failure("", input, error);
        tracing::error!(target: "weft", position = error.position, "{rendered}");
        ErrorHandlerResult::Fail
    }

    fn diagnose(&self, kind: DiagnosticKind, message: &str, input: &str, position: usize) {
        let rendered = format_message("", input, position, message);
        match kind {
            DiagnosticKind::Error => tracing::error!(target: "weft", position, "{rendered}"),
            DiagnosticKind::Warning => tracing::warn!(target: "weft", position, "{rendered}"),
        }
    }
}

type Sink = Mutex<Box<dyn Write + Send>>;

/// Writes formatted errors and diagnostics to output streams and fails
/// the parse.
///
/// Warnings go to their own stream when one is given, otherwise to the
/// error stream.
pub struct StreamErrorHandler {
    filename: String,
    errors: Sink,
    warnings: Option<Sink>,
}

impl StreamErrorHandler {
    /// Write everything to `errors`, prefixing messages with `filename`
    /// unless it is empty.
    pub fn new(filename: impl Into<String>, errors: impl Write + Send + 'static) -> Self {
        StreamErrorHandler {
            filename: filename.into(),
            errors: Mutex::new(Box::new(errors)),
            warnings: None,
        }
    }

    /// Send warnings to `warnings` instead of the error stream.
    #[must_use]
    pub fn with_warnings(mut self, warnings: impl Write + Send + 'static) -> Self {
        self.warnings = Some(Mutex::new(Box::new(warnings)));
        self
    }

    fn write(&self, kind: DiagnosticKind, text: &str) {
        let sink = match (kind, &self.warnings) {
            (DiagnosticKind::Warning, Some(warnings)) => warnings,
            _ => &self.errors,
        };
        let mut out = sink.lock();
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(target: "weft", %err, "failed to write parse diagnostic");
        }
    }
}

impl fmt::Debug for StreamErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamErrorHandler")
            .field("filename", &self.filename)
            .field("separate_warnings", &self.warnings.is_some())
            .finish_non_exhaustive()
    }
}

impl ErrorHandler for StreamErrorHandler {
    fn on_error(&self, input: &str, error: &ParseError) -> ErrorHandlerResult {
        let rendered = format_expectation_failure(&self.filename, input, error);
        self.write(DiagnosticKind::Error, &rendered);
        ErrorHandlerResult::Fail
    }

    fn diagnose(&self, kind: DiagnosticKind, message: &str, input: &str, position: usize) {
        let rendered = format_message(&self.filename, input, position, message);
        self.write(kind, &rendered);
    }
}

type Callback = Box<dyn Fn(&str) + Send + Sync>;

/// Passes formatted errors and warnings to user callbacks and fails the
/// parse.
///
/// A missing callback suppresses that kind of report.
#[derive(Default)]
pub struct CallbackErrorHandler {
    filename: String,
    on_error: Option<Callback>,
    on_warning: Option<Callback>,
}

impl CallbackErrorHandler {
    pub fn new(on_error: impl Fn(&str) + Send + Sync + 'static) -> Self {
        CallbackErrorHandler {
            filename: String::new(),
            on_error: Some(Box::new(on_error)),
            on_warning: None,
        }
    }

    #[must_use]
    pub fn with_warnings(mut self, on_warning: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_warning = Some(Box::new(on_warning));
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

impl fmt::Debug for CallbackErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackErrorHandler")
            .field("filename", &self.filename)
            .field("on_error", &self.on_error.is_some())
            .field("on_warning", &self.on_warning.is_some())
            .finish()
    }
}

impl ErrorHandler for CallbackErrorHandler {
    fn on_error(&self, input: &str, error: &ParseError) -> ErrorHandlerResult {
        if let Some(callback) = &self.on_error {
            callback(&format_expectation_failure(&self.filename, input, error));
        }
        ErrorHandlerResult::Fail
    }

    fn diagnose(&self, kind: DiagnosticKind, message: &str, input: &str, position: usize) {
        let callback = match kind {
            DiagnosticKind::Error => &self.on_error,
            DiagnosticKind::Warning => &self.on_warning,
        };
        if let Some(callback) = callback {
            callback(&format_message(&self.filename, input, position, message));
        }
    }
}

/// Hands every hard error back to the caller and ignores diagnostics.
#[derive(Copy, Clone, Debug, Default)]
pub struct RethrowErrorHandler;

impl ErrorHandler for RethrowErrorHandler {
    fn on_error(&self, _input: &str, _error: &ParseError) -> ErrorHandlerResult {
        ErrorHandlerResult::Rethrow
    }

    fn diagnose(&self, _kind: DiagnosticKind, _message: &str, _input: &str, _position: usize) {}
}
