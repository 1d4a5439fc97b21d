use codemap::{CodeMap, Span, SpanLoc};
use std::fmt::{self, Debug, Display};

/// Sink for log messages
pub trait Logger: Debug {
    /// Logs an informational message about the extension process
    fn debug(&self, location: SpanLoc, message: &str);

    /// Logs a warning, such as a deprecated `@extend` target
    fn warning(&self, location: SpanLoc, message: &str);
}

/// Logs events to standard error
#[derive(Debug)]
pub struct StdLogger;

impl Logger for StdLogger {
    #[inline]
    fn debug(&self, location: SpanLoc, message: &str) {
        eprintln!(
            "{}:{} DEBUG: {}",
            location.file.name(),
            location.begin.line + 1,
            message
        );
    }

    #[inline]
    fn warning(&self, location: SpanLoc, message: &str) {
        eprintln!(
            "WARNING on line {} of {}:\n{}\n",
            location.begin.line + 1,
            location.file.name(),
            message,
        );
    }
}

/// Discards all log events
#[derive(Debug)]
pub struct NullLogger;

impl Logger for NullLogger {
    #[inline]
    fn debug(&self, _location: SpanLoc, _message: &str) {}

    #[inline]
    fn warning(&self, _location: SpanLoc, _message: &str) {}
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// `@extend .a.b`, which will stop being supported
    CompoundExtendDeprecation,
}

/// A non-fatal problem found while registering or applying extensions
///
/// Diagnostics are returned to the caller rather than written anywhere; a
/// [`crate::Session`] additionally forwards them to its [`Logger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub(crate) fn compound_extend(target: &str, alternatives: &str, span: Option<Span>) -> Self {
        Self {
            kind: DiagnosticKind::CompoundExtendDeprecation,
            message: format!(
                "Extending a compound selector, {}, is deprecated and will not be supported in a future release.\n\
                 Consider \"@extend {}\" instead.\n\
                 See http://bit.ly/ExtendCompound for details.",
                target, alternatives
            ),
            span,
        }
    }

    pub(crate) fn emit(&self, map: &CodeMap, logger: &dyn Logger) {
        if let Some(span) = self.span {
            logger.warning(map.look_up_span(span), &self.to_string());
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::CompoundExtendDeprecation => {
                write!(f, "DEPRECATION: {}", self.message)
            }
        }
    }
}
