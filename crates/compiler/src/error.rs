use std::{
    error::Error,
    fmt::{self, Display},
};

use codemap::{Span, SpanLoc};

pub type SassResult<T> = Result<T, Box<SassError>>;

/// The category of a [`SassError`]
///
/// Failing to unify two selectors is never an error; it only prunes a branch
/// of the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// `&` used where there is no parent, or a suffix that cannot be applied
    /// to the parent selector
    InvalidParentSelector,
    /// The target of an `@extend` is nested, not a compound, or references `&`
    InvalidExtendTarget,
    /// An `@extend` inside a directive tried to extend a selector outside of it
    CrossDirectiveExtend,
    /// A mandatory `@extend` never matched any selector
    ExtendTargetNotFound,
    /// Malformed selector text
    Parse,
}

#[derive(Debug, Clone)]
pub struct SassError {
    kind: SassErrorKind,
}

impl SassError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Box<Self> {
        Box::new(SassError {
            kind: SassErrorKind::Raw {
                kind,
                message: message.into(),
                span,
            },
        })
    }

    pub(crate) fn raw(&self) -> (ErrorKind, &str, Option<Span>) {
        match &self.kind {
            SassErrorKind::Raw {
                kind,
                message,
                span,
            } => (*kind, message, *span),
            SassErrorKind::Located { kind, message, .. } => (*kind, message, None),
        }
    }

    pub(crate) fn from_loc(
        kind: ErrorKind,
        message: String,
        loc: SpanLoc,
        unicode: bool,
    ) -> Box<Self> {
        Box::new(SassError {
            kind: SassErrorKind::Located {
                kind,
                message,
                loc,
                unicode,
            },
        })
    }

    pub fn kind(&self) -> ErrorKind {
        self.raw().0
    }

    /// The bare message, without location information
    pub fn message(&self) -> &str {
        self.raw().1
    }

    /// 1-based line and column of the start of the error, if it has been located
    pub fn line_col(&self) -> Option<(usize, usize)> {
        match &self.kind {
            SassErrorKind::Located { loc, .. } => {
                Some((loc.begin.line + 1, loc.begin.column + 1))
            }
            SassErrorKind::Raw { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
enum SassErrorKind {
    /// Produced deep inside the engine, where only the span is known
    Raw {
        kind: ErrorKind,
        message: String,
        span: Option<Span>,
    },
    /// A raw error after its span was looked up in the code map
    Located {
        kind: ErrorKind,
        message: String,
        loc: SpanLoc,
        unicode: bool,
    },
}

impl Display for SassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (message, loc, unicode) = match &self.kind {
            SassErrorKind::Raw { message, .. } => return write!(f, "Error: {}", message),
            SassErrorKind::Located {
                message,
                loc,
                unicode,
                ..
            } => (message, loc, *unicode),
        };

        let first_bar = if unicode { '╷' } else { ',' };
        let middle_bar = if unicode { '│' } else { '|' };
        let last_bar = if unicode { '╵' } else { '\'' };

        let line = loc.begin.line + 1;
        let col = loc.begin.column + 1;
        let source_line = loc.file.source_line(loc.begin.line);

        let carets = if loc.end.line == loc.begin.line {
            loc.end.column.saturating_sub(loc.begin.column).max(1)
        } else {
            source_line
                .chars()
                .count()
                .saturating_sub(loc.begin.column)
                .max(1)
        };

        let padding = " ".repeat(line.to_string().len() + 1);

        writeln!(f, "Error: {}", message)?;
        writeln!(f, "{}{}", padding, first_bar)?;
        writeln!(f, "{} {} {}", line, middle_bar, source_line)?;
        writeln!(
            f,
            "{}{} {}{}",
            padding,
            middle_bar,
            " ".repeat(loc.begin.column),
            "^".repeat(carets)
        )?;
        writeln!(f, "{}{}", padding, last_bar)?;
        write!(f, "  ./{}:{}:{}", loc.file.name(), line, col)
    }
}

impl From<(&str, Span)> for Box<SassError> {
    #[inline]
    fn from(error: (&str, Span)) -> Box<SassError> {
        SassError::new(ErrorKind::Parse, error.0, Some(error.1))
    }
}

impl From<(String, Span)> for Box<SassError> {
    #[inline]
    fn from(error: (String, Span)) -> Box<SassError> {
        SassError::new(ErrorKind::Parse, error.0, Some(error.1))
    }
}

impl Error for SassError {}

#[cfg(test)]
mod tests {
    use codemap::CodeMap;

    use super::*;

    #[test]
    fn located_error_points_at_span() {
        let mut map = CodeMap::new();
        let file = map.add_file("input.scss".to_owned(), ".a & .b".to_owned());
        let span = file.span.subspan(3, 4);

        let err = SassError::from_loc(
            ErrorKind::InvalidParentSelector,
            "bad".to_owned(),
            map.look_up_span(span),
            false,
        );

        assert_eq!(err.line_col(), Some((1, 4)));
        assert_eq!(
            err.to_string(),
            "Error: bad\n  ,\n1 | .a & .b\n  |    ^\n  '\n  ./input.scss:1:4"
        );
    }

    #[test]
    fn raw_error_has_no_excerpt() {
        let err = SassError::new(ErrorKind::CrossDirectiveExtend, "nope", None);

        assert_eq!(err.kind(), ErrorKind::CrossDirectiveExtend);
        assert_eq!(err.to_string(), "Error: nope");
    }
}
