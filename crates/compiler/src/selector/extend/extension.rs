use std::{
    fmt::{self, Display},
    sync::atomic::{AtomicBool, Ordering},
};

use codemap::Span;

use crate::{
    error::{ErrorKind, SassError, SassResult},
    utils::is_subsequence,
};

use super::super::{Sequence, SimpleSelector};

/// A single `@extend` registered against one compound target
#[derive(Debug)]
pub struct Extension {
    /// The selector in which the `@extend` appeared
    pub extender: Sequence,

    /// The compound being extended, as its simple selectors
    pub target: Vec<SimpleSelector>,

    /// The directives enclosing the `@extend`, outermost first
    pub directives: Vec<Directive>,

    /// The span of the `@extend` itself
    pub span: Option<Span>,

    /// Whether this was written with `!optional`
    pub is_optional: bool,

    success: AtomicBool,
}

impl Extension {
    pub fn new(
        extender: Sequence,
        target: Vec<SimpleSelector>,
        directives: Vec<Directive>,
        span: Option<Span>,
        is_optional: bool,
    ) -> Self {
        Self {
            extender,
            target,
            directives,
            span,
            is_optional,
            success: AtomicBool::new(false),
        }
    }

    pub(crate) fn mark_success(&self) {
        self.success.store(true, Ordering::Relaxed);
    }

    /// Whether this extension has matched any selector so far
    pub fn is_successful(&self) -> bool {
        self.success.load(Ordering::Relaxed)
    }

    pub(crate) fn target_text(&self) -> String {
        self.target.iter().map(ToString::to_string).collect()
    }

    /// Ensures a selector enclosed by `directives` may be extended by this
    /// extension. Its own directives must appear among them, in order.
    pub(crate) fn check_directives(&self, directives: &[Directive]) -> SassResult<()> {
        if is_subsequence(&self.directives, directives) {
            return Ok(());
        }

        Err(SassError::new(
            ErrorKind::CrossDirectiveExtend,
            format!(
                "You may not @extend an outer selector from within {}.\n\
                 You may only @extend selectors within the same directive.\n\
                 From \"@extend {}\".",
                self.directives.last().map_or("", Directive::name),
                self.target_text(),
            ),
            self.span,
        ))
    }
}

/// An at-rule enclosing a style rule, such as `@media screen`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Directive {
    name: String,
    params: String,
}

impl Directive {
    /// `name` includes the leading `@`. `params` are the resolved parameters
    /// of the rule; directives compare equal only when these match exactly.
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.params)
        }
    }
}
