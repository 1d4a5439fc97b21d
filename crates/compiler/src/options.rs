use crate::{Logger, StdLogger};

/// Number of woven alternatives above which trimming is skipped
pub const DEFAULT_TRIM_THRESHOLD: usize = 100;

/// Configuration for selector extension
///
/// The simplest usage is `sass_extend::Options::default()`; however, a builder
/// pattern is also exposed to offer more control.
#[derive(Debug)]
pub struct Options<'a> {
    pub(crate) logger: &'a dyn Logger,
    pub(crate) style: OutputStyle,
    pub(crate) quiet: bool,
    pub(crate) unicode_error_messages: bool,
    pub(crate) hide_placeholders: bool,
    pub(crate) trim_threshold: usize,
    pub(crate) compound_extend: CompoundExtend,
}

impl Default for Options<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            logger: &StdLogger,
            style: OutputStyle::Expanded,
            quiet: false,
            unicode_error_messages: true,
            hide_placeholders: true,
            trim_threshold: DEFAULT_TRIM_THRESHOLD,
            compound_extend: CompoundExtend::Warn,
        }
    }
}

impl<'a> Options<'a> {
    /// This option allows you to define how log events should be handled
    ///
    /// Be default, [`StdLogger`] is used, which writes all events to standard error.
    #[must_use]
    #[inline]
    pub fn logger(mut self, logger: &'a dyn Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Selectors can be rendered in 2 different output styles
    ///
    ///  - [`OutputStyle::Expanded`] separates list members with `", "`, surrounds
    ///    combinators with spaces and keeps line breaks written after commas.
    ///  - [`OutputStyle::Compressed`] removes as many extra characters as possible.
    ///
    /// By default, output is expanded.
    #[must_use]
    #[inline]
    pub const fn style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    /// This flag tells the engine not to emit any warnings. Deprecations are
    /// still returned as [`crate::Diagnostic`]s from the calls that produce them.
    ///
    /// Setting this option to `true` will stop all logs from reaching the [`crate::Logger`].
    ///
    /// By default, this value is `false` and warnings are emitted.
    #[must_use]
    #[inline]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// This flag tells the engine only to emit ASCII characters as
    /// part of error messages.
    ///
    /// By default non-ASCII characters are emitted for these messages.
    #[must_use]
    #[inline]
    pub const fn unicode_error_messages(mut self, unicode_error_messages: bool) -> Self {
        self.unicode_error_messages = unicode_error_messages;
        self
    }

    /// Whether selectors made only of placeholders (`%foo`) are left out when
    /// serializing.
    ///
    /// By default, they are hidden, which matches how they appear in CSS output.
    #[must_use]
    #[inline]
    pub const fn hide_placeholders(mut self, hide_placeholders: bool) -> Self {
        self.hide_placeholders = hide_placeholders;
        self
    }

    /// Extending a sequence can produce a number of alternatives exponential in
    /// its length. Removing redundant alternatives is quadratic, so above this
    /// many alternatives for a single sequence they are all kept as-is.
    ///
    /// By default, the threshold is [`DEFAULT_TRIM_THRESHOLD`].
    #[must_use]
    #[inline]
    pub const fn trim_threshold(mut self, trim_threshold: usize) -> Self {
        self.trim_threshold = trim_threshold;
        self
    }

    /// How to treat `@extend` of a compound selector such as `.a.b`
    ///
    /// By default, [`CompoundExtend::Warn`] is used.
    #[must_use]
    #[inline]
    pub const fn compound_extend(mut self, policy: CompoundExtend) -> Self {
        self.compound_extend = policy;
        self
    }

    pub(crate) fn is_compressed(&self) -> bool {
        matches!(self.style, OutputStyle::Compressed)
    }
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputStyle {
    /// Spaces around combinators and after commas.
    ///
    /// This is the default output.
    Expanded,

    /// No optional whitespace at all.
    Compressed,
}

/// Policy for `@extend` targets made of more than one simple selector
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompoundExtend {
    /// Accept the target silently
    Allow,
    /// Accept the target and report a deprecation [`crate::Diagnostic`]
    Warn,
    /// Reject the target with [`crate::ErrorKind::InvalidExtendTarget`]
    Deny,
}
