use codemap::CodeMap;

use crate::{
    error::{SassError, SassResult},
    lexer::Lexer,
    logger::Diagnostic,
    selector::{CommaSequence, Directive, ExtendIndex, SelectorParser},
    serializer::Serializer,
    Options,
};

/// Owns everything needed to extend the selectors of one stylesheet: the
/// source of every parsed selector, the options and the extensions registered
/// so far.
///
/// ```
/// # use sass_extend_compiler as sass_extend;
/// fn main() -> Result<(), Box<sass_extend::Error>> {
///     let options = sass_extend::Options::default();
///     let mut session = sass_extend::Session::new(&options);
///
///     let extender = session.parse_selector(".bar")?;
///     session.add_extend(&extender, ".foo", &[], false)?;
///
///     let selector = session.parse_selector(".foo .baz")?;
///     let extended = session.extend_selector(&selector, &[])?;
///     session.check_extends_fired()?;
///
///     assert_eq!(session.serialize(&extended), ".foo .baz, .bar .baz");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Session<'a> {
    options: &'a Options<'a>,
    map: CodeMap,
    index: ExtendIndex,
}

impl<'a> Session<'a> {
    pub fn new(options: &'a Options<'a>) -> Self {
        Self {
            options,
            map: CodeMap::new(),
            index: ExtendIndex::new().with_trim_threshold(options.trim_threshold),
        }
    }

    pub fn index(&self) -> &ExtendIndex {
        &self.index
    }

    /// Attaches file, line and column information to an error raised with a
    /// span from this session's sources
    fn locate(&self, err: Box<SassError>) -> Box<SassError> {
        let (kind, message, span) = err.raw();
        match span {
            Some(span) => SassError::from_loc(
                kind,
                message.to_owned(),
                self.map.look_up_span(span),
                self.options.unicode_error_messages,
            ),
            None => err,
        }
    }

    fn parse(&mut self, text: &str) -> SassResult<CommaSequence> {
        let file = self.map.add_file("stdin".to_owned(), text.to_owned());
        SelectorParser::new(Lexer::new_from_file(&file), true, true).parse()
    }

    /// Parses a selector list, which may contain `&` and placeholders
    pub fn parse_selector(&mut self, text: &str) -> SassResult<CommaSequence> {
        self.parse(text).map_err(|err| self.locate(err))
    }

    /// Registers `@extend <target>` written in a rule whose selector is
    /// `extender`, enclosed by `directives` (outermost first).
    ///
    /// A trailing `!optional` in `target` is honored. Deprecation
    /// diagnostics are returned, and logged unless the options are quiet.
    pub fn add_extend(
        &mut self,
        extender: &CommaSequence,
        target: &str,
        directives: &[Directive],
        is_optional: bool,
    ) -> SassResult<Vec<Diagnostic>> {
        let (target, is_optional) = match target.trim_end().strip_suffix("!optional") {
            Some(target) => (target, true),
            None => (target, is_optional),
        };

        let target = self.parse_selector(target)?;

        let diagnostics = extender
            .populate_extends(
                &mut self.index,
                &target,
                target.span(),
                directives,
                is_optional,
                self.options.compound_extend,
            )
            .map_err(|err| self.locate(err))?;

        if !self.options.quiet {
            for diagnostic in &diagnostics {
                diagnostic.emit(&self.map, self.options.logger);
            }
        }

        Ok(diagnostics)
    }

    /// Extends `selector` with every extension registered so far
    pub fn extend_selector(
        &self,
        selector: &CommaSequence,
        directives: &[Directive],
    ) -> SassResult<CommaSequence> {
        self.index
            .extend(selector, directives)
            .map_err(|err| self.locate(err))
    }

    /// Replaces `&` in `selector` with `parent`; see
    /// [`CommaSequence::resolve_parent_refs`]
    pub fn resolve_parent_refs(
        &self,
        selector: &CommaSequence,
        parent: Option<&CommaSequence>,
        implicit_parent: bool,
    ) -> SassResult<CommaSequence> {
        selector
            .resolve_parent_refs(parent, implicit_parent)
            .map_err(|err| self.locate(err))
    }

    /// Fails if a mandatory `@extend` never matched a selector.
    ///
    /// Call this after every selector has been extended.
    pub fn check_extends_fired(&self) -> SassResult<()> {
        if !self.options.quiet {
            for extension in self.index.unused().filter(|extension| extension.is_optional) {
                if let Some(span) = extension.span {
                    self.options.logger.debug(
                        self.map.look_up_span(span),
                        &format!(
                            "\"{}\" did not @extend \"{}\"",
                            extension.extender,
                            extension.target_text()
                        ),
                    );
                }
            }
        }

        self.index
            .check_extends_fired()
            .map_err(|err| self.locate(err))
    }

    /// Renders `selector` in the configured output style
    pub fn serialize(&self, selector: &CommaSequence) -> String {
        Serializer::new(self.options).serialize(selector)
    }
}
