use crate::{
    error::SassResult,
    interner::InternedString,
    lexer::{Lexer, Token},
    parse::BaseParser,
    utils::unvendor,
};

use super::{
    Attribute, AttributeOp, Combinator, CommaSequence, Namespace, Pseudo, QualifiedName, Sequence,
    SequenceComponent, SimpleSelector, SimpleSequence, SELECTOR_PSEUDO_CLASSES,
    SELECTOR_PSEUDO_ELEMENTS,
};

#[derive(PartialEq)]
enum DevouredWhitespace {
    /// Some whitespace was found
    Whitespace,
    /// A newline and potentially other whitespace was found
    Newline,
    /// No whitespace was found
    None,
}

pub(crate) struct SelectorParser {
    /// Whether this parser allows the parent selector `&`.
    allows_parent: bool,

    /// Whether this parser allows placeholder selectors beginning with `%`.
    allows_placeholder: bool,

    pub toks: Lexer,
}

impl BaseParser for SelectorParser {
    fn toks(&self) -> &Lexer {
        &self.toks
    }

    fn toks_mut(&mut self) -> &mut Lexer {
        &mut self.toks
    }
}

impl SelectorParser {
    pub fn new(toks: Lexer, allows_parent: bool, allows_placeholder: bool) -> Self {
        Self {
            toks,
            allows_parent,
            allows_placeholder,
        }
    }

    pub fn parse(mut self) -> SassResult<CommaSequence> {
        self.whitespace()?;
        let tmp = self.parse_selector_list()?;
        if !self.toks.is_at_end() {
            return Err(("expected selector.", self.toks.current_span()).into());
        }
        Ok(tmp)
    }

    fn parse_selector_list(&mut self) -> SassResult<CommaSequence> {
        let start = self.toks.cursor();
        let mut members = vec![self.parse_complex_selector(false)?];

        let mut line_break = false;

        while self.scan_char(',') {
            line_break = self.eat_whitespace()? == DevouredWhitespace::Newline || line_break;
            match self.toks.peek() {
                Some(Token { kind: ',', .. }) => continue,
                Some(Token { kind: ')', .. }) | None => break,
                Some(..) => {}
            }
            members.push(self.parse_complex_selector(line_break)?);

            line_break = false;
        }

        Ok(CommaSequence::new(members, Some(self.toks.span_from(start))))
    }

    fn eat_whitespace(&mut self) -> SassResult<DevouredWhitespace> {
        let text = self.fallible_raw_text(Self::whitespace)?;

        Ok(if text.contains('\n') {
            DevouredWhitespace::Newline
        } else if !text.is_empty() {
            DevouredWhitespace::Whitespace
        } else {
            DevouredWhitespace::None
        })
    }

    /// Consumes a complex selector.
    ///
    /// If `line_break` is `true`, that indicates that there was a line break
    /// before this selector. Line breaks between components are kept too.
    fn parse_complex_selector(&mut self, line_break: bool) -> SassResult<Sequence> {
        let mut components = Vec::new();
        if line_break {
            components.push(SequenceComponent::Newline);
        }

        let mut is_empty = true;

        loop {
            if self.eat_whitespace()? == DevouredWhitespace::Newline
                && !is_empty
                && !matches!(components.last(), Some(SequenceComponent::Newline))
            {
                components.push(SequenceComponent::Newline);
            }

            match self.toks.peek() {
                Some(Token { kind: '+', .. }) => {
                    self.toks.next();
                    components.push(SequenceComponent::Combinator(Combinator::NextSibling));
                }
                Some(Token { kind: '>', .. }) => {
                    self.toks.next();
                    components.push(SequenceComponent::Combinator(Combinator::Child));
                }
                Some(Token { kind: '~', .. }) => {
                    self.toks.next();
                    components.push(SequenceComponent::Combinator(Combinator::FollowingSibling));
                }
                Some(Token {
                    kind: '[' | '.' | '#' | '%' | ':' | '&' | '*' | '|',
                    ..
                }) => {
                    components.push(SequenceComponent::Compound(self.parse_compound_selector()?));
                }
                Some(..) if self.looking_at_identifier() => {
                    components.push(SequenceComponent::Compound(self.parse_compound_selector()?));
                }
                Some(..) | None => break,
            }

            is_empty = false;
        }

        if is_empty {
            return Err(("expected selector.", self.toks.current_span()).into());
        }

        if let Some(SequenceComponent::Newline) = components.last() {
            components.pop();
        }

        Ok(Sequence::new(components))
    }

    fn parse_compound_selector(&mut self) -> SassResult<SimpleSequence> {
        let start = self.toks.cursor();
        let mut members = vec![self.parse_simple_selector(None)?];

        while let Some(Token { kind, .. }) = self.toks.peek() {
            if !is_simple_selector_start(kind) {
                break;
            }

            members.push(self.parse_simple_selector(Some(false))?);
        }

        if self.toks.next_char_is('&') {
            return Err((
                "\"&\" may only used at the beginning of a compound selector.",
                self.toks.current_span(),
            )
                .into());
        }

        let subject = self.scan_char('!');

        Ok(SimpleSequence::new(members, subject).with_span(Some(self.toks.span_from(start))))
    }

    /// Consumes a simple selector.
    ///
    /// If `allows_parent` is `Some`, this will override `self.allows_parent`. If `allows_parent`
    /// is `None`, it will fallback to `self.allows_parent`.
    fn parse_simple_selector(&mut self, allows_parent: Option<bool>) -> SassResult<SimpleSelector> {
        match self.toks.peek() {
            Some(Token { kind: '[', .. }) => self.parse_attribute_selector(),
            Some(Token { kind: '.', .. }) => {
                self.toks.next();
                Ok(SimpleSelector::class(&self.parse_identifier()?))
            }
            Some(Token { kind: '#', .. }) => {
                self.toks.next();
                Ok(SimpleSelector::id(&self.parse_identifier()?))
            }
            Some(Token { kind: '%', .. }) => {
                if !self.allows_placeholder {
                    return Err((
                        "Placeholder selectors aren't allowed here.",
                        self.toks.current_span(),
                    )
                        .into());
                }
                self.toks.next();
                Ok(SimpleSelector::placeholder(&self.parse_identifier()?))
            }
            Some(Token { kind: ':', .. }) => self.parse_pseudo_selector(),
            Some(Token { kind: '&', .. }) => {
                let allows_parent = allows_parent.unwrap_or(self.allows_parent);
                if !allows_parent {
                    return Err((
                        "Parent selectors aren't allowed here.",
                        self.toks.current_span(),
                    )
                        .into());
                }

                self.parse_parent_selector()
            }
            _ => self.parse_type_or_universal_selector(),
        }
    }

    fn parse_attribute_selector(&mut self) -> SassResult<SimpleSelector> {
        self.expect_char('[')?;
        self.whitespace()?;

        let name = self.parse_attribute_name()?;
        self.whitespace()?;

        if self.scan_char(']') {
            return Ok(SimpleSelector::Attribute(Box::new(Attribute {
                name,
                op: AttributeOp::Any,
                value: String::new(),
                modifier: None,
            })));
        }

        let op = self.parse_attribute_operator()?;
        self.whitespace()?;

        let value = match self.toks.peek() {
            Some(Token {
                kind: '\'' | '"', ..
            }) => self.parse_string()?,
            _ => self.parse_identifier()?,
        };
        self.whitespace()?;

        let modifier = match self.toks.peek() {
            Some(Token { kind, .. }) if kind.is_ascii_alphabetic() => {
                self.toks.next();
                self.whitespace()?;
                Some(kind)
            }
            _ => None,
        };

        self.expect_char(']')?;

        Ok(SimpleSelector::Attribute(Box::new(Attribute {
            name,
            op,
            value,
            modifier,
        })))
    }

    fn parse_attribute_name(&mut self) -> SassResult<QualifiedName> {
        if self.scan_char('*') {
            self.expect_char('|')?;
            return Ok(QualifiedName::new(
                &self.parse_identifier()?,
                Namespace::Asterisk,
            ));
        }

        if self.scan_char('|') {
            return Ok(QualifiedName::new(&self.parse_identifier()?, Namespace::Empty));
        }

        let name_or_namespace = self.parse_identifier()?;

        match (self.toks.peek(), self.toks.peek_n(1)) {
            (Some(Token { kind: '|', .. }), Some(Token { kind, .. })) if kind != '=' => {
                self.toks.next();
                Ok(QualifiedName::new(
                    &self.parse_identifier()?,
                    Namespace::Other(InternedString::get_or_intern(name_or_namespace)),
                ))
            }
            _ => Ok(QualifiedName::new(&name_or_namespace, Namespace::None)),
        }
    }

    fn parse_attribute_operator(&mut self) -> SassResult<AttributeOp> {
        let start = self.toks.cursor();
        let op = match self.toks.next() {
            Some(Token { kind: '=', .. }) => return Ok(AttributeOp::Equals),
            Some(Token { kind: '~', .. }) => AttributeOp::Include,
            Some(Token { kind: '|', .. }) => AttributeOp::Dash,
            Some(Token { kind: '^', .. }) => AttributeOp::Prefix,
            Some(Token { kind: '$', .. }) => AttributeOp::Suffix,
            Some(Token { kind: '*', .. }) => AttributeOp::Contains,
            Some(..) | None => {
                return Err(("Expected \"]\".", self.toks.span_from(start)).into())
            }
        };

        self.expect_char('=')?;

        Ok(op)
    }

    fn parse_pseudo_selector(&mut self) -> SassResult<SimpleSelector> {
        self.expect_char(':')?;
        let element = self.scan_char(':');
        let name = self.parse_identifier()?;

        if !self.scan_char('(') {
            return Ok(SimpleSelector::Pseudo(Pseudo::new(
                &name, !element, None, None,
            )));
        }

        self.whitespace()?;

        let unvendored = unvendor(&name);

        let mut argument: Option<String> = None;
        let mut selector: Option<CommaSequence> = None;

        if element {
            if SELECTOR_PSEUDO_ELEMENTS.contains(unvendored) {
                selector = Some(self.parse_selector_list()?);
                self.whitespace()?;
            } else {
                argument = Some(self.declaration_value()?.trim_end().to_owned());
            }

            self.expect_char(')')?;
        } else if SELECTOR_PSEUDO_CLASSES.contains(unvendored) {
            selector = Some(self.parse_selector_list()?);
            self.whitespace()?;
            self.expect_char(')')?;
        } else if unvendored == "nth-child" || unvendored == "nth-last-child" {
            let mut this_arg = self.parse_a_n_plus_b()?;
            let had_whitespace = self.eat_whitespace()? != DevouredWhitespace::None;

            if had_whitespace && !self.toks.next_char_is(')') {
                self.expect_identifier("of")?;
                this_arg.push_str(" of");
                self.whitespace()?;
                selector = Some(self.parse_selector_list()?);
                self.whitespace()?;
            }

            self.expect_char(')')?;
            argument = Some(this_arg);
        } else {
            argument = Some(self.declaration_value()?.trim_end().to_owned());

            self.expect_char(')')?;
        }

        Ok(SimpleSelector::Pseudo(Pseudo::new(
            &name,
            !element,
            argument.as_deref(),
            selector,
        )))
    }

    fn parse_parent_selector(&mut self) -> SassResult<SimpleSelector> {
        self.expect_char('&')?;
        let suffix = if self.looking_at_identifier_body() {
            let mut buffer = String::new();
            self.parse_identifier_body(&mut buffer)?;
            Some(buffer)
        } else {
            None
        };
        Ok(SimpleSelector::Parent(suffix))
    }

    /// Consumes a type selector or a universal selector.
    ///
    /// These are combined because either one could start with `*`.
    fn parse_type_or_universal_selector(&mut self) -> SassResult<SimpleSelector> {
        match self.toks.peek() {
            Some(Token { kind: '*', .. }) => {
                self.toks.next();
                if self.scan_char('|') {
                    if self.scan_char('*') {
                        return Ok(SimpleSelector::Universal(Namespace::Asterisk));
                    }

                    return Ok(SimpleSelector::Element(QualifiedName::new(
                        &self.parse_identifier()?,
                        Namespace::Asterisk,
                    )));
                }

                return Ok(SimpleSelector::Universal(Namespace::None));
            }
            Some(Token { kind: '|', .. }) => {
                self.toks.next();
                if self.scan_char('*') {
                    return Ok(SimpleSelector::Universal(Namespace::Empty));
                }

                return Ok(SimpleSelector::Element(QualifiedName::new(
                    &self.parse_identifier()?,
                    Namespace::Empty,
                )));
            }
            _ => {}
        }

        let name_or_namespace = self.parse_identifier()?;

        if !self.scan_char('|') {
            return Ok(SimpleSelector::element(&name_or_namespace));
        }

        let namespace = Namespace::Other(InternedString::get_or_intern(name_or_namespace));

        if self.scan_char('*') {
            return Ok(SimpleSelector::Universal(namespace));
        }

        Ok(SimpleSelector::Element(QualifiedName::new(
            &self.parse_identifier()?,
            namespace,
        )))
    }

    /// Consumes an [`An+B` production][An+B] and returns its text.
    ///
    /// [An+B]: https://drafts.csswg.org/css-syntax-3/#anb-microsyntax
    fn parse_a_n_plus_b(&mut self) -> SassResult<String> {
        let mut buf = String::new();

        match self.toks.peek() {
            Some(Token { kind: 'e' | 'E', .. }) => {
                self.expect_identifier("even")?;
                return Ok("even".to_owned());
            }
            Some(Token { kind: 'o' | 'O', .. }) => {
                self.expect_identifier("odd")?;
                return Ok("odd".to_owned());
            }
            Some(t @ Token { kind: '+' | '-', .. }) => {
                buf.push(t.kind);
                self.toks.next();
            }
            _ => {}
        }

        match self.toks.peek() {
            Some(t) if t.kind.is_ascii_digit() => {
                while let Some(t) = self.toks.peek() {
                    if !t.kind.is_ascii_digit() {
                        break;
                    }
                    buf.push(t.kind);
                    self.toks.next();
                }
                if !self.scan_ident_char('n')? {
                    return Ok(buf);
                }
            }
            Some(..) => self.expect_ident_char('n')?,
            None => return Err(("expected more input.", self.toks.current_span()).into()),
        }

        buf.push('n');

        self.whitespace()?;

        if let Some(t @ Token { kind: '+' | '-', .. }) = self.toks.peek() {
            buf.push(t.kind);
            self.toks.next();
            self.whitespace()?;
            match self.toks.peek() {
                Some(t) if t.kind.is_ascii_digit() => {}
                Some(..) | None => {
                    return Err(("Expected a number.", self.toks.current_span()).into())
                }
            }

            while let Some(t) = self.toks.peek() {
                if !t.kind.is_ascii_digit() {
                    break;
                }
                buf.push(t.kind);
                self.toks.next();
            }
        }
        Ok(buf)
    }
}

/// Returns whether `c` can start a simple selector other than a type
/// selector.
fn is_simple_selector_start(c: char) -> bool {
    matches!(c, '*' | '[' | '.' | '#' | '%' | ':')
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ErrorKind,
        selector::{parse_for_tests, try_parse_for_tests},
    };

    fn round_trip(text: &str) -> String {
        parse_for_tests(text).to_string()
    }

    #[test]
    fn combinators_and_compounds() {
        assert_eq!(round_trip("a.b  >  #c~d+ .e"), "a.b > #c ~ d + .e");
        assert_eq!(round_trip("> .a"), "> .a");
        assert_eq!(round_trip(".a >"), ".a >");
    }

    #[test]
    fn line_breaks_are_kept() {
        let list = parse_for_tests(".a,\n.b\n.c");
        let second = list.members()[1].members();
        assert!(second[0].is_newline());
        assert!(second[2].is_newline());
        assert_eq!(second.len(), 4);
        assert_eq!(list.to_string(), ".a,\n.b\n.c");
    }

    #[test]
    fn trailing_line_break_is_dropped() {
        let list = parse_for_tests(".a\n, .b");
        assert_eq!(list.members()[0].members().len(), 1);
    }

    #[test]
    fn attributes() {
        assert_eq!(round_trip("[ href ]"), "[href]");
        assert_eq!(round_trip("[href^='http']"), "[href^=http]");
        assert_eq!(round_trip("[lang|=\"en us\" i]"), "[lang|=\"en us\" i]");
        assert_eq!(round_trip("[xlink|href=a]"), "[xlink|href=a]");
    }

    #[test]
    fn namespaces() {
        assert_eq!(round_trip("*|a"), "*|a");
        assert_eq!(round_trip("|*"), "|*");
        assert_eq!(round_trip("svg|rect"), "svg|rect");
        assert_eq!(round_trip("svg|*"), "svg|*");
    }

    #[test]
    fn pseudo_arguments() {
        assert_eq!(round_trip(":not( .a , .b )"), ":not(.a, .b)");
        assert_eq!(round_trip("::slotted(span)"), "::slotted(span)");
        assert_eq!(round_trip(":nth-child(2n + 1)"), ":nth-child(2n+1)");
        assert_eq!(round_trip(":nth-child(2n+1 of .a)"), ":nth-child(2n+1 of .a)");
        assert_eq!(round_trip(":lang( en )"), ":lang(en)");
        assert_eq!(round_trip("::before"), "::before");
        assert_eq!(round_trip(":before"), ":before");
    }

    #[test]
    fn pseudo_selector_argument_is_parsed() {
        let list = parse_for_tests(":matches(.a .b, c)");
        let compound = list.members()[0].single_compound().unwrap();
        let pseudo = compound.members()[0].as_selector_pseudo().unwrap();
        assert_eq!(pseudo.selector().unwrap().members().len(), 2);
    }

    #[test]
    fn subject_marker() {
        let list = parse_for_tests(".a! .b");
        let first = list.members()[0].members()[0].as_compound().unwrap();
        assert!(first.is_subject());
        assert_eq!(list.to_string(), ".a! .b");
    }

    #[test]
    fn parent_references() {
        assert_eq!(round_trip("&-suffix .a"), "&-suffix .a");
        assert_eq!(round_trip("&.a"), "&.a");
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(round_trip(".a /* b */ .c"), ".a .c");
    }

    #[test]
    fn rejects_malformed_selectors() {
        for text in [".a&", "", "a{", "[a=]", ".", ":not(.a"] {
            let err = try_parse_for_tests(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "{:?}", text);
        }
    }
}
