use crate::{
    error::SassResult,
    lexer::{Lexer, Token},
    utils::{as_hex, hex_char_for, is_name, is_name_start, opposite_bracket},
};

/// Character-level scanning shared by the selector parsers
pub(crate) trait BaseParser {
    fn toks(&self) -> &Lexer;
    fn toks_mut(&mut self) -> &mut Lexer;

    fn whitespace_without_comments(&mut self) {
        while matches!(
            self.toks().peek(),
            Some(Token {
                kind: ' ' | '\t' | '\n',
                ..
            })
        ) {
            self.toks_mut().next();
        }
    }

    fn whitespace(&mut self) -> SassResult<()> {
        loop {
            self.whitespace_without_comments();

            if !self.scan_comment()? {
                break;
            }
        }

        Ok(())
    }

    fn scan_comment(&mut self) -> SassResult<bool> {
        if !self.toks().next_char_is('/') {
            return Ok(false);
        }

        Ok(match self.toks().peek_n(1) {
            Some(Token { kind: '/', .. }) => {
                while !self.toks().is_at_end() && !self.toks().next_char_is('\n') {
                    self.toks_mut().next();
                }
                true
            }
            Some(Token { kind: '*', .. }) => {
                self.skip_loud_comment()?;
                true
            }
            _ => false,
        })
    }

    fn skip_loud_comment(&mut self) -> SassResult<()> {
        debug_assert!(self.next_matches("/*"));
        let start = self.toks().cursor();
        self.toks_mut().next();
        self.toks_mut().next();

        while let Some(next) = self.toks_mut().next() {
            if next.kind != '*' {
                continue;
            }

            while self.scan_char('*') {}

            if self.scan_char('/') {
                return Ok(());
            }
        }

        Err(("expected more input.", self.toks().span_from(start)).into())
    }

    fn next_matches(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(idx, c)| matches!(self.toks().peek_n(idx), Some(Token { kind, .. }) if kind == c))
    }

    fn scan_char(&mut self, c: char) -> bool {
        if self.toks().next_char_is(c) {
            self.toks_mut().next();
            return true;
        }

        false
    }

    fn expect_char(&mut self, c: char) -> SassResult<()> {
        if self.scan_char(c) {
            return Ok(());
        }

        Err((format!("expected \"{}\".", c), self.toks().current_span()).into())
    }

    fn parse_identifier(&mut self) -> SassResult<String> {
        let mut text = String::new();

        if self.scan_char('-') {
            text.push('-');

            if self.scan_char('-') {
                text.push('-');
                self.parse_identifier_body(&mut text)?;
                return Ok(text);
            }
        }

        match self.toks().peek() {
            Some(Token { kind, .. }) if is_name_start(kind) => {
                self.toks_mut().next();
                text.push(kind);
            }
            Some(Token { kind: '\\', .. }) => {
                text.push_str(&self.parse_escape(true)?);
            }
            Some(..) | None => {
                return Err(("Expected identifier.", self.toks().current_span()).into())
            }
        }

        self.parse_identifier_body(&mut text)?;

        Ok(text)
    }

    fn parse_identifier_body(&mut self, buffer: &mut String) -> SassResult<()> {
        while let Some(tok) = self.toks().peek() {
            if is_name(tok.kind) {
                self.toks_mut().next();
                buffer.push(tok.kind);
            } else if tok.kind == '\\' {
                buffer.push_str(&self.parse_escape(false)?);
            } else {
                break;
            }
        }

        Ok(())
    }

    /// Consumes an escape sequence and returns the text it should be written
    /// back out as inside an identifier
    fn parse_escape(&mut self, identifier_start: bool) -> SassResult<String> {
        let start = self.toks().cursor();
        self.expect_char('\\')?;

        let first = match self.toks().peek() {
            Some(Token { kind: '\n', .. }) => {
                return Err(("Expected escape sequence.", self.toks().current_span()).into())
            }
            Some(t) => t,
            None => return Err(("Expected expression.", self.toks().current_span()).into()),
        };

        let mut value = 0;
        if first.kind.is_ascii_hexdigit() {
            for _ in 0..6 {
                match self.toks().peek() {
                    Some(next) if next.kind.is_ascii_hexdigit() => {
                        value = (value << 4) + as_hex(next.kind);
                        self.toks_mut().next();
                    }
                    _ => break,
                }
            }
            if matches!(
                self.toks().peek(),
                Some(Token {
                    kind: ' ' | '\n' | '\t',
                    ..
                })
            ) {
                self.toks_mut().next();
            }
        } else {
            value = first.kind as u32;
            self.toks_mut().next();
        }

        let c = std::char::from_u32(value)
            .ok_or_else(|| ("Invalid Unicode code point.", self.toks().span_from(start)))?;

        if (identifier_start && is_name_start(c) && !c.is_ascii_digit())
            || (!identifier_start && is_name(c))
        {
            Ok(c.to_string())
        } else if value <= 0x1F || value == 0x7F || (identifier_start && c.is_ascii_digit()) {
            let mut buf = String::with_capacity(4);
            buf.push('\\');
            if value > 0xF {
                buf.push(hex_char_for(value >> 4));
            }
            buf.push(hex_char_for(value & 0xF));
            buf.push(' ');
            Ok(buf)
        } else {
            Ok(format!("\\{}", c))
        }
    }

    /// Consumes a quoted string and returns its unquoted, unescaped contents
    fn parse_string(&mut self) -> SassResult<String> {
        let start = self.toks().cursor();
        let quote = match self.toks_mut().next() {
            Some(Token {
                kind: q @ ('\'' | '"'),
                ..
            }) => q,
            Some(..) | None => return Err(("Expected string.", self.toks().current_span()).into()),
        };

        let mut buffer = String::new();

        while let Some(next) = self.toks().peek() {
            match next.kind {
                c if c == quote => {
                    self.toks_mut().next();
                    return Ok(buffer);
                }
                '\n' => break,
                '\\' if matches!(self.toks().peek_n(1), Some(Token { kind: '\n', .. })) => {
                    self.toks_mut().next();
                    self.toks_mut().next();
                }
                '\\' => buffer.push(self.consume_escaped_char()?),
                c => {
                    self.toks_mut().next();
                    buffer.push(c);
                }
            }
        }

        Err((format!("Expected {}.", quote), self.toks().span_from(start)).into())
    }

    fn consume_escaped_char(&mut self) -> SassResult<char> {
        self.expect_char('\\')?;

        match self.toks().peek() {
            None => Ok('\u{FFFD}'),
            Some(Token { kind: '\n', .. }) => {
                Err(("Expected escape sequence.", self.toks().current_span()).into())
            }
            Some(Token { kind, .. }) if kind.is_ascii_hexdigit() => {
                let mut value = 0;
                for _ in 0..6 {
                    match self.toks().peek() {
                        Some(next) if next.kind.is_ascii_hexdigit() => {
                            self.toks_mut().next();
                            value = (value << 4) + as_hex(next.kind);
                        }
                        _ => break,
                    }
                }

                if matches!(self.toks().peek(), Some(t) if t.kind.is_ascii_whitespace()) {
                    self.toks_mut().next();
                }

                if value == 0 || (0xD800..=0xDFFF).contains(&value) {
                    Ok('\u{FFFD}')
                } else {
                    Ok(char::from_u32(value).unwrap_or('\u{FFFD}'))
                }
            }
            Some(Token { kind, .. }) => {
                self.toks_mut().next();
                Ok(kind)
            }
        }
    }

    /// Consumes the raw argument of a pseudo selector, up to but not including
    /// the first unbalanced closing bracket. Runs of whitespace collapse to a
    /// single space.
    fn declaration_value(&mut self) -> SassResult<String> {
        let mut buffer = String::new();
        let mut brackets = Vec::new();

        while let Some(tok) = self.toks().peek() {
            match tok.kind {
                '\\' => buffer.push_str(&self.parse_escape(true)?),
                '"' | '\'' => buffer.push_str(&self.fallible_raw_text(Self::parse_string)?),
                '/' if matches!(self.toks().peek_n(1), Some(Token { kind: '*', .. })) => {
                    buffer.push_str(&self.fallible_raw_text(Self::skip_loud_comment)?);
                }
                ' ' | '\t' | '\n' => {
                    self.whitespace_without_comments();
                    buffer.push(' ');
                }
                '[' | '(' => {
                    buffer.push(tok.kind);
                    self.toks_mut().next();
                    brackets.push(opposite_bracket(tok.kind));
                }
                ']' | ')' => match brackets.pop() {
                    Some(end) => {
                        self.expect_char(end)?;
                        buffer.push(end);
                    }
                    None => break,
                },
                c => {
                    if self.looking_at_identifier() {
                        buffer.push_str(&self.parse_identifier()?);
                    } else {
                        self.toks_mut().next();
                        buffer.push(c);
                    }
                }
            }
        }

        if let Some(last) = brackets.pop() {
            self.expect_char(last)?;
        }

        Ok(buffer)
    }

    /// Returns whether the scanner is immediately before a plain CSS identifier.
    ///
    /// This is based on [the CSS algorithm][], but it assumes all backslashes
    /// start escapes.
    ///
    /// [the CSS algorithm]: https://drafts.csswg.org/css-syntax-3/#would-start-an-identifier
    fn looking_at_identifier(&self) -> bool {
        match self.toks().peek() {
            Some(Token { kind, .. }) if is_name_start(kind) || kind == '\\' => return true,
            Some(Token { kind: '-', .. }) => {}
            Some(..) | None => return false,
        }

        matches!(
            self.toks().peek_n(1),
            Some(Token { kind, .. }) if is_name_start(kind) || kind == '-' || kind == '\\'
        )
    }

    fn looking_at_identifier_body(&self) -> bool {
        matches!(self.toks().peek(), Some(t) if is_name(t.kind) || t.kind == '\\')
    }

    fn fallible_raw_text<T>(
        &mut self,
        func: impl Fn(&mut Self) -> SassResult<T>,
    ) -> SassResult<String> {
        let start = self.toks().cursor();
        func(self)?;
        Ok(self.toks().raw_text(start))
    }

    fn scan_ident_char(&mut self, c: char) -> SassResult<bool> {
        let matches = |actual: char| actual.eq_ignore_ascii_case(&c);

        Ok(match self.toks().peek() {
            Some(Token { kind, .. }) if matches(kind) => {
                self.toks_mut().next();
                true
            }
            Some(Token { kind: '\\', .. }) => {
                let start = self.toks().cursor();
                if matches(self.consume_escaped_char()?) {
                    return Ok(true);
                }
                self.toks_mut().set_cursor(start);
                false
            }
            Some(..) | None => false,
        })
    }

    fn expect_ident_char(&mut self, c: char) -> SassResult<()> {
        if self.scan_ident_char(c)? {
            return Ok(());
        }

        Err((format!("Expected \"{}\".", c), self.toks().current_span()).into())
    }

    /// Consumes `ident`, case-insensitively, failing if it is followed by more
    /// identifier characters
    fn expect_identifier(&mut self, ident: &str) -> SassResult<()> {
        let start = self.toks().cursor();

        for c in ident.chars() {
            if !self.scan_ident_char(c)? {
                return Err((
                    format!("Expected \"{}\".", ident),
                    self.toks().span_from(start),
                )
                    .into());
            }
        }

        if !self.looking_at_identifier_body() {
            return Ok(());
        }

        Err((
            format!("Expected \"{}\".", ident),
            self.toks().span_from(start),
        )
            .into())
    }
}
