use std::{iter::Peekable, str::Chars, sync::Arc};

use codemap::{File, Span};

const FORM_FEED: char = '\x0C';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Token {
    pub kind: char,
    pos: u32,
}

/// A cursor over the characters of a single selector source, each tagged with
/// its byte offset so that spans can be recovered
#[derive(Debug, Clone)]
pub(crate) struct Lexer {
    buf: Vec<Token>,
    entire_span: Span,
    cursor: usize,
}

impl Lexer {
    pub fn new_from_file(file: &Arc<File>) -> Self {
        Lexer {
            buf: TokenLexer::new(file.source().chars().peekable()).collect(),
            entire_span: file.span,
            cursor: 0,
        }
    }

    pub fn raw_text(&self, start: usize) -> String {
        self.buf[start..self.cursor]
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    pub fn next_char_is(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token { kind, .. }) if kind == c)
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.buf.len()
    }

    /// The span of the character at `idx`, clamped to the last character. An
    /// empty input yields an empty span.
    fn span_at_index(&self, idx: usize) -> Span {
        let (start, len) = match self.buf.get(idx).or_else(|| self.buf.last()) {
            Some(tok) => (tok.pos, tok.kind.len_utf8()),
            None => (0, 0),
        };

        self.entire_span
            .subspan(u64::from(start), u64::from(start) + len as u64)
    }

    pub fn span_from(&self, start: usize) -> Span {
        let start = self.span_at_index(start);
        let end = self.prev_span();

        start.merge(end)
    }

    pub fn prev_span(&self) -> Span {
        self.span_at_index(self.cursor.saturating_sub(1))
    }

    pub fn current_span(&self) -> Span {
        self.span_at_index(self.cursor)
    }

    pub fn peek(&self) -> Option<Token> {
        self.buf.get(self.cursor).copied()
    }

    /// Peeks `n` from current peeked position without modifying cursor
    pub fn peek_n(&self, n: usize) -> Option<Token> {
        self.buf.get(self.cursor + n).copied()
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.get(self.cursor).copied().map(|tok| {
            self.cursor += 1;
            tok
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

/// Normalizes line endings while assigning byte offsets
struct TokenLexer<'a> {
    buf: Peekable<Chars<'a>>,
    cursor: u32,
}

impl<'a> TokenLexer<'a> {
    fn new(buf: Peekable<Chars<'a>>) -> TokenLexer<'a> {
        Self { buf, cursor: 0 }
    }
}

impl<'a> Iterator for TokenLexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.cursor;
        let kind = match self.buf.next()? {
            FORM_FEED => '\n',
            '\r' => {
                if self.buf.next_if_eq(&'\n').is_some() {
                    self.cursor += 1;
                }
                '\n'
            }
            c => c,
        };
        self.cursor += kind.len_utf8() as u32;
        Some(Token { pos, kind })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.buf.size_hint()
    }
}
