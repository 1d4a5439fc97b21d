use super::{is_name, is_name_start};

pub(crate) fn is_ident(s: &str) -> bool {
    let s = s.strip_prefix("--").or_else(|| s.strip_prefix('-')).unwrap_or(s);
    let mut chars = s.chars().peekable();
    match chars.next() {
        Some('\\') => {}
        Some(c) if is_name_start(c) => {}
        Some(..) | None => return false,
    }
    while let Some(c) = chars.next() {
        if c == '\\' {
            for _ in 0..6 {
                match chars.peek() {
                    Some(next) if next.is_ascii_hexdigit() => {
                        chars.next();
                    }
                    Some(..) => break,
                    None => return true,
                }
            }
            if let Some(c) = chars.peek() {
                if c.is_whitespace() {
                    chars.next();
                }
            }
            continue;
        }
        if !is_name(c) {
            return false;
        }
    }
    true
}

/// Writes `s` as a CSS string, preferring double quotes
pub(crate) fn write_quoted(s: &str, buffer: &mut String) {
    let quote = if s.contains('"') && !s.contains('\'') {
        '\''
    } else {
        '"'
    };

    buffer.push(quote);
    for c in s.chars() {
        match c {
            '\n' => buffer.push_str("\\a "),
            '\\' => buffer.push_str("\\\\"),
            c if c == quote => {
                buffer.push('\\');
                buffer.push(c);
            }
            c => buffer.push(c),
        }
    }
    buffer.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_ident("foo"));
        assert!(is_ident("-foo"));
        assert!(is_ident("--foo"));
        assert!(is_ident("f\\6f o"));
        assert!(!is_ident("1foo"));
        assert!(!is_ident("foo bar"));
        assert!(!is_ident(""));
    }

    #[test]
    fn quoting() {
        let mut buffer = String::new();
        write_quoted("a\"b", &mut buffer);
        assert_eq!(buffer, "'a\"b'");

        buffer.clear();
        write_quoted("a'b\"", &mut buffer);
        assert_eq!(buffer, "\"a'b\\\"\"");
    }
}
