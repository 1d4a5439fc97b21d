pub(crate) use strings::{is_ident, write_quoted};

mod strings;

pub(crate) fn is_name(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

pub(crate) fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic() || c as u32 >= 0x0080
}

pub(crate) fn as_hex(c: char) -> u32 {
    c.to_digit(16).unwrap_or(0)
}

pub(crate) fn hex_char_for(number: u32) -> char {
    debug_assert!(number < 0x10);
    std::char::from_digit(number, 16).unwrap_or('0')
}

pub(crate) fn opposite_bracket(b: char) -> char {
    debug_assert!(matches!(b, '(' | '[' | ')' | ']'));
    match b {
        '(' => ')',
        '[' => ']',
        ')' => '(',
        _ => '[',
    }
}

/// Strips a vendor prefix such as `-webkit-` from a pseudo selector name
pub(crate) fn unvendor(name: &str) -> &str {
    let bytes = name.as_bytes();

    if bytes.len() < 2 || bytes[0] != b'-' || bytes[1] == b'-' {
        return name;
    }

    match name[2..].find('-') {
        Some(idx) => &name[idx + 3..],
        None => name,
    }
}

/// Whether `needle` appears in `haystack` in order, not necessarily contiguously
pub(crate) fn is_subsequence<T: PartialEq>(needle: &[T], haystack: &[T]) -> bool {
    let mut haystack = haystack.iter();
    needle.iter().all(|item| haystack.any(|other| other == item))
}
