use std::fmt::{self, Display, Write};

use crate::utils::{is_ident, write_quoted};

use super::QualifiedName;

/// `[name op value modifier]`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: QualifiedName,
    pub op: AttributeOp,
    /// The unquoted value; empty for [`AttributeOp::Any`]
    pub value: String,
    pub modifier: Option<char>,
}

impl Attribute {
    pub(crate) fn write(&self, buffer: &mut String) {
        buffer.push('[');
        // writing to a `String` cannot fail
        let _ = write!(buffer, "{}", self.name);

        if self.op != AttributeOp::Any {
            buffer.push_str(self.op.as_str());
            if is_ident(&self.value) && !self.value.starts_with("--") {
                buffer.push_str(&self.value);
            } else {
                write_quoted(&self.value, buffer);
            }

            if let Some(c) = self.modifier {
                buffer.push(' ');
                buffer.push(c);
            }
        }

        buffer.push(']');
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        self.write(&mut buffer);
        f.write_str(&buffer)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttributeOp {
    /// `[attr]`
    Any,

    /// `[attr=value]`
    Equals,

    /// `[attr~=value]`
    ///
    /// The value is a whitespace-separated list of words, one of which is
    /// exactly `value`
    Include,

    /// `[attr|=value]`
    ///
    /// The value is exactly `value` or begins with `value-`
    Dash,

    /// `[attr^=value]`
    Prefix,

    /// `[attr$=value]`
    Suffix,

    /// `[attr*=value]`
    Contains,
}

impl AttributeOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            AttributeOp::Any => "",
            AttributeOp::Equals => "=",
            AttributeOp::Include => "~=",
            AttributeOp::Dash => "|=",
            AttributeOp::Prefix => "^=",
            AttributeOp::Suffix => "$=",
            AttributeOp::Contains => "*=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Namespace;

    #[test]
    fn quotes_only_non_identifiers() {
        let mut attr = Attribute {
            name: QualifiedName::new("href", Namespace::None),
            op: AttributeOp::Prefix,
            value: "http".to_owned(),
            modifier: None,
        };
        assert_eq!(attr.to_string(), "[href^=http]");

        attr.value = "http://".to_owned();
        attr.modifier = Some('i');
        assert_eq!(attr.to_string(), "[href^=\"http://\" i]");
    }
}
