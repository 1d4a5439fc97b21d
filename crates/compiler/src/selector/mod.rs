pub use attribute::{Attribute, AttributeOp};
pub use common::*;
pub use complex::*;
pub use compound::*;
pub use extend::*;
pub use list::*;
pub(crate) use parse::SelectorParser;
pub use simple::*;

mod attribute;
mod common;
mod complex;
mod compound;
mod extend;
mod list;
mod parse;
mod simple;

#[cfg(test)]
pub(crate) fn try_parse_for_tests(text: &str) -> crate::error::SassResult<CommaSequence> {
    let mut map = codemap::CodeMap::new();
    let file = map.add_file("test.scss".to_owned(), text.to_owned());
    SelectorParser::new(crate::lexer::Lexer::new_from_file(&file), true, true).parse()
}

#[cfg(test)]
pub(crate) fn parse_for_tests(text: &str) -> CommaSequence {
    try_parse_for_tests(text).unwrap()
}
