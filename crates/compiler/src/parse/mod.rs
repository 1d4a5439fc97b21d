pub(crate) use base::BaseParser;

mod base;
