/*!
This crate implements Sass's `@extend`: given the selectors of a stylesheet
and the `@extend` directives found in it, it computes the selectors each rule
must be emitted with.

Selectors are unified (intersected), woven (interleaved while preserving the
order their combinators imply) and trimmed, so that redundant alternatives
are left out of the output.

## Use as library
```
# use sass_extend_compiler as sass_extend;
fn main() -> Result<(), Box<sass_extend::Error>> {
    let options = sass_extend::Options::default()
        .style(sass_extend::OutputStyle::Compressed);
    let mut session = sass_extend::Session::new(&options);

    // .a .b { ... }
    // .c { @extend .b; }
    let extender = session.parse_selector(".c")?;
    session.add_extend(&extender, ".b", &[], false)?;

    let selector = session.parse_selector(".a .b")?;
    let extended = session.extend_selector(&selector, &[])?;
    assert_eq!(session.serialize(&extended), ".a .b,.a .c");
    Ok(())
}
```
*/

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::dbg_macro)]
#![deny(missing_debug_implementations)]
#![allow(
    clippy::use_self,
    // filter isn't fallible
    clippy::manual_filter_map,
    renamed_and_removed_lints,
    clippy::unknown_clippy_lints,
    clippy::single_match,
    clippy::new_without_default,
    clippy::single_match_else,
    clippy::multiple_crate_versions,
    clippy::wrong_self_convention,
    clippy::comparison_chain,
    clippy::unwrap_or_default,
    clippy::mutable_key_type,
    unknown_lints,
)]

pub use crate::error::{ErrorKind, SassError as Error, SassResult as Result};
pub use crate::logger::{Diagnostic, DiagnosticKind, Logger, NullLogger, StdLogger};
pub use crate::options::{CompoundExtend, Options, OutputStyle, DEFAULT_TRIM_THRESHOLD};
pub use crate::selector::{CommaSequence, Directive, ExtendIndex, Extension};
pub use crate::session::Session;

/// The selector AST
pub mod sass_selector {
    pub use crate::selector::{
        Attribute, AttributeOp, Combinator, CommaSequence, Namespace, Pseudo, QualifiedName,
        Sequence, SequenceComponent, SimpleSelector, SimpleSequence, Specificity,
    };
}

pub use codemap;

mod error;
mod interner;
mod lexer;
mod logger;
mod options;
mod parse;
mod selector;
mod serializer;
mod session;
mod utils;

/// Extends `selector`, which is enclosed by `directives`, with every
/// extension in `index`
///
/// Every extension that matched is marked as such, so that
/// [`ExtendIndex::check_extends_fired`] can be called once all selectors have
/// been extended.
#[inline]
pub fn extend(
    selector: &CommaSequence,
    index: &ExtendIndex,
    directives: &[Directive],
) -> Result<CommaSequence> {
    index.extend(selector, directives)
}
