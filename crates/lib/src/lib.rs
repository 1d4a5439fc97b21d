/*!
This crate resolves Sass's [`@extend`](https://sass-lang.com/documentation/at-rules/extend)
at the selector level.

Given the `@extend` directives of a stylesheet, it computes every selector a
rule must be emitted with so that elements matching the extended selector
also get the extender's styles, leaving out alternatives that are redundant.

## Use as library
```
fn main() -> Result<(), Box<sass_extend::Error>> {
    let options = sass_extend::Options::default();
    let mut session = sass_extend::Session::new(&options);

    // .foo .baz { ... }
    // .bar { @extend .foo; }
    let extender = session.parse_selector(".bar")?;
    session.add_extend(&extender, ".foo", &[], false)?;

    let selector = session.parse_selector(".foo .baz")?;
    let extended = session.extend_selector(&selector, &[])?;
    session.check_extends_fired()?;

    assert_eq!(session.serialize(&extended), ".foo .baz, .bar .baz");
    Ok(())
}
```
*/

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::dbg_macro)]
#![deny(missing_debug_implementations)]
#![allow(
    clippy::use_self,
    clippy::missing_docs_in_private_items,
    clippy::module_name_repetitions,
    renamed_and_removed_lints,
    clippy::unknown_clippy_lints,
    clippy::missing_errors_doc,
    clippy::multiple_crate_versions,
    clippy::uninlined_format_args,
    unknown_lints,
)]

pub use sass_extend_compiler::*;
