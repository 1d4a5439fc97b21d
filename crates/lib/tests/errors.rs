use sass_extend::{CompoundExtend, Directive, ErrorKind, Options, Session};

#[macro_use]
mod macros;

error!(
    mandatory_extend_must_match,
    ".a",
    [".b" => ".missing"],
    "Error: \".b\" failed to @extend \".missing\"."
);
error!(
    nested_target,
    ".x",
    [".b" => ".a .c"],
    "Error: Can't extend .a .c: can't extend nested selectors"
);
error!(
    combinator_target,
    ".x",
    [".b" => "> .a"],
    "Error: Can't extend > .a: can't extend nested selectors"
);
error!(
    parent_target,
    ".x",
    [".b" => "&"],
    "Error: Can't extend &: can't extend parent selectors"
);
error!(
    compound_target_denied,
    ".a.b",
    [".x" => ".a.b"],
    "Error: Can't extend .a.b: compound selectors may not be extended.",
    Options::default().compound_extend(CompoundExtend::Deny)
);
error!(
    extender_ends_in_combinator,
    ".a",
    [".b >" => ".a"],
    "Error: .b > can't extend: invalid selector"
);
error!(
    unterminated_pseudo,
    ":not(.a",
    [],
    "Error: expected \")\"."
);
error!(
    trailing_garbage,
    "a{",
    [],
    "Error: expected selector."
);

#[test]
fn extend_from_inner_directive() {
    let options = Options::default();
    let mut session = Session::new(&options);

    let extender = session.parse_selector(".b").unwrap();
    session
        .add_extend(&extender, ".a", &[Directive::new("@media", "print")], false)
        .unwrap();

    let selector = session.parse_selector(".a").unwrap();
    let err = session.extend_selector(&selector, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CrossDirectiveExtend);
    assert_eq!(
        err.message(),
        "You may not @extend an outer selector from within @media.\n\
         You may only @extend selectors within the same directive.\n\
         From \"@extend .a\"."
    );
}

#[test]
fn extend_from_sibling_directive() {
    let options = Options::default();
    let mut session = Session::new(&options);

    let extender = session.parse_selector(".b").unwrap();
    session
        .add_extend(&extender, ".a", &[Directive::new("@media", "print")], false)
        .unwrap();

    let selector = session.parse_selector(".a").unwrap();
    let err = session
        .extend_selector(&selector, &[Directive::new("@media", "screen")])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CrossDirectiveExtend);
}

#[test]
fn parent_without_parent() {
    let options = Options::default();
    let mut session = Session::new(&options);

    let selector = session.parse_selector(".a &").unwrap();
    let err = session
        .resolve_parent_refs(&selector, None, true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParentSelector);
    assert_eq!(
        err.message(),
        "Base-level rules cannot contain the parent-selector-referencing character '&'."
    );
}

#[test]
fn errors_are_located() {
    let options = Options::default().unicode_error_messages(false);
    let mut session = Session::new(&options);

    let err = session.parse_selector("a{").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.line_col(), Some((1, 2)));
    assert_eq!(
        err.to_string(),
        "Error: expected selector.\n  ,\n1 | a{\n  |  ^\n  '\n  ./stdin:1:2"
    );
}

#[test]
fn unmatched_extend_points_at_target() {
    let options = Options::default();
    let mut session = Session::new(&options);

    let extender = session.parse_selector(".b").unwrap();
    session.add_extend(&extender, ".missing", &[], false).unwrap();

    let err = session.check_extends_fired().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExtendTargetNotFound);
    assert_eq!(err.line_col(), Some((1, 1)));
}
