#[macro_use]
mod macros;

test!(
    extends_ancestor,
    ".foo .baz",
    [".bar" => ".foo"],
    ".foo .baz, .bar .baz"
);
test!(
    extends_descendant,
    ".a .b",
    [".c" => ".b"],
    ".a .b, .a .c"
);
test!(
    complex_extender_is_woven_with_ancestors,
    ".a .b",
    [".x .y" => ".b"],
    ".a .b, .a .x .y, .x .a .y"
);
test!(
    shared_ancestor_is_not_duplicated,
    ".x .a",
    [".x .b" => ".a"],
    ".x .a, .x .b"
);
test!(
    extends_child,
    ".a > .b",
    [".c" => ".b"],
    ".a > .b, .a > .c"
);
test!(
    chained_extensions,
    ".a",
    [".b" => ".a", ".c" => ".b"],
    ".a, .b, .c"
);
test!(
    every_member_of_extender_list,
    ".a",
    [".b, .c" => ".a"],
    ".a, .b, .c"
);
test!(
    only_matching_list_members_grow,
    ".a, .d",
    [".b" => ".a"],
    ".a, .b, .d"
);
test!(
    self_extension_terminates,
    ".a",
    [".a" => ".a"],
    ".a"
);
test!(
    self_extension_with_more_specific_extender,
    ".a",
    [".a.b" => ".a"],
    ".a, .a.b"
);
test!(
    element_extended_by_class,
    "a",
    [".b" => "a"],
    "a, .b"
);
test!(
    class_extended_by_element,
    ".a",
    ["b" => ".a"],
    ".a, b"
);
test!(
    remaining_simples_are_kept,
    "a.foo",
    [".bar" => ".foo"],
    "a.foo, a.bar"
);
test!(
    conflicting_ids_are_pruned,
    "#x.a",
    ["#y" => ".a"],
    "#x.a"
);
test!(
    compound_target,
    ".a.b.c",
    [".x" => ".a.b"],
    ".a.b.c, .c.x",
    sass_extend::Options::default().compound_extend(sass_extend::CompoundExtend::Allow)
);
test!(
    compound_target_needs_every_simple,
    ".a.c",
    [".x" => ".a.b !optional"],
    ".a.c",
    sass_extend::Options::default().compound_extend(sass_extend::CompoundExtend::Allow)
);
test!(
    unrelated_selectors_are_untouched,
    ".c .d",
    [".b" => ".a !optional"],
    ".c .d"
);
test!(
    optional_extend_may_fail,
    ".a",
    [".b" => ".missing !optional"],
    ".a"
);
test!(
    placeholder_is_hidden,
    "%p .x",
    [".a" => "%p"],
    ".a .x"
);
test!(
    placeholder_is_shown_when_asked,
    "%p .x",
    [".a" => "%p"],
    "%p .x, .a .x",
    sass_extend::Options::default().hide_placeholders(false)
);
test!(
    extends_inside_not,
    ":not(.a)",
    [".b" => ".a"],
    ":not(.a):not(.b)"
);
test!(
    extends_inside_matches,
    ":matches(.a)",
    [".b" => ".a"],
    ":matches(.a, .b)"
);
test!(
    no_extensions,
    ".a > .b ~ c + d",
    [],
    ".a > .b ~ c + d"
);

#[test]
fn extends_within_same_directive() {
    let options = sass_extend::Options::default();
    let mut session = sass_extend::Session::new(&options);
    let media = [sass_extend::Directive::new("@media", "screen")];

    let extender = session.parse_selector(".b").unwrap();
    session.add_extend(&extender, ".a", &media, false).unwrap();

    let selector = session.parse_selector(".a").unwrap();
    let extended = session.extend_selector(&selector, &media).unwrap();
    assert_eq!(session.serialize(&extended), ".a, .b");
    assert!(session.check_extends_fired().is_ok());
}

#[test]
fn extends_from_outer_directive() {
    let options = sass_extend::Options::default();
    let mut session = sass_extend::Session::new(&options);
    let outer = [sass_extend::Directive::new("@media", "screen")];
    let inner = [
        sass_extend::Directive::new("@media", "screen"),
        sass_extend::Directive::new("@supports", "(display: grid)"),
    ];

    let extender = session.parse_selector(".b").unwrap();
    session.add_extend(&extender, ".a", &outer, false).unwrap();

    let selector = session.parse_selector(".a").unwrap();
    let extended = session.extend_selector(&selector, &inner).unwrap();
    assert_eq!(session.serialize(&extended), ".a, .b");
}

#[test]
fn free_function_marks_extensions() {
    let options = sass_extend::Options::default();
    let mut session = sass_extend::Session::new(&options);

    let extender = session.parse_selector(".b").unwrap();
    session.add_extend(&extender, ".a", &[], false).unwrap();
    let selector = session.parse_selector(".a .c").unwrap();

    let extended = sass_extend::extend(&selector, session.index(), &[]).unwrap();
    assert_eq!(extended.members().len(), 2);
    assert!(session.index().extensions().all(|extension| extension.is_successful()));
    assert_eq!(session.index().unused().count(), 0);
}
test!(
    not_extender_keeps_overlapping_extenders,
    ".c",
    [".b" => ".c", ":not(.a)" => ".c"],
    ".c, .b, :not(.a)"
);
test!(
    not_extender_keeps_overlapping_extenders_in_context,
    ".x .c",
    [".b" => ".c", ":not(.a)" => ".c"],
    ".x .c, .x .b, .x :not(.a)"
);
