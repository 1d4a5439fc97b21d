use macros::parse;
use sass_extend::sass_selector::Specificity;

#[macro_use]
mod macros;

#[test]
fn superselector_is_reflexive() {
    for text in [
        ".a",
        "a.b#c",
        ".a .b > .c ~ d + e",
        ":not(.a)",
        ":matches(.a, .b) .c",
        "[href^=http]::before",
        ".a, .b .c",
    ] {
        let selector = parse(text);
        assert!(selector.is_superselector(&selector), "{}", text);
    }
}

#[test]
fn superselector_of_descendants() {
    assert!(parse(".b").is_superselector(&parse(".a .b")));
    assert!(parse(".a .c").is_superselector(&parse(".a .b .c")));
    assert!(parse(".a .b").is_superselector(&parse(".a > .b")));
    assert!(!parse(".a > .b").is_superselector(&parse(".a .b")));
    assert!(!parse(".a .b").is_superselector(&parse(".b")));
}

#[test]
fn not_is_superselector_of_other_classes() {
    assert!(!parse(":not(.a)").is_superselector(&parse(".a")));
    assert!(parse(":not(.a)").is_superselector(&parse(".b")));
}

#[test]
fn unified_is_subselector_of_both() {
    for (first, second) in [
        (".a .b", ".c .d"),
        ("a.x", ".y"),
        (":not(.a)", ".b"),
        (".a", ".a.b"),
    ] {
        let first = parse(first);
        let second = parse(second);
        let unified = first.unify(&second).unwrap();

        assert!(first.is_superselector(&unified), "{}", unified);
        assert!(second.is_superselector(&unified), "{}", unified);
    }
}

#[test]
fn unify_output() {
    assert_eq!(parse("a.x").unify(&parse(".y")).unwrap().to_string(), "a.x.y");
    assert_eq!(
        parse(".a .b").unify(&parse(".c .d")).unwrap().to_string(),
        ".a .c .b.d, .c .a .b.d"
    );
}

#[test]
fn distinct_ids_do_not_unify() {
    assert!(parse("#a").unify(&parse("#b")).is_none());
    assert!(parse("a").unify(&parse("b")).is_none());
    assert!(parse("::before").unify(&parse("::after")).is_none());
}

#[test]
fn specificity() {
    let specificity = |text: &str| parse(text).members()[0].specificity();

    assert_eq!(specificity("*"), Specificity::exact(0));
    assert_eq!(specificity("#a .b c"), Specificity::exact(1_001_001));
    assert_eq!(specificity("a:hover::before"), Specificity::exact(1_002));
    assert_eq!(
        specificity(":matches(.a, #b)"),
        Specificity::new(1_000, 1_000_000)
    );
}

#[test]
fn resolves_parent_references() {
    let options = sass_extend::Options::default();
    let mut session = sass_extend::Session::new(&options);
    let parent = session.parse_selector(".a .b").unwrap();

    let child = session.parse_selector("&:hover, .x &").unwrap();
    let resolved = session
        .resolve_parent_refs(&child, Some(&parent), true)
        .unwrap();
    assert_eq!(session.serialize(&resolved), ".a .b:hover, .x .a .b");

    let implicit = session.parse_selector(".c").unwrap();
    let parents = session.parse_selector(".p, .q").unwrap();
    let resolved = session
        .resolve_parent_refs(&implicit, Some(&parents), true)
        .unwrap();
    assert_eq!(session.serialize(&resolved), ".p .c, .q .c");

    let suffixed = session.parse_selector("&-x").unwrap();
    let resolved = session
        .resolve_parent_refs(&suffixed, Some(&parse(".p")), true)
        .unwrap();
    assert_eq!(session.serialize(&resolved), ".p-x");
}

#[test]
fn subjectless() {
    let selector = parse(".a! > .b");
    assert_eq!(selector.members()[0].subjectless().to_string(), ".a:has(> .b)");
}
