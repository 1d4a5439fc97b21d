use sass_extend::{Options, OutputStyle};

#[macro_use]
mod macros;

test!(
    no_space_around_combinators,
    ".a > .b",
    [".c" => ".b"],
    ".a>.b,.a>.c",
    Options::default().style(OutputStyle::Compressed)
);
test!(
    descendants_keep_one_space,
    ".foo .baz",
    [".bar" => ".foo"],
    ".foo .baz,.bar .baz",
    Options::default().style(OutputStyle::Compressed)
);
test!(
    line_breaks_are_dropped,
    ".a,\n.b",
    [],
    ".a,.b",
    Options::default().style(OutputStyle::Compressed)
);
test!(
    line_breaks_are_kept_when_expanded,
    ".a,\n.b",
    [],
    ".a,\n.b"
);
test!(
    selector_arguments,
    ":not(.a)",
    [".b, .c" => ".a"],
    ":not(.a):not(.b):not(.c)",
    Options::default().style(OutputStyle::Compressed)
);
