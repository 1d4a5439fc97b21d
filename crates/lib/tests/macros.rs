use std::cell::RefCell;

use sass_extend::{codemap::SpanLoc, CommaSequence, Logger, Options, Session};

/// Extends `$selector` with the `extender => target` pairs, in order, and
/// compares the serialized result
#[macro_export]
macro_rules! test {
    (@base $( #[$attr:meta] ),*$func:ident, $selector:expr, [$($extender:literal => $target:literal),* $(,)?], $output:expr, $options:expr) => {
        $(#[$attr])*
        #[test]
        #[allow(non_snake_case)]
        fn $func() {
            let css = crate::macros::extend($selector, &[$(($extender, $target)),*], &$options)
                .expect(concat!("failed to extend ", $selector));
            assert_eq!(
                String::from($output),
                css
            );
        }
    };
    ($( #[$attr:meta] ),*$func:ident, $selector:expr, [$($extender:literal => $target:literal),* $(,)?], $output:expr, $options:expr) => {
        test!(@base $(#[$attr])* $func, $selector, [$($extender => $target),*], $output, $options);
    };
    ($( #[$attr:meta] ),*$func:ident, $selector:expr, [$($extender:literal => $target:literal),* $(,)?], $output:expr) => {
        test!(@base $(#[$attr])* $func, $selector, [$($extender => $target),*], $output, sass_extend::Options::default());
    };
}

/// Verify the error *message*
/// Only the first line is compared; the source excerpt is not tested
#[macro_export]
macro_rules! error {
    (@base $( #[$attr:meta] ),*$func:ident, $selector:expr, [$($extender:literal => $target:literal),* $(,)?], $err:expr, $options:expr) => {
        $(#[$attr])*
        #[test]
        #[allow(non_snake_case)]
        fn $func() {
            match crate::macros::extend($selector, &[$(($extender, $target)),*], &$options) {
                Ok(..) => panic!("did not fail"),
                Err(e) => assert_eq!($err, e.to_string()
                                                .chars()
                                                .take_while(|c| *c != '\n')
                                                .collect::<String>()
                                                .as_str()
                ),
            }
        }
    };
    ($( #[$attr:meta] ),*$func:ident, $selector:expr, [$($extender:literal => $target:literal),* $(,)?], $err:expr) => {
        error!(@base $(#[$attr])* $func, $selector, [$($extender => $target),*], $err, sass_extend::Options::default());
    };
    ($( #[$attr:meta] ),*$func:ident, $selector:expr, [$($extender:literal => $target:literal),* $(,)?], $err:expr, $options:expr) => {
        error!(@base $(#[$attr])* $func, $selector, [$($extender => $target),*], $err, $options);
    };
}

/// Runs a whole session: registers every extension, extends `selector`,
/// checks that mandatory extensions matched and serializes the result
#[allow(unused)]
pub fn extend(
    selector: &str,
    extends: &[(&str, &str)],
    options: &Options,
) -> sass_extend::Result<String> {
    let mut session = Session::new(options);

    for (extender, target) in extends {
        let extender = session.parse_selector(extender)?;
        session.add_extend(&extender, target, &[], false)?;
    }

    let selector = session.parse_selector(selector)?;
    let extended = session.extend_selector(&selector, &[])?;
    session.check_extends_fired()?;

    Ok(session.serialize(&extended))
}

#[allow(unused)]
pub fn parse(text: &str) -> CommaSequence {
    let options = Options::default();
    Session::new(&options)
        .parse_selector(text)
        .expect(text)
}

#[derive(Debug, Default)]
struct TestLoggerState {
    debug_messages: Vec<String>,
    warning_messages: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TestLogger(RefCell<TestLoggerState>);

#[allow(unused)]
impl TestLogger {
    pub fn debug_messages(&self) -> Vec<String> {
        self.0.borrow().debug_messages.clone()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.0.borrow().warning_messages.clone()
    }
}

impl Logger for TestLogger {
    fn debug(&self, _location: SpanLoc, message: &str) {
        self.0.borrow_mut().debug_messages.push(message.into());
    }

    fn warning(&self, _location: SpanLoc, message: &str) {
        self.0.borrow_mut().warning_messages.push(message.into());
    }
}
