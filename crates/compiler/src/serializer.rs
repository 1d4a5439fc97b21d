use crate::{
    selector::{
        Combinator, CommaSequence, Namespace, Pseudo, Sequence, SequenceComponent, SimpleSelector,
        SimpleSequence,
    },
    Options,
};

/// Writes selectors back out as text
#[derive(Debug, Clone, Copy)]
pub(crate) struct Serializer {
    compressed: bool,
    hide_placeholders: bool,
}

impl Serializer {
    pub fn new(options: &Options) -> Self {
        Self {
            compressed: options.is_compressed(),
            hide_placeholders: options.hide_placeholders,
        }
    }

    /// Expanded output that keeps every alternative, used for `Display`
    pub const fn inspect() -> Self {
        Self {
            compressed: false,
            hide_placeholders: false,
        }
    }

    pub fn serialize(self, list: &CommaSequence) -> String {
        let mut buffer = String::new();
        self.write_comma_sequence(list, &mut buffer);
        buffer
    }

    fn write_namespace(self, namespace: &Namespace, buffer: &mut String) {
        match namespace {
            Namespace::Empty => buffer.push('|'),
            Namespace::Asterisk => buffer.push_str("*|"),
            Namespace::Other(namespace) => {
                buffer.push_str(namespace.resolve_ref());
                buffer.push('|');
            }
            Namespace::None => {}
        }
    }

    fn write_pseudo(self, pseudo: &Pseudo, buffer: &mut String) {
        if let Some(selector) = &pseudo.selector {
            if self.hide_placeholders
                && pseudo.normalized_name() == "not"
                && selector.is_invisible()
            {
                return;
            }
        }

        buffer.push(':');

        if !pseudo.is_syntactic_class {
            buffer.push(':');
        }

        buffer.push_str(pseudo.name.resolve_ref());

        if pseudo.argument.is_none() && pseudo.selector.is_none() {
            return;
        }

        buffer.push('(');
        if let Some(argument) = &pseudo.argument {
            buffer.push_str(argument);
            if pseudo.selector.is_some() {
                buffer.push(' ');
            }
        }

        if let Some(selector) = &pseudo.selector {
            self.write_comma_sequence(selector, buffer);
        }

        buffer.push(')');
    }

    pub fn write_simple(self, simple: &SimpleSelector, buffer: &mut String) {
        match simple {
            SimpleSelector::Id(name) => {
                buffer.push('#');
                buffer.push_str(name.resolve_ref());
            }
            SimpleSelector::Class(name) => {
                buffer.push('.');
                buffer.push_str(name.resolve_ref());
            }
            SimpleSelector::Placeholder(name) => {
                buffer.push('%');
                buffer.push_str(name.resolve_ref());
            }
            SimpleSelector::Universal(namespace) => {
                self.write_namespace(namespace, buffer);
                buffer.push('*');
            }
            SimpleSelector::Element(name) => {
                self.write_namespace(&name.namespace, buffer);
                buffer.push_str(name.ident.resolve_ref());
            }
            SimpleSelector::Parent(suffix) => {
                buffer.push('&');
                if let Some(suffix) = suffix {
                    buffer.push_str(suffix);
                }
            }
            SimpleSelector::Attribute(attribute) => attribute.write(buffer),
            SimpleSelector::Pseudo(pseudo) => self.write_pseudo(pseudo, buffer),
        }
    }

    pub fn write_simple_sequence(self, compound: &SimpleSequence, buffer: &mut String) {
        let len = buffer.len();

        for simple in compound.members() {
            self.write_simple(simple, buffer);
        }

        // every member was left out, which only happens for selectors that
        // match everything
        if buffer.len() == len {
            buffer.push('*');
        }

        if compound.is_subject() {
            buffer.push('!');
        }
    }

    fn write_combinator(self, combinator: Combinator, buffer: &mut String) {
        buffer.push(match combinator {
            Combinator::Child => '>',
            Combinator::NextSibling => '+',
            Combinator::FollowingSibling => '~',
        });
    }

    /// Whether no space is needed between `component` and its neighbours
    fn omit_spaces_around(self, component: &SequenceComponent) -> bool {
        match component {
            SequenceComponent::Newline => true,
            SequenceComponent::Combinator(..) => self.compressed,
            SequenceComponent::Compound(..) => false,
        }
    }

    pub fn write_sequence(self, seq: &Sequence, buffer: &mut String) {
        let mut last: Option<&SequenceComponent> = None;

        let components = seq
            .members()
            .iter()
            .skip_while(|component| component.is_newline())
            .filter(|component| !(self.compressed && component.is_newline()));

        for component in components {
            if let Some(last) = last {
                if !self.omit_spaces_around(last) && !self.omit_spaces_around(component) {
                    buffer.push(' ');
                }
            }

            match component {
                SequenceComponent::Compound(compound) => {
                    self.write_simple_sequence(compound, buffer);
                }
                SequenceComponent::Combinator(combinator) => {
                    self.write_combinator(*combinator, buffer);
                }
                SequenceComponent::Newline => buffer.push('\n'),
            }

            last = Some(component);
        }
    }

    pub fn write_comma_sequence(self, list: &CommaSequence, buffer: &mut String) {
        let members = list
            .members()
            .iter()
            .filter(|seq| !(self.hide_placeholders && seq.is_invisible()));

        let mut first = true;

        for seq in members {
            if first {
                first = false;
            } else {
                buffer.push(',');
                if !self.compressed {
                    let line_break = matches!(seq.members().first(), Some(SequenceComponent::Newline));
                    buffer.push(if line_break { '\n' } else { ' ' });
                }
            }

            self.write_sequence(seq, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{selector::parse_for_tests, OutputStyle};

    use super::*;

    fn serialize(text: &str, options: &Options) -> String {
        Serializer::new(options).serialize(&parse_for_tests(text))
    }

    #[test]
    fn expanded_output() {
        let options = Options::default();
        assert_eq!(serialize(".a  >  .b,   c ~ d", &options), ".a > .b, c ~ d");
        assert_eq!(serialize(".a,\n.b", &options), ".a,\n.b");
    }

    #[test]
    fn compressed_output() {
        let options = Options::default().style(OutputStyle::Compressed);
        assert_eq!(serialize(".a > .b, c ~ d", &options), ".a>.b,c~d");
        assert_eq!(serialize(".a,\n.b\n.c", &options), ".a,.b .c");
        assert_eq!(serialize(":not(.a, .b)", &options), ":not(.a,.b)");
    }

    #[test]
    fn placeholders_are_hidden() {
        let options = Options::default();
        assert_eq!(serialize("%a, .b, .c %d", &options), ".b");
        assert_eq!(serialize(".b:not(%a)", &options), ".b");
        assert_eq!(serialize(".b:-moz-not(%a)", &options), ".b");

        let shown = Options::default().hide_placeholders(false);
        assert_eq!(serialize("%a, .b", &shown), "%a, .b");
    }

    #[test]
    fn inspect_keeps_everything() {
        let list = parse_for_tests("%a, .b! > &-c");
        let mut buffer = String::new();
        Serializer::inspect().write_comma_sequence(&list, &mut buffer);
        assert_eq!(buffer, "%a, .b! > &-c");
    }

    #[test]
    fn empty_compound_is_universal() {
        let compound = SimpleSequence::new(Vec::new(), false);
        let mut buffer = String::new();
        Serializer::inspect().write_simple_sequence(&compound, &mut buffer);
        assert_eq!(buffer, "*");
    }
}
