use std::{
    borrow::Cow,
    collections::hash_map::DefaultHasher,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use indexmap::IndexSet;
use once_cell::sync::OnceCell;

use crate::error::{ErrorKind, SassError, SassResult};

use super::{
    paths, trim, weave, CommaSequence, Directive, ExtendIndex, NotRule, Pseudo, Seen,
    SimpleSelector, SimpleSequence, Specificity,
};

/// A complex selector: compounds joined by combinators, such as `a > .b ~ .c`
///
/// Adjacent compounds are joined by the descendant combinator.
#[derive(Clone, Debug)]
pub struct Sequence {
    members: Vec<SequenceComponent>,
    hash: OnceCell<u64>,
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.cached_hash() == other.cached_hash()
            && self.visible_members().eq(other.visible_members())
    }
}

impl Eq for Sequence {}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.cached_hash());
    }
}

impl Sequence {
    pub fn new(members: Vec<SequenceComponent>) -> Self {
        Self {
            members,
            hash: OnceCell::new(),
        }
    }

    pub fn members(&self) -> &[SequenceComponent] {
        &self.members
    }

    pub(crate) fn into_members(self) -> Vec<SequenceComponent> {
        self.members
    }

    /// Members other than line breaks
    fn visible_members(&self) -> impl Iterator<Item = &SequenceComponent> {
        self.members.iter().filter(|c| !c.is_newline())
    }

    fn compounds(&self) -> impl Iterator<Item = &SimpleSequence> {
        self.members.iter().filter_map(SequenceComponent::as_compound)
    }

    pub fn last_compound(&self) -> Option<&SimpleSequence> {
        self.visible_members().last().and_then(SequenceComponent::as_compound)
    }

    /// The only compound of this sequence, if it has no combinators
    pub fn single_compound(&self) -> Option<&SimpleSequence> {
        let mut members = self.visible_members();
        match (members.next(), members.next()) {
            (Some(SequenceComponent::Compound(compound)), None) => Some(compound),
            _ => None,
        }
    }

    pub fn specificity(&self) -> Specificity {
        self.compounds().map(SimpleSequence::specificity).sum()
    }

    /// Whether this sequence contains a placeholder, and so would never appear
    /// in CSS output
    pub fn is_invisible(&self) -> bool {
        self.compounds().any(SimpleSequence::is_invisible)
    }

    pub fn contains_parent_ref(&self) -> bool {
        self.compounds().any(SimpleSequence::contains_parent_ref)
    }

    /// Returns a copy whose compounds all also have `sources` as sources
    #[must_use]
    pub(crate) fn add_sources(&self, sources: &IndexSet<Sequence>) -> Sequence {
        if sources.is_empty() {
            return self.clone();
        }

        Sequence::new(
            self.members
                .iter()
                .map(|component| match component {
                    SequenceComponent::Compound(compound) => {
                        SequenceComponent::Compound(compound.with_more_sources(sources))
                    }
                    other => other.clone(),
                })
                .collect(),
        )
    }

    /// The highest specificity among the extenders that produced this sequence
    pub(crate) fn max_source_specificity(&self) -> i32 {
        self.compounds()
            .flat_map(|compound| compound.sources().iter())
            .map(|source| source.specificity().max)
            .max()
            .unwrap_or(0)
    }

    /// Returns the sequences this sequence should be replaced with. The first
    /// is the sequence itself unless `replace` is set.
    ///
    /// `original` marks a sequence that was written by the user rather than
    /// produced by an earlier extension.
    pub(crate) fn do_extend(
        &self,
        index: &ExtendIndex,
        directives: &[Directive],
        replace: bool,
        seen: &Seen,
        original: bool,
    ) -> SassResult<Vec<Sequence>> {
        let mut choices: Vec<Vec<Vec<SequenceComponent>>> = Vec::with_capacity(self.members.len());
        let visible = !self.is_invisible();

        for component in &self.members {
            let compound = match component {
                SequenceComponent::Compound(compound) => compound,
                other => {
                    choices.push(vec![vec![other.clone()]]);
                    continue;
                }
            };

            let mut extended = compound.do_extend(index, directives, replace, seen)?;
            if original && visible {
                if let Some(first) = extended.first_mut() {
                    let mut sources = IndexSet::with_capacity(1);
                    sources.insert(self.clone());
                    *first = first.add_sources(&sources);
                }
            }

            choices.push(extended.into_iter().map(Sequence::into_members).collect());
        }

        let woven: Vec<Vec<Sequence>> = paths(choices)
            .into_iter()
            .map(|path| weave(path).into_iter().map(Sequence::new).collect())
            .collect();

        // the untouched input is the first alternative of the first path
        let protected = if original && !replace {
            woven.first().and_then(|group| group.first()).cloned()
        } else {
            None
        };

        Ok(trim(woven, index.trim_threshold(), protected.as_ref()))
    }

    /// Returns whether `self` matches every element `other` matches
    pub fn is_superselector(&self, other: &Sequence) -> bool {
        components_are_superselector(&self.members, &other.members, NotRule::Loose)
    }

    /// Returns selectors matching only elements matched by both `self` and
    /// `other`, or `None` if there are none.
    pub fn unify(&self, other: &Sequence) -> Option<CommaSequence> {
        let (base, prefix) = match self.members.split_last() {
            Some((SequenceComponent::Compound(base), prefix)) => (base, prefix),
            _ => return None,
        };
        let (other_base, other_prefix) = match other.members.split_last() {
            Some((SequenceComponent::Compound(base), prefix)) => (base, prefix),
            _ => return None,
        };

        let unified = other_base.unify(base)?;

        let mut other_group = other_prefix.to_vec();
        other_group.push(SequenceComponent::Compound(unified));

        let woven = weave(vec![prefix.to_vec(), other_group]);
        if woven.is_empty() {
            return None;
        }

        Some(CommaSequence::new(
            woven.into_iter().map(Sequence::new).collect(),
            None,
        ))
    }

    /// Moves a `!` subject marker into a `:has()` pseudo-class: `.a! .b`
    /// becomes `.a:has(.b)`
    #[must_use]
    pub fn subjectless(&self) -> Sequence {
        let idx = match self.members.iter().position(|component| {
            component
                .as_compound()
                .map_or(false, SimpleSequence::is_subject)
        }) {
            Some(idx) => idx,
            None => return self.clone(),
        };

        let subject = match &self.members[idx] {
            SequenceComponent::Compound(compound) => compound,
            _ => return self.clone(),
        };

        let mut members = subject.members().to_vec();
        let has = &self.members[idx + 1..];
        if !has.is_empty() {
            members.push(SimpleSelector::Pseudo(Pseudo::new(
                "has",
                true,
                None,
                Some(CommaSequence::new(vec![Sequence::new(has.to_vec())], None)),
            )));
        }

        let mut result = self.members[..idx].to_vec();
        result.push(SequenceComponent::Compound(
            SimpleSequence::new(members, false).with_span(subject.span()),
        ));

        Sequence::new(result)
    }

    /// Replaces each `&` in this sequence with `parent`. If the sequence has no
    /// `&` and `implicit_parent` is set, `parent` is prepended as an ancestor.
    pub(crate) fn resolve_parent_refs(
        &self,
        parent: &CommaSequence,
        implicit_parent: bool,
    ) -> SassResult<CommaSequence> {
        let contains_parent_ref = self.contains_parent_ref();
        if !implicit_parent && !contains_parent_ref {
            return Ok(CommaSequence::new(vec![self.clone()], parent.span()));
        }

        let mut members = self.members.clone();
        let leading_newline = matches!(members.first(), Some(SequenceComponent::Newline));
        if leading_newline {
            members.remove(0);
        }

        if !contains_parent_ref {
            members.insert(
                0,
                SequenceComponent::Compound(SimpleSequence::new(
                    vec![SimpleSelector::Parent(None)],
                    false,
                )),
            );
        }

        let mut choices: Vec<Vec<Vec<SequenceComponent>>> = Vec::with_capacity(members.len());
        for component in &members {
            match component {
                SequenceComponent::Compound(compound) => choices.push(
                    compound
                        .resolve_parent_refs(parent)?
                        .into_members()
                        .into_iter()
                        .map(Sequence::into_members)
                        .collect(),
                ),
                other => choices.push(vec![vec![other.clone()]]),
            }
        }

        let resolved = paths(choices)
            .into_iter()
            .map(|path| {
                let mut components: Vec<SequenceComponent> = path.into_iter().flatten().collect();
                if leading_newline {
                    components.insert(0, SequenceComponent::Newline);
                }
                Sequence::new(components)
            })
            .collect();

        Ok(CommaSequence::new(resolved, parent.span()))
    }

    fn cached_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            for component in self.visible_members() {
                component.hash(&mut hasher);
            }
            hasher.finish()
        })
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        crate::serializer::Serializer::inspect().write_sequence(self, &mut buffer);
        f.write_str(&buffer)
    }
}

/// Builds the error for a parent selector that can't be combined with `&`
pub(crate) fn invalid_parent(
    child: &SimpleSequence,
    parent: &Sequence,
) -> Box<SassError> {
    SassError::new(
        ErrorKind::InvalidParentSelector,
        format!("Invalid parent selector for \"{}\": \"{}\"", child, parent),
        child.span(),
    )
}

/// Returns whether `seq1` matches every element `seq2` matches. Line breaks
/// are ignored.
pub(crate) fn components_are_superselector(
    seq1: &[SequenceComponent],
    seq2: &[SequenceComponent],
    rule: NotRule,
) -> bool {
    fn without_newlines(seq: &[SequenceComponent]) -> Cow<'_, [SequenceComponent]> {
        if seq.iter().any(SequenceComponent::is_newline) {
            Cow::Owned(seq.iter().filter(|c| !c.is_newline()).cloned().collect())
        } else {
            Cow::Borrowed(seq)
        }
    }

    superselector_inner(&without_newlines(seq1), &without_newlines(seq2), rule)
}

fn superselector_inner(
    seq1: &[SequenceComponent],
    seq2: &[SequenceComponent],
    rule: NotRule,
) -> bool {
    let (first1, last1, last2) = match (seq1.first(), seq1.last(), seq2.first(), seq2.last()) {
        (
            Some(SequenceComponent::Compound(first1)),
            Some(SequenceComponent::Compound(last1)),
            Some(SequenceComponent::Compound(..)),
            Some(SequenceComponent::Compound(last2)),
        ) => (first1, last1, last2),
        _ => return false,
    };

    if seq1.len() > seq2.len() {
        return false;
    }

    if seq1.len() == 1 {
        return last1.superselector_with(last2, &seq2[..seq2.len() - 1], rule);
    }

    let mut matched = None;
    for (idx, component) in seq2.iter().enumerate() {
        if idx == seq2.len() - 1 {
            return false;
        }
        if let SequenceComponent::Compound(compound) = component {
            if first1.superselector_with(compound, &seq2[..idx], rule) {
                matched = Some(idx);
                break;
            }
        }
    }

    let si = match matched {
        Some(si) => si,
        None => return false,
    };

    match (&seq1[1], &seq2[si + 1]) {
        (SequenceComponent::Combinator(combinator1), next2) => {
            let combinator2 = match next2 {
                SequenceComponent::Combinator(combinator2) => *combinator2,
                _ => return false,
            };

            let compatible = if *combinator1 == Combinator::FollowingSibling {
                combinator2 != Combinator::Child
            } else {
                *combinator1 == combinator2
            };

            if !compatible || (seq1.len() == 3 && seq2.len() > 3) {
                return false;
            }

            superselector_inner(&seq1[2..], &seq2[si + 2..], rule)
        }
        (_, SequenceComponent::Combinator(combinator2)) => {
            *combinator2 == Combinator::Child
                && superselector_inner(&seq1[1..], &seq2[si + 2..], rule)
        }
        _ => superselector_inner(&seq1[1..], &seq2[si + 1..], rule),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SequenceComponent {
    Compound(SimpleSequence),
    Combinator(Combinator),
    /// A line break in the source; kept for output only
    Newline,
}

impl SequenceComponent {
    pub fn as_compound(&self) -> Option<&SimpleSequence> {
        match self {
            Self::Compound(compound) => Some(compound),
            Self::Combinator(..) | Self::Newline => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Self::Compound(..))
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, Self::Newline)
    }

    /// Combinators and line breaks, which weaving treats alike
    pub(crate) fn is_op(&self) -> bool {
        !self.is_compound()
    }
}

/// A combinator that's written explicitly
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `>`: the right side is a direct child of the left
    Child,

    /// `+`: the right side immediately follows the left
    NextSibling,

    /// `~`: the right side follows the left
    FollowingSibling,
}

impl Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Child => ">",
            Self::NextSibling => "+",
            Self::FollowingSibling => "~",
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::selector::parse_for_tests;

    use super::*;

    fn seq(text: &str) -> Sequence {
        parse_for_tests(text).members()[0].clone()
    }

    #[test]
    fn descendant_superselector() {
        assert!(seq(".a .c").is_superselector(&seq(".a .b .c")));
        assert!(seq(".c").is_superselector(&seq(".a .b .c")));
        assert!(!seq(".a .b .c").is_superselector(&seq(".a .c")));
        assert!(seq(".a .c").is_superselector(&seq(".a > .c")));
        assert!(!seq(".a > .c").is_superselector(&seq(".a .c")));
    }

    #[test]
    fn sibling_superselector() {
        assert!(seq(".a ~ .b").is_superselector(&seq(".a + .b")));
        assert!(!seq(".a + .b").is_superselector(&seq(".a ~ .b")));
        assert!(!seq(".a ~ .b").is_superselector(&seq(".a > .b")));
        assert!(seq(".a > .b").is_superselector(&seq(".a > .b")));
    }

    #[test]
    fn trailing_child_is_not_superselector_of_longer_chain() {
        assert!(!seq(".a > .c").is_superselector(&seq(".a > .b > .c")));
        assert!(!seq(".a > .c").is_superselector(&seq(".x .a > .b > .c")));
    }

    #[test]
    fn rejects_dangling_combinators() {
        assert!(!seq("> .a").is_superselector(&seq("> .a")));
    }

    #[test]
    fn reflexive() {
        for text in [".a", ".a .b", ".a > .b ~ .c + d", ":not(.a) .b"] {
            let seq = seq(text);
            assert!(seq.is_superselector(&seq), "{}", text);
        }
    }

    #[test]
    fn newlines_are_ignored_by_equality() {
        let list = parse_for_tests(".x,\n.a .b");
        assert!(list.members()[1].members()[0].is_newline());
        assert_eq!(list.members()[1], seq(".a .b"));
    }

    #[test]
    fn unify_weaves_prefixes() {
        let unified = seq(".a .x").unify(&seq(".b .y")).unwrap();
        let rendered: Vec<String> = unified.members().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, [".a .b .x.y", ".b .a .x.y"]);

        assert!(seq(".a #x").unify(&seq(".b #y")).is_none());
    }

    #[test]
    fn subjectless_moves_subject_into_has() {
        assert_eq!(seq(".a! .b > .c").subjectless().to_string(), ".a:has(.b > .c)");
        assert_eq!(seq(".x .a!").subjectless().to_string(), ".x .a");
        assert_eq!(seq(".a .b").subjectless(), seq(".a .b"));
    }

    #[test]
    fn specificity_sums_compounds() {
        assert_eq!(seq("#a .b c").specificity(), Specificity::exact(1_001_001));
        assert_eq!(
            seq(":matches(.a, #b)").specificity(),
            Specificity::new(1000, 1_000_000)
        );
        assert_eq!(
            seq(":not(.a, #b)").specificity(),
            Specificity::exact(1_000_000)
        );
    }
}
