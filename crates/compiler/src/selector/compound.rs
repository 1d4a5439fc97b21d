use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use codemap::Span;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;

use crate::error::SassResult;

use super::{
    CommaSequence, Directive, ExtendIndex, Extension, NotRule, Pseudo, Seen, Sequence,
    SequenceComponent, SimpleSelector, Specificity,
};

/// A compound selector: simple selectors that must all match one element,
/// such as `a.foo:hover`
#[derive(Clone, Debug)]
pub struct SimpleSequence {
    members: Vec<SimpleSelector>,

    /// Whether this was written with the `!` subject marker
    subject: bool,

    span: Option<Span>,

    /// The extenders whose extension produced this compound, used to decide
    /// which generated selectors may be trimmed
    sources: Arc<IndexSet<Sequence>>,

    rest: OnceCell<IndexSet<SimpleSelector>>,
    pseudo_elements: OnceCell<Vec<SimpleSelector>>,
    hash: OnceCell<u64>,
}

impl SimpleSequence {
    pub fn new(members: Vec<SimpleSelector>, subject: bool) -> Self {
        Self {
            members,
            subject,
            span: None,
            sources: Arc::default(),
            rest: OnceCell::new(),
            pseudo_elements: OnceCell::new(),
            hash: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn members(&self) -> &[SimpleSelector] {
        &self.members
    }

    pub fn is_subject(&self) -> bool {
        self.subject
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn sources(&self) -> &IndexSet<Sequence> {
        &self.sources
    }

    /// The leading element or universal selector, if any
    pub fn base(&self) -> Option<&SimpleSelector> {
        self.members
            .first()
            .filter(|simple| simple.is_universal() || simple.is_element())
    }

    pub fn pseudo_elements(&self) -> &[SimpleSelector] {
        self.pseudo_elements.get_or_init(|| {
            self.members
                .iter()
                .filter(|simple| simple.is_pseudo_element())
                .cloned()
                .collect()
        })
    }

    /// Every member other than the base and pseudo-elements
    pub fn rest(&self) -> &IndexSet<SimpleSelector> {
        self.rest.get_or_init(|| {
            let skip = usize::from(self.base().is_some());
            self.members
                .iter()
                .skip(skip)
                .filter(|simple| !simple.is_pseudo_element())
                .cloned()
                .collect()
        })
    }

    /// Pseudo selectors, of either kind, that take a selector argument
    pub fn selector_pseudos(&self) -> impl Iterator<Item = &Pseudo> {
        self.members.iter().filter_map(SimpleSelector::as_selector_pseudo)
    }

    pub fn selector_pseudo_classes(&self) -> impl Iterator<Item = &Pseudo> {
        self.selector_pseudos().filter(|pseudo| pseudo.is_class())
    }

    pub fn specificity(&self) -> Specificity {
        self.members.iter().map(SimpleSelector::specificity).sum()
    }

    pub fn is_invisible(&self) -> bool {
        self.members.iter().any(SimpleSelector::is_invisible)
    }

    pub(crate) fn contains_parent_ref(&self) -> bool {
        self.members.iter().any(|simple| {
            simple.is_parent()
                || simple
                    .as_selector_pseudo()
                    .and_then(Pseudo::selector)
                    .map_or(false, CommaSequence::contains_parent_ref)
        })
    }

    /// Returns a copy whose sources also include `sources`
    #[must_use]
    pub fn with_more_sources<'a>(&self, sources: impl IntoIterator<Item = &'a Sequence>) -> Self {
        let mut merged = (*self.sources).clone();
        merged.extend(sources.into_iter().cloned());

        Self {
            sources: Arc::new(merged),
            ..self.clone()
        }
    }

    /// Returns a compound matching only elements matched by both `self` and
    /// `other`, or `None` if there are none.
    pub fn unify(&self, other: &SimpleSequence) -> Option<SimpleSequence> {
        let mut members = other.members.clone();
        for simple in &self.members {
            members = simple.clone().unify(members)?;
        }

        Some(
            SimpleSequence::new(members, self.subject || other.subject)
                .with_span(other.span.or(self.span)),
        )
    }

    /// Returns whether `self` matches every element `other` matches.
    ///
    /// `parents` are the components that precede `other` in its complex
    /// selector, if any.
    pub fn is_superselector(&self, other: &SimpleSequence, parents: &[SequenceComponent]) -> bool {
        self.superselector_with(other, parents, NotRule::Loose)
    }

    pub(crate) fn superselector_with(
        &self,
        other: &SimpleSequence,
        parents: &[SequenceComponent],
        rule: NotRule,
    ) -> bool {
        if self.base().map_or(false, |base| Some(base) != other.base()) {
            return false;
        }

        if self.pseudo_elements() != other.pseudo_elements() {
            return false;
        }

        let rest_matches = self.rest().iter().all(|simple| {
            simple.as_selector_pseudo().map_or(false, Pseudo::is_class)
                || simple.is_in_compound(other)
        });

        rest_matches
            && self
                .selector_pseudo_classes()
                .all(|pseudo| pseudo.is_superselector(other, parents, rule))
    }

    /// Returns the sequences this compound should be replaced with under the
    /// extensions in `index`. The first result is `self` unless it was
    /// replaced.
    pub(crate) fn do_extend(
        &self,
        index: &ExtendIndex,
        directives: &[Directive],
        replace: bool,
        seen: &Seen,
    ) -> SassResult<Vec<Sequence>> {
        let mut seen_with_pseudos = seen.clone();
        let mut modified_original = false;
        let mut members = Vec::with_capacity(self.members.len());

        for simple in &self.members {
            let (pseudo, selector) = match simple {
                SimpleSelector::Pseudo(pseudo) => match pseudo.selector() {
                    Some(selector) if !seen.contains(std::slice::from_ref(simple)) => {
                        (pseudo, selector)
                    }
                    _ => {
                        members.push(simple.clone());
                        continue;
                    }
                },
                _ => {
                    members.push(simple.clone());
                    continue;
                }
            };

            let extended = selector.do_extend(index, directives, replace, seen, false)?;
            if &extended == selector {
                members.push(simple.clone());
                continue;
            }

            let mut alternatives: Vec<Sequence> = extended
                .members()
                .iter()
                .filter(|seq| !seq.is_invisible())
                .cloned()
                .collect();

            // `:not(.a)` extended by `.b .c` must not become `:not(.a, .b .c)`,
            // which older browsers reject
            if pseudo.normalized_name() == "not"
                && selector.members().iter().all(|seq| seq.members().len() <= 1)
                && alternatives.iter().any(|seq| seq.members().len() == 1)
            {
                alternatives.retain(|seq| seq.members().len() <= 1);
            }

            modified_original = true;
            let rewritten = CommaSequence::new(alternatives, extended.span());
            for new_pseudo in pseudo.with_selector(&rewritten) {
                let new_simple = SimpleSelector::Pseudo(new_pseudo);
                seen_with_pseudos.insert(vec![new_simple.clone()]);
                members.push(new_simple);
            }
        }

        let member_set: IndexSet<SimpleSelector> = members.iter().cloned().collect();

        let mut groups: IndexMap<&Sequence, Vec<&Extension>> = IndexMap::new();
        for extension in index.get(&member_set) {
            groups
                .entry(&extension.extender)
                .or_default()
                .push(extension);
        }

        let mut generated = Vec::with_capacity(groups.len());
        for (extender, group) in groups {
            let targets: Vec<SimpleSelector> = group
                .iter()
                .flat_map(|extension| extension.target.iter().cloned())
                .collect();

            let without_targets: Vec<SimpleSelector> = members
                .iter()
                .filter(|simple| !targets.contains(simple))
                .cloned()
                .collect();

            for extension in &group {
                extension.mark_success();
            }

            let (prefix, extender_compound) = match extender.members().split_last() {
                Some((SequenceComponent::Compound(compound), prefix)) => (prefix, compound),
                _ => continue,
            };

            let unified = match extender_compound
                .unify(&SimpleSequence::new(without_targets, self.subject).with_span(self.span))
            {
                Some(unified) => unified,
                None => continue,
            };

            for extension in &group {
                extension.check_directives(directives)?;
            }

            let mut components = prefix.to_vec();
            components.push(SequenceComponent::Compound(unified));

            let mut sources = (*self.sources).clone();
            sources.insert(extender.clone());

            generated.push((targets, Sequence::new(components).add_sources(&sources)));
        }

        let mut results = Vec::new();
        for (targets, seq) in generated {
            if seen.contains(&targets) {
                continue;
            }

            let mut next_seen = seen_with_pseudos.clone();
            next_seen.insert(targets);
            results.extend(seq.do_extend(index, directives, false, &next_seen, false)?);
        }

        if modified_original || !replace || results.is_empty() {
            let original = SimpleSequence {
                members,
                subject: self.subject,
                span: self.span,
                sources: Arc::clone(&self.sources),
                rest: OnceCell::new(),
                pseudo_elements: OnceCell::new(),
                hash: OnceCell::new(),
            };
            results.insert(0, Sequence::new(vec![SequenceComponent::Compound(original)]));
        }

        let unique: IndexSet<Sequence> = results.into_iter().collect();
        Ok(unique.into_iter().collect())
    }

    /// Replaces a leading `&` with each alternative of `parent`, and resolves
    /// `&` inside selector pseudos
    pub(crate) fn resolve_parent_refs(&self, parent: &CommaSequence) -> SassResult<CommaSequence> {
        let mut resolved = Vec::with_capacity(self.members.len());
        for simple in &self.members {
            match simple
                .as_selector_pseudo()
                .and_then(|pseudo| Some((pseudo, pseudo.selector()?)))
            {
                Some((pseudo, selector)) if selector.contains_parent_ref() => {
                    let selector = selector.resolve_parent_refs(Some(parent), false)?;
                    resolved.extend(
                        pseudo
                            .with_selector(&selector)
                            .into_iter()
                            .map(SimpleSelector::Pseudo),
                    );
                }
                _ => resolved.push(simple.clone()),
            }
        }

        let suffix = match resolved.first() {
            Some(SimpleSelector::Parent(suffix)) => suffix.clone(),
            _ => {
                let compound = SimpleSequence::new(resolved, self.subject).with_span(self.span);
                return Ok(CommaSequence::new(
                    vec![Sequence::new(vec![SequenceComponent::Compound(compound)])],
                    parent.span(),
                ));
            }
        };

        if self.members.len() == 1 && suffix.is_none() {
            return Ok(parent.clone());
        }

        let mut members = Vec::with_capacity(parent.members().len());
        for parent_seq in parent.members() {
            let mut components = parent_seq.members().to_vec();
            let trailing_newline = matches!(components.last(), Some(SequenceComponent::Newline));
            if trailing_newline {
                components.pop();
            }

            let mut parent_members = match components.pop() {
                Some(SequenceComponent::Compound(last)) => last.members().to_vec(),
                _ => return Err(super::invalid_parent(self, parent_seq)),
            };

            if let Some(suffix) = &suffix {
                let last = parent_members
                    .pop()
                    .and_then(|simple| simple.with_suffix(suffix))
                    .ok_or_else(|| super::invalid_parent(self, parent_seq))?;
                parent_members.push(last);
            }

            parent_members.extend(resolved.iter().skip(1).cloned());
            components.push(SequenceComponent::Compound(
                SimpleSequence::new(parent_members, self.subject).with_span(self.span),
            ));
            if trailing_newline {
                components.push(SequenceComponent::Newline);
            }

            members.push(Sequence::new(components));
        }

        Ok(CommaSequence::new(members, parent.span()))
    }

    fn cached_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.base().hash(&mut hasher);
            self.pseudo_elements().hash(&mut hasher);
            self.subject.hash(&mut hasher);

            // `rest` is a set, so its hash must not depend on order
            let rest = self
                .rest()
                .iter()
                .map(|simple| {
                    let mut hasher = DefaultHasher::new();
                    simple.hash(&mut hasher);
                    hasher.finish()
                })
                .fold(0_u64, u64::wrapping_add);
            rest.hash(&mut hasher);

            hasher.finish()
        })
    }
}

impl PartialEq for SimpleSequence {
    fn eq(&self, other: &Self) -> bool {
        self.cached_hash() == other.cached_hash()
            && self.subject == other.subject
            && self.base() == other.base()
            && self.pseudo_elements() == other.pseudo_elements()
            && self.rest() == other.rest()
    }
}

impl Eq for SimpleSequence {}

impl Hash for SimpleSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.cached_hash());
    }
}

impl fmt::Display for SimpleSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        crate::serializer::Serializer::inspect().write_simple_sequence(self, &mut buffer);
        f.write_str(&buffer)
    }
}

#[cfg(test)]
mod tests {
    use crate::selector::parse_for_tests;

    use super::*;

    fn compound(text: &str) -> SimpleSequence {
        parse_for_tests(text).members()[0]
            .single_compound()
            .unwrap()
            .clone()
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(compound(".a.b"), compound(".b.a"));
        assert_ne!(compound(".a.b"), compound(".a"));
        assert_ne!(compound("a.b"), compound(".b"));
    }

    #[test]
    fn memoized_views() {
        let seq = compound("a.b:hover::before");
        assert_eq!(seq.base(), Some(&SimpleSelector::element("a")));
        assert_eq!(seq.pseudo_elements().len(), 1);
        assert_eq!(seq.rest().len(), 2);
    }

    #[test]
    fn unify_merges_members() {
        let unified = compound(".a").unify(&compound(".b")).unwrap();
        assert_eq!(unified.to_string(), ".b.a");

        assert_eq!(compound("#a").unify(&compound("#b")), None);
        assert_eq!(compound("a").unify(&compound("b")), None);
    }

    #[test]
    fn unify_yields_superselected_result() {
        let a = compound("a.x");
        let b = compound(".y:hover");
        let unified = a.unify(&b).unwrap();

        assert!(a.is_superselector(&unified, &[]));
        assert!(b.is_superselector(&unified, &[]));
    }

    #[test]
    fn superselector() {
        assert!(compound(".a").is_superselector(&compound(".a.b"), &[]));
        assert!(!compound(".a.b").is_superselector(&compound(".a"), &[]));
        assert!(compound(".a").is_superselector(&compound(":matches(.a.b, .a.c)"), &[]));
        assert!(!compound(".a").is_superselector(&compound(":matches(.a, .b .c)"), &[]));
        assert!(compound(":matches(.a, .b)").is_superselector(&compound(".a"), &[]));
    }

    #[test]
    fn not_pseudo_superselector() {
        assert!(!compound(":not(.a)").is_superselector(&compound(".a"), &[]));
        assert!(compound(":not(.a)").is_superselector(&compound(".b"), &[]));
        assert!(compound(":not(a)").is_superselector(&compound("b"), &[]));
        assert!(compound(":not(#a)").is_superselector(&compound("#b"), &[]));
        assert!(compound(":not(.a)").is_superselector(&compound(":not(.a)"), &[]));
        assert!(!compound(":not(.a)").is_superselector(&compound(".a.b"), &[]));
    }

    #[test]
    fn strict_not_needs_a_contradiction() {
        let strict = |ours: &str, theirs: &str| {
            compound(ours).superselector_with(&compound(theirs), &[], NotRule::Strict)
        };

        assert!(!strict(":not(.a)", ".b"));
        assert!(strict(":not(a)", "b"));
        assert!(strict(":not(#a)", "#b.c"));
        assert!(strict(":not(.a)", ":not(.a)"));
    }

    #[test]
    fn reflexive() {
        for text in [".a", "a.b#c", "*", ":not(.a)", ":matches(.a, .b)", "[href]::before"] {
            let seq = compound(text);
            assert!(seq.is_superselector(&seq, &[]), "{}", text);
        }
    }

    #[test]
    fn sources_are_copied_not_shared() {
        let base = compound(".a");
        let source = parse_for_tests(".b").members()[0].clone();
        let with_source = base.with_more_sources([&source]);

        assert!(base.sources().is_empty());
        assert_eq!(with_source.sources().len(), 1);
        assert_eq!(base, with_source);
    }
}
