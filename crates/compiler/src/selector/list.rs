use std::{
    collections::VecDeque,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use codemap::Span;

use crate::{
    error::{ErrorKind, SassError, SassResult},
    logger::Diagnostic,
    options::CompoundExtend,
};

use super::{
    components_are_superselector, Directive, ExtendIndex, Extension, NotRule, Seen, Sequence,
    SequenceComponent,
};

/// A comma-separated list of complex selectors, any of which may match
#[derive(Clone, Debug)]
pub struct CommaSequence {
    members: Vec<Sequence>,
    span: Option<Span>,
}

impl PartialEq for CommaSequence {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for CommaSequence {}

impl Hash for CommaSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.members.hash(state);
    }
}

impl CommaSequence {
    pub fn new(members: Vec<Sequence>, span: Option<Span>) -> Self {
        Self { members, span }
    }

    pub fn members(&self) -> &[Sequence] {
        &self.members
    }

    pub(crate) fn into_members(self) -> Vec<Sequence> {
        self.members
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether every alternative contains a placeholder
    pub fn is_invisible(&self) -> bool {
        self.members.iter().all(Sequence::is_invisible)
    }

    pub fn contains_parent_ref(&self) -> bool {
        self.members.iter().any(Sequence::contains_parent_ref)
    }

    /// Returns this selector with every alternative extended by the
    /// extensions in `index`.
    ///
    /// Extensions registered under `directives` that don't enclose the
    /// extending `@extend` cause [`ErrorKind::CrossDirectiveExtend`].
    pub(crate) fn do_extend(
        &self,
        index: &ExtendIndex,
        directives: &[Directive],
        replace: bool,
        seen: &Seen,
        original: bool,
    ) -> SassResult<CommaSequence> {
        let mut members = Vec::with_capacity(self.members.len());
        for seq in &self.members {
            members.extend(seq.do_extend(index, directives, replace, seen, original)?);
        }

        Ok(CommaSequence::new(members, self.span))
    }

    /// Returns whether every alternative of `other` is matched by one of ours
    pub fn is_superselector(&self, other: &CommaSequence) -> bool {
        self.superselector_with(other, NotRule::Loose)
    }

    pub(crate) fn superselector_with(&self, other: &CommaSequence, rule: NotRule) -> bool {
        other.members.iter().all(|theirs| {
            self.members
                .iter()
                .any(|ours| components_are_superselector(ours.members(), theirs.members(), rule))
        })
    }

    /// Returns a selector matching only elements matched by both `self` and
    /// `other`, or `None` if there are none.
    pub fn unify(&self, other: &CommaSequence) -> Option<CommaSequence> {
        let members: Vec<Sequence> = self
            .members
            .iter()
            .flat_map(|ours| other.members.iter().map(move |theirs| (ours, theirs)))
            .filter_map(|(ours, theirs)| ours.unify(theirs))
            .flat_map(CommaSequence::into_members)
            .collect();

        if members.is_empty() {
            return None;
        }

        Some(CommaSequence::new(members, self.span))
    }

    /// Replaces every `&` with `parent`.
    ///
    /// With `implicit_parent`, alternatives without `&` are nested under
    /// `parent` as descendants.
    pub fn resolve_parent_refs(
        &self,
        parent: Option<&CommaSequence>,
        implicit_parent: bool,
    ) -> SassResult<CommaSequence> {
        let parent = match parent {
            Some(parent) => parent,
            None if self.contains_parent_ref() => {
                return Err(SassError::new(
                    ErrorKind::InvalidParentSelector,
                    "Base-level rules cannot contain the parent-selector-referencing character '&'.",
                    self.span,
                ))
            }
            None => return Ok(self.clone()),
        };

        let mut resolved = Vec::with_capacity(self.members.len());
        for seq in &self.members {
            resolved.push(seq.resolve_parent_refs(parent, implicit_parent)?.into_members());
        }

        Ok(CommaSequence::new(flatten_vertically(resolved), self.span))
    }

    /// Registers `@extend <extendee>` written in a rule whose selector is
    /// `self`.
    ///
    /// Returns the deprecations found along the way; under
    /// [`CompoundExtend::Deny`] those are errors instead.
    #[allow(clippy::too_many_arguments)]
    pub fn populate_extends(
        &self,
        index: &mut ExtendIndex,
        extendee: &CommaSequence,
        span: Option<Span>,
        directives: &[Directive],
        is_optional: bool,
        policy: CompoundExtend,
    ) -> SassResult<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();

        for seq in &extendee.members {
            let invalid = |reason: &str| {
                SassError::new(
                    ErrorKind::InvalidExtendTarget,
                    format!("Can't extend {}: {}", seq, reason),
                    span,
                )
            };

            let mut components = seq.members().iter().filter(|c| !c.is_newline());
            let compound = match (components.next(), components.next()) {
                (Some(SequenceComponent::Compound(compound)), None) => compound,
                (Some(..), Some(..)) => return Err(invalid("can't extend nested selectors")),
                _ => return Err(invalid("invalid selector")),
            };

            if compound.members().iter().any(|simple| simple.is_parent()) {
                return Err(invalid("can't extend parent selectors"));
            }

            let target = compound.members().to_vec();

            if target.len() > 1 {
                let alternatives = target
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                match policy {
                    CompoundExtend::Allow => {}
                    CompoundExtend::Warn => diagnostics.push(Diagnostic::compound_extend(
                        &compound.to_string(),
                        &alternatives,
                        span,
                    )),
                    CompoundExtend::Deny => {
                        return Err(invalid(&format!(
                            "compound selectors may not be extended.\nConsider \"@extend {}\" instead.",
                            alternatives
                        )))
                    }
                }
            }

            for extender in &self.members {
                if !matches!(extender.members().last(), Some(SequenceComponent::Compound(..))) {
                    return Err(SassError::new(
                        ErrorKind::InvalidExtendTarget,
                        format!("{} can't extend: invalid selector", extender),
                        span,
                    ));
                }

                index.insert(
                    target.clone(),
                    Extension::new(
                        extender.clone(),
                        target.clone(),
                        directives.to_vec(),
                        span,
                        is_optional,
                    ),
                );
            }
        }

        Ok(diagnostics)
    }
}

impl Display for CommaSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        crate::serializer::Serializer::inspect().write_comma_sequence(self, &mut buffer);
        f.write_str(&buffer)
    }
}

/// Returns all elements of the inner lists, taking one element from each in
/// turn: `[[1, 2], [3, 4], [5]]` becomes `[1, 3, 5, 2, 4]`
fn flatten_vertically<A>(iterable: Vec<Vec<A>>) -> Vec<A> {
    let mut queues: Vec<VecDeque<A>> = iterable.into_iter().map(VecDeque::from).collect();

    let mut result = Vec::new();

    while !queues.is_empty() {
        for queue in &mut queues {
            result.extend(queue.pop_front());
        }

        queues.retain(|queue| !queue.is_empty());
    }

    result
}
