use std::{
    fmt,
    hash::{Hash, Hasher},
};

use phf::phf_set;

use crate::{interner::InternedString, utils::unvendor};

use super::{
    components_are_superselector, unify_namespaces, Attribute, CommaSequence, Namespace, NotRule,
    QualifiedName, Sequence, SequenceComponent, SimpleSequence, Specificity, BASE_SPECIFICITY,
};

/// Pseudo-class selectors that take unadorned selectors as arguments.
pub(crate) static SELECTOR_PSEUDO_CLASSES: phf::Set<&'static str> = phf_set! {
    "not",
    "matches",
    "current",
    "any",
    "has",
    "host",
    "host-context",
};

/// Pseudo-element selectors that take unadorned selectors as arguments.
pub(crate) static SELECTOR_PSEUDO_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "slotted",
};

/// Pseudo selectors that can match a subset of the elements matched by one of
/// their argument's simple selectors
static SUBSELECTOR_PSEUDOS: phf::Set<&'static str> = phf_set! {
    "matches",
    "any",
    "nth-child",
    "nth-last-child",
};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SimpleSelector {
    /// `*`, optionally namespaced
    Universal(Namespace),

    /// A type selector such as `div`
    Element(QualifiedName),

    /// `.name`
    Class(InternedString),

    /// `#name`
    Id(InternedString),

    /// `%name`
    ///
    /// This doesn't match any elements. It only exists to be extended, and
    /// selectors containing it are left out of CSS output.
    Placeholder(InternedString),

    /// `&`, with an optional suffix such as the `-foo` in `&-foo`
    ///
    /// This only exists until it has been replaced by the parent selector.
    Parent(Option<String>),

    Attribute(Box<Attribute>),

    /// A pseudo-class or pseudo-element selector.
    ///
    /// Some pseudo selectors take other selectors as arguments; those get
    /// special treatment during extension and unification.
    Pseudo(Pseudo),
}

impl SimpleSelector {
    pub fn class(name: &str) -> Self {
        Self::Class(InternedString::get_or_intern(name))
    }

    pub fn id(name: &str) -> Self {
        Self::Id(InternedString::get_or_intern(name))
    }

    pub fn placeholder(name: &str) -> Self {
        Self::Placeholder(InternedString::get_or_intern(name))
    }

    pub fn element(name: &str) -> Self {
        Self::Element(QualifiedName::new(name, Namespace::None))
    }

    /// The range of specificities this selector can have
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Universal(..) => Specificity::ZERO,
            Self::Element(..) => Specificity::exact(1),
            Self::Id(..) => Specificity::exact(BASE_SPECIFICITY * BASE_SPECIFICITY),
            Self::Pseudo(pseudo) => pseudo.specificity(),
            Self::Class(..) | Self::Placeholder(..) | Self::Attribute(..) | Self::Parent(..) => {
                Specificity::exact(BASE_SPECIFICITY)
            }
        }
    }

    /// Whether at most one element on a page can match this selector
    pub fn is_unique(&self) -> bool {
        match self {
            Self::Id(..) => true,
            Self::Pseudo(pseudo) => pseudo.is_class() && pseudo.normalized_name() == "root",
            _ => false,
        }
    }

    /// Whether this selector can never appear in CSS output
    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Placeholder(..) => true,
            Self::Pseudo(pseudo) => pseudo.is_invisible(),
            _ => false,
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Universal(..))
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Parent(..))
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Self::Id(..))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(..))
    }

    pub fn is_pseudo_element(&self) -> bool {
        matches!(self, Self::Pseudo(pseudo) if pseudo.is_element())
    }

    /// A pseudo selector that takes a selector argument
    pub fn as_selector_pseudo(&self) -> Option<&Pseudo> {
        match self {
            Self::Pseudo(pseudo) if pseudo.selector.is_some() => Some(pseudo),
            _ => None,
        }
    }

    /// Returns `compound` narrowed so that it also requires this selector, or
    /// `None` when no element could match both.
    pub fn unify(self, compound: Vec<Self>) -> Option<Vec<Self>> {
        match self {
            Self::Universal(..) => self.unify_universal(compound),
            Self::Element(..) => self.unify_element(compound),
            Self::Id(..) => {
                if compound
                    .iter()
                    .any(|simple| simple.is_id() && simple != &self)
                {
                    return None;
                }

                self.unify_default(compound)
            }
            Self::Pseudo(ref pseudo) if pseudo.is_element() => {
                // a compound may hold a single pseudo-element
                if compound.iter().any(|simple| match simple {
                    Self::Pseudo(other) if other.is_element() => {
                        other.name != pseudo.name
                            || other.argument != pseudo.argument
                            || other.selector != pseudo.selector
                    }
                    _ => false,
                }) {
                    return None;
                }

                self.unify_default(compound)
            }
            _ => self.unify_default(compound),
        }
    }

    fn unify_default(self, mut compound: Vec<Self>) -> Option<Vec<Self>> {
        if compound.len() == 1 && compound[0].is_universal() {
            return compound.remove(0).unify(vec![self]);
        }

        if compound.contains(&self) {
            return Some(compound);
        }

        if compound.last().map_or(false, Self::is_pseudo_element) {
            let idx = compound
                .iter()
                .position(|simple| matches!(simple, Self::Pseudo(..)))
                .unwrap_or(compound.len());
            compound.insert(idx, self);
        } else {
            compound.push(self);
        }

        Some(compound)
    }

    fn unify_universal(self, mut compound: Vec<Self>) -> Option<Vec<Self>> {
        let namespace = match self {
            Self::Universal(namespace) => namespace,
            _ => return None,
        };

        let first = match compound.first() {
            Some(Self::Universal(other)) => Self::Universal(unify_namespaces(namespace, *other)?),
            Some(Self::Element(name)) => Self::Element(QualifiedName {
                ident: name.ident,
                namespace: unify_namespaces(namespace, name.namespace)?,
            }),
            _ => {
                if !matches!(namespace, Namespace::None | Namespace::Asterisk) {
                    compound.insert(0, self);
                } else if compound.is_empty() {
                    compound.push(self);
                }
                return Some(compound);
            }
        };

        compound[0] = first;
        Some(compound)
    }

    fn unify_element(self, mut compound: Vec<Self>) -> Option<Vec<Self>> {
        let name = match self {
            Self::Element(name) => name,
            _ => return None,
        };

        let other_namespace = match compound.first() {
            Some(Self::Universal(namespace)) => *namespace,
            Some(Self::Element(other)) if other.ident == name.ident => other.namespace,
            Some(Self::Element(..)) => return None,
            _ => {
                compound.insert(0, self);
                return Some(compound);
            }
        };

        compound[0] = Self::Element(QualifiedName {
            ident: name.ident,
            namespace: unify_namespaces(name.namespace, other_namespace)?,
        });

        Some(compound)
    }

    /// Whether this selector appears in `compound`, either directly or in every
    /// single-compound alternative of one of its `:matches()`-like pseudos
    pub(crate) fn is_in_compound(&self, compound: &SimpleSequence) -> bool {
        if compound.rest().contains(self) {
            return true;
        }

        compound
            .selector_pseudo_classes()
            .filter(|pseudo| SUBSELECTOR_PSEUDOS.contains(pseudo.normalized_name()))
            .any(|pseudo| {
                pseudo.selector().map_or(false, |selector| {
                    selector.members().iter().all(|seq| {
                        seq.single_compound()
                            .map_or(false, |their| their.rest().contains(self))
                    })
                })
            })
    }

    /// Appends the suffix of a `&-suffix` reference to this selector, or
    /// returns `None` if this kind of selector can't take a suffix
    pub(crate) fn with_suffix(&self, suffix: &str) -> Option<Self> {
        let append = |name: InternedString| InternedString::get_or_intern(format!("{}{}", name, suffix));

        Some(match self {
            Self::Element(name) => Self::Element(QualifiedName {
                ident: append(name.ident),
                namespace: name.namespace,
            }),
            Self::Class(name) => Self::Class(append(*name)),
            Self::Id(name) => Self::Id(append(*name)),
            Self::Placeholder(name) => Self::Placeholder(append(*name)),
            Self::Pseudo(pseudo) if pseudo.argument.is_none() && pseudo.selector.is_none() => {
                Self::Pseudo(Pseudo {
                    name: append(pseudo.name),
                    ..pseudo.clone()
                })
            }
            _ => return None,
        })
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        crate::serializer::Serializer::inspect().write_simple(self, &mut buffer);
        f.write_str(&buffer)
    }
}

#[derive(Clone, Debug)]
pub struct Pseudo {
    /// The name of this selector, without colons.
    pub name: InternedString,

    /// Whether this was written with a single colon.
    ///
    /// `:before`, `:after`, `:first-line` and `:first-letter` are
    /// pseudo-elements even when written this way; see [`Pseudo::is_class`].
    pub is_syntactic_class: bool,

    /// The non-selector argument, such as the `2n+1 of` in
    /// `:nth-child(2n+1 of .foo)`.
    pub argument: Option<Box<str>>,

    /// The selector argument, such as the `.foo` in `:not(.foo)`.
    pub selector: Option<Box<CommaSequence>>,
}

impl Pseudo {
    pub fn new(
        name: &str,
        is_syntactic_class: bool,
        argument: Option<&str>,
        selector: Option<CommaSequence>,
    ) -> Self {
        Self {
            name: InternedString::get_or_intern(name),
            is_syntactic_class,
            argument: argument.map(Into::into),
            selector: selector.map(Box::new),
        }
    }

    /// Whether this is a pseudo-class, as opposed to a pseudo-element
    pub fn is_class(&self) -> bool {
        self.is_syntactic_class && !is_fake_pseudo_element(self.name.resolve_ref())
    }

    pub fn is_element(&self) -> bool {
        !self.is_class()
    }

    /// Like `name`, but without any vendor prefixes.
    pub fn normalized_name(&self) -> &'static str {
        unvendor(self.name.resolve_ref())
    }

    pub fn selector(&self) -> Option<&CommaSequence> {
        self.selector.as_deref()
    }

    pub(crate) fn is_invisible(&self) -> bool {
        self.normalized_name() != "not"
            && self
                .selector
                .as_ref()
                .map_or(false, |selector| selector.members().iter().all(Sequence::is_invisible))
    }

    pub fn specificity(&self) -> Specificity {
        if self.is_element() {
            return Specificity::exact(1);
        }

        let selector = match &self.selector {
            Some(selector) if !selector.members().is_empty() => selector,
            Some(..) => return Specificity::ZERO,
            None => return Specificity::exact(BASE_SPECIFICITY),
        };

        let alternatives = selector.members().iter().map(Sequence::specificity);

        if self.normalized_name() == "not" {
            alternatives.fold(Specificity::ZERO, |acc, spec| {
                Specificity::new(acc.min.max(spec.min), acc.max.max(spec.max))
            })
        } else {
            // larger than any real specificity
            let start = Specificity::new(BASE_SPECIFICITY.pow(3), 0);
            alternatives.fold(start, |acc, spec| {
                Specificity::new(acc.min.min(spec.min), acc.max.max(spec.max))
            })
        }
    }

    /// Returns copies of this pseudo with `selector` as its argument.
    ///
    /// Nested pseudos of the same kind are flattened where that doesn't change
    /// meaning, and `:not(.a, .b)` is split into `:not(.a):not(.b)`.
    pub(crate) fn with_selector(&self, selector: &CommaSequence) -> Vec<Pseudo> {
        let normalized = self.normalized_name();
        let mut members = Vec::with_capacity(selector.members().len());

        for seq in selector.members() {
            let nested = seq
                .single_compound()
                .filter(|compound| compound.members().len() == 1)
                .and_then(|compound| compound.members()[0].as_selector_pseudo());

            let nested = match nested {
                Some(nested) => nested,
                None => {
                    members.push(seq.clone());
                    continue;
                }
            };

            match normalized {
                // a nested `:not` would need to be unified with the result, so
                // only `:not(:matches(...))` is flattened
                "not" => {
                    if nested.normalized_name() == "matches" {
                        members.extend(nested_members(nested));
                    }
                }
                "matches" | "any" | "current" | "nth-child" | "nth-last-child" => {
                    if nested.name == self.name && nested.argument == self.argument {
                        members.extend(nested_members(nested));
                    }
                }
                // each layer of these changes what the argument is matched
                // against, so `:has(:has(img))` is not `:has(img)`
                "has" | "host" | "host-context" | "slotted" => members.push(seq.clone()),
                _ => {}
            }
        }

        let rebuild = |members: Vec<Sequence>| Pseudo {
            selector: Some(Box::new(CommaSequence::new(members, selector.span()))),
            ..self.clone()
        };

        if normalized == "not"
            && self
                .selector()
                .map_or(true, |original| original.members().len() <= 1)
        {
            return members
                .into_iter()
                .map(|seq| rebuild(vec![seq]))
                .collect();
        }

        vec![rebuild(members)]
    }

    /// Returns whether this pseudo matches every element `compound` matches.
    ///
    /// `parents` are the components of the complex selector that precede
    /// `compound`; `:matches()` and `:any()` may need them to compare against
    /// their complex alternatives.
    pub(crate) fn is_superselector(
        &self,
        compound: &SimpleSequence,
        parents: &[SequenceComponent],
        rule: NotRule,
    ) -> bool {
        let selector = match self.selector() {
            Some(selector) => selector,
            None => return compound.members().contains(&SimpleSelector::Pseudo(self.clone())),
        };

        let normalized = self.normalized_name();
        let same_name = || {
            compound.selector_pseudos().filter(move |pseudo| {
                pseudo.is_class() == self.is_class() && pseudo.normalized_name() == normalized
            })
        };

        match normalized {
            "matches" | "any" => {
                same_name().any(|theirs| {
                    theirs
                        .selector()
                        .map_or(false, |their_sel| selector.superselector_with(their_sel, rule))
                }) || selector.members().iter().any(|our_seq| {
                    let mut components = parents.to_vec();
                    components.push(SequenceComponent::Compound(compound.clone()));
                    components_are_superselector(our_seq.members(), &components, rule)
                })
            }
            "has" | "host" | "host-context" | "slotted" => same_name().any(|theirs| {
                theirs
                    .selector()
                    .map_or(false, |their_sel| selector.superselector_with(their_sel, rule))
            }),
            "current" => same_name().any(|theirs| theirs.selector() == Some(selector)),
            "nth-child" | "nth-last-child" => same_name().any(|theirs| {
                theirs.argument == self.argument
                    && theirs
                        .selector()
                        .map_or(false, |their_sel| selector.superselector_with(their_sel, rule))
            }),
            "not" => selector
                .members()
                .iter()
                .all(|our_seq| excludes(our_seq, compound, self.name, rule)),
            _ => false,
        }
    }
}

fn nested_members(pseudo: &Pseudo) -> impl Iterator<Item = Sequence> + '_ {
    pseudo
        .selector()
        .into_iter()
        .flat_map(|selector| selector.members().iter().cloned())
}

/// Whether `compound` can never match anything `seq` matches, which makes
/// `:not(seq)` a superselector of `compound`
fn excludes(
    seq: &Sequence,
    compound: &SimpleSequence,
    not_name: InternedString,
    rule: NotRule,
) -> bool {
    let ours = seq.last_compound();

    let contradicted = compound.members().iter().any(|theirs| match theirs {
        SimpleSelector::Element(..) => ours.map_or(false, |ours| {
            ours.members()
                .iter()
                .any(|simple| simple.is_element() && simple != theirs)
        }),
        SimpleSelector::Id(..) => ours.map_or(false, |ours| {
            ours.members()
                .iter()
                .any(|simple| simple.is_id() && simple != theirs)
        }),
        SimpleSelector::Pseudo(pseudo) if pseudo.name == not_name => {
            pseudo.selector().map_or(false, |their_sel| {
                their_sel.superselector_with(&CommaSequence::new(vec![seq.clone()], None), rule)
            })
        }
        _ => false,
    });

    if contradicted || rule == NotRule::Strict {
        return contradicted;
    }

    seq.single_compound().map_or(false, |ours| {
        !ours.members().is_empty()
            && ours
                .members()
                .iter()
                .all(|simple| !compound.members().contains(simple))
    })
}

impl PartialEq for Pseudo {
    fn eq(&self, other: &Pseudo) -> bool {
        self.name == other.name
            && self.is_class() == other.is_class()
            && self.argument == other.argument
            && self.selector == other.selector
    }
}

impl Eq for Pseudo {}

impl Hash for Pseudo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.is_class().hash(state);
        self.argument.hash(state);
        self.selector.hash(state);
    }
}

/// Returns whether `name` is the name of a pseudo-element that can be written
/// with pseudo-class syntax (`:before`, `:after`, `:first-line`, or
/// `:first-letter`)
pub(crate) fn is_fake_pseudo_element(name: &str) -> bool {
    ["after", "before", "first-line", "first-letter"]
        .iter()
        .any(|fake| name.eq_ignore_ascii_case(fake))
}
