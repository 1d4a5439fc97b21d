use std::collections::HashSet;

use indexmap::IndexSet;

use crate::{
    error::{ErrorKind, SassError, SassResult},
    options::DEFAULT_TRIM_THRESHOLD,
};

use super::{CommaSequence, SimpleSelector};

pub use extension::{Directive, Extension};
pub(crate) use functions::{paths, trim, weave};
use subset_map::SubsetMap;

mod extension;
mod functions;
mod subset_map;

/// Targets already applied along the current chain of extensions, so that a
/// selector is never extended by the same target twice
pub(crate) type Seen = HashSet<Vec<SimpleSelector>>;

/// Every `@extend` in a stylesheet, keyed by the simple selectors of its
/// target
#[derive(Debug)]
pub struct ExtendIndex {
    extensions: SubsetMap<SimpleSelector, Extension>,
    trim_threshold: usize,
}

impl Default for ExtendIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendIndex {
    pub fn new() -> Self {
        Self {
            extensions: SubsetMap::default(),
            trim_threshold: DEFAULT_TRIM_THRESHOLD,
        }
    }

    /// Above this many woven groups, generated selectors are no longer checked
    /// for redundancy
    #[must_use]
    pub const fn with_trim_threshold(mut self, trim_threshold: usize) -> Self {
        self.trim_threshold = trim_threshold;
        self
    }

    pub(crate) const fn trim_threshold(&self) -> usize {
        self.trim_threshold
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn insert(&mut self, target: Vec<SimpleSelector>, extension: Extension) {
        self.extensions.insert(target, extension);
    }

    /// Every extension whose target is contained in `compound`
    pub(crate) fn get(&self, compound: &IndexSet<SimpleSelector>) -> Vec<&Extension> {
        self.extensions.get(compound)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.values()
    }

    /// Extensions that haven't matched any selector
    pub fn unused(&self) -> impl Iterator<Item = &Extension> {
        self.extensions().filter(|extension| !extension.is_successful())
    }

    /// Fails for the first mandatory extension that never matched
    pub fn check_extends_fired(&self) -> SassResult<()> {
        let extension = match self.unused().find(|extension| !extension.is_optional) {
            Some(extension) => extension,
            None => return Ok(()),
        };

        let target = extension.target_text();

        Err(SassError::new(
            ErrorKind::ExtendTargetNotFound,
            format!(
                "\"{}\" failed to @extend \"{}\".\n\
                 The selector \"{}\" was not found.\n\
                 Use \"@extend {} !optional\" if the extend should be able to fail.",
                extension.extender, target, target, target
            ),
            extension.span,
        ))
    }

    /// Extends `selector`, which is enclosed by `directives`, with every
    /// extension registered so far
    pub fn extend(
        &self,
        selector: &CommaSequence,
        directives: &[Directive],
    ) -> SassResult<CommaSequence> {
        if self.is_empty() {
            return Ok(selector.clone());
        }

        selector.do_extend(self, directives, false, &Seen::new(), true)
    }
}
