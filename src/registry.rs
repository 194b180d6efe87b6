use indexmap::IndexMap;
use thiserror::Error;

use crate::matcher::{self, Match, MatchOptions};
use crate::product::ProductRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registered path must not be empty")]
    EmptyPath,
}

/// What to store when a second product claims an already registered path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Replace the product with [`ProductRecord::placeholder`].
    #[default]
    Placeholder,
    /// Replace the product with the incoming one.
    KeepNew,
}

impl ConflictPolicy {
    pub fn from_placeholder_flag(placeholder_on_conflict: bool) -> Self {
        if placeholder_on_conflict {
            ConflictPolicy::Placeholder
        } else {
            ConflictPolicy::KeepNew
        }
    }
}

/// Fresh -> Conflicted is the only transition; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Fresh,
    Conflicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New path, appended.
    Added,
    /// Same product key already on file for this path.
    Unchanged,
    /// Path was claimed by a different product key.
    Conflicted,
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    path: String,
    product: ProductRecord,
    state: EntryState,
}

impl RegistryEntry {
    fn fresh(path: &str, product: ProductRecord) -> Self {
        Self {
            path: path.to_string(),
            product,
            state: EntryState::Fresh,
        }
    }

    fn mark_conflicted(&mut self, product: ProductRecord) {
        self.product = product;
        self.state = EntryState::Conflicted;
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn product(&self) -> &ProductRecord {
        &self.product
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn has_conflict(&self) -> bool {
        self.state == EntryState::Conflicted
    }
}

/// Accumulates path registrations.
///
/// Entries are kept in insertion order until [`Registry::sort`] puts the
/// longest paths first. [`Registry::find`] scans in whatever order the
/// registry is currently in, so longest-prefix results require a sort first;
/// [`Registry::finalize`] does that and hands back a read-only [`PathIndex`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    options: MatchOptions,
    policy: ConflictPolicy,
    // comparison key -> entry
    entries: IndexMap<String, RegistryEntry>,
    sorted: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Register `product` under `path` using the registry's conflict policy.
    pub fn insert(&mut self, product: ProductRecord, path: &str) -> Result<InsertOutcome, RegistryError> {
        self.insert_with(product, path, self.policy)
    }

    pub fn insert_with(
        &mut self,
        product: ProductRecord,
        path: &str,
        policy: ConflictPolicy,
    ) -> Result<InsertOutcome, RegistryError> {
        if path.is_empty() {
            return Err(RegistryError::EmptyPath);
        }

        let key = self.options.comparison_key(path);

        if let Some(existing) = self.entries.get_mut(&*key) {
            if existing.product == product {
                tracing::trace!(path, key = product.key(), "already registered");
                return Ok(InsertOutcome::Unchanged);
            }

            tracing::debug!(
                path,
                existing = existing.product.key(),
                incoming = product.key(),
                ?policy,
                "path claimed by more than one product"
            );

            let replacement = match policy {
                ConflictPolicy::Placeholder => ProductRecord::placeholder(),
                ConflictPolicy::KeepNew => product,
            };
            existing.mark_conflicted(replacement);
            return Ok(InsertOutcome::Conflicted);
        }

        tracing::trace!(path, key = product.key(), "registered");
        let key = key.into_owned();
        self.entries.insert(key, RegistryEntry::fresh(path, product));
        self.sorted = false;
        Ok(InsertOutcome::Added)
    }

    /// Longest path first. Equal lengths keep their relative order.
    ///
    /// Length is measured on the comparison key, which is the raw path in
    /// case-sensitive mode. Under case folding a registered path's byte
    /// length can differ from its key's, and only the key length orders
    /// nested matches correctly.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, _, b, _| b.len().cmp(&a.len()));
        self.sorted = true;
        tracing::debug!(entries = self.entries.len(), "registry sorted");
    }

    /// True when no insert has happened since the last [`Registry::sort`].
    pub fn is_sorted(&self) -> bool {
        self.sorted || self.entries.len() < 2
    }

    /// First entry, in current order, that is a boundary-respecting ancestor
    /// of (or equal to) `candidate`.
    pub fn find(&self, candidate: &str) -> Option<Match<'_>> {
        if !self.is_sorted() {
            tracing::trace!(candidate, "lookup on unsorted registry");
        }
        lookup(&self.entries, &self.options, candidate)
    }

    /// Exact lookup of a registered path.
    pub fn get(&self, path: &str) -> Option<&RegistryEntry> {
        self.entries.get(&*self.options.comparison_key(path))
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort and freeze into a queryable index.
    pub fn finalize(mut self) -> PathIndex {
        if !self.sorted {
            self.sort();
        }
        PathIndex {
            options: self.options,
            entries: self.entries,
        }
    }
}

/// Sorted, read-only view of a [`Registry`]. Lookups always see the longest
/// registered ancestor first.
#[derive(Debug, Clone)]
pub struct PathIndex {
    options: MatchOptions,
    entries: IndexMap<String, RegistryEntry>,
}

impl PathIndex {
    pub fn find(&self, candidate: &str) -> Option<Match<'_>> {
        lookup(&self.entries, &self.options, candidate)
    }

    pub fn get(&self, path: &str) -> Option<&RegistryEntry> {
        self.entries.get(&*self.options.comparison_key(path))
    }

    /// Entries, longest path first.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }
}

fn lookup<'a>(
    entries: &'a IndexMap<String, RegistryEntry>,
    options: &MatchOptions,
    candidate: &str,
) -> Option<Match<'a>> {
    let candidate_key = options.comparison_key(candidate);
    let hit = matcher::first_match(
        entries.iter().map(|(k, e)| (k.as_str(), e)),
        &candidate_key,
        options.separator,
    );

    match hit {
        Some(e) => tracing::trace!(candidate, matched = e.path(), "lookup hit"),
        None => tracing::trace!(candidate, "lookup miss"),
    }

    hit.map(Match::from)
}
