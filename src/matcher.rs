use std::borrow::Cow;

use crate::product::ProductRecord;
use crate::registry::RegistryEntry;

pub const DEFAULT_SEPARATOR: char = '\\';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseMode {
    #[default]
    Sensitive,
    /// Both sides are lowercased (Unicode) before comparing.
    Insensitive,
}

/// How registered paths and candidates are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub separator: char,
    pub case: CaseMode,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            case: CaseMode::Sensitive,
        }
    }
}

impl MatchOptions {
    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.case = if yes {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        };
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// The form of `path` that comparisons actually run on.
    ///
    /// Folding is per character, so the key of a prefix is always a prefix
    /// of the key of any longer string. `str::to_lowercase` is context
    /// sensitive (final sigma) and breaks that.
    pub fn comparison_key<'a>(&self, path: &'a str) -> Cow<'a, str> {
        match self.case {
            CaseMode::Sensitive => Cow::Borrowed(path),
            CaseMode::Insensitive => Cow::Owned(path.chars().flat_map(char::to_lowercase).collect()),
        }
    }

    /// Boundary-aware prefix test under these options.
    pub fn starts_with_boundary(&self, candidate: &str, registered_prefix: &str) -> bool {
        let candidate = self.comparison_key(candidate);
        let prefix = self.comparison_key(registered_prefix);
        starts_with_path_prefix(&candidate, &prefix, self.separator)
    }
}

/// A lookup hit: the entry whose registered path is the matching ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub path: &'a str,
    pub product: &'a ProductRecord,
    pub has_conflict: bool,
}

impl<'a> From<&'a RegistryEntry> for Match<'a> {
    fn from(e: &'a RegistryEntry) -> Self {
        Match {
            path: e.path(),
            product: e.product(),
            has_conflict: e.has_conflict(),
        }
    }
}

/// `C:\Program Files` matches `C:\Program Files` and `C:\Program Files\app.exe`
/// but not `C:\Program FilesXtra\app.exe`.
///
/// Uses the default options: `\` separator, case-sensitive.
pub fn path_starts_with_boundary(candidate: &str, registered_prefix: &str) -> bool {
    starts_with_path_prefix(candidate, registered_prefix, DEFAULT_SEPARATOR)
}

// A single trailing separator on the prefix is ignored, so `C:\Foo\` and
// `C:\Foo` accept exactly the same candidates. A trimmed prefix that is empty
// or still ends in a separator (`\`, `C:\Foo\\`) only matches itself exactly.
pub(crate) fn starts_with_path_prefix(path: &str, prefix: &str, sep: char) -> bool {
    if path == prefix {
        return true;
    }

    let trimmed = prefix.strip_suffix(sep).unwrap_or(prefix);
    let Some(rest) = path.strip_prefix(trimmed) else {
        return false;
    };

    // boundary check: exact match on a plain directory, or next char is the separator
    if rest.is_empty() {
        return !trimmed.is_empty() && !trimmed.ends_with(sep);
    }
    rest.starts_with(sep)
}

/// First entry, in iteration order, whose registered path is a
/// boundary-respecting prefix of `candidate_key`.
///
/// `candidate_key` must already be in comparison form, see
/// [`MatchOptions::comparison_key`].
pub(crate) fn first_match<'a, I>(entries: I, candidate_key: &str, sep: char) -> Option<&'a RegistryEntry>
where
    I: IntoIterator<Item = (&'a str, &'a RegistryEntry)>,
{
    entries
        .into_iter()
        .find(|(key, _)| starts_with_path_prefix(candidate_key, key, sep))
        .map(|(_, e)| e)
}
