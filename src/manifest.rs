//! Line-oriented registration list used by the CLI.
//!
//! Format, one registration per line:
//!
//! ```text
//! # key | name | version | path
//! AAAA|Product 1|1.00.0000|C:\Program Files
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Fields are trimmed.

use thiserror::Error;

use crate::product::ProductRecord;
use crate::registry::{InsertOutcome, Registry, RegistryError};

const FIELD_SEP: char = '|';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("line {line}: expected 4 '|'-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: product key is empty")]
    EmptyKey { line: usize },

    #[error("line {line}: {source}")]
    Registry {
        line: usize,
        #[source]
        source: RegistryError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub line: usize,
    pub product: ProductRecord,
    pub path: String,
}

pub fn parse(text: &str) -> Result<Vec<Registration>, ManifestError> {
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(FIELD_SEP).map(str::trim).collect();
        let &[key, name, version, path] = &fields[..] else {
            return Err(ManifestError::FieldCount {
                line,
                found: fields.len(),
            });
        };

        if key.is_empty() {
            return Err(ManifestError::EmptyKey { line });
        }

        out.push(Registration {
            line,
            product: ProductRecord::new(key, name, version),
            path: path.to_string(),
        });
    }

    Ok(out)
}

/// Parse `text` and insert every registration into `registry`, in order.
///
/// Returns the number of registrations that ended in a conflict.
pub fn load_into(registry: &mut Registry, text: &str) -> Result<usize, ManifestError> {
    let mut conflicts = 0usize;

    for reg in parse(text)? {
        let outcome = registry
            .insert(reg.product, &reg.path)
            .map_err(|source| ManifestError::Registry {
                line: reg.line,
                source,
            })?;
        if outcome == InsertOutcome::Conflicted {
            conflicts += 1;
        }
    }

    tracing::debug!(entries = registry.len(), conflicts, "manifest loaded");
    Ok(conflicts)
}
