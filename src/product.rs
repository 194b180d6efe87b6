use std::hash::{Hash, Hasher};

/// A registrable product: stable key plus display name and version.
///
/// Equality and hashing look at the key only.
#[derive(Debug, Clone, Default)]
pub struct ProductRecord {
    key: String,
    name: String,
    version: String,
}

impl ProductRecord {
    pub fn new(key: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The empty record stored on a path claimed by more than one product.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_placeholder(&self) -> bool {
        self.key.is_empty()
    }
}

impl PartialEq for ProductRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ProductRecord {}

impl Hash for ProductRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
