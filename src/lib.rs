//! Longest-prefix registry mapping directory paths to products.
//!
//! Register `(product, directory)` pairs in a [`Registry`], then
//! [`Registry::finalize`] it into a [`PathIndex`] and ask which registered
//! directory is the most specific ancestor of a file path.
//!
//! ```
//! use prodpaths::{ProductRecord, Registry};
//!
//! let mut reg = Registry::new();
//! reg.insert(ProductRecord::new("D", "Base", "1.0"), r"C:\Program Files").unwrap();
//! reg.insert(ProductRecord::new("C", "App", "3.0"), r"C:\Program Files\My Company\My Product").unwrap();
//!
//! let index = reg.finalize();
//! let hit = index.find(r"C:\Program Files\My Company\My Product\test1.exe").unwrap();
//! assert_eq!(hit.product.key(), "C");
//! assert!(index.find(r"C:\Program FilesXtra\app.exe").is_none());
//! ```

pub mod manifest;
pub mod matcher;
pub mod product;
pub mod registry;

pub use matcher::{path_starts_with_boundary, CaseMode, Match, MatchOptions, DEFAULT_SEPARATOR};
pub use product::ProductRecord;
pub use registry::{
    ConflictPolicy, EntryState, InsertOutcome, PathIndex, Registry, RegistryEntry, RegistryError,
};
