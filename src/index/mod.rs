/// Secondary index metadata
///
/// The column store keeps custom index configuration as a string column value
/// whose `schema` entry is itself an escaped JSON document. `extract` turns that
/// payload into one descriptor per indexed field.
pub mod extract;

pub use extract::{extract_index_metadata, index_fields, unwrap_escaped_json};

use crate::core::ColumnRef;
use serde::{Deserialize, Serialize};

/// Index kind: default inverted (hash), full-text or custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    /// Inverted index on the column value, equality lookups only
    Default,
    /// Full-text index backed by an analyzer class
    FullText,
    /// Index implemented by a user-supplied class
    Custom,
}

impl Default for IndexKind {
    fn default() -> Self {
        Self::Default
    }
}

impl IndexKind {
    /// Keyword used by the dialect
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Default => "HASH",
            Self::FullText => "FULLTEXT",
            Self::Custom => "CUSTOM",
        }
    }
}

/// One indexed field of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub column: ColumnRef,
    pub kind: IndexKind,
    /// Field configuration as JSON text
    pub options: String,
}

impl IndexDescriptor {
    #[must_use]
    pub const fn new(column: ColumnRef, kind: IndexKind, options: String) -> Self {
        Self {
            column,
            kind,
            options,
        }
    }
}
