use serde::{Deserialize, Serialize};

/// `table` or `keyspace.table`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub keyspace: Option<String>,
    pub name: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            keyspace: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn qualified(keyspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyspace: Some(keyspace.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.keyspace {
            Some(ks) => write!(f, "{ks}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Column of a specific table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: QualifiedName,
    pub name: String,
}

impl ColumnRef {
    #[must_use]
    pub fn new(table: QualifiedName, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}
