use serde::{Deserialize, Serialize};

use super::name::QualifiedName;
use crate::index::IndexKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: String,
    /// Raw index configuration stored by the column store, if the column is indexed
    #[serde(default)]
    pub index_options: Option<String>,
}

impl ColumnMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            index_options: None,
        }
    }

    #[must_use]
    pub fn with_index_options(mut self, options: impl Into<String>) -> Self {
        self.index_options = Some(options.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableMetadata {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyspaceMetadata {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

impl KeyspaceMetadata {
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexMetadata {
    pub name: String,
    pub table: QualifiedName,
    pub columns: Vec<String>,
    #[serde(default)]
    pub kind: IndexKind,
}

/// Read-only view of the column store schema.
///
/// Implementations are refreshed outside the front end; validation reads
/// whatever snapshot the provider returns at call time.
pub trait MetadataProvider {
    fn keyspace(&self, name: &str) -> Option<KeyspaceMetadata>;

    /// Resolves `table` against the provider's current keyspace when unqualified.
    fn table(&self, name: &QualifiedName) -> Option<TableMetadata>;

    fn index(&self, name: &str) -> Option<IndexMetadata>;

    fn column(&self, table: &QualifiedName, column: &str) -> Option<ColumnMetadata> {
        self.table(table)
            .and_then(|t| t.column(column).cloned())
    }

    fn raw_index_options(&self, table: &QualifiedName, column: &str) -> Option<String> {
        self.column(table, column).and_then(|c| c.index_options)
    }
}

/// In-memory schema snapshot, loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaCatalog {
    #[serde(default)]
    pub current_keyspace: Option<String>,
    #[serde(default)]
    pub keyspaces: Vec<KeyspaceMetadata>,
    #[serde(default)]
    pub indexes: Vec<IndexMetadata>,
}

impl SchemaCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_current_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.current_keyspace = Some(keyspace.into());
        self
    }

    pub fn add_keyspace(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.keyspaces.iter().all(|k| k.name != name) {
            self.keyspaces.push(KeyspaceMetadata {
                name,
                tables: Vec::new(),
            });
        }
    }

    /// Adds a table, creating its keyspace on first use.
    pub fn add_table(&mut self, keyspace: &str, table: TableMetadata) {
        self.add_keyspace(keyspace);
        if let Some(ks) = self.keyspaces.iter_mut().find(|k| k.name == keyspace) {
            ks.tables.retain(|t| t.name != table.name);
            ks.tables.push(table);
        }
    }

    pub fn add_index(&mut self, index: IndexMetadata) {
        self.indexes.retain(|i| i.name != index.name);
        self.indexes.push(index);
    }

    fn resolve_keyspace<'a>(&'a self, name: &'a QualifiedName) -> Option<&'a str> {
        name.keyspace
            .as_deref()
            .or(self.current_keyspace.as_deref())
    }
}

impl MetadataProvider for SchemaCatalog {
    fn keyspace(&self, name: &str) -> Option<KeyspaceMetadata> {
        self.keyspaces.iter().find(|k| k.name == name).cloned()
    }

    fn table(&self, name: &QualifiedName) -> Option<TableMetadata> {
        match self.resolve_keyspace(name) {
            Some(ks) => self
                .keyspaces
                .iter()
                .find(|k| k.name == ks)
                .and_then(|k| k.table(&name.name))
                .cloned(),
            // No keyspace in scope: first table with that name wins
            None => self
                .keyspaces
                .iter()
                .find_map(|k| k.table(&name.name))
                .cloned(),
        }
    }

    fn index(&self, name: &str) -> Option<IndexMetadata> {
        self.indexes.iter().find(|i| i.name == name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new().with_current_keyspace("app");
        catalog.add_table(
            "app",
            TableMetadata::new(
                "users",
                vec![
                    ColumnMetadata::new("id", "int"),
                    ColumnMetadata::new("bio", "text").with_index_options("{schema: \"{}\"}"),
                ],
            ),
        );
        catalog.add_table("audit", TableMetadata::new("events", vec![ColumnMetadata::new("ts", "timestamp")]));
        catalog
    }

    #[test]
    fn test_unqualified_table_uses_current_keyspace() {
        let catalog = catalog();
        assert!(catalog.table(&QualifiedName::new("users")).is_some());
        assert!(catalog.table(&QualifiedName::new("events")).is_none());
        assert!(catalog.table(&QualifiedName::qualified("audit", "events")).is_some());
    }

    #[test]
    fn test_raw_index_options_lookup() {
        let catalog = catalog();
        let users = QualifiedName::new("users");
        assert_eq!(catalog.raw_index_options(&users, "bio").as_deref(), Some("{schema: \"{}\"}"));
        assert_eq!(catalog.raw_index_options(&users, "id"), None);
        assert_eq!(catalog.raw_index_options(&users, "missing"), None);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "current_keyspace": "app",
            "keyspaces": [{"name": "app", "tables": [{"name": "t", "columns": [{"name": "c", "data_type": "text"}]}]}],
            "indexes": [{"name": "t_c", "table": {"keyspace": "app", "name": "t"}, "columns": ["c"]}]
        }"#;
        let catalog = SchemaCatalog::from_json(json).unwrap();
        assert_eq!(catalog.column(&QualifiedName::new("t"), "c").unwrap().data_type, "text");
        assert_eq!(catalog.index("t_c").unwrap().kind, IndexKind::Default);
    }
}
