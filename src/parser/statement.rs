use crate::index::IndexKind;
use crate::types::{QualifiedName, Value};

/// One parsed statement of the dialect.
///
/// Rendering (`Display`) gives the canonical form; see `render.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateKeyspace {
        name: String,
        if_not_exists: bool,
        properties: Vec<Property>,
    },
    CreateTable {
        name: QualifiedName,
        if_not_exists: bool,
        columns: Vec<ColumnDef>,
        primary_key: Option<PrimaryKey>,
        properties: Vec<Property>,
    },
    AlterTable {
        name: QualifiedName,
        operation: AlterTableOperation,
    },
    CreateIndex {
        /// None when the statement omits the kind keyword
        kind: Option<IndexKind>,
        if_not_exists: bool,
        name: Option<String>,
        table: QualifiedName,
        fields: Vec<String>,
        using: Option<String>,
        options: Vec<Property>,
    },
    DropIndex {
        if_exists: bool,
        name: String,
    },
    AddResource {
        locator: String,
    },
    ListResources {
        kind: ResourceKind,
    },
    RemoveResource {
        locator: String,
    },
    Delete {
        columns: Vec<String>,
        from: QualifiedName,
        filter: Vec<Relation>,
    },
    Update {
        table: QualifiedName,
        using: Vec<Property>,
        assignments: Vec<(String, Value)>,
        filter: Vec<Relation>,
    },
    Select {
        /// `*` selects every column
        columns: Vec<String>,
        from: QualifiedName,
        join: Option<JoinClause>,
        filter: Vec<Relation>,
        limit: Option<u64>,
    },
    StopProcess {
        process: String,
    },
    CreateTrigger {
        name: String,
        table: QualifiedName,
        class: String,
    },
    DropTrigger {
        name: String,
        table: QualifiedName,
    },
}

impl Statement {
    /// Whether a retry with the scan-permission hint can change the native query
    #[must_use]
    pub const fn accepts_filtering_hint(&self) -> bool {
        matches!(self, Self::Select { .. })
    }
}

/// `name = value` entry of a WITH / OPTIONS / USING list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Looks up a property by case-insensitive name
#[must_use]
pub fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Value> {
    properties
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| &p.value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    /// Declared type as written, e.g. `int`
    pub data_type: String,
    pub primary_key: bool,
}

/// `PRIMARY KEY (a, b)` or `PRIMARY KEY ((a, b), c)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub partition: Vec<String>,
    pub clustering: Vec<String>,
}

impl PrimaryKey {
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.partition.iter().chain(self.clustering.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableOperation {
    Columns(Vec<ColumnChange>),
    Properties(Vec<Property>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnChange {
    Alter { column: String, data_type: String },
    Add { column: String, data_type: String },
    Drop(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Process,
    Udf,
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl Operator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
        }
    }
}

/// One conjunct of a WHERE clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    Compare {
        column: String,
        op: Operator,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
}

impl Relation {
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Compare { column, .. } | Self::In { column, .. } => column,
        }
    }
}

/// `INNER JOIN table ON left.col = right.col`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub table: QualifiedName,
    pub on_left: String,
    pub on_right: String,
}

/// Statement together with the text it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub source: String,
    pub statement: Statement,
}
