use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::index::IndexKind;
use crate::parser::{
    AlterTableOperation, ColumnChange, ColumnDef, ParsedQuery, PrimaryKey, Property, Relation,
    Statement,
};
use crate::types::{MetadataProvider, QualifiedName, TableMetadata, ValidationError, Value};

/// Statement checked against the schema snapshot.
///
/// Only `validate` constructs this type, so the executor cannot be handed an
/// unchecked statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStatement {
    source: String,
    statement: Statement,
    /// Declared type of every column the statement references
    column_types: BTreeMap<String, String>,
}

impl ValidatedStatement {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn statement(&self) -> &Statement {
        &self.statement
    }

    #[must_use]
    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.column_types.get(column).map(String::as_str)
    }
}

#[derive(Clone, Copy)]
enum OptionType {
    Integer,
    Numeric,
    Boolean,
}

impl OptionType {
    const fn label(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
        }
    }

    const fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.as_int().is_some(),
            Self::Numeric => value.is_numeric(),
            Self::Boolean => value.as_bool().is_some(),
        }
    }
}

// Options whose value type is known; anything else passes through untouched
const TYPED_OPTIONS: &[(&str, OptionType)] = &[
    ("gc_grace_seconds", OptionType::Integer),
    ("default_time_to_live", OptionType::Integer),
    ("memtable_flush_period_in_ms", OptionType::Integer),
    ("ttl", OptionType::Integer),
    ("timestamp", OptionType::Integer),
    ("bloom_filter_fp_chance", OptionType::Numeric),
    ("read_repair_chance", OptionType::Numeric),
    ("dclocal_read_repair_chance", OptionType::Numeric),
    ("crc_check_chance", OptionType::Numeric),
    ("durable_writes", OptionType::Boolean),
];

fn check_properties(properties: &[Property]) -> Result<(), ValidationError> {
    for property in properties {
        let typed = TYPED_OPTIONS
            .iter()
            .find(|(name, _)| property.name.eq_ignore_ascii_case(name));
        if let Some((_, expected)) = typed {
            if !expected.accepts(&property.value) {
                return Err(ValidationError::IncompatibleOption {
                    name: property.name.clone(),
                    expected: expected.label(),
                    found: property.value.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn require_keyspace<M: MetadataProvider + ?Sized>(
    metadata: &M,
    keyspace: &str,
) -> Result<(), ValidationError> {
    metadata
        .keyspace(keyspace)
        .map(|_| ())
        .ok_or_else(|| ValidationError::KeyspaceNotFound(keyspace.to_string()))
}

fn require_table<M: MetadataProvider + ?Sized>(
    metadata: &M,
    name: &QualifiedName,
) -> Result<TableMetadata, ValidationError> {
    if let Some(keyspace) = &name.keyspace {
        require_keyspace(metadata, keyspace)?;
    }
    metadata
        .table(name)
        .ok_or_else(|| ValidationError::TableNotFound(name.to_string()))
}

/// Strips a `table.` prefix from a column reference.
fn bare_column(column: &str) -> (Option<&str>, &str) {
    match column.rsplit_once('.') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, column),
    }
}

/// Tracks the columns a statement touches and their declared types
struct ColumnResolver<'a> {
    tables: Vec<(&'a QualifiedName, TableMetadata)>,
    types: BTreeMap<String, String>,
}

impl<'a> ColumnResolver<'a> {
    fn new(name: &'a QualifiedName, table: TableMetadata) -> Self {
        Self {
            tables: vec![(name, table)],
            types: BTreeMap::new(),
        }
    }

    fn join(&mut self, name: &'a QualifiedName, table: TableMetadata) {
        self.tables.push((name, table));
    }

    fn require(&mut self, column: &str) -> Result<(), ValidationError> {
        let (prefix, bare) = bare_column(column);
        let found = self
            .tables
            .iter()
            .filter(|(name, _)| prefix.is_none_or(|p| p == name.name || p == name.to_string()))
            .find_map(|(_, table)| table.column(bare));

        match found {
            Some(meta) => {
                self.types.insert(column.to_string(), meta.data_type.clone());
                Ok(())
            }
            None => Err(ValidationError::ColumnNotFound {
                table: self.tables[0].0.to_string(),
                column: column.to_string(),
            }),
        }
    }

    fn require_all<'c>(
        &mut self,
        columns: impl IntoIterator<Item = &'c str>,
    ) -> Result<(), ValidationError> {
        columns.into_iter().try_for_each(|c| self.require(c))
    }

    fn require_filter(&mut self, filter: &[Relation]) -> Result<(), ValidationError> {
        self.require_all(filter.iter().map(Relation::column))
    }

    fn into_types(self) -> BTreeMap<String, String> {
        self.types
    }
}

fn validate_create_table(
    columns: &[ColumnDef],
    primary_key: Option<&PrimaryKey>,
) -> Result<BTreeMap<String, String>, ValidationError> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(ValidationError::DuplicateColumn(column.name.clone()));
        }
    }

    let inline = columns.iter().filter(|c| c.primary_key).count();
    let declared = inline + usize::from(primary_key.is_some());
    if declared != 1 {
        return Err(ValidationError::PrimaryKeyCount(declared));
    }

    if let Some(pk) = primary_key {
        if let Some(missing) = pk.columns().find(|c| !seen.contains(c.as_str())) {
            return Err(ValidationError::UndeclaredPrimaryKeyColumn(missing.clone()));
        }
    }

    Ok(columns
        .iter()
        .map(|c| (c.name.clone(), c.data_type.clone()))
        .collect())
}

fn validate_alter_table(
    name: &QualifiedName,
    table: &TableMetadata,
    operation: &AlterTableOperation,
) -> Result<BTreeMap<String, String>, ValidationError> {
    match operation {
        AlterTableOperation::Columns(changes) => {
            let mut types = BTreeMap::new();
            for change in changes {
                match change {
                    ColumnChange::Add { column, data_type } => {
                        if table.column(column).is_some() {
                            return Err(ValidationError::ColumnAlreadyExists {
                                table: name.to_string(),
                                column: column.clone(),
                            });
                        }
                        types.insert(column.clone(), data_type.clone());
                    }
                    ColumnChange::Alter { column, data_type } => {
                        if table.column(column).is_none() {
                            return Err(ValidationError::ColumnNotFound {
                                table: name.to_string(),
                                column: column.clone(),
                            });
                        }
                        types.insert(column.clone(), data_type.clone());
                    }
                    ColumnChange::Drop(column) => {
                        let meta = table.column(column).ok_or_else(|| {
                            ValidationError::ColumnNotFound {
                                table: name.to_string(),
                                column: column.clone(),
                            }
                        })?;
                        types.insert(column.clone(), meta.data_type.clone());
                    }
                }
            }
            Ok(types)
        }
        AlterTableOperation::Properties(properties) => {
            check_properties(properties)?;
            Ok(BTreeMap::new())
        }
    }
}

/// Checks a parsed statement against the schema snapshot of `metadata`.
///
/// # Errors
///
/// Returns the first violated rule: unknown keyspace, table, column or index,
/// an object that already exists, a malformed primary key, or an option value
/// of the wrong type.
pub fn validate<M: MetadataProvider + ?Sized>(
    parsed: ParsedQuery,
    metadata: &M,
) -> Result<ValidatedStatement, ValidationError> {
    let ParsedQuery { source, statement } = parsed;

    let column_types = match &statement {
        Statement::CreateKeyspace {
            name,
            if_not_exists,
            properties,
        } => {
            if !if_not_exists && metadata.keyspace(name).is_some() {
                return Err(ValidationError::KeyspaceAlreadyExists(name.clone()));
            }
            check_properties(properties)?;
            BTreeMap::new()
        }
        Statement::CreateTable {
            name,
            if_not_exists,
            columns,
            primary_key,
            properties,
        } => {
            if let Some(keyspace) = &name.keyspace {
                require_keyspace(metadata, keyspace)?;
            }
            if !if_not_exists && metadata.table(name).is_some() {
                return Err(ValidationError::TableAlreadyExists(name.to_string()));
            }
            let types = validate_create_table(columns, primary_key.as_ref())?;
            check_properties(properties)?;
            types
        }
        Statement::AlterTable { name, operation } => {
            let table = require_table(metadata, name)?;
            validate_alter_table(name, &table, operation)?
        }
        Statement::CreateIndex {
            kind,
            if_not_exists,
            name,
            table,
            fields,
            using,
            options,
        } => {
            let mut resolver = ColumnResolver::new(table, require_table(metadata, table)?);
            resolver.require_all(fields.iter().map(String::as_str))?;

            if let Some(index) = name {
                if !if_not_exists && metadata.index(index).is_some() {
                    return Err(ValidationError::IndexAlreadyExists(index.clone()));
                }
            }
            if *kind == Some(IndexKind::Custom) && using.is_none() {
                return Err(ValidationError::MissingIndexClass);
            }
            let custom_kind = matches!(kind, Some(IndexKind::Custom | IndexKind::FullText));
            if !options.is_empty() && using.is_none() && !custom_kind {
                return Err(ValidationError::OptionsWithoutIndexClass);
            }
            check_properties(options)?;
            resolver.into_types()
        }
        Statement::DropIndex { if_exists, name } => {
            if !if_exists && metadata.index(name).is_none() {
                return Err(ValidationError::IndexNotFound(name.clone()));
            }
            BTreeMap::new()
        }
        Statement::AddResource { locator } | Statement::RemoveResource { locator } => {
            if locator.trim().is_empty() {
                return Err(ValidationError::EmptyLocator);
            }
            BTreeMap::new()
        }
        Statement::ListResources { .. } | Statement::StopProcess { .. } => BTreeMap::new(),
        Statement::Delete {
            columns,
            from,
            filter,
        } => {
            let mut resolver = ColumnResolver::new(from, require_table(metadata, from)?);
            resolver.require_all(columns.iter().map(String::as_str))?;
            resolver.require_filter(filter)?;
            resolver.into_types()
        }
        Statement::Update {
            table,
            using,
            assignments,
            filter,
        } => {
            let mut resolver = ColumnResolver::new(table, require_table(metadata, table)?);
            resolver.require_all(assignments.iter().map(|(c, _)| c.as_str()))?;
            resolver.require_filter(filter)?;
            check_properties(using)?;
            resolver.into_types()
        }
        Statement::Select {
            columns,
            from,
            join,
            filter,
            ..
        } => {
            let mut resolver = ColumnResolver::new(from, require_table(metadata, from)?);
            if let Some(join) = join {
                resolver.join(&join.table, require_table(metadata, &join.table)?);
                resolver.require(&join.on_left)?;
                resolver.require(&join.on_right)?;
            }
            resolver.require_all(columns.iter().map(String::as_str).filter(|c| *c != "*"))?;
            resolver.require_filter(filter)?;
            resolver.into_types()
        }
        Statement::CreateTrigger { table, .. } | Statement::DropTrigger { table, .. } => {
            require_table(metadata, table)?;
            BTreeMap::new()
        }
    };

    debug!(statement = %statement, "validated");
    Ok(ValidatedStatement {
        source,
        statement,
        column_types,
    })
}
