//! Statement → native query.
//!
//! SELECT, DELETE and UPDATE go through a structured builder so hints can be
//! applied without re-parsing text; every other native statement is rendered
//! directly as query text.

use std::fmt::{self, Display, Formatter};

use serde_json::json;
use thiserror::Error;

use super::validate::ValidatedStatement;
use crate::config::FrontendConfig;
use crate::index::IndexKind;
use crate::parser::{AlterTableOperation, ColumnChange, Property, Relation, Statement};
use crate::types::{QualifiedName, Value};

/// Per-attempt modifiers; never stored on the statement itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionHints {
    pub allow_filtering: bool,
}

impl ExecutionHints {
    #[must_use]
    pub const fn with_allow_filtering(self) -> Self {
        Self {
            allow_filtering: true,
        }
    }
}

/// Statement has no native counterpart and must run on the distributed engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not supported by the native engine")]
pub struct Unsupported(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltStatement {
    Select {
        columns: Vec<String>,
        from: QualifiedName,
        filter: Vec<Relation>,
        limit: Option<u64>,
        allow_filtering: bool,
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
}

/// Query handed to the native engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeQuery {
    Built(BuiltStatement),
    Text(String),
}

fn relation_cql(relation: &Relation) -> String {
    match relation {
        Relation::Compare { column, op, value } => {
            format!("{column} {} {}", op.as_str(), value.to_cql())
        }
        Relation::In { column, values } => {
            let values: Vec<String> = values.iter().map(Value::to_cql).collect();
            format!("{column} IN ({})", values.join(", "))
        }
    }
}

fn where_cql(filter: &[Relation]) -> String {
    if filter.is_empty() {
        return String::new();
    }
    let relations: Vec<String> = filter.iter().map(relation_cql).collect();
    format!(" WHERE {}", relations.join(" AND "))
}

fn properties_cql(properties: &[Property]) -> String {
    properties
        .iter()
        .map(|p| format!("{} = {}", p.name, p.value.to_cql()))
        .collect::<Vec<_>>()
        .join(" AND ")
}

impl Display for BuiltStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select {
                columns,
                from,
                filter,
                limit,
                allow_filtering,
            } => {
                write!(f, "SELECT {} FROM {from}{}", columns.join(", "), where_cql(filter))?;
                if let Some(n) = limit {
                    write!(f, " LIMIT {n}")?;
                }
                if *allow_filtering {
                    write!(f, " ALLOW FILTERING")?;
                }
                Ok(())
            }
            Self::Delete {
                columns,
                from,
                filter,
            } => {
                write!(f, "DELETE ")?;
                if !columns.is_empty() {
                    write!(f, "{} ", columns.join(", "))?;
                }
                write!(f, "FROM {from}{}", where_cql(filter))
            }
            Self::Update {
                table,
                using,
                assignments,
                filter,
            } => {
                write!(f, "UPDATE {table}")?;
                if !using.is_empty() {
                    let using: Vec<String> = using
                        .iter()
                        .map(|p| format!("{} {}", p.name.to_uppercase(), p.value.to_cql()))
                        .collect();
                    write!(f, " USING {}", using.join(" AND "))?;
                }
                let sets: Vec<String> = assignments
                    .iter()
                    .map(|(column, value)| format!("{column} = {}", value.to_cql()))
                    .collect();
                write!(f, " SET {}{}", sets.join(", "), where_cql(filter))
            }
        }
    }
}

impl Display for NativeQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Built(built) => write!(f, "{built}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

fn if_not_exists_cql(flag: bool) -> &'static str {
    if flag { "IF NOT EXISTS " } else { "" }
}

/// Single column change of an ALTER TABLE
pub(crate) fn column_change_cql(table: &QualifiedName, change: &ColumnChange) -> String {
    match change {
        ColumnChange::Alter { column, data_type } => {
            format!("ALTER TABLE {table} ALTER {column} TYPE {data_type}")
        }
        ColumnChange::Add { column, data_type } => {
            format!("ALTER TABLE {table} ADD {column} {data_type}")
        }
        ColumnChange::Drop(column) => format!("ALTER TABLE {table} DROP {column}"),
    }
}

// Column type → field type understood by the full-text index schema
fn fulltext_field_type(data_type: &str) -> &'static str {
    match data_type.to_ascii_lowercase().as_str() {
        "text" | "varchar" | "ascii" => "text",
        "int" | "smallint" | "tinyint" => "integer",
        "bigint" | "varint" | "counter" => "bigint",
        "float" => "float",
        "double" | "decimal" => "double",
        "boolean" => "boolean",
        "timestamp" | "date" => "date",
        "uuid" | "timeuuid" => "uuid",
        _ => "string",
    }
}

fn option_entry(property: &Property) -> String {
    let raw = match &property.value {
        Value::Identifier(s) | Value::Text(s) => s.clone(),
        other => other.to_string(),
    };
    format!("{}: {}", Value::Text(property.name.clone()).to_cql(), Value::Text(raw).to_cql())
}

fn quoted_class(class: &str) -> String {
    if class.starts_with('\'') {
        class.to_string()
    } else {
        Value::Text(class.to_string()).to_cql()
    }
}

fn create_index_cql(
    statement: &ValidatedStatement,
    config: &FrontendConfig,
) -> Option<String> {
    let Statement::CreateIndex {
        kind,
        if_not_exists,
        name,
        table,
        fields,
        using,
        options,
    } = statement.statement()
    else {
        return None;
    };

    // An index class turns any index into a custom one on the native side
    let custom = using.is_some() || matches!(kind, Some(IndexKind::FullText | IndexKind::Custom));
    let mut cql = format!("CREATE {}INDEX {}", if custom { "CUSTOM " } else { "" }, if_not_exists_cql(*if_not_exists));
    if let Some(name) = name {
        cql.push_str(name);
        cql.push(' ');
    }
    cql.push_str(&format!("ON {table} ({})", fields.join(", ")));

    let mut entries: Vec<String> = options.iter().map(option_entry).collect();
    if *kind == Some(IndexKind::FullText) {
        let class = using.as_deref().unwrap_or(&config.fulltext_index_class);
        cql.push_str(&format!(" USING {}", quoted_class(class)));

        if !options.iter().any(|p| p.name.eq_ignore_ascii_case("schema")) {
            let schema: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|f| {
                    let field_type = fulltext_field_type(statement.column_type(f).unwrap_or(""));
                    (f.clone(), json!({ "type": field_type }))
                })
                .collect();
            let schema = json!({ "fields": schema }).to_string();
            entries.push(option_entry(&Property::new("schema", Value::Text(schema))));
        }
    } else if let Some(class) = using {
        cql.push_str(&format!(" USING {}", quoted_class(class)));
    }

    if custom && !entries.is_empty() {
        cql.push_str(&format!(" WITH OPTIONS = {{{}}}", entries.join(", ")));
    }
    Some(cql)
}

/// One native submission: a statement plus the hints it is sent with
#[derive(Debug, Clone, Copy)]
pub struct Attempt<'a> {
    pub statement: &'a ValidatedStatement,
    pub hints: ExecutionHints,
}

impl<'a> Attempt<'a> {
    #[must_use]
    pub const fn new(statement: &'a ValidatedStatement, hints: ExecutionHints) -> Self {
        Self { statement, hints }
    }

    /// Builds the native query for this attempt.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for statements the native engine cannot run:
    /// joins, ALTER TABLE with several column changes, and resource, process
    /// or trigger commands.
    pub fn translate(&self, config: &FrontendConfig) -> Result<NativeQuery, Unsupported> {
        let query = match self.statement.statement() {
            Statement::CreateKeyspace {
                name,
                if_not_exists,
                properties,
            } => NativeQuery::Text(format!(
                "CREATE KEYSPACE {}{name} WITH {}",
                if_not_exists_cql(*if_not_exists),
                properties_cql(properties)
            )),
            Statement::CreateTable {
                name,
                if_not_exists,
                columns,
                primary_key,
                properties,
            } => {
                let columns: Vec<String> = columns.iter().map(ToString::to_string).collect();
                let mut cql = format!(
                    "CREATE TABLE {}{name} ({}",
                    if_not_exists_cql(*if_not_exists),
                    columns.join(", ")
                );
                if let Some(pk) = primary_key {
                    cql.push_str(&format!(", PRIMARY KEY {pk}"));
                }
                cql.push(')');
                if !properties.is_empty() {
                    cql.push_str(&format!(" WITH {}", properties_cql(properties)));
                }
                NativeQuery::Text(cql)
            }
            Statement::AlterTable { name, operation } => match operation {
                AlterTableOperation::Columns(changes) => match changes.as_slice() {
                    [change] => NativeQuery::Text(column_change_cql(name, change)),
                    _ => return Err(Unsupported("ALTER TABLE with several column changes".to_string())),
                },
                AlterTableOperation::Properties(properties) => NativeQuery::Text(format!(
                    "ALTER TABLE {name} WITH {}",
                    properties_cql(properties)
                )),
            },
            Statement::CreateIndex { .. } => create_index_cql(self.statement, config)
                .map(NativeQuery::Text)
                .ok_or_else(|| Unsupported("CREATE INDEX".to_string()))?,
            Statement::DropIndex { if_exists, name } => NativeQuery::Text(format!(
                "DROP INDEX {}{name}",
                if *if_exists { "IF EXISTS " } else { "" }
            )),
            Statement::AddResource { .. } => return Err(Unsupported("ADD".to_string())),
            Statement::ListResources { kind } => return Err(Unsupported(format!("LIST {kind}"))),
            Statement::RemoveResource { .. } => return Err(Unsupported("REMOVE UDF".to_string())),
            Statement::StopProcess { .. } => return Err(Unsupported("STOP PROCESS".to_string())),
            Statement::CreateTrigger { .. } => return Err(Unsupported("CREATE TRIGGER".to_string())),
            Statement::DropTrigger { .. } => return Err(Unsupported("DROP TRIGGER".to_string())),
            Statement::Delete {
                columns,
                from,
                filter,
            } => NativeQuery::Built(BuiltStatement::Delete {
                columns: columns.clone(),
                from: from.clone(),
                filter: filter.clone(),
            }),
            Statement::Update {
                table,
                using,
                assignments,
                filter,
            } => NativeQuery::Built(BuiltStatement::Update {
                table: table.clone(),
                using: using.clone(),
                assignments: assignments.clone(),
                filter: filter.clone(),
            }),
            Statement::Select { join: Some(_), .. } => {
                return Err(Unsupported("JOIN".to_string()));
            }
            Statement::Select {
                columns,
                from,
                join: None,
                filter,
                limit,
            } => NativeQuery::Built(BuiltStatement::Select {
                columns: columns.clone(),
                from: from.clone(),
                filter: filter.clone(),
                limit: *limit,
                allow_filtering: self.hints.allow_filtering,
            }),
        };
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::validate;
    use crate::parser::parse_query;
    use crate::types::{ColumnMetadata, SchemaCatalog, TableMetadata};

    fn catalog() -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new().with_current_keyspace("app");
        catalog.add_table(
            "app",
            TableMetadata::new(
                "users",
                vec![
                    ColumnMetadata::new("id", "int"),
                    ColumnMetadata::new("name", "text"),
                    ColumnMetadata::new("age", "int"),
                ],
            ),
        );
        catalog
    }

    fn translate(sql: &str, hints: ExecutionHints) -> Result<NativeQuery, Unsupported> {
        let validated = validate(parse_query(sql).unwrap(), &catalog()).unwrap();
        Attempt::new(&validated, hints).translate(&FrontendConfig::default())
    }

    fn text(sql: &str) -> String {
        translate(sql, ExecutionHints::default()).unwrap().to_string()
    }

    #[test]
    fn test_select_hint_toggles_filtering() {
        let sql = "SELECT * FROM users WHERE name = 'x'";
        assert_eq!(text(sql), "SELECT * FROM users WHERE name = 'x'");
        let retried = translate(sql, ExecutionHints::default().with_allow_filtering()).unwrap();
        assert_eq!(retried.to_string(), "SELECT * FROM users WHERE name = 'x' ALLOW FILTERING");
    }

    #[test]
    fn test_select_limit_and_in() {
        assert_eq!(
            text("SELECT id, name FROM users WHERE id IN (1, 2) LIMIT 10"),
            "SELECT id, name FROM users WHERE id IN (1, 2) LIMIT 10"
        );
    }

    #[test]
    fn test_update_and_delete_built() {
        assert_eq!(
            text("UPDATE users USING ttl 400 SET name = bob, age = 3 WHERE id = 1"),
            "UPDATE users USING TTL 400 SET name = 'bob', age = 3 WHERE id = 1"
        );
        assert_eq!(
            text("DELETE (name, age) FROM users WHERE id = 1"),
            "DELETE name, age FROM users WHERE id = 1"
        );
    }

    #[test]
    fn test_ddl_text() {
        assert_eq!(
            text("CREATE KEYSPACE IF NOT EXISTS ks WITH durable_writes = false"),
            "CREATE KEYSPACE IF NOT EXISTS ks WITH durable_writes = false"
        );
        assert_eq!(
            text("create table t (a text, b int, primary key ((a, b))) with gc_grace_seconds = 10"),
            "CREATE TABLE t (a text, b int, PRIMARY KEY ((a, b))) WITH gc_grace_seconds = 10"
        );
        assert_eq!(text("alter table users drop age"), "ALTER TABLE users DROP age");
        assert_eq!(
            text("CREATE KEYSPACE ks WITH replication = {class: SimpleStrategy, replication_factor : 3}"),
            "CREATE KEYSPACE ks WITH replication = {'class': 'SimpleStrategy', 'replication_factor': 3}"
        );
    }

    #[test]
    fn test_fulltext_index_generates_schema() {
        let cql = text("CREATE FULLTEXT INDEX users_idx ON users (name, age)");
        assert_eq!(
            cql,
            "CREATE CUSTOM INDEX users_idx ON users (name, age) USING 'com.stratio.cassandra.index.RowIndex' \
             WITH OPTIONS = {'schema': '{\"fields\":{\"age\":{\"type\":\"integer\"},\"name\":{\"type\":\"text\"}}}'}"
        );
    }

    #[test]
    fn test_custom_index_options() {
        let cql = text("CREATE CUSTOM INDEX ON users (name) USING com.company.Index WITH OPTIONS mode = prefix");
        assert_eq!(
            cql,
            "CREATE CUSTOM INDEX ON users (name) USING 'com.company.Index' WITH OPTIONS = {'mode': 'prefix'}"
        );
        assert_eq!(text("CREATE INDEX ON users (name)"), "CREATE INDEX ON users (name)");
    }

    #[test]
    fn test_hash_index_with_class_keeps_clauses() {
        let cql = text(
            "CREATE HASH INDEX users_hash ON users (name, age) USING com.company.Index.class WITH OPTIONS opt1=val1 AND opt2=val2",
        );
        assert_eq!(
            cql,
            "CREATE CUSTOM INDEX users_hash ON users (name, age) USING 'com.company.Index.class' \
             WITH OPTIONS = {'opt1': 'val1', 'opt2': 'val2'}"
        );
        assert_eq!(
            text("CREATE INDEX ON users (age) USING 'org.Idx'"),
            "CREATE CUSTOM INDEX ON users (age) USING 'org.Idx'"
        );
    }

    #[test]
    fn test_unsupported_statements() {
        let hints = ExecutionHints::default();
        assert!(translate("alter table users add a int, add b int", hints).is_err());
        assert!(translate("LIST PROCESS", hints).is_err());
        assert!(translate("Stop process p1", hints).is_err());
        assert!(translate("create trigger tr on users using com.x.Trigger", hints).is_err());
    }
}
