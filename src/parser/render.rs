//! Canonical text of statements.
//!
//! Keywords of keyspace, index, resource and DML statements render upper-case;
//! table, trigger and process statements use the capitalised short form
//! (`Create table`, `Stop process`). Clauses are separated by single spaces.

use std::fmt::{self, Display, Formatter, Write};

use super::statement::{
    AlterTableOperation, ColumnChange, ColumnDef, JoinClause, PrimaryKey, Property, Relation,
    ResourceKind, Statement,
};

fn join<T: Display>(items: &[T], sep: &str) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        let _ = write!(out, "{item}");
    }
    out
}

/// `p = v AND p = v`
fn assignment_list(properties: &[Property], eq: &str) -> String {
    properties
        .iter()
        .map(|p| format!("{}{eq}{}", p.name, p.value))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// ` with:` block, one tab-indented `name: value` line per property
fn property_block(properties: &[Property]) -> String {
    let mut out = String::from(" with:");
    for p in properties {
        let _ = write!(out, "\n\t{}: {}", p.name, p.value);
    }
    out
}

fn where_clause(filter: &[Relation]) -> String {
    if filter.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", join(filter, " AND "))
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { column, op, value } => write!(f, "{column} {} {value}", op.as_str()),
            Self::In { column, values } => write!(f, "{column} IN ({})", join(values, ", ")),
        }
    }
}

impl Display for ColumnDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.primary_key {
            write!(f, " PRIMARY KEY")?;
        }
        Ok(())
    }
}

impl Display for PrimaryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        if self.partition.len() > 1 {
            write!(f, "({})", join(&self.partition, ", "))?;
        } else {
            write!(f, "{}", join(&self.partition, ", "))?;
        }
        for column in &self.clustering {
            write!(f, ", {column}")?;
        }
        write!(f, ")")
    }
}

impl Display for ColumnChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alter { column, data_type } => write!(f, "alter {column} type {data_type}"),
            Self::Add { column, data_type } => write!(f, "add {column} {data_type}"),
            Self::Drop(column) => write!(f, "drop {column}"),
        }
    }
}

impl Display for JoinClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "INNER JOIN {} ON {} = {}", self.table, self.on_left, self.on_right)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Process => "PROCESS",
            Self::Udf => "UDF",
            Self::Trigger => "TRIGGER",
        })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateKeyspace {
                name,
                if_not_exists,
                properties,
            } => {
                write!(f, "CREATE KEYSPACE ")?;
                if *if_not_exists {
                    write!(f, "IF NOT EXISTS ")?;
                }
                write!(f, "{name} WITH {}", assignment_list(properties, " = "))
            }
            Self::CreateTable {
                name,
                if_not_exists,
                columns,
                primary_key,
                properties,
            } => {
                write!(f, "Create table ")?;
                if *if_not_exists {
                    write!(f, "IF NOT EXISTS ")?;
                }
                write!(f, "{name}({}", join(columns, ", "))?;
                if let Some(pk) = primary_key {
                    write!(f, ", PRIMARY KEY {pk}")?;
                }
                write!(f, ")")?;
                if !properties.is_empty() {
                    f.write_str(&property_block(properties))?;
                }
                Ok(())
            }
            Self::AlterTable { name, operation } => {
                write!(f, "Alter table {name}")?;
                match operation {
                    AlterTableOperation::Columns(changes) => write!(f, " {}", join(changes, ", ")),
                    AlterTableOperation::Properties(properties) => {
                        f.write_str(&property_block(properties))
                    }
                }
            }
            Self::CreateIndex {
                kind,
                if_not_exists,
                name,
                table,
                fields,
                using,
                options,
            } => {
                write!(f, "CREATE ")?;
                if let Some(kind) = kind {
                    write!(f, "{} ", kind.keyword())?;
                }
                write!(f, "INDEX ")?;
                if *if_not_exists {
                    write!(f, "IF NOT EXISTS ")?;
                }
                if let Some(name) = name {
                    write!(f, "{name} ")?;
                }
                write!(f, "ON {table} ({})", join(fields, ", "))?;
                if let Some(class) = using {
                    write!(f, " USING {class}")?;
                }
                if !options.is_empty() {
                    write!(f, " WITH OPTIONS {}", assignment_list(options, "="))?;
                }
                Ok(())
            }
            Self::DropIndex { if_exists, name } => {
                write!(f, "DROP INDEX ")?;
                if *if_exists {
                    write!(f, "IF EXISTS ")?;
                }
                write!(f, "{name}")
            }
            Self::AddResource { locator } => write!(f, "ADD \"{locator}\""),
            Self::ListResources { kind } => write!(f, "LIST {kind}"),
            Self::RemoveResource { locator } => write!(f, "REMOVE UDF \"{locator}\""),
            Self::Delete {
                columns,
                from,
                filter,
            } => {
                write!(f, "DELETE ")?;
                if !columns.is_empty() {
                    write!(f, "({}) ", join(columns, ", "))?;
                }
                write!(f, "FROM {from}{}", where_clause(filter))
            }
            Self::Update {
                table,
                using,
                assignments,
                filter,
            } => {
                write!(f, "UPDATE {table}")?;
                if !using.is_empty() {
                    write!(f, " USING {}", assignment_list(using, " "))?;
                }
                let sets = assignments
                    .iter()
                    .map(|(column, value)| format!("{column} = {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, " SET {sets}{}", where_clause(filter))
            }
            Self::Select {
                columns,
                from,
                join: join_clause,
                filter,
                limit,
            } => {
                write!(f, "SELECT {} FROM {from}", join(columns, ", "))?;
                if let Some(j) = join_clause {
                    write!(f, " {j}")?;
                }
                f.write_str(&where_clause(filter))?;
                if let Some(n) = limit {
                    write!(f, " LIMIT {n}")?;
                }
                Ok(())
            }
            Self::StopProcess { process } => write!(f, "Stop process {process}"),
            Self::CreateTrigger { name, table, class } => {
                write!(f, "Create trigger {name} on {table} using {class}")
            }
            Self::DropTrigger { name, table } => write!(f, "Drop trigger {name} on {table}"),
        }
    }
}
