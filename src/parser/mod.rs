// Module declarations
mod statement;
mod common;
mod ddl;
mod dml;
mod queries;
mod meta;
mod render;

pub use statement::{
    find_property,
    AlterTableOperation,
    ColumnChange,
    ColumnDef,
    JoinClause,
    Operator,
    ParsedQuery,
    PrimaryKey,
    Property,
    Relation,
    ResourceKind,
    Statement,
};

use crate::types::SyntaxError;
use nom::IResult;

type StatementParser = fn(&str) -> IResult<&str, Statement>;

// Tried in order; the first full parse wins
const PARSERS: &[StatementParser] = &[
    ddl::create_keyspace,
    ddl::create_table,
    ddl::alter_table,
    ddl::create_index,
    ddl::drop_index,
    ddl::create_trigger,
    ddl::drop_trigger,
    meta::add_resource,
    meta::list_resources,
    meta::remove_resource,
    meta::stop_process,
    dml::delete,
    dml::update,
    queries::select,
];

/// Parses one statement; a trailing `;` is optional.
///
/// On failure the error points at the furthest position any grammar rule reached.
pub fn parse_statement(input: &str) -> Result<Statement, SyntaxError> {
    let body = input.trim_end();
    let body = body.strip_suffix(';').unwrap_or(body);

    let mut furthest: &str = body;
    for parser in PARSERS {
        let remaining = match parser(body) {
            Ok((remaining, stmt)) => {
                if remaining.trim().is_empty() {
                    return Ok(stmt);
                }
                remaining
            }
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => e.input,
            Err(nom::Err::Incomplete(_)) => "",
        };
        if remaining.len() < furthest.len() {
            furthest = remaining;
        }
    }

    Err(syntax_error(body, furthest))
}

/// Parses and keeps the source text alongside the statement.
pub fn parse_query(input: &str) -> Result<ParsedQuery, SyntaxError> {
    let statement = parse_statement(input)?;
    Ok(ParsedQuery {
        source: input.to_string(),
        statement,
    })
}

fn syntax_error(body: &str, remaining: &str) -> SyntaxError {
    let offset = body.len() - remaining.len();
    let consumed = &body[..offset];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
        .rsplit('\n')
        .next()
        .map_or(0, |l| l.chars().count());

    let detail = match remaining.split_whitespace().next() {
        Some(token) => format!("unexpected input at '{token}'"),
        None => "unexpected end of input".to_string(),
    };

    SyntaxError { line, column, detail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;
    use crate::types::{QualifiedName, Value};

    #[test]
    fn test_parse_create_keyspace() {
        let stmt = parse_statement("CREATE KEYSPACE ks WITH replication = simple;").unwrap();
        match stmt {
            Statement::CreateKeyspace { name, if_not_exists, properties } => {
                assert_eq!(name, "ks");
                assert!(!if_not_exists);
                assert_eq!(properties, vec![Property::new("replication", Value::Identifier("simple".to_string()))]);
            }
            _ => panic!("Expected CREATE KEYSPACE"),
        }
    }

    #[test]
    fn test_parse_create_table_composite_key() {
        let sql = "create table ks.t (a text, b int, c bool, primary key ((a, b), c));";
        match parse_statement(sql).unwrap() {
            Statement::CreateTable { name, columns, primary_key: Some(pk), .. } => {
                assert_eq!(name, QualifiedName::qualified("ks", "t"));
                assert_eq!(columns.len(), 3);
                assert_eq!(pk.partition, vec!["a", "b"]);
                assert_eq!(pk.clustering, vec!["c"]);
            }
            other => panic!("Expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_table_simple_key() {
        match parse_statement("create table t (a text, b int, primary key (a, b))").unwrap() {
            Statement::CreateTable { primary_key: Some(pk), .. } => {
                assert_eq!(pk.partition, vec!["a"]);
                assert_eq!(pk.clustering, vec!["b"]);
            }
            other => panic!("Expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_alter_table_multiple_changes() {
        let stmt = parse_statement("alter table t add c1 int, drop c2, alter c3 type text").unwrap();
        match stmt {
            Statement::AlterTable { operation: AlterTableOperation::Columns(changes), .. } => {
                assert_eq!(changes.len(), 3);
                assert_eq!(changes[1], ColumnChange::Drop("c2".to_string()));
            }
            other => panic!("Expected ALTER TABLE, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_index_kinds() {
        match parse_statement("CREATE FULLTEXT INDEX ON t (bio)").unwrap() {
            Statement::CreateIndex { kind, name, fields, .. } => {
                assert_eq!(kind, Some(IndexKind::FullText));
                assert_eq!(name, None);
                assert_eq!(fields, vec!["bio"]);
            }
            other => panic!("Expected CREATE INDEX, got {other:?}"),
        }
        match parse_statement("CREATE INDEX idx ON t (a)").unwrap() {
            Statement::CreateIndex { kind, .. } => assert_eq!(kind, None),
            other => panic!("Expected CREATE INDEX, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_select_with_in_and_limit() {
        let stmt = parse_statement("SELECT a, b FROM t WHERE a IN (1, 2) AND b > 3 LIMIT 5").unwrap();
        match stmt {
            Statement::Select { columns, filter, limit, join, .. } => {
                assert_eq!(columns, vec!["a", "b"]);
                assert_eq!(filter.len(), 2);
                assert!(matches!(filter[0], Relation::In { .. }));
                assert_eq!(limit, Some(5));
                assert!(join.is_none());
            }
            other => panic!("Expected SELECT, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_select_join() {
        let stmt = parse_statement("SELECT * FROM users INNER JOIN orders ON users.id = orders.user_id").unwrap();
        match stmt {
            Statement::Select { join: Some(j), .. } => {
                assert_eq!(j.table, QualifiedName::new("orders"));
                assert_eq!(j.on_left, "users.id");
                assert_eq!(j.on_right, "orders.user_id");
            }
            other => panic!("Expected SELECT with JOIN, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse_statement("SELECT a FROM t WHERE").unwrap_err();
        assert_eq!((err.line, err.column), (1, 16));
        assert_eq!(err.detail, "unexpected input at 'WHERE'");

        let err = parse_statement("CREATE TABLE t (a text,\n  b int b)").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 8);
        assert_eq!(err.detail, "unexpected input at 'b)'");
    }

    #[test]
    fn test_syntax_error_unknown_statement() {
        let err = parse_statement("TRUNCATE t").unwrap_err();
        assert_eq!((err.line, err.column), (1, 0));
    }

    #[test]
    fn test_parse_query_keeps_source() {
        let parsed = parse_query("LIST UDF;").unwrap();
        assert_eq!(parsed.source, "LIST UDF;");
        assert_eq!(parsed.statement, Statement::ListResources { kind: ResourceKind::Udf });
    }
}
