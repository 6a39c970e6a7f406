use crate::index::IndexKind;
use super::common::{
    class_name, data_type, identifier_list, if_exists, if_not_exists, keyword,
    non_keyword_identifier, property_list, qualified_name, ws,
};
use super::statement::{AlterTableOperation, ColumnChange, ColumnDef, PrimaryKey, Statement};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

/// Parse CREATE KEYSPACE statement
///
/// Syntax: CREATE KEYSPACE [IF NOT EXISTS] name WITH p = v [AND p = v]*
pub fn create_keyspace(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, _) = keyword("KEYSPACE")(input)?;
    let (input, if_not_exists) = if_not_exists(input)?;
    let (input, name) = ws(non_keyword_identifier)(input)?;
    let (input, _) = keyword("WITH")(input)?;
    let (input, properties) = property_list(input)?;

    Ok((input, Statement::CreateKeyspace {
        name,
        if_not_exists,
        properties,
    }))
}

fn column_def(input: &str) -> IResult<&str, ColumnDef> {
    let (input, name) = ws(non_keyword_identifier)(input)?;
    let (input, data_type) = ws(data_type)(input)?;
    let (input, primary_key) = opt(pair(keyword("PRIMARY"), keyword("KEY")))(input)?;

    Ok((
        input,
        ColumnDef {
            name,
            data_type,
            primary_key: primary_key.is_some(),
        },
    ))
}

// PRIMARY KEY (a, b) | PRIMARY KEY ((a, b), c)
fn primary_key_clause(input: &str) -> IResult<&str, PrimaryKey> {
    let (input, _) = keyword("PRIMARY")(input)?;
    let (input, _) = keyword("KEY")(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, key) = alt((
        // Composite partition key
        map(
            pair(
                identifier_list,
                many0(preceded(ws(char(',')), ws(non_keyword_identifier))),
            ),
            |(partition, clustering)| PrimaryKey { partition, clustering },
        ),
        map(
            separated_list1(ws(char(',')), ws(non_keyword_identifier)),
            |mut columns| {
                let clustering = columns.split_off(1);
                PrimaryKey { partition: columns, clustering }
            },
        ),
    ))(input)?;

    let (input, _) = ws(char(')'))(input)?;
    Ok((input, key))
}

/// Parse CREATE TABLE statement
///
/// Syntax:
/// - CREATE TABLE [IF NOT EXISTS] t (c type [PRIMARY KEY], ...)
/// - CREATE TABLE t (c type, ..., PRIMARY KEY ((a, b), c)) [WITH p = v [AND p = v]*]
pub fn create_table(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, _) = keyword("TABLE")(input)?;
    let (input, if_not_exists) = if_not_exists(input)?;
    let (input, name) = ws(qualified_name)(input)?;
    let (input, (columns, primary_key)) = delimited(
        ws(char('(')),
        pair(
            separated_list1(ws(char(',')), column_def),
            opt(preceded(ws(char(',')), primary_key_clause)),
        ),
        ws(char(')')),
    )(input)?;
    let (input, properties) = opt(preceded(keyword("WITH"), property_list))(input)?;

    Ok((input, Statement::CreateTable {
        name,
        if_not_exists,
        columns,
        primary_key,
        properties: properties.unwrap_or_default(),
    }))
}

fn column_change(input: &str) -> IResult<&str, ColumnChange> {
    alt((
        map(
            tuple((
                keyword("ALTER"),
                ws(non_keyword_identifier),
                keyword("TYPE"),
                ws(data_type),
            )),
            |(_, column, _, data_type)| ColumnChange::Alter { column, data_type },
        ),
        map(
            tuple((keyword("ADD"), ws(non_keyword_identifier), ws(data_type))),
            |(_, column, data_type)| ColumnChange::Add { column, data_type },
        ),
        map(
            preceded(keyword("DROP"), ws(non_keyword_identifier)),
            ColumnChange::Drop,
        ),
    ))(input)
}

/// Parse ALTER TABLE statement
///
/// Syntax:
/// - ALTER TABLE t ALTER c TYPE ty
/// - ALTER TABLE t ADD c ty, DROP c2
/// - ALTER TABLE t WITH p = v [AND p = v]*
pub fn alter_table(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("ALTER")(input)?;
    let (input, _) = keyword("TABLE")(input)?;
    let (input, name) = ws(qualified_name)(input)?;

    let (input, operation) = alt((
        map(preceded(keyword("WITH"), property_list), AlterTableOperation::Properties),
        map(
            separated_list1(ws(char(',')), column_change),
            AlterTableOperation::Columns,
        ),
    ))(input)?;

    Ok((input, Statement::AlterTable { name, operation }))
}

fn index_kind(input: &str) -> IResult<&str, IndexKind> {
    alt((
        map(keyword("HASH"), |_| IndexKind::Default),
        map(keyword("FULLTEXT"), |_| IndexKind::FullText),
        map(keyword("CUSTOM"), |_| IndexKind::Custom),
    ))(input)
}

/// Parse CREATE INDEX statement
///
/// Syntax:
/// CREATE [HASH | FULLTEXT | CUSTOM] INDEX [IF NOT EXISTS] [name] ON t (f, ...)
///     [USING class] [WITH OPTIONS o=v [AND o=v]*]
pub fn create_index(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, kind) = opt(index_kind)(input)?;
    let (input, _) = keyword("INDEX")(input)?;
    let (input, if_not_exists) = if_not_exists(input)?;
    let (input, name) = opt(ws(non_keyword_identifier))(input)?;
    let (input, _) = keyword("ON")(input)?;
    let (input, table) = ws(qualified_name)(input)?;
    let (input, fields) = identifier_list(input)?;
    let (input, using) = opt(preceded(keyword("USING"), ws(class_name)))(input)?;
    let (input, options) = opt(preceded(
        pair(keyword("WITH"), opt(keyword("OPTIONS"))),
        property_list,
    ))(input)?;

    Ok((input, Statement::CreateIndex {
        kind,
        if_not_exists,
        name,
        table,
        fields,
        using,
        options: options.unwrap_or_default(),
    }))
}

/// Parse DROP INDEX statement
///
/// Syntax: DROP INDEX [IF EXISTS] name
pub fn drop_index(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("DROP")(input)?;
    let (input, _) = keyword("INDEX")(input)?;
    let (input, if_exists) = if_exists(input)?;
    let (input, name) = ws(non_keyword_identifier)(input)?;

    Ok((input, Statement::DropIndex { if_exists, name }))
}

/// Parse CREATE TRIGGER statement
///
/// Syntax: CREATE TRIGGER name ON t USING class
pub fn create_trigger(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, _) = keyword("TRIGGER")(input)?;
    let (input, name) = ws(non_keyword_identifier)(input)?;
    let (input, _) = keyword("ON")(input)?;
    let (input, table) = ws(qualified_name)(input)?;
    let (input, _) = keyword("USING")(input)?;
    let (input, class) = ws(class_name)(input)?;

    Ok((input, Statement::CreateTrigger { name, table, class }))
}

/// Parse DROP TRIGGER statement
///
/// Syntax: DROP TRIGGER name ON t
pub fn drop_trigger(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("DROP")(input)?;
    let (input, _) = keyword("TRIGGER")(input)?;
    let (input, name) = ws(non_keyword_identifier)(input)?;
    let (input, _) = keyword("ON")(input)?;
    let (input, table) = ws(qualified_name)(input)?;

    Ok((input, Statement::DropTrigger { name, table }))
}
