use super::common::{identifier, identifier_list, keyword, qualified_name, value, ws};
use super::statement::{Property, Statement};
use super::queries::relations;
use nom::{
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list1,
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Parse DELETE statement
///
/// Syntax: DELETE [(c1, c2)] FROM t WHERE r [AND r]*
pub fn delete(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("DELETE")(input)?;
    let (input, columns) = opt(identifier_list)(input)?;
    let (input, _) = keyword("FROM")(input)?;
    let (input, from) = ws(qualified_name)(input)?;
    let (input, _) = keyword("WHERE")(input)?;
    let (input, filter) = relations(input)?;

    Ok((input, Statement::Delete {
        columns: columns.unwrap_or_default(),
        from,
        filter,
    }))
}

// USING TTL 400 [AND TIMESTAMP 1]
fn using_list(input: &str) -> IResult<&str, Vec<Property>> {
    separated_list1(
        keyword("AND"),
        map(pair(ws(identifier), ws(value)), |(name, value)| Property::new(name, value)),
    )(input)
}

/// Parse UPDATE statement
///
/// Syntax: UPDATE t [USING p v [AND p v]*] SET c = v [, c = v]* [WHERE r [AND r]*]
pub fn update(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("UPDATE")(input)?;
    let (input, table) = ws(qualified_name)(input)?;
    let (input, using) = opt(preceded(keyword("USING"), using_list))(input)?;
    let (input, _) = keyword("SET")(input)?;
    let (input, assignments) = separated_list1(
        ws(char(',')),
        tuple((ws(identifier), ws(char('=')), ws(value))),
    )(input)?;
    let assignments = assignments
        .into_iter()
        .map(|(col, _, val)| (col, val))
        .collect();
    let (input, filter) = opt(preceded(keyword("WHERE"), relations))(input)?;

    Ok((
        input,
        Statement::Update {
            table,
            using: using.unwrap_or_default(),
            assignments,
            filter: filter.unwrap_or_default(),
        },
    ))
}
