use super::common::{column_name, keyword, qualified_name, value, ws};
use super::statement::{JoinClause, Operator, Relation, Statement};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

fn operator(input: &str) -> IResult<&str, Operator> {
    alt((
        map(tag(">="), |_| Operator::GtEq),
        map(tag("<="), |_| Operator::LtEq),
        map(tag("!="), |_| Operator::NotEq),
        map(tag("="), |_| Operator::Eq),
        map(tag(">"), |_| Operator::Gt),
        map(tag("<"), |_| Operator::Lt),
    ))(input)
}

// Parse a single relation (column op value, column IN (...))
fn relation(input: &str) -> IResult<&str, Relation> {
    alt((
        map(
            tuple((
                ws(column_name),
                keyword("IN"),
                delimited(
                    ws(char('(')),
                    separated_list1(ws(char(',')), ws(value)),
                    ws(char(')')),
                ),
            )),
            |(column, _, values)| Relation::In { column, values },
        ),
        map(
            tuple((ws(column_name), ws(operator), ws(value))),
            |(column, op, value)| Relation::Compare { column, op, value },
        ),
    ))(input)
}

/// Conjunction of relations: `r AND r AND ...`
pub fn relations(input: &str) -> IResult<&str, Vec<Relation>> {
    separated_list1(keyword("AND"), relation)(input)
}

// INNER JOIN t2 ON t1.a = t2.b
fn join_clause(input: &str) -> IResult<&str, JoinClause> {
    let (input, _) = opt(keyword("INNER"))(input)?;
    let (input, _) = keyword("JOIN")(input)?;
    let (input, table) = ws(qualified_name)(input)?;
    let (input, _) = keyword("ON")(input)?;
    let (input, on_left) = ws(column_name)(input)?;
    let (input, _) = ws(char('='))(input)?;
    let (input, on_right) = ws(column_name)(input)?;

    Ok((input, JoinClause { table, on_left, on_right }))
}

fn limit(input: &str) -> IResult<&str, Option<u64>> {
    opt(preceded(
        keyword("LIMIT"),
        ws(map_res(digit1, |s: &str| s.parse::<u64>())),
    ))(input)
}

/// Parse SELECT statement
///
/// Syntax: SELECT * | c, ... FROM t [INNER JOIN t2 ON a = b] [WHERE r [AND r]*] [LIMIT n]
pub fn select(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("SELECT")(input)?;
    let (input, columns) = alt((
        map(ws(char('*')), |_| vec!["*".to_string()]),
        separated_list1(ws(char(',')), ws(column_name)),
    ))(input)?;
    let (input, _) = keyword("FROM")(input)?;
    let (input, from) = ws(qualified_name)(input)?;
    let (input, join) = opt(join_clause)(input)?;
    let (input, filter) = opt(preceded(keyword("WHERE"), relations))(input)?;
    let (input, limit) = limit(input)?;

    Ok((
        input,
        Statement::Select {
            columns,
            from,
            join,
            filter: filter.unwrap_or_default(),
            limit,
        },
    ))
}
