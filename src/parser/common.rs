use crate::types::{QualifiedName, Value};
use super::statement::Property;
use rust_decimal::Decimal;
use std::str::FromStr;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, char, digit1, multispace0, satisfy},
    combinator::{map, map_res, not, opt, recognize, verify},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

/// Words that never parse as a bare identifier
const RESERVED: &[&str] = &[
    "AND", "FROM", "IF", "IN", "INNER", "JOIN", "LIMIT", "ON", "PRIMARY", "SET", "USING", "WHERE",
    "WITH",
];

pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive keyword that is not the prefix of a longer word
pub fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    ws(terminated(tag_no_case(word), not(satisfy(is_identifier_char))))
}

pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            take_while(is_identifier_char),
        )),
        |s: &str| s.to_string(),
    )(input)
}

// Identifier that is not a reserved keyword
pub fn non_keyword_identifier(input: &str) -> IResult<&str, String> {
    verify(identifier, |s: &String| {
        let upper = s.to_uppercase();
        !RESERVED.contains(&upper.as_str())
    })(input)
}

/// `table` or `keyspace.table`
pub fn qualified_name(input: &str) -> IResult<&str, QualifiedName> {
    map(
        pair(
            non_keyword_identifier,
            opt(preceded(char('.'), identifier)),
        ),
        |(first, second)| match second {
            Some(name) => QualifiedName::qualified(first, name),
            None => QualifiedName::new(first),
        },
    )(input)
}

/// Column reference, optionally prefixed by its table (`t.col`)
pub fn column_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            non_keyword_identifier,
            opt(pair(char('.'), identifier)),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Declared column type as written, e.g. `int` or `map<text, int>`
pub fn data_type(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            identifier,
            opt(delimited(char('<'), take_while(|c: char| c != '>'), char('>'))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

pub fn if_not_exists(input: &str) -> IResult<&str, bool> {
    map(
        opt(tuple((keyword("IF"), keyword("NOT"), keyword("EXISTS")))),
        |found| found.is_some(),
    )(input)
}

pub fn if_exists(input: &str) -> IResult<&str, bool> {
    map(opt(pair(keyword("IF"), keyword("EXISTS"))), |found| found.is_some())(input)
}

pub fn value(input: &str) -> IResult<&str, Value> {
    alt((
        // Boolean
        map(terminated(tag_no_case("TRUE"), not(satisfy(is_identifier_char))), |_| Value::Boolean(true)),
        map(terminated(tag_no_case("FALSE"), not(satisfy(is_identifier_char))), |_| Value::Boolean(false)),

        // Text in quotes
        map(string_literal, Value::Text),

        // {key: value, ...}
        map(map_literal, Value::Map),

        // Numeric with decimal point, scale preserved
        map_res(
            recognize(tuple((
                opt(char('-')),
                digit1,
                char('.'),
                digit1,
            ))),
            |s: &str| Decimal::from_str(s).map(Value::Decimal),
        ),

        // Integer
        map_res(
            recognize(pair(opt(char('-')), digit1)),
            |s: &str| s.parse::<i64>().map(Value::Integer),
        ),

        // Bare word
        map(identifier, Value::Identifier),
    ))(input)
}

// Map key as written: bare word or quoted string (quotes kept)
fn map_key(input: &str) -> IResult<&str, String> {
    map(
        alt((
            recognize(delimited(char('\''), take_while(|c| c != '\''), char('\''))),
            recognize(pair(alt((alpha1, tag("_"))), take_while(is_identifier_char))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// `{key: value, ...}`; keys and values separated by `:`, entries by `,`
pub fn map_literal(input: &str) -> IResult<&str, Vec<(String, Value)>> {
    delimited(
        ws(char('{')),
        separated_list0(
            ws(char(',')),
            map(tuple((ws(map_key), char(':'), ws(value))), |(key, _, value)| (key, value)),
        ),
        ws(char('}')),
    )(input)
}

pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted resource locator, returned without the quotes
pub fn quoted_locator(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        |s: &str| s.to_string(),
    )(input)
}

/// Class name as written: dotted path (`com.company.Index.class`) or quoted string
pub fn class_name(input: &str) -> IResult<&str, String> {
    map(
        alt((
            recognize(delimited(char('\''), take_while(|c| c != '\''), char('\''))),
            recognize(pair(identifier, many0(pair(char('.'), identifier)))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// `name = value`
pub fn property(input: &str) -> IResult<&str, Property> {
    map(
        tuple((ws(identifier), ws(char('=')), ws(value))),
        |(name, _, value)| Property::new(name, value),
    )(input)
}

/// `p = v AND p = v ...`
pub fn property_list(input: &str) -> IResult<&str, Vec<Property>> {
    separated_list1(keyword("AND"), property)(input)
}

/// `(a, b, c)`
pub fn identifier_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), ws(non_keyword_identifier)),
        ws(char(')')),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_boundary() {
        assert!(keyword("IN")("INDEX").is_err());
        assert_eq!(keyword("in")("IN (1)").unwrap().0, "(1)");
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(value("false").unwrap().1, Value::Boolean(false));
        assert_eq!(value("falsehood").unwrap().1, Value::Identifier("falsehood".to_string()));
        assert_eq!(value("'x y'").unwrap().1, Value::Text("x y".to_string()));
        assert_eq!(value("-12").unwrap().1, Value::Integer(-12));
        assert_eq!(value("3.0").unwrap().1.to_string(), "3.0");
        assert_eq!(value("val1").unwrap().1, Value::Identifier("val1".to_string()));
        assert_eq!(
            value("{class: Simple, 'DC1' : 1}").unwrap().1,
            Value::Map(vec![
                ("class".to_string(), Value::Identifier("Simple".to_string())),
                ("'DC1'".to_string(), Value::Integer(1)),
            ])
        );
        assert_eq!(value("{}").unwrap().1, Value::Map(Vec::new()));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("ks.t rest").unwrap().1, QualifiedName::qualified("ks", "t"));
        assert_eq!(qualified_name("t").unwrap().1, QualifiedName::new("t"));
        assert!(qualified_name("WHERE").is_err());
    }

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("com.company.Index.class WITH").unwrap().1, "com.company.Index.class");
        assert_eq!(class_name("'org.Idx'").unwrap().1, "'org.Idx'");
    }

    #[test]
    fn test_property_list() {
        let (rest, props) = property_list("opt1=val1 AND opt2 = 2").unwrap();
        assert!(rest.is_empty());
        assert_eq!(props.len(), 2);
        assert_eq!(props[1], Property::new("opt2", Value::Integer(2)));
    }
}
