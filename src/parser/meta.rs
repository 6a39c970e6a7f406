use super::common::{identifier, keyword, quoted_locator, ws};
use super::statement::{ResourceKind, Statement};
use nom::{
    branch::alt,
    combinator::map,
    IResult,
};

/// ADD "path/to/library.jar"
pub fn add_resource(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("ADD")(input)?;
    let (input, locator) = ws(quoted_locator)(input)?;
    Ok((input, Statement::AddResource { locator }))
}

/// LIST PROCESS | LIST UDF | LIST TRIGGER
pub fn list_resources(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("LIST")(input)?;
    let (input, kind) = alt((
        map(keyword("PROCESS"), |_| ResourceKind::Process),
        map(keyword("UDF"), |_| ResourceKind::Udf),
        map(keyword("TRIGGER"), |_| ResourceKind::Trigger),
    ))(input)?;
    Ok((input, Statement::ListResources { kind }))
}

/// REMOVE UDF "library.jar"
pub fn remove_resource(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("REMOVE")(input)?;
    let (input, _) = keyword("UDF")(input)?;
    let (input, locator) = ws(quoted_locator)(input)?;
    Ok((input, Statement::RemoveResource { locator }))
}

/// STOP PROCESS id
pub fn stop_process(input: &str) -> IResult<&str, Statement> {
    let (input, _) = keyword("STOP")(input)?;
    let (input, _) = keyword("PROCESS")(input)?;
    let (input, process) = ws(identifier)(input)?;
    Ok((input, Statement::StopProcess { process }))
}
