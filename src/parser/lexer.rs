// Lexical helpers shared by the style parsers

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, digit1, multispace0},
    combinator::{map, opt, recognize, value},
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a double-quoted string; no escapes, may be empty
pub fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(opt(is_not("\"")), |s: Option<&str>| s.unwrap_or("").to_string()),
        char('"'),
    )(input)
}

/// Parse a signed integer, saturating at the i64 bounds
pub fn integer_literal(input: &str) -> IResult<&str, i64> {
    map(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
            .unwrap_or(if s.starts_with('-') { i64::MIN } else { i64::MAX })
    })(input)
}

/// Parse `true` or `false`
pub fn bool_literal(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}
