use nom::{
    bytes::complete::tag,
    character::complete::char,
    combinator::opt,
    sequence::{delimited, preceded},
    IResult,
};
use crate::parser::lexer::{string_literal, ws};

/// Parse labs(title: "...") or labs()
pub fn parse_labs(input: &str) -> IResult<&str, Option<String>> {
    preceded(
        ws(tag("labs")),
        delimited(
            ws(char('(')),
            opt(preceded(ws(tag("title:")), ws(string_literal))),
            ws(char(')')),
        ),
    )(input)
}
