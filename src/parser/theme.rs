use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    sequence::preceded,
    IResult,
};
use crate::ir::{Customization, LegendPosition};
use crate::parser::lexer::{bool_literal, integer_literal, string_literal, ws};
use crate::theme_resolve::palette_index;

// === Theme Argument Parsing ===

#[derive(Debug)]
enum ThemeArg {
    Palette(Option<i64>),
    Grid(bool),
    Legend(LegendPosition),
}

/// palette: 2 or palette: "purple"; an unknown name falls back to theme 0
fn parse_palette_arg(input: &str) -> IResult<&str, ThemeArg> {
    let (input, _) = ws(tag("palette:"))(input)?;
    alt((
        map(ws(integer_literal), |i| ThemeArg::Palette(Some(i))),
        map(ws(string_literal), |name| {
            ThemeArg::Palette(Some(palette_index(&name).map_or(0, |i| i as i64)))
        }),
    ))(input)
}

fn parse_theme_arg(input: &str) -> IResult<&str, ThemeArg> {
    alt((
        parse_palette_arg,
        map(preceded(ws(tag("grid:")), ws(bool_literal)), ThemeArg::Grid),
        map(preceded(ws(tag("legend:")), ws(string_literal)), |v| {
            ThemeArg::Legend(LegendPosition::parse(&v))
        }),
    ))(input)
}

// === Main Theme Parsers ===

/// Parse theme_minimal() - hides grid and legend
pub fn parse_theme_minimal(input: &str) -> IResult<&str, Customization> {
    let (input, _) = ws(tag("theme_minimal"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(char(')'))(input)?;

    Ok((input, Customization {
        show_grid: Some(false),
        legend_position: Some(LegendPosition::None),
        ..Default::default()
    }))
}

/// Parse theme(palette: N, grid: bool, legend: "pos") in any order
pub fn parse_theme(input: &str) -> IResult<&str, Customization> {
    let (input, _) = ws(tag("theme"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        parse_theme_arg
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut custom = Customization::default();
    for arg in args {
        match arg {
            ThemeArg::Palette(p) => custom.color_theme = p,
            ThemeArg::Grid(g) => custom.show_grid = Some(g),
            ThemeArg::Legend(pos) => custom.legend_position = Some(pos),
        }
    }

    Ok((input, custom))
}

/// Parse any theme command (theme_minimal or theme)
pub fn parse_theme_command(input: &str) -> IResult<&str, Customization> {
    alt((parse_theme_minimal, parse_theme))(input)
}
