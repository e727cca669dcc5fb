// Pipeline parser for the style overlay DSL

use super::labels::parse_labs;
use super::lexer::ws;
use super::theme::parse_theme_command;
use crate::ir::Customization;
use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, map, opt},
    multi::separated_list0,
    IResult,
};

#[derive(Debug)]
enum PipelineComponent {
    Labels(Option<String>),
    Theme(Customization),
}

fn parse_pipeline_component(input: &str) -> IResult<&str, PipelineComponent> {
    alt((
        map(parse_labs, PipelineComponent::Labels),
        map(parse_theme_command, PipelineComponent::Theme),
    ))(input)
}

/// Parse a complete style overlay
/// Format: component | component | ...
pub fn parse_style_spec(input: &str) -> IResult<&str, Customization> {
    // If input starts with "|", consume it
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, components) = separated_list0(
        ws(tag("|")),
        parse_pipeline_component
    )(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    // Later components override earlier ones
    let mut custom = Customization::default();
    for comp in components {
        match comp {
            PipelineComponent::Labels(title) => {
                if title.is_some() {
                    custom.title = title;
                }
            }
            PipelineComponent::Theme(t) => custom = custom.merged_with(&t),
        }
    }

    Ok((input, custom))
}

/// Parse a style overlay, reporting the unparsed remainder on failure
pub fn parse_style(input: &str) -> Result<Customization> {
    match parse_style_spec(input) {
        Ok((_, custom)) => Ok(custom),
        Err(e) => Err(anyhow!("Invalid style overlay '{}': {:?}", input, e)),
    }
}
