use anyhow::{Context, Result};
use chartforge::data::{Column, Dataset};
use chartforge::ir::{ChartFamily, Customization, LegendPosition};
use chartforge::parser::parse_style;
use chartforge::recommend::{recommend, validate_recommendations, RawRecommendation};
use chartforge::build_descriptor_checked;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chartforge")]
#[command(about = "Turn tabular data into chart descriptors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a descriptor for one chart family from the dataset on stdin
    Render(RenderArgs),
    /// Suggest chart families for the dataset on stdin
    Recommend(RecommendArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Format of the data on stdin
    #[arg(long, value_enum, default_value = "csv")]
    input_format: InputFormat,

    /// JSON file with column metadata; inferred from the data when omitted
    #[arg(long)]
    columns: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    #[command(flatten)]
    input: InputArgs,

    /// JSON file of externally produced recommendations to normalize instead
    /// of reading a dataset
    #[arg(long)]
    validate: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart family (e.g. 'bar', 'stacked-area', '饼图'); unknown names draw a column chart
    family: String,

    #[command(flatten)]
    input: InputArgs,

    /// JSON file with customization options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Style overlay (e.g. 'labs(title: "Sales") | theme(palette: 2, legend: "right")')
    #[arg(long)]
    style: Option<String>,

    #[arg(long)]
    title: Option<String>,

    /// Palette index (0-5)
    #[arg(long)]
    theme: Option<i64>,

    /// top, bottom, left, right or none
    #[arg(long)]
    legend: Option<String>,

    #[arg(long)]
    no_grid: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON only
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Recommend(args) => run_recommend(args),
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let dataset = read_dataset(&args.input)?;
    let custom = resolve_customization(&args)?;
    let family = ChartFamily::parse_or_default(&args.family);

    let descriptor = build_descriptor_checked(family, &dataset.rows, &dataset.columns, &custom)
        .context("Cannot build chart")?;
    tracing::info!(family = %family, series = descriptor.series.len(), "descriptor built");

    write_json(&descriptor, args.compact)
}

fn run_recommend(args: RecommendArgs) -> Result<()> {
    if let Some(path) = &args.validate {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recommendations file {}", path.display()))?;
        let raw: Vec<RawRecommendation> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse recommendations file {}", path.display()))?;
        return write_json(&validate_recommendations(raw), false);
    }

    let dataset = read_dataset(&args.input)?;
    write_json(&recommend(&dataset.columns), false)
}

/// Layer customization sources: config file, then style overlay, then flags
fn resolve_customization(args: &RenderArgs) -> Result<Customization> {
    let mut custom = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<Customization>(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => Customization::default(),
    };

    if let Some(style) = &args.style {
        custom = custom.merged_with(&parse_style(style)?);
    }

    let flags = Customization {
        title: args.title.clone(),
        color_theme: args.theme,
        show_grid: if args.no_grid { Some(false) } else { None },
        legend_position: args.legend.as_deref().map(LegendPosition::parse),
    };
    Ok(custom.merged_with(&flags))
}

fn read_dataset(args: &InputArgs) -> Result<Dataset> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read data from stdin")?;

    let mut dataset = match args.input_format {
        InputFormat::Csv => Dataset::from_csv(input.as_bytes()).context("Failed to parse CSV input")?,
        InputFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(&input).context("Failed to parse JSON input")?;
            if value.is_object() {
                Dataset::from_json_bundle(&value)?
            } else {
                Dataset::from_json(&value)?
            }
        }
    };

    if let Some(path) = &args.columns {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read columns file {}", path.display()))?;
        dataset.columns = serde_json::from_str::<Vec<Column>>(&text)
            .with_context(|| format!("Failed to parse columns file {}", path.display()))?;
    }

    tracing::debug!(rows = dataset.rows.len(), columns = dataset.columns.len(), "dataset loaded");
    Ok(dataset)
}

fn write_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialize output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
