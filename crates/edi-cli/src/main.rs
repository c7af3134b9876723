//! # edi-cli
//!
//! Command-line front end for the EDI segment tokenizer.
//!
//! Reads X12 or EDIFACT interchanges, tokenizes every segment and prints the
//! resulting segment contexts as JSON.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::CliConfig;
use edi_segment::{SegmentContext, SegmentReader, Separators};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "edi")]
#[command(about = "EDI segment tokenizer CLI")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Syntax family whose default separators to use
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Detect from UNA/ISA or the first segment
    Auto,
    X12,
    Edifact,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize every segment of an interchange and print JSON
    Tokenize {
        /// Input file path
        input: PathBuf,

        /// Separator family
        #[arg(short, long, value_enum, default_value_t = Format::Auto)]
        format: Format,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Only print envelope segments
        #[arg(long)]
        headers_only: bool,
    },

    /// Classify a single raw segment
    Classify {
        /// Raw segment text
        segment: String,

        /// Separator family; `auto` picks EDIFACT when `+` comes before `*`
        #[arg(short, long, value_enum, default_value_t = Format::Auto)]
        format: Format,
    },

    /// Print the UNA service string advice for a separator set
    Una {
        /// Separator family
        #[arg(short, long, value_enum, default_value_t = Format::Edifact)]
        format: Format,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Tokenize {
            input,
            format,
            pretty,
            headers_only,
        } => {
            info!("Tokenizing {}", input.display());
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let separators = resolve_separators(&config, format, &text)?;

            let contexts = SegmentReader::new(&text, separators)
                .contexts()
                .collect::<edi_segment::Result<Vec<_>>>()
                .with_context(|| format!("failed to tokenize {}", input.display()))?;
            report_jumps(&contexts);

            let selected: Vec<&SegmentContext> = contexts
                .iter()
                .filter(|ctx| !headers_only || ctx.is_header())
                .collect();
            let json = if pretty {
                serde_json::to_string_pretty(&selected)?
            } else {
                serde_json::to_string(&selected)?
            };
            println!("{json}");
        }
        Commands::Classify { segment, format } => {
            let separators = match (config.separators, format) {
                (None, Format::Auto) => guess_segment_separators(&segment)?,
                _ => resolve_separators(&config, format, &segment)?,
            };
            let ctx = SegmentContext::build(&segment, Some(&separators)).with_context(|| {
                format!(
                    "failed to classify with element separator {:?}; try --format x12 or --format edifact",
                    separators.element()
                )
            })?;
            println!("{}\t{}", ctx.tag(), ctx.log_label());
        }
        Commands::Una { format } => {
            let separators = resolve_separators(&config, format, "")?;
            println!("{}", separators.to_una());
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config overrides win, then the explicit family, then detection
fn resolve_separators(config: &CliConfig, format: Format, sample: &str) -> Result<Separators> {
    if let Some(separators) = config.separators {
        debug!("Using separators from configuration");
        return Ok(separators);
    }
    Ok(match format {
        Format::X12 => Separators::default_x12(),
        Format::Edifact => Separators::default_edifact(),
        Format::Auto => SegmentReader::detect(sample)?.separators(),
    })
}

/// Pick a family for a lone segment from whichever default element
/// separator it uses first
fn guess_segment_separators(segment: &str) -> Result<Separators> {
    let edifact = Separators::default_edifact();
    let x12 = Separators::default_x12();
    let first_separator = segment
        .chars()
        .find(|&ch| ch == edifact.element() || ch == x12.element());

    Ok(match first_separator {
        Some(ch) if ch == edifact.element() => edifact,
        Some(_) => x12,
        None => SegmentReader::detect(segment)?.separators(),
    })
}

fn report_jumps(contexts: &[SegmentContext]) {
    for ctx in contexts.iter().filter(|ctx| ctx.is_jump()) {
        warn!(segment = %ctx, "hierarchical id skips ahead of its parent");
    }
}
