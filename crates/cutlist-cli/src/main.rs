//! cutlist - convert, inspect and transform video cut lists.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cutlist_core::{CutError, English};
use cutlist_edl::EdlFormat;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{Context, Output};
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "cutlist",
    version,
    about = "Convert, inspect and transform video cut lists",
    long_about = "Reads and writes cut lists in CSV, MPlayer EDL, YouTube chapter, SRT, \
                  Final Cut Pro XML, CUE, PotPlayer bookmark and DV Analyzer formats, and \
                  computes gaps, merges and chapters over them."
)]
struct Cli {
    /// Configuration file (defaults to cutlist/cutlist.toml in the config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct MediaArgs {
    /// Frame rate of the media, required by frame based formats
    #[arg(long)]
    fps: Option<f64>,

    /// Media length in seconds, used to resolve open segment ends
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Args)]
struct InputArgs {
    /// Cut list to read
    input: PathBuf,

    /// Format of the input file
    #[arg(short, long)]
    from: EdlFormat,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (defaults to export.format from the config)
    #[arg(short, long)]
    to: Option<EdlFormat>,

    /// Output file; standard output if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl OutputArgs {
    fn as_output(&self) -> Output<'_> {
        Output {
            format: self.to,
            path: self.output.as_deref(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Convert a cut list to another format
    Convert {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        media: MediaArgs,
        /// Resolve open bounds and drop segments without length
        #[arg(long)]
        clean: bool,
    },
    /// Show the segments of a cut list and any overlaps
    Inspect {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        media: MediaArgs,
        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the gaps between segments
    Invert {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        media: MediaArgs,
        /// Leave out the gap before the first segment
        #[arg(long)]
        no_first: bool,
        /// Leave out the gap after the last segment
        #[arg(long)]
        no_last: bool,
    },
    /// Merge overlapping segments
    Merge {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// List chapters covering the timeline up to the last segment
    Chapters {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        media: MediaArgs,
        /// Print chapters as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported formats
    Formats,
}

fn init_logging(verbose: u8, default_level: &str) {
    let level = match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.log.level);
    debug!(?config, "configuration loaded");

    let context = Context::new(config);
    let media_info = |media: &MediaArgs| context.config.media_info(media.fps, media.duration);

    match cli.command {
        Command::Convert {
            input,
            output,
            media,
            clean,
        } => context.convert(
            &input.input,
            input.from,
            &output.as_output(),
            &media_info(&media),
            clean,
        ),
        Command::Inspect { input, media, json } => {
            context.inspect(&input.input, input.from, &media_info(&media), json)
        }
        Command::Invert {
            input,
            output,
            media,
            no_first,
            no_last,
        } => context.invert(
            &input.input,
            input.from,
            &output.as_output(),
            &media_info(&media),
            context.config.export.include_first && !no_first,
            context.config.export.include_last && !no_last,
        ),
        Command::Merge {
            input,
            output,
            media,
        } => context.merge(
            &input.input,
            input.from,
            &output.as_output(),
            &media_info(&media),
        ),
        Command::Chapters { input, media, json } => {
            context.chapters(&input.input, input.from, &media_info(&media), json)
        }
        Command::Formats => {
            commands::formats();
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CutError>() {
            Some(cut_error) => eprintln!("error: {}", cut_error.localized(&English)),
            None => eprintln!("error: {:#}", err),
        }
        std::process::exit(1);
    }
}
