//! mdocx - Markdown report to DOCX converter

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;

use mdocx::sections::DEFAULT_REPORT;
use mdocx::{BlockParser, Error, build_bundle, build_single, decode_source, split_report};

#[derive(Parser)]
#[command(name = "mdocx")]
#[command(version, about = "Markdown report to DOCX converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    mdocx single README.md README.docx          Convert one file
    mdocx bundle \"Reports\" all.docx a.md b.md    Concatenate files with a title
    mdocx split report.md --out-dir Reports     Write the derivative packages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one markdown file
    Single {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Concatenate markdown files into one document, separated by page breaks
    Bundle {
        /// Emitted as a level-1 heading before the first file
        #[arg(value_name = "TITLE")]
        title: String,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Split a report into the team, summary and wiki packages
    Split {
        #[arg(value_name = "REPORT", default_value = DEFAULT_REPORT)]
        report: PathBuf,

        /// Output root (defaults to the report's directory)
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Print the parsed block sequence
    Blocks {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| format!("mdocx={level}"));
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Single { input, output } => {
            build_single(&input, &output)?;
        }
        Command::Bundle {
            title,
            output,
            inputs,
        } => {
            build_bundle(inputs, &output, Some(title.as_str()))?;
        }
        Command::Split { report, out_dir } => {
            let out_root = match out_dir {
                Some(dir) => dir,
                None => report_dir(&report),
            };
            let written = split_report(&report, &out_root)?;
            debug!(count = written.len(), "split complete");
        }
        Command::Blocks { input, json } => dump_blocks(&input, json)?,
    }
    Ok(())
}

fn report_dir(report: &Path) -> PathBuf {
    match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn dump_blocks(input: &Path, json: bool) -> Result<(), Error> {
    let source = decode_source(&fs::read(input)?);
    let blocks: Vec<_> = BlockParser::new(&source).collect();

    if json {
        let text = serde_json::to_string_pretty(&blocks).map_err(std::io::Error::from)?;
        println!("{text}");
    } else {
        for block in &blocks {
            println!("{block:?}");
        }
    }
    Ok(())
}
