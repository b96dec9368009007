use anyhow::Result;
use clap::Parser;
use csh2sh::batch::{self, BatchSummary};
use csh2sh::config::{Config, ErrorFormat};
use csh2sh::error::ConvertError;
use csh2sh::registry::{ConverterOptions, ConverterRegistry};
use csh2sh::review;
use csh2sh::transpile::SOURCE_EXTENSION;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "csh2sh",
    version,
    about = "Convert C-shell scripts into Bash scripts"
)]
struct Cli {
    /// Script to convert, or a directory with --recursive
    #[arg(required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Target kind to convert to
    #[arg(short, long, default_value = "sh")]
    target: String,

    /// Convert every .csh file under INPUT
    #[arg(short, long)]
    recursive: bool,

    /// Print constructs that need manual review
    #[arg(long)]
    review: bool,

    /// Print errors as JSON
    #[arg(long)]
    json: bool,

    /// Interpreter line for generated scripts
    #[arg(long)]
    header: Option<String>,

    /// List registered conversions and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CSH2SH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load();
    if cli.json {
        config.error_format = ErrorFormat::Json;
    }
    if let Some(header) = &cli.header {
        config.header = header.clone();
    }
    if cli.review {
        config.review = true;
    }

    let registry = ConverterRegistry::builtin();
    if let Err(e) = registry.validate() {
        fail(&e, config.error_format);
    }

    if cli.list {
        for (extension, target) in registry.pairs() {
            println!("{} -> {}", extension, target);
        }
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        return Ok(());
    };
    let options = ConverterOptions {
        header: config.header.clone(),
    };

    if cli.recursive {
        let summary = registry
            .resolve(SOURCE_EXTENSION, &cli.target, &options)
            .and_then(|converter| batch::convert_tree(input, converter.as_ref()));
        match summary {
            Ok(summary) => {
                report_batch(&summary, &config)?;
                if !summary.is_success() {
                    process::exit(1);
                }
            }
            Err(e) => fail(&e, config.error_format),
        }
        return Ok(());
    }

    let converted = registry
        .lookup_with(input, &cli.target, &options)
        .and_then(|converter| converter.convert(input));
    match converted {
        Ok(output) => {
            println!("Converted: {}", output.display());
            if config.review {
                print_review(input, &config)?;
            }
        }
        Err(e) => fail(&e, config.error_format),
    }

    Ok(())
}

fn report_batch(summary: &BatchSummary, config: &Config) -> Result<()> {
    for (input, output) in &summary.converted {
        println!("Converted: {}", output.display());
        if config.review {
            print_review(input, config)?;
        }
    }
    for (input, error) in &summary.failed {
        print_error(error, config.error_format);
        tracing::debug!(input = %input.display(), "skipped");
    }
    println!(
        "{} of {} scripts converted",
        summary.converted.len(),
        summary.total()
    );
    Ok(())
}

fn print_review(input: &Path, config: &Config) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let notes = review::review(&source);
    let color = config.color.enabled(std::io::stdout().is_terminal());
    print!("{}", review::format_notes(&notes, color));
    Ok(())
}

fn print_error(error: &ConvertError, format: ErrorFormat) {
    let report = error.report();
    match format {
        ErrorFormat::Json => eprintln!("{}", report.to_json()),
        ErrorFormat::Text => eprintln!("csh2sh: {}", report.with_help()),
    }
}

fn fail(error: &ConvertError, format: ErrorFormat) -> ! {
    print_error(error, format);
    process::exit(error.exit_code());
}
