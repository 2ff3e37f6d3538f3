use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use logtriage::classify::Classifier;
use logtriage::extract::Extractor;
use logtriage::ingest::normalizer::normalize;
use logtriage::ingest::source::{FileSource, Source, StdinSource};
use logtriage::report::{render_json, ConsoleReport};
use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "logtriage")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(about = "Triage CI build logs: extract failures and classify them", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a log file, or stdin when no file is given
    Analyze {
        /// Path to the log file (reads stdin if omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Only print the summary, not the detailed failures
        #[arg(long)]
        summary_only: bool,

        /// Emit the report as JSON instead of the console format
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Report output owns stdout; diagnostics go to stderr.
    // Set RUST_LOG to override (e.g. RUST_LOG=logtriage=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = match args.command {
        Command::Analyze {
            file,
            summary_only,
            json,
        } => run_analyze(file, summary_only, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_analyze(file: Option<PathBuf>, summary_only: bool, json: bool) -> anyhow::Result<()> {
    let lines = match file {
        Some(path) => {
            tracing::info!(path = %path.display(), "analyzing log file");
            FileSource::new(path).read()?
        }
        None => {
            if std::io::stdin().is_terminal() {
                bail!("no file provided and stdin is not piped; provide a file path or pipe input");
            }
            StdinSource::new().read()?
        }
    };

    let records = normalize(&lines);

    let mut extractor = Extractor::new();
    let failures = extractor.extract(&records);
    let stats = extractor.stats();

    let mut classifier = Classifier::new();
    let classified = classifier.classify_batch(&failures);
    tracing::debug!(stats = ?classifier.stats(), "classification statistics");

    let stdout = std::io::stdout().lock();
    if json {
        render_json(stdout, &classified, &stats).context("failed to write JSON report")?;
    } else {
        let mut report = ConsoleReport::new(stdout);
        if summary_only {
            report.render_summary_only(&classified, &stats)
        } else {
            report.render(&classified, &stats)
        }
        .context("failed to write report")?;
    }

    Ok(())
}
