// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr so stdout stays clean for JSON)
// 3. Load harvester.toml and merge the flags on top
// 4. Dispatch to the subcommand
// 5. Exit with proper code (0 = success, 1 = a fetch failed, 2 = other error)
// =============================================================================

mod cli;
mod config;
mod fetcher;
mod pipeline;
mod progress;
mod sink;
mod targets;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FetchArgs, SinkKind, SourceArgs};
use config::Config;
use fetcher::{FetchError, HttpSource};
use pipeline::RunReport;
use progress::Progress;
use sink::{ConsoleSink, FileSink, Sink};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    // Only fails if a subscriber is already installed, which is harmless
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// A failed fetch is the "expected" failure; anything else is exit 2
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<FetchError>() {
        Some(fetch_error) => {
            debug!(failed = fetch_error.target(), "batch aborted, nothing exported");
            1
        }
        None => 2,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut progress = Progress::stderr(cli.quiet);
    match cli.command {
        Commands::Fetch(args) => handle_fetch(&args, &mut progress).await,
        Commands::Targets(args) => handle_targets(&args),
    }
}

// Handles the 'fetch' subcommand
async fn handle_fetch<W: Write>(args: &FetchArgs, progress: &mut Progress<W>) -> Result<()> {
    args.validate().map_err(anyhow::Error::msg)?;

    let mut config = Config::discover(args.source.config.as_deref())?;
    config.merge_fetch_args(args);
    debug!(?config, "effective config");

    let targets = config.target_list()?;
    let mut options = config.run_options()?;
    options.echo_raw_sets = args.sink == SinkKind::Console;
    let source = HttpSource::new(config.base_url()?, &config.http_options())
        .context("Failed to create HTTP client")?;

    progress.line(format!(
        "🔍 Fetching {} target(s) from '{}' at {}",
        targets.len(),
        targets.name(),
        source.base()
    ));

    let (dir, _) = config.output_location()?;
    let sink: Box<dyn Sink> = match args.sink {
        SinkKind::Console => Box::new(ConsoleSink::stdout()),
        SinkKind::File => Box::new(FileSink::new(dir.clone())),
    };

    let report = pipeline::run(&source, &targets, &options, &sink).await?;

    let written_to = match args.sink {
        SinkKind::Console => None,
        SinkKind::File => Some(dir.join(&options.file_name)),
    };
    print_summary(progress, &report, written_to.as_deref());

    Ok(())
}

// Per-target counts, then one line saying where the export went
// (None means it was printed to stdout)
fn print_summary<W: Write>(
    progress: &mut Progress<W>,
    report: &RunReport,
    written_to: Option<&Path>,
) {
    for (name, count) in &report.per_target {
        progress.line(format!("   {} record(s) from {}", count, name));
    }
    match written_to {
        None => progress.line(format!(
            "✅ Printed {} record(s) ({} bytes)",
            report.aggregate_len, report.bytes
        )),
        Some(path) => progress.line(format!(
            "✅ Wrote {} record(s) ({} bytes) to {}",
            report.aggregate_len,
            report.bytes,
            path.display()
        )),
    }
}

// Handles the 'targets' subcommand
fn handle_targets(args: &SourceArgs) -> Result<()> {
    let mut config = Config::discover(args.config.as_deref())?;
    config.merge_source_args(args);

    let base = config.base_url()?;
    let targets = config.target_list()?;

    println!("📋 {} ({} target(s))", targets.name(), targets.len());
    for target in &targets {
        let url = target
            .resolve(&base)
            .with_context(|| format!("Target '{}' is not a valid URL", target.name))?;
        println!("   {:<20} {}", target.name, url);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::RequestTarget;

    #[test]
    fn test_fetch_error_exits_with_one() {
        let target = RequestTarget::new("a", "a");
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        let err = anyhow::Error::new(FetchError::transport(&target, io)).context("Fetching failed");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn test_other_errors_exit_with_two() {
        let err = anyhow::anyhow!("Failed to parse config file");
        assert_eq!(exit_code_for(&err), 2);
    }

    fn report() -> RunReport {
        RunReport {
            per_target: vec![("sonology".to_string(), 2), ("teachers".to_string(), 1)],
            aggregate_len: 3,
            bytes: 42,
        }
    }

    #[test]
    fn test_summary_lists_targets_and_destination() {
        let mut progress = Progress::new(Vec::new(), false);
        print_summary(&mut progress, &report(), Some(Path::new("out/internal-research.json")));

        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert!(text.contains("2 record(s) from sonology"));
        assert!(text.contains("1 record(s) from teachers"));
        assert!(text.contains("✅ Wrote 3 record(s) (42 bytes) to out/internal-research.json"));
    }

    #[test]
    fn test_summary_for_console_sink() {
        let mut progress = Progress::new(Vec::new(), false);
        print_summary(&mut progress, &report(), None);

        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert!(text.contains("✅ Printed 3 record(s) (42 bytes)"));
    }

    #[test]
    fn test_quiet_suppresses_summary() {
        let mut progress = Progress::new(Vec::new(), true);
        print_summary(&mut progress, &report(), Some(Path::new("internal-research.json")));
        assert!(progress.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_console_sink_with_output_is_rejected_before_fetching() {
        let args = match Cli::parse_from([
            "research-harvester",
            "fetch",
            "--sink",
            "console",
            "--output",
            "x.json",
        ])
        .command
        {
            Commands::Fetch(args) => args,
            Commands::Targets(_) => panic!("expected fetch"),
        };
        let mut progress = Progress::new(Vec::new(), false);

        let err = handle_fetch(&args, &mut progress).await.unwrap_err();

        assert!(err.to_string().contains("--output"));
        assert_eq!(exit_code_for(&err), 2);
        assert!(progress.into_inner().is_empty());
    }
}
