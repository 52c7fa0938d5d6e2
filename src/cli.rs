// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - fetch: run every target, flatten the results, export the JSON
// - targets: show which URLs a fetch would hit, without fetching
//
// Every flag is optional. Anything not given on the command line comes from
// harvester.toml or a built-in default (see config.rs).
// =============================================================================

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "research-harvester",
    version,
    about = "Fetch a fixed set of search queries and export the combined results as one JSON array",
    long_about = "research-harvester requests every configured search query at once, waits for all \
                  of them, and concatenates the JSON arrays they return in the order the queries \
                  are listed. If any single request fails, nothing is written."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs (each request, each raw result set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every target and export the combined JSON
    ///
    /// Example: research-harvester fetch --output exports/internal-research.json
    Fetch(FetchArgs),

    /// List the target URLs without fetching them
    ///
    /// Example: research-harvester targets --preset published
    Targets(SourceArgs),
}

// Where the target list and base URL come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Built-in target list to use (internal-research, published)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Path to a config file (defaults to ./harvester.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL that relative targets are resolved against
    #[arg(long, value_name = "URL", env = "HARVESTER_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum requests in flight (default: all at once)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Fail on any non-2xx response instead of trying to parse its body
    #[arg(long)]
    pub strict_status: bool,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Where the export goes
    #[arg(long, value_enum, default_value_t = SinkKind::File)]
    pub sink: SinkKind,

    /// Export file path for the file sink (default: ./internal-research.json).
    /// Not accepted together with --sink console
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Indent the exported JSON
    #[arg(long)]
    pub pretty: bool,
}

impl FetchArgs {
    // Catches flag combinations clap can't express on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.sink == SinkKind::Console && self.output.is_some() {
            return Err("--output only applies to --sink file; \
                        drop it or switch the sink"
                .to_string());
        }
        Ok(())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Print the JSON to stdout
    Console,
    /// Write the JSON to a file
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::parse_from(["research-harvester", "fetch"]);
        assert_eq!(cli.log_level(), tracing::Level::INFO);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.sink, SinkKind::File);
        assert_eq!(args.concurrency, None);
        assert!(!args.strict_status);
    }

    #[test]
    fn test_fetch_flags() {
        let cli = Cli::parse_from([
            "research-harvester",
            "fetch",
            "--preset",
            "published",
            "--concurrency",
            "2",
            "--sink",
            "console",
            "--strict-status",
            "-v",
        ]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.source.preset.as_deref(), Some("published"));
        assert_eq!(args.concurrency, Some(2));
        assert_eq!(args.sink, SinkKind::Console);
        assert!(args.strict_status);
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["research-harvester", "-q", "-v", "targets"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_targets_subcommand() {
        let cli = Cli::parse_from(["research-harvester", "targets", "-q"]);
        assert!(matches!(cli.command, Commands::Targets(_)));
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }

    fn fetch_args(extra: &[&str]) -> FetchArgs {
        let mut argv = vec!["research-harvester", "fetch"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Fetch(args) => args,
            Commands::Targets(_) => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_console_sink_rejects_output() {
        let args = fetch_args(&["--sink", "console", "-o", "out.json"]);
        let err = args.validate().unwrap_err();
        assert!(err.contains("--output"));
    }

    #[test]
    fn test_file_sink_accepts_output() {
        assert!(fetch_args(&["-o", "out.json"]).validate().is_ok());
        assert!(fetch_args(&["--sink", "console"]).validate().is_ok());
    }
}
