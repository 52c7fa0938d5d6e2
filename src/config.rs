// src/config.rs
// =============================================================================
// This module loads the optional harvester.toml config file and merges the
// command-line flags on top of it.
//
// Precedence (highest first):
//   1. command-line flag (or its environment variable)
//   2. harvester.toml
//   3. built-in default
//
// Example harvester.toml:
//
//   base_url = "https://www.researchcatalogue.net/"
//   concurrency = 4
//   strict_status = true
//   output = "exports/internal-research.json"
//
//   [[targets]]
//   name = "sonology"
//   path = "portal/search-result?keyword=sonology&format=json&limit=50&page=0"
//
// When [[targets]] entries are present they replace the preset, unless a
// preset is asked for explicitly on the command line.
// =============================================================================

use crate::cli::{FetchArgs, SourceArgs};
use crate::fetcher::{Concurrency, HttpOptions, StatusPolicy};
use crate::pipeline::RunOptions;
use crate::sink::DEFAULT_FILE_NAME;
use crate::targets::{self, RequestTarget, TargetList};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "harvester.toml";
pub const DEFAULT_BASE_URL: &str = "https://www.researchcatalogue.net/";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL that relative targets are resolved against
    #[serde(default)]
    pub base_url: Option<String>,

    /// Built-in target list to use when no [[targets]] are given
    #[serde(default)]
    pub preset: Option<String>,

    /// Explicit target list, in output order
    #[serde(default)]
    pub targets: Vec<RequestTarget>,

    /// Max requests in flight; unset means no cap
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Treat non-2xx responses as failures
    #[serde(default)]
    pub strict_status: bool,

    /// Per-request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Indent the exported JSON
    #[serde(default)]
    pub pretty: bool,

    /// Where the file sink writes the export
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    // Loads ./harvester.toml if it exists
    pub fn load_default() -> Result<Option<Self>> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    // Explicit --config path, else ./harvester.toml, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_default()?.unwrap_or_default()),
        }
    }

    // Applies the flags shared by every subcommand
    pub fn merge_source_args(&mut self, args: &SourceArgs) {
        if let Some(ref base_url) = args.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(ref preset) = args.preset {
            self.preset = Some(preset.clone());
            // An explicit preset wins over targets from the file
            self.targets.clear();
        }
    }

    // Applies the fetch-only flags
    pub fn merge_fetch_args(&mut self, args: &FetchArgs) {
        self.merge_source_args(&args.source);

        if let Some(concurrency) = args.concurrency {
            self.concurrency = Some(concurrency);
        }
        if let Some(timeout) = args.timeout {
            self.timeout_secs = Some(timeout);
        }
        if let Some(ref output) = args.output {
            self.output = Some(output.clone());
        }

        // Flags can only switch these on
        if args.strict_status {
            self.strict_status = true;
        }
        if args.pretty {
            self.pretty = true;
        }
    }

    pub fn target_list(&self) -> Result<TargetList> {
        if !self.targets.is_empty() {
            return Ok(TargetList::new("config", self.targets.clone())?);
        }
        let name = self.preset.as_deref().unwrap_or(targets::DEFAULT_PRESET);
        Ok(targets::preset(name)?)
    }

    // Parses the base URL and makes sure it ends in '/'
    //
    // Without the trailing slash, Url::join would replace the last path
    // segment instead of appending to it.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let mut url = Url::parse(raw).with_context(|| format!("Invalid base URL: {}", raw))?;
        if url.cannot_be_a_base() {
            bail!("Base URL cannot have paths joined onto it: {}", raw);
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn concurrency(&self) -> Result<Concurrency> {
        match self.concurrency {
            Some(0) => bail!("concurrency must be at least 1"),
            limit => Ok(Concurrency::from_limit(limit)),
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            status_policy: if self.strict_status {
                StatusPolicy::Strict
            } else {
                StatusPolicy::Lenient
            },
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    // Splits the output path into (directory, file name)
    pub fn output_location(&self) -> Result<(PathBuf, String)> {
        let path = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Output path has no usable file name: {}", path.display()))?
            .to_string();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok((dir, file_name))
    }

    pub fn run_options(&self) -> Result<RunOptions> {
        let (_, file_name) = self.output_location()?;
        Ok(RunOptions {
            concurrency: self.concurrency()?,
            pretty: self.pretty,
            file_name,
            echo_raw_sets: false,
        })
    }
}
