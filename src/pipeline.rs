// src/pipeline.rs
// =============================================================================
// The whole job, start to finish:
//
//   targets -> fetch_all (fan-out + join) -> flatten -> serialize -> sink
//
// It's one straight line. There is exactly one await point that matters
// (the join); everything after it is plain synchronous code. If the join
// fails, we return before flatten/serialize run and the sink is never
// called, so a failed run leaves no output behind.
// =============================================================================

use crate::fetcher::{self, Concurrency, JsonSource};
use crate::sink::{Delivery, Sink, DEFAULT_FILE_NAME};
use crate::targets::TargetList;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

// Per-run settings that don't belong to the source or the sink
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub concurrency: Concurrency,
    /// Indented JSON instead of one compact line
    pub pretty: bool,
    /// Name the export is delivered under
    pub file_name: String,
    /// Log each raw result set at INFO instead of DEBUG
    pub echo_raw_sets: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: Concurrency::Unbounded,
            pretty: false,
            file_name: DEFAULT_FILE_NAME.to_string(),
            echo_raw_sets: false,
        }
    }
}

// What happened, for the summary line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// (target name, items contributed), in target order
    pub per_target: Vec<(String, usize)>,
    pub aggregate_len: usize,
    pub bytes: usize,
}

pub async fn run<S, K>(
    source: &S,
    targets: &TargetList,
    options: &RunOptions,
    sink: &K,
) -> Result<RunReport>
where
    S: JsonSource,
    K: Sink + ?Sized,
{
    let result_sets = fetcher::fetch_all(source, targets, options.concurrency)
        .await
        .with_context(|| format!("Fetching target list '{}' failed", targets.name()))?;

    // The raw per-target results, before they lose their grouping
    let per_target: Vec<(String, usize)> = targets
        .iter()
        .zip(&result_sets)
        .map(|(target, set)| {
            if options.echo_raw_sets {
                info!(name = %target.name, raw = %set, "result set");
            } else {
                debug!(name = %target.name, raw = %set, "result set");
            }
            (target.name.clone(), fetcher::result_set_len(set))
        })
        .collect();

    let aggregate = fetcher::flatten(result_sets);
    let body = serialize(&aggregate, options.pretty)?;

    info!(
        targets = per_target.len(),
        records = aggregate.len(),
        bytes = body.len(),
        "aggregate ready"
    );

    let report = RunReport {
        per_target,
        aggregate_len: aggregate.len(),
        bytes: body.len(),
    };

    sink.deliver(&Delivery::json(options.file_name.clone(), body))?;

    Ok(report)
}

fn serialize(aggregate: &[Value], pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(aggregate)
    } else {
        serde_json::to_string(aggregate)
    };
    text.context("Failed to serialize aggregate")
}
