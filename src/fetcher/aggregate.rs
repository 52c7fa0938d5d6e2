// src/fetcher/aggregate.rs
// =============================================================================
// Fan-out, join, flatten.
//
// How it works:
// 1. Build one pending fetch per target (nothing runs yet, futures are lazy)
// 2. Drive them all at once inside the current task
// 3. Wait for every one of them; the first failure fails the batch
// 4. Hand back the result sets in TARGET order, not completion order
// 5. flatten() concatenates them one level deep
//
// Rust concepts:
// - try_join_all: Promise.all() for futures that return Result
// - buffered(n): Like buffer_unordered(n), but yields in input order
// - NonZeroUsize: A cap of zero can't even be represented
// =============================================================================

use super::{FetchError, JsonSource};
use crate::targets::TargetList;
use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use std::num::NonZeroUsize;
use tracing::debug;

// How many fetches may be in flight at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// Every target is requested immediately
    #[default]
    Unbounded,
    /// At most this many requests in flight
    Limited(NonZeroUsize),
}

impl Concurrency {
    // None or 0 both mean "no cap"
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit.and_then(NonZeroUsize::new) {
            Some(n) => Concurrency::Limited(n),
            None => Concurrency::Unbounded,
        }
    }
}

// Fetches every target and returns one result set per target, in order
//
// All-or-nothing: if any fetch fails, the error is returned and every
// result that already arrived is dropped.
pub async fn fetch_all<S: JsonSource>(
    source: &S,
    targets: &TargetList,
    concurrency: Concurrency,
) -> Result<Vec<Value>, FetchError> {
    debug!(
        list = targets.name(),
        count = targets.len(),
        ?concurrency,
        "fanning out"
    );

    let pending = targets.iter().map(|target| source.fetch_json(target));

    match concurrency {
        Concurrency::Unbounded => try_join_all(pending).await,
        Concurrency::Limited(limit) => {
            stream::iter(pending)
                .buffered(limit.get())
                .try_collect()
                .await
        }
    }
}

// Concatenates result sets one level deep
//
// Arrays contribute their items; any other value (an object, a string, null)
// is kept as a single item, the same way a one-level flat() treats it.
pub fn flatten(result_sets: Vec<Value>) -> Vec<Value> {
    let mut aggregate = Vec::with_capacity(result_sets.iter().map(result_set_len).sum());

    for set in result_sets {
        match set {
            Value::Array(items) => aggregate.extend(items),
            other => aggregate.push(other),
        }
    }

    aggregate
}

// How many items a result set contributes to the aggregate
pub fn result_set_len(set: &Value) -> usize {
    match set {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not buffer_unordered?
//    - buffer_unordered yields results as they finish
//    - Our output order must match the target list, so we use buffered(),
//      which still runs n at a time but yields in input order
//
// 2. Where is the concurrency coming from? There's no tokio::spawn here.
//    - try_join_all polls every future inside the current task
//    - Each request makes progress whenever its socket is ready
//    - One task, many in-flight requests, no threads to coordinate
//
// 3. What happens to the other requests when one fails?
//    - try_join_all returns the error right away and drops the rest
//    - Dropping a reqwest future abandons that request
// -----------------------------------------------------------------------------
