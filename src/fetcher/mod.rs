// src/fetcher/mod.rs
// =============================================================================
// This module contains the aggregating fetcher.
//
// Submodules:
// - error: what can go wrong while fetching (transport vs parse failures)
// - http: the reqwest-backed source that talks to the real API
// - aggregate: fan-out, join, and flatten
//
// The pieces meet at the JsonSource trait below. The pipeline only knows
// "give me the JSON for this target"; whether that comes from the network
// or from a test fixture is the source's business.
//
// Rust concepts:
// - Traits: A shared interface several types can implement
// - async fn in traits: Lets each source await inside fetch_json
// =============================================================================

mod aggregate;
mod error;
mod http;
#[cfg(test)]
pub(crate) mod stub_server;

pub use aggregate::{fetch_all, flatten, result_set_len, Concurrency};
pub use error::FetchError;
pub use http::{HttpOptions, HttpSource, StatusPolicy};

use crate::targets::RequestTarget;
use serde_json::Value;

// Anything that can turn a request target into a parsed JSON value
//
// Implementations must not retry: one call, one attempt.
pub trait JsonSource {
    async fn fetch_json(&self, target: &RequestTarget) -> Result<Value, FetchError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - fetch_all() is generic over JsonSource
//    - Tests plug in a fake source with fixed answers and delays
//    - The production binary plugs in HttpSource
//
// 2. Why no Send bound?
//    - All fetches run inside one task (see aggregate.rs)
//    - Nothing is spawned onto other threads, so futures don't need Send
// -----------------------------------------------------------------------------
