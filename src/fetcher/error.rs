// src/fetcher/error.rs
// =============================================================================
// Error taxonomy for a single fetch.
//
// Any one of these fails the whole batch: fetch_all() never returns
// partial results.
// =============================================================================

use crate::targets::RequestTarget;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be completed (DNS, connect, reset, timeout...)
    #[error("request for '{target}' failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: BoxError,
    },

    /// The response body was not valid JSON
    #[error("response for '{target}' is not valid JSON: {source}")]
    Parse {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx status, only raised under StatusPolicy::Strict
    #[error("response for '{target}' had HTTP status {status}")]
    Status { target: String, status: u16 },

    /// The target could not be turned into a URL
    #[error("target '{target}' is not a valid URL: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    pub fn transport(target: &RequestTarget, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            target: target.name.clone(),
            source: source.into(),
        }
    }

    pub fn parse(target: &RequestTarget, source: serde_json::Error) -> Self {
        Self::Parse {
            target: target.name.clone(),
            source,
        }
    }

    // Name of the target that failed
    pub fn target(&self) -> &str {
        match self {
            Self::Transport { target, .. }
            | Self::Parse { target, .. }
            | Self::Status { target, .. }
            | Self::InvalidTarget { target, .. } => target,
        }
    }
}
