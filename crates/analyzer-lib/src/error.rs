//! Error taxonomy for the analyzer
//!
//! Only `Unreachable` is fatal to a run: a failed series query degrades that
//! series to empty, and a malformed sample is skipped. Every recovery path
//! logs before continuing.

use thiserror::Error;

/// Errors produced while fetching or parsing Prometheus data
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Prometheus did not answer the startup reachability probe
    #[error("Prometheus not reachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// A series query failed at the transport level (connect, timeout, body)
    #[error("query request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Prometheus answered a series query with a non-success status
    #[error("Prometheus responded with status {status}")]
    BadStatus { status: reqwest::StatusCode },

    /// A sample carried a value that is not a valid float
    #[error("invalid value {value:?} for pod {pod:?} in namespace {namespace:?}")]
    RecordParse {
        pod: String,
        namespace: String,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}
