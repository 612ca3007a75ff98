//! Core data models for the analyzer

use serde::{Deserialize, Serialize};

/// Bytes per megabyte, the unit all memory values are displayed in
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One parsed observation from a Prometheus series
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub pod: String,
    pub namespace: String,
    pub value: f64,
}

impl MetricSample {
    pub fn new(pod: impl Into<String>, namespace: impl Into<String>, value: f64) -> Self {
        Self {
            pod: pod.into(),
            namespace: namespace.into(),
            value,
        }
    }
}

/// Join key for looking up a pod across series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricKey {
    pub pod: String,
    pub namespace: String,
}

impl From<&MetricSample> for MetricKey {
    fn from(sample: &MetricSample) -> Self {
        Self {
            pod: sample.pod.clone(),
            namespace: sample.namespace.clone(),
        }
    }
}

/// Joined per-pod view consumed by the rule engine
///
/// Built fresh for each entry of the CPU-usage series and discarded once the
/// rules have been evaluated. Memory fields are already in MB.
#[derive(Debug, Clone)]
pub struct PodMetrics {
    pub namespace: String,
    pub pod: String,
    pub cpu_usage_cores: f64,
    pub cpu_request_cores: Option<f64>,
    pub mem_usage_mb: f64,
    pub mem_request_mb: Option<f64>,
    pub cpu_percentage: f64,
    pub mem_percentage: f64,
}

/// One pod's bundled suggestions and reasons, the unit of output
///
/// Display fields are pre-formatted strings; field order here is the field
/// order of the exported JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub namespace: String,
    pub pod_name: String,
    pub cpu_usage: String,
    pub cpu_percentage: String,
    pub memory_usage: String,
    pub memory_percentage: String,
    pub suggested_optimization: String,
    pub reason: String,
}
