//! HTTP client for the Prometheus query API
//!
//! One instant-vector query per metric series, each a single best-effort GET
//! with a short timeout. Stringified sample values are parsed with validation
//! at this boundary so the rule engine only ever sees numeric data.

use crate::error::AnalyzerError;
use crate::models::MetricSample;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Per-request timeout for probe and series queries
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The four fixed query expressions driving one analysis run
pub mod queries {
    pub const CPU_USAGE: &str =
        r#"sum(rate(container_cpu_usage_seconds_total{container!=""}[5m])) by (pod, namespace)"#;
    pub const MEMORY_USAGE: &str =
        r#"sum(container_memory_usage_bytes{container!=""}) by (pod, namespace)"#;
    pub const CPU_REQUESTS: &str =
        r#"sum(kube_pod_container_resource_requests{resource="cpu"}) by (pod, namespace)"#;
    pub const MEMORY_REQUESTS: &str =
        r#"sum(kube_pod_container_resource_requests{resource="memory"}) by (pod, namespace)"#;
}

/// Client for a single Prometheus query endpoint
pub struct PrometheusClient {
    client: Client,
    query_url: Url,
}

impl PrometheusClient {
    /// Create a client for the given query endpoint
    /// (e.g. "http://localhost:9090/api/v1/query")
    pub fn new(query_url: &str) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let query_url = Url::parse(query_url).map_err(|e| AnalyzerError::Unreachable {
            url: query_url.to_string(),
            reason: format!("invalid URL: {e}"),
        })?;

        Ok(Self { client, query_url })
    }

    /// The configured query endpoint
    pub fn query_url(&self) -> &str {
        self.query_url.as_str()
    }

    /// Probe the server root to verify Prometheus is up before querying
    pub async fn check_availability(&self) -> Result<(), AnalyzerError> {
        let mut probe_url = self.query_url.clone();
        probe_url.set_path("/");
        probe_url.set_query(None);

        match self.client.get(probe_url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(AnalyzerError::Unreachable {
                url: probe_url.to_string(),
                reason: format!("status {}", resp.status()),
            }),
            Err(e) => Err(AnalyzerError::Unreachable {
                url: probe_url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Run one instant query, returning the parsed samples
    ///
    /// Transport failures and non-2xx statuses surface as errors; the caller
    /// decides whether to degrade the series to empty. Individual samples
    /// with malformed values are skipped with a warning.
    pub async fn query(&self, expr: &str) -> Result<Vec<MetricSample>, AnalyzerError> {
        let response = self
            .client
            .get(self.query_url.clone())
            .query(&[("query", expr)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalyzerError::BadStatus {
                status: response.status(),
            });
        }

        let body: QueryResponse = response.json().await?;
        Ok(samples_from_entries(body.result()))
    }
}

// Wire types for the query API response. The value of each vector entry is a
// [timestamp, "stringified_value"] pair; labels may be missing entirely.

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: QueryData,
}

impl QueryResponse {
    fn result(self) -> Vec<VectorEntry> {
        self.data.result
    }
}

#[derive(Debug, Default, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<VectorEntry>,
}

#[derive(Debug, Deserialize)]
struct VectorEntry {
    #[serde(default)]
    metric: Labels,
    value: (f64, String),
}

#[derive(Debug, Default, Deserialize)]
struct Labels {
    #[serde(default)]
    pod: String,
    #[serde(default)]
    namespace: String,
}

impl VectorEntry {
    fn into_sample(self) -> Result<MetricSample, AnalyzerError> {
        let raw = self.value.1;
        let value = raw.parse::<f64>().map_err(|source| AnalyzerError::RecordParse {
            pod: self.metric.pod.clone(),
            namespace: self.metric.namespace.clone(),
            value: raw,
            source,
        })?;

        Ok(MetricSample {
            pod: self.metric.pod,
            namespace: self.metric.namespace,
            value,
        })
    }
}

/// Convert raw vector entries to samples, skipping malformed ones
fn samples_from_entries(entries: Vec<VectorEntry>) -> Vec<MetricSample> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.into_sample() {
            Ok(sample) => Some(sample),
            Err(err) => {
                warn!(%err, "Skipping sample with invalid data");
                None
            }
        })
        .collect()
}
