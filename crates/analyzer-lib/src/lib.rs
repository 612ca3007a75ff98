//! Core library for the K8s Prometheus Analyzer
//!
//! This crate provides the core functionality for:
//! - Querying Prometheus for per-pod CPU and memory series
//! - Joining usage and request series by (pod, namespace)
//! - Rule-based analysis producing optimization recommendations

pub mod analyzer;
pub mod error;
pub mod models;
pub mod prometheus;
pub mod rules;

pub use analyzer::{analyze, index_by_pod};
pub use error::AnalyzerError;
pub use models::{MetricKey, MetricSample, Recommendation};
pub use prometheus::{queries, PrometheusClient};
pub use rules::RuleProfile;
