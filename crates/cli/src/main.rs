//! K8s Prometheus Analyzer CLI
//!
//! Queries Prometheus for per-pod CPU and memory usage versus declared
//! resource requests, flags misconfigured workloads with a threshold rule
//! table, and emits a table plus a JSON report.

mod output;

use std::path::PathBuf;

use analyzer_lib::{analyze, queries, PrometheusClient, RuleProfile};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Analyze Kubernetes resource usage from Prometheus
#[derive(Parser)]
#[command(name = "k8s-analyze")]
#[command(author, version, about = "Analyze Kubernetes resource usage from Prometheus", long_about = None)]
struct Cli {
    /// URL of the Prometheus query API (can also be set via PROMETHEUS_URL env var)
    #[arg(
        long,
        env = "PROMETHEUS_URL",
        default_value = "http://localhost:9090/api/v1/query"
    )]
    prometheus_url: String,

    /// Output JSON file name
    #[arg(long, short, default_value = "optimization_suggestions.json")]
    output: PathBuf,

    /// Rule profile to evaluate
    #[arg(long, value_enum, default_value = "fine-grained")]
    profile: Profile,
}

/// Selectable rule profiles
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Profile {
    /// Seven fine-grained threshold rules
    #[default]
    FineGrained,
    /// Three consolidated rules with a single scaling trigger
    Consolidated,
}

impl From<Profile> for RuleProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::FineGrained => RuleProfile::FineGrained,
            Profile::Consolidated => RuleProfile::Consolidated,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let client = PrometheusClient::new(&cli.prometheus_url)?;

    info!(url = %cli.prometheus_url, "Checking Prometheus availability");
    if let Err(err) = client.check_availability().await {
        error!(%err, "Prometheus is not reachable");
        output::print_error(&format!("Exiting: {err}"));
        anyhow::bail!("Prometheus is not reachable at {}", cli.prometheus_url);
    }
    output::print_success("Prometheus is accessible");

    info!("Fetching data from Prometheus");
    let cpu_usage = fetch_or_empty(&client, queries::CPU_USAGE).await;
    let mem_usage = fetch_or_empty(&client, queries::MEMORY_USAGE).await;
    let cpu_requests = fetch_or_empty(&client, queries::CPU_REQUESTS).await;
    let mem_requests = fetch_or_empty(&client, queries::MEMORY_REQUESTS).await;

    info!("Analyzing resource usage");
    let recommendations = analyze(
        &cpu_usage,
        &mem_usage,
        &cpu_requests,
        &mem_requests,
        cli.profile.into(),
    );

    if recommendations.is_empty() {
        output::print_info("No optimizations needed. All pods are well-sized.");
    } else {
        println!("\nOptimization Suggestions:\n");
        println!("{}", output::render(&recommendations));
    }

    match output::export(&recommendations, &cli.output) {
        Ok(()) => output::print_success(&format!(
            "Report exported to {}",
            cli.output.display()
        )),
        Err(err) => {
            // Table already shown; a failed export does not fail the run
            error!(%err, "Failed to export report");
            output::print_error(&format!("Failed to export report: {err}"));
        }
    }

    Ok(())
}

/// Fetch one series, degrading to empty on failure so analysis can proceed
async fn fetch_or_empty(client: &PrometheusClient, expr: &str) -> Vec<analyzer_lib::MetricSample> {
    match client.query(expr).await {
        Ok(samples) => samples,
        Err(err) => {
            warn!(%err, query = expr, "Query failed, treating series as empty");
            output::print_warning(&format!("Query failed, continuing without it: {err}"));
            Vec::new()
        }
    }
}
