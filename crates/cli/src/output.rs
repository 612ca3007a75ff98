//! Table rendering, JSON export and terminal status output

use std::path::Path;

use analyzer_lib::Recommendation;
use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

/// Row for the recommendations table
#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Pod Name")]
    pod_name: String,
    #[tabled(rename = "CPU Usage")]
    cpu_usage: String,
    #[tabled(rename = "CPU %")]
    cpu_percentage: String,
    #[tabled(rename = "Memory Usage")]
    memory_usage: String,
    #[tabled(rename = "Memory %")]
    memory_percentage: String,
    #[tabled(rename = "Suggested Optimization")]
    suggested_optimization: String,
}

/// Render recommendations as a table for human consumption
pub fn render(recommendations: &[Recommendation]) -> String {
    let rows: Vec<RecommendationRow> = recommendations
        .iter()
        .map(|rec| RecommendationRow {
            namespace: rec.namespace.clone(),
            pod_name: rec.pod_name.clone(),
            cpu_usage: rec.cpu_usage.clone(),
            cpu_percentage: rec.cpu_percentage.clone(),
            memory_usage: rec.memory_usage.clone(),
            memory_percentage: rec.memory_percentage.clone(),
            suggested_optimization: rec.suggested_optimization.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Write recommendations as a pretty-printed JSON array
pub fn export(recommendations: &[Recommendation], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(recommendations)
        .context("Failed to serialize recommendations")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pod: &str) -> Recommendation {
        Recommendation {
            namespace: "default".into(),
            pod_name: pod.into(),
            cpu_usage: "0.05 cores".into(),
            cpu_percentage: "5.0%".into(),
            memory_usage: "10.00 MB".into(),
            memory_percentage: "0.0%".into(),
            suggested_optimization: "Reduce CPU requests".into(),
            reason: "Low CPU usage (0.05 cores) vs request (1.00 cores)".into(),
        }
    }

    #[test]
    fn render_includes_headers_and_values() {
        let table = render(&[rec("web-1")]);

        assert!(table.contains("Namespace"));
        assert!(table.contains("Pod Name"));
        assert!(table.contains("Suggested Optimization"));
        assert!(table.contains("web-1"));
        assert!(table.contains("0.05 cores"));
    }

    #[test]
    fn export_writes_parseable_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        export(&[rec("web-1"), rec("web-2")], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'), "export should be pretty-printed");

        let parsed: Vec<Recommendation> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].pod_name, "web-1");
    }

    #[test]
    fn export_to_unwritable_path_fails() {
        let result = export(&[rec("web-1")], Path::new("/nonexistent/dir/report.json"));
        assert!(result.is_err());
    }
}
