//! Series join and rule engine
//!
//! The CPU-usage series drives the analysis: the other three series are
//! indexed by (pod, namespace) and joined per CPU entry. A pod that is
//! missing from the memory series counts as using 0 MB; a pod with no
//! declared request gets a 0 percentage instead of a division by zero.

use std::collections::HashMap;

use crate::models::{MetricKey, MetricSample, PodMetrics, Recommendation, BYTES_PER_MB};
use crate::rules::RuleProfile;

/// Index one series by (pod, namespace) for O(1) lookup
///
/// Duplicate keys within a series overwrite earlier entries (last-write-wins).
pub fn index_by_pod(samples: &[MetricSample]) -> HashMap<MetricKey, f64> {
    samples
        .iter()
        .map(|sample| (MetricKey::from(sample), sample.value))
        .collect()
}

/// Join the four series per pod and evaluate the profile's rule table
///
/// Iterates the CPU-usage series in order; pods absent from it are never
/// analyzed. Only pods with at least one matching rule appear in the output,
/// in the same relative order as the input series.
pub fn analyze(
    cpu_usage: &[MetricSample],
    mem_usage: &[MetricSample],
    cpu_requests: &[MetricSample],
    mem_requests: &[MetricSample],
    profile: RuleProfile,
) -> Vec<Recommendation> {
    let mem_map = index_by_pod(mem_usage);
    let cpu_request_map = index_by_pod(cpu_requests);
    let mem_request_map = index_by_pod(mem_requests);

    let rules = profile.rules();
    let mut recommendations = Vec::new();

    for sample in cpu_usage {
        if sample.pod.is_empty() || sample.namespace.is_empty() {
            continue;
        }
        let key = MetricKey::from(sample);

        let cpu_usage_cores = sample.value;
        let mem_usage_mb = mem_map.get(&key).copied().unwrap_or(0.0) / BYTES_PER_MB;
        let cpu_request_cores = cpu_request_map.get(&key).copied();
        let mem_request_mb = mem_request_map.get(&key).map(|v| v / BYTES_PER_MB);

        let cpu_percentage = match cpu_request_cores {
            Some(request) if request > 0.0 => cpu_usage_cores / request * 100.0,
            _ => 0.0,
        };
        let mem_percentage = match mem_request_mb {
            Some(request) if request > 0.0 => mem_usage_mb / request * 100.0,
            _ => 0.0,
        };

        let metrics = PodMetrics {
            namespace: key.namespace,
            pod: key.pod,
            cpu_usage_cores,
            cpu_request_cores,
            mem_usage_mb,
            mem_request_mb,
            cpu_percentage,
            mem_percentage,
        };

        let mut suggestions = Vec::new();
        let mut reasons = Vec::new();
        for rule in rules {
            if (rule.matches)(&metrics) {
                suggestions.push(rule.suggestion);
                reasons.push((rule.reason)(&metrics));
            }
        }

        if !suggestions.is_empty() {
            recommendations.push(Recommendation {
                namespace: metrics.namespace,
                pod_name: metrics.pod,
                cpu_usage: format!("{:.2} cores", metrics.cpu_usage_cores),
                cpu_percentage: format!("{:.1}%", metrics.cpu_percentage),
                memory_usage: format!("{:.2} MB", metrics.mem_usage_mb),
                memory_percentage: format!("{:.1}%", metrics.mem_percentage),
                suggested_optimization: suggestions.join(", "),
                reason: reasons.join("; "),
            });
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricSample;

    fn sample(pod: &str, value: f64) -> MetricSample {
        MetricSample::new(pod, "default", value)
    }

    fn mb(megabytes: f64) -> f64 {
        megabytes * BYTES_PER_MB
    }

    #[test]
    fn empty_cpu_series_yields_no_recommendations() {
        let mem = vec![sample("a", mb(600.0))];
        let recs = analyze(&[], &mem, &[], &[], RuleProfile::FineGrained);
        assert!(recs.is_empty());
    }

    #[test]
    fn pod_missing_from_memory_series_defaults_to_zero() {
        let cpu = vec![sample("a", 0.01)];
        let cpu_req = vec![sample("a", 1.0)];
        let recs = analyze(&cpu, &[], &cpu_req, &[], RuleProfile::FineGrained);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].memory_usage, "0.00 MB");
        assert_eq!(recs[0].memory_percentage, "0.0%");
    }

    #[test]
    fn cpu_percentage_is_zero_without_request() {
        // 2 cores with no request: over-utilization rules must stay silent
        let cpu = vec![sample("a", 2.0)];
        let mem = vec![sample("a", mb(600.0))];
        let recs = analyze(&cpu, &mem, &[], &[], RuleProfile::FineGrained);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].cpu_percentage, "0.0%");
        assert!(!recs[0].suggested_optimization.contains("Increase CPU"));
    }

    #[test]
    fn zero_valued_request_does_not_divide() {
        let cpu = vec![sample("a", 2.0)];
        let cpu_req = vec![sample("a", 0.0)];
        let recs = analyze(&cpu, &[], &cpu_req, &[], RuleProfile::FineGrained);

        // Rules still see the request as present, but the percentage is 0
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].cpu_percentage, "0.0%");
    }

    #[test]
    fn well_sized_pod_produces_no_recommendation() {
        let cpu = vec![sample("a", 0.5)];
        let mem = vec![sample("a", mb(200.0))];
        let cpu_req = vec![sample("a", 1.0)];
        let mem_req = vec![sample("a", mb(256.0))];
        let recs = analyze(&cpu, &mem, &cpu_req, &mem_req, RuleProfile::FineGrained);

        assert!(recs.is_empty());
    }

    #[test]
    fn samples_without_pod_or_namespace_are_skipped() {
        let cpu = vec![
            MetricSample::new("", "default", 0.01),
            MetricSample::new("a", "", 0.01),
            MetricSample::new("a", "default", 0.01),
        ];
        let recs = analyze(&cpu, &[], &[], &[], RuleProfile::FineGrained);

        // Only the fully-labelled near-idle pod survives
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].pod_name, "a");
    }

    #[test]
    fn multiple_rules_fire_independently_in_order() {
        // Low CPU against its request and high memory usage at once
        let cpu = vec![sample("a", 0.08)];
        let mem = vec![sample("a", mb(600.0))];
        let cpu_req = vec![sample("a", 1.0)];
        let recs = analyze(&cpu, &mem, &cpu_req, &[], RuleProfile::FineGrained);

        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].suggested_optimization,
            "Reduce CPU requests, Increase memory limits"
        );
        assert_eq!(recs[0].reason.matches(';').count(), 1);
    }

    #[test]
    fn throttling_rule_fires_when_usage_exceeds_request() {
        let cpu = vec![sample("a", 1.2)];
        let cpu_req = vec![sample("a", 1.0)];
        let mem = vec![sample("a", mb(100.0))];
        let recs = analyze(&cpu, &mem, &cpu_req, &[], RuleProfile::FineGrained);

        assert_eq!(recs.len(), 1);
        assert!(recs[0]
            .suggested_optimization
            .contains("Increase CPU limits or add replicas"));
        assert!(recs[0].suggested_optimization.contains("Increase CPU requests"));
        assert_eq!(recs[0].cpu_percentage, "120.0%");
    }

    #[test]
    fn overcommitted_memory_request_fires_reduction() {
        let cpu = vec![sample("a", 0.5)];
        let mem = vec![sample("a", mb(100.0))];
        let mem_req = vec![sample("a", mb(400.0))];
        let recs = analyze(&cpu, &mem, &[], &mem_req, RuleProfile::FineGrained);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].suggested_optimization, "Reduce memory requests");
        assert!(recs[0].reason.contains("over 3x usage"));
        assert_eq!(recs[0].memory_percentage, "25.0%");
    }

    #[test]
    fn low_usage_scenario_matches_expected_output() {
        let cpu = vec![sample("a", 0.05)];
        let cpu_req = vec![sample("a", 1.0)];
        let mem = vec![sample("a", 10_485_760.0)]; // 10 MB
        let recs = analyze(&cpu, &mem, &cpu_req, &[], RuleProfile::FineGrained);

        assert_eq!(recs.len(), 1);
        let rec = &recs[0];
        assert_eq!(rec.namespace, "default");
        assert_eq!(rec.pod_name, "a");
        assert_eq!(rec.cpu_usage, "0.05 cores");
        assert_eq!(rec.cpu_percentage, "5.0%");
        assert_eq!(rec.memory_usage, "10.00 MB");
        assert!(rec.suggested_optimization.contains("Reduce CPU requests"));
        assert!(rec
            .suggested_optimization
            .contains("Consider reducing replicas"));
    }

    #[test]
    fn consolidated_profile_uses_single_scaling_rule() {
        let cpu = vec![sample("a", 0.9)];
        let cpu_req = vec![sample("a", 1.0)];
        let mem = vec![sample("a", mb(600.0))];
        let recs = analyze(&cpu, &mem, &cpu_req, &[], RuleProfile::Consolidated);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].suggested_optimization, "Consider scaling replicas");
        assert!(recs[0].reason.contains("High resource usage"));
    }

    #[test]
    fn output_preserves_cpu_series_order() {
        let cpu = vec![
            MetricSample::new("z", "default", 0.01),
            MetricSample::new("a", "default", 0.01),
        ];
        let cpu_req = vec![
            MetricSample::new("z", "default", 1.0),
            MetricSample::new("a", "default", 1.0),
        ];
        let recs = analyze(&cpu, &[], &cpu_req, &[], RuleProfile::FineGrained);

        let pods: Vec<_> = recs.iter().map(|r| r.pod_name.as_str()).collect();
        assert_eq!(pods, vec!["z", "a"]);
    }

    #[test]
    fn analyze_is_deterministic() {
        let cpu = vec![sample("a", 0.05), sample("b", 1.2)];
        let mem = vec![sample("a", mb(10.0)), sample("b", mb(600.0))];
        let cpu_req = vec![sample("a", 1.0), sample("b", 1.0)];
        let mem_req = vec![sample("b", mb(512.0))];

        let first = analyze(&cpu, &mem, &cpu_req, &mem_req, RuleProfile::FineGrained);
        let second = analyze(&cpu, &mem, &cpu_req, &mem_req, RuleProfile::FineGrained);

        assert_eq!(first, second);
    }

    #[test]
    fn index_by_pod_is_last_write_wins_on_duplicates() {
        let series = vec![sample("a", 1.0), sample("a", 2.0)];
        let map = index_by_pod(&series);

        assert_eq!(map.len(), 1);
        let key = MetricKey {
            pod: "a".into(),
            namespace: "default".into(),
        };
        assert_eq!(map.get(&key), Some(&2.0));
    }
}
