//! Threshold rule tables for the rule engine
//!
//! Two profiles are shipped: the fine-grained table with seven independent
//! rules, and the consolidated table that folds the high-utilization checks
//! into a single scaling rule. Rules within a profile are evaluated in order
//! and are non-exclusive; every match contributes a suggestion and a reason.

use crate::models::PodMetrics;

/// Which rule table `analyze` evaluates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleProfile {
    /// Seven fine-grained rules (default)
    #[default]
    FineGrained,
    /// Three consolidated rules with a single scaling trigger
    Consolidated,
}

impl RuleProfile {
    pub(crate) fn rules(self) -> &'static [Rule] {
        match self {
            RuleProfile::FineGrained => FINE_GRAINED,
            RuleProfile::Consolidated => CONSOLIDATED,
        }
    }
}

/// One threshold rule: a predicate plus a reason formatter
pub(crate) struct Rule {
    pub suggestion: &'static str,
    pub matches: fn(&PodMetrics) -> bool,
    pub reason: fn(&PodMetrics) -> String,
}

const FINE_GRAINED: &[Rule] = &[
    Rule {
        suggestion: "Reduce CPU requests",
        matches: |m| m.cpu_request_cores.is_some() && m.cpu_usage_cores < 0.1,
        reason: |m| {
            format!(
                "Low CPU usage ({:.2} cores) vs request ({:.2} cores)",
                m.cpu_usage_cores,
                m.cpu_request_cores.unwrap_or(0.0)
            )
        },
    },
    Rule {
        suggestion: "Reduce memory requests",
        matches: |m| m.mem_request_mb.is_some() && m.mem_usage_mb < 50.0,
        reason: |m| {
            format!(
                "Low memory usage ({:.2} MB) vs request ({:.2} MB)",
                m.mem_usage_mb,
                m.mem_request_mb.unwrap_or(0.0)
            )
        },
    },
    Rule {
        suggestion: "Increase CPU limits or add replicas",
        matches: |m| m.cpu_percentage > 80.0,
        reason: |m| format!("High CPU utilization ({:.1}% of request)", m.cpu_percentage),
    },
    Rule {
        suggestion: "Increase memory limits",
        matches: |m| m.mem_usage_mb > 500.0,
        reason: |m| format!("High memory usage ({:.2} MB)", m.mem_usage_mb),
    },
    Rule {
        suggestion: "Increase CPU requests",
        matches: |m| m
            .cpu_request_cores
            .is_some_and(|request| m.cpu_usage_cores > request),
        reason: |m| {
            format!(
                "CPU usage ({:.2} cores) exceeds request ({:.2} cores), risking throttling",
                m.cpu_usage_cores,
                m.cpu_request_cores.unwrap_or(0.0)
            )
        },
    },
    Rule {
        suggestion: "Reduce memory requests",
        matches: |m| m
            .mem_request_mb
            .is_some_and(|request| request > m.mem_usage_mb * 3.0),
        reason: |m| {
            format!(
                "Memory request ({:.2} MB) is over 3x usage ({:.2} MB)",
                m.mem_request_mb.unwrap_or(0.0),
                m.mem_usage_mb
            )
        },
    },
    Rule {
        suggestion: "Consider reducing replicas",
        matches: |m| m.cpu_usage_cores <= 0.05 && m.mem_usage_mb < 20.0,
        reason: |m| {
            format!(
                "Near-idle pod: CPU {:.2} cores, memory {:.2} MB",
                m.cpu_usage_cores, m.mem_usage_mb
            )
        },
    },
];

const CONSOLIDATED: &[Rule] = &[
    Rule {
        suggestion: "Reduce CPU requests",
        matches: |m| m.cpu_request_cores.is_some() && m.cpu_usage_cores < 0.1,
        reason: |m| {
            format!(
                "Low CPU usage ({:.2} cores) vs request ({:.2} cores)",
                m.cpu_usage_cores,
                m.cpu_request_cores.unwrap_or(0.0)
            )
        },
    },
    Rule {
        suggestion: "Reduce memory requests",
        matches: |m| m.mem_request_mb.is_some() && m.mem_usage_mb < 50.0,
        reason: |m| {
            format!(
                "Low memory usage ({:.2} MB) vs request ({:.2} MB)",
                m.mem_usage_mb,
                m.mem_request_mb.unwrap_or(0.0)
            )
        },
    },
    Rule {
        suggestion: "Consider scaling replicas",
        matches: |m| m.cpu_percentage > 80.0 || m.mem_usage_mb > 500.0,
        reason: |m| {
            format!(
                "High resource usage: CPU {:.1}%, Memory {:.2} MB",
                m.cpu_percentage, m.mem_usage_mb
            )
        },
    },
];
