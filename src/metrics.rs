// SPDX-License-Identifier: PMPL-1.0-or-later
//! Metrics snapshot types.
//!
//! A [`MetricsSnapshot`] is the result of one scan run. Snapshots are built
//! once by the aggregator and never mutated afterwards; the history store
//! only ever hands out clones. Field names serialise in camelCase, which is
//! the persisted history layout.

use crate::scan::Impact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the synthetic component that owns violations nobody claimed
pub const APPLICATION_COMPONENT: &str = "Application";

/// Violation counts per severity bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl ViolationCounts {
    /// Count one violation of the given severity
    pub fn record(&mut self, impact: Impact) {
        match impact {
            Impact::Critical => self.critical += 1,
            Impact::Serious => self.serious += 1,
            Impact::Moderate => self.moderate += 1,
            Impact::Minor => self.minor += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.serious + self.moderate + self.minor
    }
}

impl FromIterator<Impact> for ViolationCounts {
    fn from_iter<I: IntoIterator<Item = Impact>>(iter: I) -> Self {
        let mut counts = ViolationCounts::default();
        for impact in iter {
            counts.record(impact);
        }
        counts
    }
}

/// Compliance percentage per WCAG level, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WcagCompliance {
    #[serde(rename = "levelA")]
    pub level_a: f64,
    #[serde(rename = "levelAA")]
    pub level_aa: f64,
    #[serde(rename = "levelAAA")]
    pub level_aaa: f64,
}

impl WcagCompliance {
    /// Fully compliant at every level
    pub fn full() -> Self {
        Self { level_a: 100.0, level_aa: 100.0, level_aaa: 100.0 }
    }
}

impl Default for WcagCompliance {
    fn default() -> Self {
        Self::full()
    }
}

/// Health of a single component within a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Passing,
    Warning,
    Failing,
}

impl ComponentStatus {
    /// `Failing` on any critical, else `Warning` on any serious, else `Passing`
    pub fn from_counts(counts: &ViolationCounts) -> Self {
        if counts.critical > 0 {
            ComponentStatus::Failing
        } else if counts.serious > 0 {
            ComponentStatus::Warning
        } else {
            ComponentStatus::Passing
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::Passing => write!(f, "passing"),
            ComponentStatus::Warning => write!(f, "warning"),
            ComponentStatus::Failing => write!(f, "failing"),
        }
    }
}

/// Movement of a component against its previous recorded metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTrend {
    pub improving: bool,
    /// Current count minus previous count; negative means fewer violations
    pub violation_delta: i64,
}

impl ComponentTrend {
    pub fn between(previous: usize, current: usize) -> Self {
        let violation_delta = current as i64 - previous as i64;
        Self { improving: violation_delta < 0, violation_delta }
    }
}

/// Accessibility standing of one UI component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetric {
    pub component_name: String,
    pub violation_count: usize,
    pub violations_by_level: ViolationCounts,
    pub wcag_score: u32,
    pub status: ComponentStatus,
    pub last_tested: DateTime<Utc>,
    #[serde(default)]
    pub trends: ComponentTrend,
}

impl ComponentMetric {
    /// Build a metric from the severities of the violations a component owns
    pub fn new(
        component_name: &str,
        violations_by_level: ViolationCounts,
        last_tested: DateTime<Utc>,
        trends: ComponentTrend,
    ) -> Self {
        let violation_count = violations_by_level.total();
        Self {
            component_name: component_name.to_string(),
            violation_count,
            violations_by_level,
            wcag_score: component_wcag_score(violation_count),
            status: ComponentStatus::from_counts(&violations_by_level),
            last_tested,
            trends,
        }
    }

    pub fn is_failing(&self) -> bool {
        self.status == ComponentStatus::Failing
    }
}

/// 100 minus 5 per violation, floored at 0
pub fn component_wcag_score(violation_count: usize) -> u32 {
    let penalty = violation_count.saturating_mul(5);
    100usize.saturating_sub(penalty) as u32
}

/// How much of the known component registry the scan exercised
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCoverage {
    pub total_components: usize,
    pub tested_components: usize,
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Wall-clock time spent aggregating, in milliseconds
    pub test_execution_time: f64,
    pub average_violations_per_component: f64,
}

/// One full scan run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_violations: usize,
    pub violations_by_level: ViolationCounts,
    pub wcag_compliance: WcagCompliance,
    pub component_metrics: Vec<ComponentMetric>,
    pub test_coverage: TestCoverage,
    pub performance_metrics: PerformanceMetrics,
}

impl MetricsSnapshot {
    /// A snapshot with no violations, taken at `timestamp`
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            total_violations: 0,
            violations_by_level: ViolationCounts::default(),
            wcag_compliance: WcagCompliance::full(),
            component_metrics: Vec::new(),
            test_coverage: TestCoverage::default(),
            performance_metrics: PerformanceMetrics::default(),
        }
    }

    /// Look up a component's metric by name
    pub fn component(&self, name: &str) -> Option<&ComponentMetric> {
        self.component_metrics.iter().find(|c| c.component_name == name)
    }

    /// Components whose status is failing
    pub fn failing_components(&self) -> Vec<&ComponentMetric> {
        self.component_metrics.iter().filter(|c| c.is_failing()).collect()
    }
}
