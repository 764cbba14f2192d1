// SPDX-License-Identifier: PMPL-1.0-or-later
//! Metrics aggregation.
//!
//! Reduces one scan run's violations into a [`MetricsSnapshot`]:
//!
//! - severity buckets and totals
//! - per-level WCAG compliance against a nominal universe of
//!   [`CHECK_UNIVERSE`] checks
//! - per-component metrics, with trends against the component's previous
//!   appearance in history
//! - coverage against the component registry
//!
//! The compliance figure is coarse on purpose: it only measures violation
//! volume against a fixed 50-check denominator, not real success criteria.

use crate::attribution::{AttributionStrategy, FixedAttribution, MarkupAttribution};
use crate::classify::{classify, Classification, WcagLevel};
use crate::coverage::{estimate_coverage, ComponentRegistry, CountRegistry};
use crate::metrics::{
    ComponentMetric, ComponentTrend, MetricsSnapshot, PerformanceMetrics, ViolationCounts,
    WcagCompliance, APPLICATION_COMPONENT,
};
use crate::scan::RawViolation;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info};

/// Nominal number of checks each WCAG level is scored against
pub const CHECK_UNIVERSE: usize = 50;

/// Builds snapshots from raw scan violations
pub struct MetricsAggregator {
    strategy: Box<dyn AttributionStrategy>,
    registry: Box<dyn ComponentRegistry>,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(Box::new(MarkupAttribution), Box::new(CountRegistry(0)))
    }
}

impl MetricsAggregator {
    pub fn new(
        strategy: Box<dyn AttributionStrategy>,
        registry: Box<dyn ComponentRegistry>,
    ) -> Self {
        Self { strategy, registry }
    }

    /// Aggregate a scan run taken now.
    ///
    /// `history` is newest first and is only read, to fill component trends.
    /// With `component` set, every violation is attributed to that component.
    pub fn process(
        &self,
        violations: &[RawViolation],
        component: Option<&str>,
        history: &[MetricsSnapshot],
    ) -> MetricsSnapshot {
        self.process_at(violations, component, history, Utc::now())
    }

    pub fn process_at(
        &self,
        violations: &[RawViolation],
        component: Option<&str>,
        history: &[MetricsSnapshot],
        timestamp: DateTime<Utc>,
    ) -> MetricsSnapshot {
        let started = Instant::now();

        let classified: Vec<(&RawViolation, Classification)> =
            violations.iter().map(|v| (v, classify(v))).collect();

        let violations_by_level: ViolationCounts =
            classified.iter().map(|(_, c)| c.severity).collect();
        let wcag_compliance = wcag_compliance(classified.iter().map(|(_, c)| c));

        let fixed;
        let strategy: &dyn AttributionStrategy = match component {
            Some(name) => {
                fixed = FixedAttribution::new(name);
                &fixed
            }
            None => self.strategy.as_ref(),
        };

        let mut groups = group_by_component(strategy, &classified);
        if groups.is_empty() {
            if let Some(name) = component {
                // a scoped scan that came back clean still tested its component
                groups.push((name.to_string(), ViolationCounts::default()));
            }
        }
        let tested_components = groups.len();
        if groups.is_empty() {
            debug!(
                strategy = strategy.name(),
                "No component attributed, using {}", APPLICATION_COMPONENT
            );
            groups.push((APPLICATION_COMPONENT.to_string(), violations_by_level));
        }

        let component_metrics: Vec<ComponentMetric> = groups
            .into_iter()
            .map(|(name, counts)| {
                let trends = prior_trend(history, &name, counts.total());
                ComponentMetric::new(&name, counts, timestamp, trends)
            })
            .collect();

        let test_coverage = estimate_coverage(self.registry.total_components(), tested_components);

        let average_violations_per_component = if component_metrics.is_empty() {
            0.0
        } else {
            violations.len() as f64 / component_metrics.len() as f64
        };

        let snapshot = MetricsSnapshot {
            timestamp,
            total_violations: violations.len(),
            violations_by_level,
            wcag_compliance,
            component_metrics,
            test_coverage,
            performance_metrics: PerformanceMetrics {
                test_execution_time: started.elapsed().as_secs_f64() * 1000.0,
                average_violations_per_component,
            },
        };

        info!(
            total = snapshot.total_violations,
            critical = snapshot.violations_by_level.critical,
            components = snapshot.component_metrics.len(),
            "Processed accessibility scan"
        );

        snapshot
    }
}

/// Compliance percentage for a level with `violating` matching violations
pub fn level_compliance(violating: usize) -> f64 {
    let remaining = CHECK_UNIVERSE.saturating_sub(violating) as f64;
    remaining * 100.0 / CHECK_UNIVERSE as f64
}

fn wcag_compliance<'a>(
    classifications: impl Iterator<Item = &'a Classification>,
) -> WcagCompliance {
    let mut violating = [0usize; 3];
    for c in classifications {
        for (slot, level) in violating.iter_mut().zip(WcagLevel::ALL) {
            if c.violates(level) {
                *slot += 1;
            }
        }
    }

    WcagCompliance {
        level_a: level_compliance(violating[0]),
        level_aa: level_compliance(violating[1]),
        level_aaa: level_compliance(violating[2]),
    }
}

/// Severity counts per attributed component, in order of first appearance
fn group_by_component(
    strategy: &dyn AttributionStrategy,
    classified: &[(&RawViolation, Classification)],
) -> Vec<(String, ViolationCounts)> {
    let mut groups: Vec<(String, ViolationCounts)> = Vec::new();

    for (violation, classification) in classified {
        for name in strategy.attribute(violation) {
            match groups.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, counts)) => counts.record(classification.severity),
                None => {
                    let mut counts = ViolationCounts::default();
                    counts.record(classification.severity);
                    groups.push((name, counts));
                }
            }
        }
    }

    groups
}

/// Trend against the most recent snapshot in which the component appeared
fn prior_trend(history: &[MetricsSnapshot], name: &str, current: usize) -> ComponentTrend {
    history
        .iter()
        .find_map(|s| s.component(name))
        .map(|previous| ComponentTrend::between(previous.violation_count, current))
        .unwrap_or_default()
}
