// SPDX-License-Identifier: PMPL-1.0-or-later
//! The monitor facade.
//!
//! [`AccessibilityMonitor`] ties an aggregator to an injected
//! [`HistoryStore`]. None of its operations fail: persistence problems are
//! logged by the store and show up as missing history.

use crate::aggregate::MetricsAggregator;
use crate::attribution::MarkupAttribution;
use crate::config::Config;
use crate::history::{HistoryStore, ViolationTrend};
use crate::metrics::MetricsSnapshot;
use crate::report::{generate_report, AccessibilityReport};
use crate::scan::RawViolation;
use tracing::debug;

pub struct AccessibilityMonitor {
    aggregator: MetricsAggregator,
    history: HistoryStore,
}

impl AccessibilityMonitor {
    pub fn new(aggregator: MetricsAggregator, history: HistoryStore) -> Self {
        Self { aggregator, history }
    }

    /// Monitor with markup attribution, the configured registry and file-backed history
    pub fn from_config(config: &Config) -> Self {
        let aggregator =
            MetricsAggregator::new(Box::new(MarkupAttribution), config.registry.build());
        Self::new(aggregator, config.open_history())
    }

    /// Reduce one scan run to a snapshot. Does not store it.
    pub fn process_results(
        &self,
        violations: &[RawViolation],
        component: Option<&str>,
    ) -> MetricsSnapshot {
        self.aggregator.process(violations, component, self.history.snapshots())
    }

    pub fn generate_report(&self, snapshot: &MetricsSnapshot) -> AccessibilityReport {
        generate_report(snapshot, self.history.snapshots())
    }

    pub fn store_metrics(&mut self, snapshot: MetricsSnapshot) {
        debug!(timestamp = %snapshot.timestamp, "Storing metrics snapshot");
        self.history.store(snapshot);
    }

    /// Every stored snapshot, newest first
    pub fn get_metrics_history(&self) -> Vec<MetricsSnapshot> {
        self.history.get_history()
    }

    pub fn get_trend_data(&self, days: u32) -> Vec<ViolationTrend> {
        self.history.get_trend_data(days)
    }

    pub fn get_component_trends(&self, component_name: &str, days: u32) -> Vec<ViolationTrend> {
        self.history.get_component_trends(component_name, days)
    }

    /// Report on the newest stored snapshot, if any
    pub fn latest_report(&self) -> Option<AccessibilityReport> {
        self.history.latest().map(|snapshot| self.generate_report(snapshot))
    }
}
