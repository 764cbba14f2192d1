// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-monitor - accessibility scan metrics and compliance reporting
//!
//! Turns raw automated accessibility scan results (axe-core shaped
//! violations) into metrics snapshots, keeps a bounded history of them and
//! derives a qualitative report: a 0-100 score, a WCAG compliance tier, the
//! violation trend, key issues and recommendations.
//!
//! ## Pipeline
//!
//! - **Scan** (`scan`): parse scanner output, defaulting missing severities
//! - **Classify** (`classify`): severity bucket and WCAG A/AA/AAA membership
//! - **Attribute** (`attribution`): map violations to UI components
//! - **Aggregate** (`aggregate`, `coverage`): build a `MetricsSnapshot`
//! - **History** (`history`): bounded, persisted, newest-first snapshots
//! - **Evaluate** (`evaluate`): score, compliance tier, trend direction
//! - **Report** (`report`): summary plus text/JSON rendering
//!
//! [`AccessibilityMonitor`] wires these together over an injected history
//! store.

pub mod aggregate;
pub mod attribution;
pub mod classify;
pub mod config;
pub mod coverage;
pub mod error;
pub mod evaluate;
pub mod history;
pub mod metrics;
pub mod monitor;
pub mod report;
pub mod scan;

pub use aggregate::MetricsAggregator;
pub use attribution::{AttributionStrategy, FixedAttribution, MarkupAttribution};
pub use classify::WcagLevel;
pub use config::Config;
pub use error::{MonitorError, Result};
pub use evaluate::{ComplianceLevel, TrendDirection};
pub use history::{FileBackend, HistoryBackend, HistoryStore, MemoryBackend, ViolationTrend};
pub use metrics::{ComponentMetric, ComponentStatus, MetricsSnapshot};
pub use monitor::AccessibilityMonitor;
pub use report::{AccessibilityReport, OutputFormat};
pub use scan::{Impact, RawViolation, ViolationNode};
