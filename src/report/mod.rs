// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for accessibility metrics.
//!
//! [`generate_report`] turns a snapshot plus history into an
//! [`AccessibilityReport`]. Rendering supports two output formats:
//! - Text: human-readable summary with a per-component table
//! - JSON: the report structure itself, camelCase, for dashboards

use crate::evaluate::{
    compliance_level, overall_score, trend_direction, ComplianceLevel, TrendDirection,
};
use crate::history::ViolationTrend;
use crate::metrics::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

/// Qualitative summary derived from a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub overall_score: u32,
    pub compliance_level: ComplianceLevel,
    pub trend_direction: TrendDirection,
    pub key_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A snapshot together with its summary. Built on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityReport {
    pub metrics: MetricsSnapshot,
    pub summary: ReportSummary,
}

/// Build a report for `snapshot`. The trend is read from `history` (newest
/// first), so store the snapshot first if it should count as the newest run.
pub fn generate_report(
    snapshot: &MetricsSnapshot,
    history: &[MetricsSnapshot],
) -> AccessibilityReport {
    AccessibilityReport {
        metrics: snapshot.clone(),
        summary: ReportSummary {
            overall_score: overall_score(snapshot),
            compliance_level: compliance_level(&snapshot.wcag_compliance),
            trend_direction: trend_direction(history),
            key_issues: key_issues(snapshot),
            recommendations: recommendations(snapshot),
        },
    }
}

fn key_issues(snapshot: &MetricsSnapshot) -> Vec<String> {
    let counts = &snapshot.violations_by_level;
    let coverage = snapshot.test_coverage.coverage_percentage;
    let mut issues = Vec::new();

    if counts.critical > 0 {
        issues.push(format!("{} critical accessibility violations", counts.critical));
    }
    if counts.serious > 5 {
        issues.push(format!("High number of serious violations ({})", counts.serious));
    }
    if coverage < 80.0 {
        issues.push(format!("Low test coverage ({:.0}%)", coverage));
    }

    issues
}

fn recommendations(snapshot: &MetricsSnapshot) -> Vec<String> {
    let counts = &snapshot.violations_by_level;
    let mut recommendations = Vec::new();

    if counts.critical > 0 {
        recommendations.push("Address critical accessibility violations immediately".to_string());
    }
    if counts.serious > 0 {
        recommendations.push("Review and fix serious accessibility issues".to_string());
    }
    if snapshot.test_coverage.coverage_percentage < 90.0 {
        recommendations.push("Increase accessibility test coverage".to_string());
    }

    let failing = snapshot.failing_components().len();
    if failing > 0 {
        recommendations.push(format!("Focus on {} failing components", failing));
    }

    recommendations
}

/// Render a report in the requested format
pub fn render_report(report: &AccessibilityReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text_report(report),
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_else(|e| {
            format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
        }),
    }
}

fn render_text_report(report: &AccessibilityReport) -> String {
    let metrics = &report.metrics;
    let summary = &report.summary;
    let counts = &metrics.violations_by_level;
    let mut output = String::new();

    output.push_str("=== Accessibility Report ===\n\n");
    output.push_str(&format!("Scanned:     {}\n", metrics.timestamp.to_rfc3339()));
    output.push_str(&format!("Score:       {}/100\n", summary.overall_score));
    output.push_str(&format!("Compliance:  {}\n", summary.compliance_level));
    output.push_str(&format!("Trend:       {}\n", summary.trend_direction));
    output.push_str(&format!(
        "Violations:  {} ({} critical, {} serious, {} moderate, {} minor)\n",
        metrics.total_violations, counts.critical, counts.serious, counts.moderate, counts.minor
    ));
    output.push_str(&format!(
        "WCAG:        A {:.1}% | AA {:.1}% | AAA {:.1}%\n",
        metrics.wcag_compliance.level_a,
        metrics.wcag_compliance.level_aa,
        metrics.wcag_compliance.level_aaa
    ));
    output.push_str(&format!(
        "Coverage:    {}/{} components ({:.1}%)\n",
        metrics.test_coverage.tested_components,
        metrics.test_coverage.total_components,
        metrics.test_coverage.coverage_percentage
    ));

    if !summary.key_issues.is_empty() {
        output.push_str(&format!("\n--- Key issues ({}) ---\n", summary.key_issues.len()));
        for issue in &summary.key_issues {
            output.push_str(&format!("- {}\n", issue));
        }
    }

    if !summary.recommendations.is_empty() {
        output.push_str(&format!(
            "\n--- Recommendations ({}) ---\n",
            summary.recommendations.len()
        ));
        for recommendation in &summary.recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }
    }

    if !metrics.component_metrics.is_empty() {
        output.push_str(&format!("\n--- Components ({}) ---\n", metrics.component_metrics.len()));
        for component in &metrics.component_metrics {
            let delta = if component.trends.violation_delta == 0 {
                String::new()
            } else {
                format!("  ({:+})", component.trends.violation_delta)
            };
            output.push_str(&format!(
                "{:<28} {:<8} {:>3} violation(s)  score {:>3}{}\n",
                component.component_name,
                component.status.to_string().to_uppercase(),
                component.violation_count,
                component.wcag_score,
                delta
            ));
        }
    }

    output
}

/// Render a trend series in the requested format
pub fn render_trends(trends: &[ViolationTrend], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(trends).unwrap_or_else(|e| {
            format!("{{\"error\": \"Failed to serialize trends: {}\"}}", e)
        }),
        OutputFormat::Text => {
            if trends.is_empty() {
                return "No metrics recorded in this period.\n".to_string();
            }
            let mut output = String::from("date        critical serious moderate minor total\n");
            for t in trends {
                output.push_str(&format!(
                    "{}  {:>8} {:>7} {:>8} {:>5} {:>5}\n",
                    t.date, t.critical, t.serious, t.moderate, t.minor, t.total
                ));
            }
            output
        }
    }
}
