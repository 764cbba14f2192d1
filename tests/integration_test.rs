// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for a11y-monitor

use a11y_monitor::aggregate::MetricsAggregator;
use a11y_monitor::attribution::MarkupAttribution;
use a11y_monitor::config::Config;
use a11y_monitor::coverage::StaticRegistry;
use a11y_monitor::report::{render_report, OutputFormat};
use a11y_monitor::scan::{self, Impact, RawViolation};
use a11y_monitor::{
    AccessibilityMonitor, ComplianceLevel, ComponentStatus, FileBackend, HistoryStore,
    TrendDirection,
};
use std::path::Path;
use tempfile::TempDir;

fn in_memory_monitor() -> AccessibilityMonitor {
    AccessibilityMonitor::new(MetricsAggregator::default(), HistoryStore::in_memory())
}

#[test]
fn test_clean_scan_is_fully_compliant() {
    let monitor = in_memory_monitor();
    let snapshot = monitor.process_results(&[], None);

    assert_eq!(snapshot.total_violations, 0);
    assert_eq!(snapshot.violations_by_level.total(), 0);
    assert_eq!(snapshot.wcag_compliance.level_a, 100.0);
    assert_eq!(snapshot.wcag_compliance.level_aa, 100.0);
    assert_eq!(snapshot.wcag_compliance.level_aaa, 100.0);

    let report = monitor.generate_report(&snapshot);
    assert_eq!(report.summary.overall_score, 100);
    assert_eq!(report.summary.compliance_level, ComplianceLevel::AAA);
}

#[test]
fn test_single_critical_contrast_violation() {
    let monitor = in_memory_monitor();
    let violations =
        vec![RawViolation::new("color-contrast", Impact::Critical).with_tags(&["color-contrast"])];
    let snapshot = monitor.process_results(&violations, None);

    assert_eq!(snapshot.violations_by_level.critical, 1);
    assert_eq!(snapshot.wcag_compliance.level_a, 98.0);
    assert_eq!(snapshot.wcag_compliance.level_aa, 100.0);

    let report = monitor.generate_report(&snapshot);
    // AA compliance (100) - 10 for one critical, no coverage bonus
    assert_eq!(report.summary.overall_score, 90);
    assert!(report
        .summary
        .key_issues
        .contains(&"1 critical accessibility violations".to_string()));
}

#[test]
fn test_six_serious_untagged_violations() {
    let monitor = in_memory_monitor();
    let violations: Vec<RawViolation> =
        (0..6).map(|_| RawViolation::new("region", Impact::Serious)).collect();
    let snapshot = monitor.process_results(&violations, None);

    assert_eq!(snapshot.wcag_compliance.level_a, 100.0);
    assert_eq!(snapshot.wcag_compliance.level_aa, 100.0);
    assert_eq!(snapshot.wcag_compliance.level_aaa, 100.0);

    let report = monitor.generate_report(&snapshot);
    assert_eq!(report.summary.overall_score, 70);
    assert!(report
        .summary
        .key_issues
        .contains(&"High number of serious violations (6)".to_string()));
}

#[test]
fn test_sequential_snapshots_improve() {
    let mut monitor = in_memory_monitor();
    let minor = |n: usize| -> Vec<RawViolation> {
        (0..n).map(|_| RawViolation::new("list", Impact::Minor)).collect()
    };
    let ten = minor(10);
    let four = minor(4);

    let first = monitor.process_results(&ten, None);
    monitor.store_metrics(first);
    let second = monitor.process_results(&four, None);
    monitor.store_metrics(second.clone());

    let report = monitor.generate_report(&second);
    assert_eq!(report.summary.trend_direction, TrendDirection::Improving);
}

#[test]
fn test_history_keeps_most_recent_hundred() {
    let mut monitor = in_memory_monitor();
    for i in 0..150 {
        let violations: Vec<RawViolation> =
            (0..i).map(|_| RawViolation::new("list", Impact::Minor)).collect();
        let snapshot = monitor.process_results(&violations, None);
        monitor.store_metrics(snapshot);
    }

    let history = monitor.get_metrics_history();
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].total_violations, 149);
    assert_eq!(history[99].total_violations, 50);
}

#[test]
fn test_fixture_scan_end_to_end() {
    let violations = scan::load_scan_file(Path::new("tests/fixtures/axe-results.json"))
        .expect("fixture should parse");
    assert_eq!(violations.len(), 4);
    // the label violation has no impact in the fixture
    assert_eq!(violations[2].impact, Impact::Minor);

    let registry = StaticRegistry::new([
        "PlayerCard",
        "OracleExplainer",
        "RosterTable",
        "DraftBoard",
        "Navbar",
    ]);
    let aggregator = MetricsAggregator::new(Box::new(MarkupAttribution), Box::new(registry));
    let monitor = AccessibilityMonitor::new(aggregator, HistoryStore::in_memory());
    let snapshot = monitor.process_results(&violations, None);

    assert_eq!(snapshot.total_violations, 4);
    assert_eq!(snapshot.violations_by_level.critical, 1);
    assert_eq!(snapshot.violations_by_level.serious, 1);
    assert_eq!(snapshot.violations_by_level.moderate, 1);
    assert_eq!(snapshot.violations_by_level.minor, 1);
    // image-alt, color-contrast and label count against level A
    assert_eq!(snapshot.wcag_compliance.level_a, 94.0);

    let names: Vec<&str> = snapshot
        .component_metrics
        .iter()
        .map(|c| c.component_name.as_str())
        .collect();
    assert_eq!(names, vec!["PlayerCard", "OracleExplainer", "RosterTable", "DraftBoard"]);
    assert_eq!(snapshot.component("PlayerCard").unwrap().status, ComponentStatus::Failing);
    assert_eq!(snapshot.component("RosterTable").unwrap().status, ComponentStatus::Warning);
    assert_eq!(snapshot.component("DraftBoard").unwrap().status, ComponentStatus::Passing);
    assert_eq!(snapshot.test_coverage.coverage_percentage, 80.0);

    let report = monitor.generate_report(&snapshot);
    // 100 - (10 + 5 + 2 + 1) + 8
    assert_eq!(report.summary.overall_score, 90);
    assert_eq!(report.summary.compliance_level, ComplianceLevel::AAA);
    assert_eq!(
        report.summary.recommendations,
        vec![
            "Address critical accessibility violations immediately".to_string(),
            "Review and fix serious accessibility issues".to_string(),
            "Increase accessibility test coverage".to_string(),
            "Focus on 1 failing components".to_string(),
        ]
    );

    let text = render_report(&report, OutputFormat::Text);
    assert!(text.contains("PlayerCard"));
    assert!(text.contains("FAILING"));
}

#[test]
fn test_history_persists_across_monitors() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.history.storage_dir = temp.path().to_path_buf();

    {
        let mut monitor = AccessibilityMonitor::from_config(&config);
        let violations = [RawViolation::new("label", Impact::Serious)];
        let snapshot = monitor.process_results(&violations, Some("Navbar"));
        monitor.store_metrics(snapshot);
    }

    let monitor = AccessibilityMonitor::from_config(&config);
    let history = monitor.get_metrics_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].component_metrics[0].component_name, "Navbar");
    assert_eq!(monitor.get_component_trends("Navbar", 7).len(), 1);

    let stored =
        std::fs::read_to_string(temp.path().join("accessibility-metrics-history.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stored).expect("history is a JSON array");
    assert!(parsed.is_array());
    assert_eq!(parsed[0]["violationsByLevel"]["serious"], 1);
}

#[test]
fn test_corrupt_history_file_degrades_to_empty() {
    let temp = TempDir::new().unwrap();
    let history_file = temp.path().join("accessibility-metrics-history.json");
    std::fs::write(&history_file, "[{\"broken\"").unwrap();

    let backend = FileBackend::new(temp.path(), "accessibility-metrics-history");
    let history = HistoryStore::open(Box::new(backend), 100);
    let mut monitor = AccessibilityMonitor::new(MetricsAggregator::default(), history);
    assert!(monitor.get_metrics_history().is_empty());

    let snapshot = monitor.process_results(&[], None);
    let report = monitor.generate_report(&snapshot);
    assert_eq!(report.summary.trend_direction, TrendDirection::Stable);

    // a successful write replaces the corrupt file
    monitor.store_metrics(snapshot);
    let reopened = HistoryStore::open(
        Box::new(FileBackend::new(temp.path(), "accessibility-metrics-history")),
        100,
    );
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_report_generation_is_repeatable() {
    let mut monitor = in_memory_monitor();
    let violations = [RawViolation::new("keyboard", Impact::Serious).with_tags(&["keyboard"])];
    let snapshot = monitor.process_results(&violations, None);
    monitor.store_metrics(snapshot.clone());

    let first = monitor.generate_report(&snapshot);
    let second = monitor.generate_report(&snapshot);
    assert_eq!(first, second);
    assert_eq!(monitor.get_metrics_history().len(), 1);
}

#[test]
fn test_unrelated_document_is_not_a_clean_scan() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("results.json");
    std::fs::write(&path, r#"{"testEngine": {"name": "axe-core"}}"#).unwrap();
    assert!(scan::load_scan_file(&path).is_err());
}
