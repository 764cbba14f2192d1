// SPDX-License-Identifier: PMPL-1.0-or-later
//! Scoring, compliance tiers and trend direction.

use crate::metrics::{MetricsSnapshot, WcagCompliance};
use serde::{Deserialize, Serialize};

/// Compliance percentage a level must reach to be claimed
pub const COMPLIANCE_THRESHOLD: f64 = 95.0;

/// Discrete compliance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceLevel {
    A,
    AA,
    AAA,
    #[serde(rename = "Non-compliant")]
    NonCompliant,
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceLevel::A => write!(f, "A"),
            ComplianceLevel::AA => write!(f, "AA"),
            ComplianceLevel::AAA => write!(f, "AAA"),
            ComplianceLevel::NonCompliant => write!(f, "Non-compliant"),
        }
    }
}

/// Direction of the global violation count between the two newest snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Improving => write!(f, "improving"),
            TrendDirection::Declining => write!(f, "declining"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Severity-weighted health score in `0..=100`.
///
/// Starts from AA compliance, subtracts 10/5/2/1 per critical, serious,
/// moderate and minor violation, and adds a tenth of the coverage percentage.
pub fn overall_score(snapshot: &MetricsSnapshot) -> u32 {
    let counts = &snapshot.violations_by_level;
    let penalty = 10.0 * counts.critical as f64
        + 5.0 * counts.serious as f64
        + 2.0 * counts.moderate as f64
        + counts.minor as f64;
    let coverage_bonus = 0.1 * snapshot.test_coverage.coverage_percentage;

    let score = snapshot.wcag_compliance.level_aa - penalty + coverage_bonus;
    score.clamp(0.0, 100.0).round() as u32
}

/// Highest tier whose compliance reaches the threshold, checked AAA first
pub fn compliance_level(compliance: &WcagCompliance) -> ComplianceLevel {
    if compliance.level_aaa >= COMPLIANCE_THRESHOLD {
        ComplianceLevel::AAA
    } else if compliance.level_aa >= COMPLIANCE_THRESHOLD {
        ComplianceLevel::AA
    } else if compliance.level_a >= COMPLIANCE_THRESHOLD {
        ComplianceLevel::A
    } else {
        ComplianceLevel::NonCompliant
    }
}

/// Compare total violations of the newest two snapshots (newest first)
pub fn trend_direction(history: &[MetricsSnapshot]) -> TrendDirection {
    match history {
        [current, previous, ..] => {
            if current.total_violations < previous.total_violations {
                TrendDirection::Improving
            } else if current.total_violations > previous.total_violations {
                TrendDirection::Declining
            } else {
                TrendDirection::Stable
            }
        }
        _ => TrendDirection::Stable,
    }
}
