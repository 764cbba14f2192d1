// SPDX-License-Identifier: PMPL-1.0-or-later
//! Violation classifier.
//!
//! Buckets a raw violation by severity and decides which WCAG conformance
//! levels it counts against. Level membership is keyword based: a violation
//! counts against a level when any of its rule tags is in that level's set.
//! The sets are allowed to overlap (`color-contrast-enhanced` is in both AA
//! and AAA).

use crate::scan::{Impact, RawViolation};
use serde::{Deserialize, Serialize};

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl WcagLevel {
    pub const ALL: [WcagLevel; 3] = [WcagLevel::A, WcagLevel::AA, WcagLevel::AAA];

    /// Rule tags that count against this level
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            WcagLevel::A => LEVEL_A_KEYWORDS,
            WcagLevel::AA => LEVEL_AA_KEYWORDS,
            WcagLevel::AAA => LEVEL_AAA_KEYWORDS,
        }
    }

    /// Whether any of the given tags belongs to this level
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        let keywords = self.keywords();
        tags.iter().any(|tag| keywords.contains(&tag.as_ref()))
    }
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

const LEVEL_A_KEYWORDS: &[&str] = &["color-contrast", "image-alt", "label", "keyboard"];
const LEVEL_AA_KEYWORDS: &[&str] = &["color-contrast-enhanced", "focus-order-semantics"];
const LEVEL_AAA_KEYWORDS: &[&str] = &["color-contrast-enhanced", "context-help"];

/// Result of classifying one violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub severity: Impact,
    pub level_a: bool,
    pub level_aa: bool,
    pub level_aaa: bool,
}

impl Classification {
    /// Whether the violation counts against the given level
    pub fn violates(&self, level: WcagLevel) -> bool {
        match level {
            WcagLevel::A => self.level_a,
            WcagLevel::AA => self.level_aa,
            WcagLevel::AAA => self.level_aaa,
        }
    }
}

/// Classify a violation by severity and WCAG level membership
pub fn classify(violation: &RawViolation) -> Classification {
    Classification {
        severity: violation.impact,
        level_a: WcagLevel::A.matches(&violation.tags),
        level_aa: WcagLevel::AA.matches(&violation.tags),
        level_aaa: WcagLevel::AAA.matches(&violation.tags),
    }
}
