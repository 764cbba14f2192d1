// SPDX-License-Identifier: PMPL-1.0-or-later
//! Raw scanner output.
//!
//! Mirrors the violation shape emitted by axe-core style scanners. Only the
//! fields the monitor reads are modelled; everything else in the scanner
//! document is ignored on parse.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Severity reported by the scanner for a violation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    /// Also used when the scanner omits the impact or reports one we don't know
    #[default]
    Minor,
}

impl Impact {
    /// Map a scanner impact tag to a bucket, falling back to `Minor`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "critical" => Impact::Critical,
            "serious" => Impact::Serious,
            "moderate" => Impact::Moderate,
            _ => Impact::Minor,
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Critical => write!(f, "critical"),
            Impact::Serious => write!(f, "serious"),
            Impact::Moderate => write!(f, "moderate"),
            Impact::Minor => write!(f, "minor"),
        }
    }
}

/// The single place where a missing, non-string or unrecognised impact
/// becomes `Minor`
fn impact_or_minor<'de, D>(deserializer: D) -> std::result::Result<Impact, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(tag) => Impact::from_tag(&tag),
        _ => Impact::Minor,
    })
}

/// Text field; anything but a string reads as empty
fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

fn optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// String list; non-string entries are dropped and a non-array is empty
fn strings_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Node list; null or a non-array is empty and malformed nodes are dropped
fn nodes_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ViolationNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A DOM node affected by a violation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationNode {
    /// Outer HTML of the node
    #[serde(default, deserialize_with = "string_or_empty")]
    pub html: String,
    /// CSS selectors locating the node
    #[serde(default, deserialize_with = "strings_or_empty")]
    pub target: Vec<String>,
}

impl ViolationNode {
    pub fn new(html: &str, target: &[&str]) -> Self {
        Self {
            html: html.to_string(),
            target: target.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// A single failed check as reported by the scanner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawViolation {
    /// Rule identifier (e.g. "color-contrast")
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "impact_or_minor")]
    pub impact: Impact,
    /// Rule tags, used for WCAG level classification
    #[serde(default, deserialize_with = "strings_or_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub help: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nodes_or_empty")]
    pub nodes: Vec<ViolationNode>,
}

impl RawViolation {
    /// Create a violation for a rule with the given impact
    pub fn new(id: &str, impact: Impact) -> Self {
        Self {
            id: id.to_string(),
            impact,
            ..Self::default()
        }
    }

    /// Set rule tags
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Add an affected node
    pub fn with_node(mut self, node: ViolationNode) -> Self {
        self.nodes.push(node);
        self
    }
}

/// Top-level scanner document: either a full results object or a bare list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScanResults {
    Violations(Vec<RawViolation>),
    Results { violations: Vec<RawViolation> },
}

impl ScanResults {
    pub fn into_violations(self) -> Vec<RawViolation> {
        match self {
            ScanResults::Violations(violations) => violations,
            ScanResults::Results { violations } => violations,
        }
    }
}

/// Parse scanner output into violations
pub fn parse_scan_results(json: &str) -> Result<Vec<RawViolation>> {
    let document: ScanResults = serde_json::from_str(json).map_err(|e| {
        MonitorError::Scan(format!("expected a results object or violation array: {}", e))
    })?;

    let violations = document.into_violations();

    debug!(count = violations.len(), "Parsed scan results");
    Ok(violations)
}

/// Read and parse a scanner results file
pub fn load_scan_file(path: &Path) -> Result<Vec<RawViolation>> {
    let content = std::fs::read_to_string(path)?;
    parse_scan_results(&content)
}
