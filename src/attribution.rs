// SPDX-License-Identifier: PMPL-1.0-or-later
//! Component attribution strategies.
//!
//! The aggregator asks an [`AttributionStrategy`] which UI components a
//! violation belongs to. The default [`MarkupAttribution`] looks for
//! PascalCase identifiers in the affected nodes' selectors and attributes,
//! which works for apps that stamp component names into class names or
//! `data-component`. [`FixedAttribution`] is for scans that were already
//! scoped to a single component.

use crate::scan::RawViolation;
use regex::Regex;
use std::sync::LazyLock;

/// Resolves the component names a violation belongs to
pub trait AttributionStrategy: Send + Sync {
    /// Human-readable name of this strategy
    fn name(&self) -> &str;

    /// Distinct component names for the violation, in discovery order.
    /// An empty list means the violation is unattributed.
    fn attribute(&self, violation: &RawViolation) -> Vec<String>;
}

/// Suffix stripped from identifiers like `PlayerCardComponent`
const COMPONENT_SUFFIX: &str = "Component";

static MARKUP_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(?:class|className|id|data-component)\s*=\s*["']([^"']*)["']"#)
        .unwrap()
});

static PASCAL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]*)*$").unwrap());

/// Attributes violations by scanning node markup for component identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupAttribution;

impl MarkupAttribution {
    /// Component name carried by a single selector or attribute token, if any
    pub fn component_from_token(token: &str) -> Option<String> {
        if !PASCAL_CASE.is_match(token) {
            return None;
        }
        match token.strip_suffix(COMPONENT_SUFFIX) {
            Some(stem) if !stem.is_empty() => Some(stem.to_string()),
            Some(_) => None,
            None => Some(token.to_string()),
        }
    }

    fn scan_text(text: &str, found: &mut Vec<String>) {
        for token in text.split(|c: char| !c.is_ascii_alphanumeric()) {
            if let Some(name) = Self::component_from_token(token) {
                if !found.contains(&name) {
                    found.push(name);
                }
            }
        }
    }
}

impl AttributionStrategy for MarkupAttribution {
    fn name(&self) -> &str {
        "markup"
    }

    fn attribute(&self, violation: &RawViolation) -> Vec<String> {
        let mut found = Vec::new();

        for node in &violation.nodes {
            for selector in &node.target {
                Self::scan_text(selector, &mut found);
            }
            for caps in MARKUP_ATTRIBUTE.captures_iter(&node.html) {
                Self::scan_text(&caps[1], &mut found);
            }
        }

        found
    }
}

/// Attributes every violation to one named component
#[derive(Debug, Clone)]
pub struct FixedAttribution {
    component: String,
}

impl FixedAttribution {
    pub fn new(component: &str) -> Self {
        Self { component: component.to_string() }
    }
}

impl AttributionStrategy for FixedAttribution {
    fn name(&self) -> &str {
        "fixed"
    }

    fn attribute(&self, _violation: &RawViolation) -> Vec<String> {
        vec![self.component.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{Impact, ViolationNode};

    fn violation_with(html: &str, target: &[&str]) -> RawViolation {
        RawViolation::new("label", Impact::Serious).with_node(ViolationNode::new(html, target))
    }

    #[test]
    fn test_component_suffix_is_stripped() {
        assert_eq!(
            MarkupAttribution::component_from_token("DraftBoardComponent"),
            Some("DraftBoard".to_string())
        );
        assert_eq!(MarkupAttribution::component_from_token("Component"), None);
    }

    #[test]
    fn test_lowercase_and_acronym_tokens_are_ignored() {
        assert_eq!(MarkupAttribution::component_from_token("button"), None);
        assert_eq!(MarkupAttribution::component_from_token("HTML"), None);
        assert_eq!(MarkupAttribution::component_from_token("X"), None);
    }

    #[test]
    fn test_attribute_from_target_selector() {
        let v = violation_with("<button></button>", &[".RosterTable > tbody > tr > td > button"]);
        assert_eq!(MarkupAttribution.attribute(&v), vec!["RosterTable".to_string()]);
    }

    #[test]
    fn test_attribute_from_markup_attributes() {
        let v = violation_with(
            r#"<div data-component="OracleExplainer" class="mt-4 text-sm">Why?</div>"#,
            &["div:nth-child(3)"],
        );
        assert_eq!(MarkupAttribution.attribute(&v), vec!["OracleExplainer".to_string()]);
    }

    #[test]
    fn test_hyphenated_attribute_names_are_not_scanned() {
        let v = violation_with(
            r#"<div data-id="PlayerCard" aria-owns-id="Navbar" data-class="DraftBoard"></div>"#,
            &["div"],
        );
        assert!(MarkupAttribution.attribute(&v).is_empty());
    }

    #[test]
    fn test_text_content_is_not_scanned() {
        let v = violation_with("<button class=\"btn\">Submit</button>", &["button"]);
        assert!(MarkupAttribution.attribute(&v).is_empty());
    }

    #[test]
    fn test_multiple_nodes_yield_distinct_names() {
        let v = RawViolation::new("image-alt", Impact::Critical)
            .with_node(ViolationNode::new(
                "<img class=\"PlayerCard__avatar\">",
                &[".PlayerCard__avatar"],
            ))
            .with_node(ViolationNode::new("<img>", &["#PlayerCard img"]))
            .with_node(ViolationNode::new("<img>", &[".TeamLogoComponent img"]));
        assert_eq!(
            MarkupAttribution.attribute(&v),
            vec!["PlayerCard".to_string(), "TeamLogo".to_string()]
        );
    }

    #[test]
    fn test_fixed_attribution_ignores_markup() {
        let v = violation_with("<div class=\"Navbar\"></div>", &[".Navbar"]);
        assert_eq!(FixedAttribution::new("Settings").attribute(&v), vec!["Settings".to_string()]);
    }
}
