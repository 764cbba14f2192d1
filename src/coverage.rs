// SPDX-License-Identifier: PMPL-1.0-or-later
//! Coverage estimation against the registry of known UI components.

use crate::metrics::TestCoverage;

/// Source of the total number of known UI components
pub trait ComponentRegistry: Send + Sync {
    fn total_components(&self) -> usize;
}

/// A registry backed by an explicit list of component names
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    components: Vec<String>,
}

impl StaticRegistry {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in components.into_iter().map(Into::into) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { components: names }
    }
}

impl ComponentRegistry for StaticRegistry {
    fn total_components(&self) -> usize {
        self.components.len()
    }
}

/// A registry that only knows how many components exist
#[derive(Debug, Clone, Copy, Default)]
pub struct CountRegistry(pub usize);

impl ComponentRegistry for CountRegistry {
    fn total_components(&self) -> usize {
        self.0
    }
}

/// Coverage of `tested` components out of `total`, clamped to `[0, 100]`
pub fn estimate_coverage(total_components: usize, tested_components: usize) -> TestCoverage {
    let coverage_percentage = if total_components == 0 {
        0.0
    } else {
        (100.0 * tested_components as f64 / total_components as f64).clamp(0.0, 100.0)
    };

    TestCoverage {
        total_components,
        tested_components,
        coverage_percentage,
    }
}
