// SPDX-License-Identifier: PMPL-1.0-or-later
//! Bounded metrics history.
//!
//! [`HistoryStore`] keeps the most recent snapshots newest first and mirrors
//! them to a [`HistoryBackend`] after every write. Persistence is best effort:
//! a failed load starts from an empty history and a failed save leaves the
//! in-memory list untouched. Both are logged and never reach the caller.

use crate::error::Result;
use crate::metrics::{MetricsSnapshot, ViolationCounts};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Number of snapshots kept before the oldest are evicted
pub const DEFAULT_CAPACITY: usize = 100;

/// Storage key the history is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "accessibility-metrics-history";

/// Persistence for the serialized history list
pub trait HistoryBackend: Send {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// Load the stored list, newest first. A missing entry is an empty list.
    fn load(&self) -> Result<Vec<MetricsSnapshot>>;

    /// Replace the stored list
    fn save(&mut self, snapshots: &[MetricsSnapshot]) -> Result<()>;
}

/// One JSON file named after the storage key
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl HistoryBackend for FileBackend {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<MetricsSnapshot>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&self.path)?;
        let snapshots: Vec<MetricsSnapshot> = serde_json::from_str(&json)?;

        debug!(path = %self.path.display(), count = snapshots.len(), "Loaded metrics history");
        Ok(snapshots)
    }

    fn save(&mut self, snapshots: &[MetricsSnapshot]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(snapshots)?;

        // Readers only ever see the old file or the complete new one
        let staging = self.staging_path();
        std::fs::write(&staging, json)?;
        std::fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), count = snapshots.len(), "Saved metrics history");
        Ok(())
    }
}

/// Keeps the serialized history in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    payload: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already serialized payload
    pub fn with_payload(payload: &str) -> Self {
        Self { payload: Some(payload.to_string()) }
    }
}

impl HistoryBackend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<Vec<MetricsSnapshot>> {
        match &self.payload {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, snapshots: &[MetricsSnapshot]) -> Result<()> {
        self.payload = Some(serde_json::to_string(snapshots)?);
        Ok(())
    }
}

/// Violation counts for one day-stamped point in a trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationTrend {
    pub date: NaiveDate,
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    pub total: usize,
}

impl ViolationTrend {
    fn from_counts(timestamp: DateTime<Utc>, counts: &ViolationCounts, total: usize) -> Self {
        Self {
            date: timestamp.date_naive(),
            critical: counts.critical,
            serious: counts.serious,
            moderate: counts.moderate,
            minor: counts.minor,
            total,
        }
    }
}

/// Newest-first, bounded list of metrics snapshots
pub struct HistoryStore {
    backend: Box<dyn HistoryBackend>,
    snapshots: Vec<MetricsSnapshot>,
    capacity: usize,
}

impl HistoryStore {
    /// Open a store over a backend, loading whatever it already holds
    pub fn open(backend: Box<dyn HistoryBackend>, capacity: usize) -> Self {
        let mut snapshots = match backend.load() {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(
                    location = %backend.describe(),
                    error = %e,
                    "Could not read metrics history, starting empty"
                );
                Vec::new()
            }
        };
        snapshots.truncate(capacity);

        Self { backend, snapshots, capacity }
    }

    /// An unpersisted store with the default capacity
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::new()), DEFAULT_CAPACITY)
    }

    /// Record a snapshot as the newest entry, evicting the oldest past capacity
    pub fn store(&mut self, snapshot: MetricsSnapshot) {
        self.snapshots.insert(0, snapshot);
        self.snapshots.truncate(self.capacity);

        if let Err(e) = self.backend.save(&self.snapshots) {
            warn!(
                location = %self.backend.describe(),
                error = %e,
                "Could not persist metrics history"
            );
        }
    }

    /// Copy of every stored snapshot, newest first
    pub fn get_history(&self) -> Vec<MetricsSnapshot> {
        self.snapshots.clone()
    }

    /// Borrowed view used by the aggregator and evaluators
    pub(crate) fn snapshots(&self) -> &[MetricsSnapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&MetricsSnapshot> {
        self.snapshots.first()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Severity counts of every snapshot from the last `days` days, oldest first
    pub fn get_trend_data(&self, days: u32) -> Vec<ViolationTrend> {
        self.get_trend_data_at(days, Utc::now())
    }

    pub fn get_trend_data_at(&self, days: u32, now: DateTime<Utc>) -> Vec<ViolationTrend> {
        let mut trends: Vec<ViolationTrend> = self
            .within(days, now)
            .map(|s| {
                ViolationTrend::from_counts(s.timestamp, &s.violations_by_level, s.total_violations)
            })
            .collect();
        trends.reverse();
        trends
    }

    /// Severity counts of one component from the last `days` days, oldest first.
    /// Snapshots that did not see the component are skipped.
    pub fn get_component_trends(&self, component_name: &str, days: u32) -> Vec<ViolationTrend> {
        self.get_component_trends_at(component_name, days, Utc::now())
    }

    pub fn get_component_trends_at(
        &self,
        component_name: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Vec<ViolationTrend> {
        let mut trends: Vec<ViolationTrend> = self
            .within(days, now)
            .filter_map(|s| {
                let c = s.component(component_name)?;
                Some(ViolationTrend::from_counts(
                    s.timestamp,
                    &c.violations_by_level,
                    c.violation_count,
                ))
            })
            .collect();
        trends.reverse();
        trends
    }

    fn within(&self, days: u32, now: DateTime<Utc>) -> impl Iterator<Item = &MetricsSnapshot> {
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.snapshots
            .iter()
            .filter(move |s| s.timestamp >= cutoff && s.timestamp <= now)
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("backend", &self.backend.describe())
            .field("len", &self.snapshots.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
