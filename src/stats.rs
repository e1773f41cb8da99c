//! Journey statistics
//!
//! Append-only history of completed levels. Cleared only when a new journey
//! starts; handed read-only to the reporting layer after the final level.

use serde::{Deserialize, Serialize};

/// Resources at or above this count are highlighted in the report
pub const REPORT_HIGHLIGHT_RESOURCES: u32 = 3;

/// Outcome of one completed level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub level_id: u32,
    /// Score at the moment the destination was reached
    pub resources_collected: u32,
    /// Session clock time spent in the level (ms)
    pub time_taken_ms: u64,
    /// Random events triggered during the level
    pub events_triggered: u32,
}

/// Ordered record of completed levels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    entries: Vec<GameStats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed level
    pub fn record(
        &mut self,
        level_id: u32,
        resources_collected: u32,
        time_taken_ms: u64,
        events_triggered: u32,
    ) -> GameStats {
        let entry = GameStats {
            level_id,
            resources_collected,
            time_taken_ms,
            events_triggered,
        };
        self.entries.push(entry);
        log::info!(
            "Recorded level {}: {} resources, {} ms, {} events",
            level_id,
            resources_collected,
            time_taken_ms,
            events_triggered
        );
        entry
    }

    /// Drop all history (new journey only)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[GameStats] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&GameStats> {
        self.entries.last()
    }

    /// Chart-ready summary of the history
    pub fn report(&self) -> StatsReport {
        let rows = self
            .entries
            .iter()
            .map(|s| StatsRow {
                label: format!("Lvl {}", s.level_id),
                resources: s.resources_collected,
                events: s.events_triggered,
                seconds: (s.time_taken_ms as f64 / 1000.0).round() as u64,
                highlighted: s.resources_collected >= REPORT_HIGHLIGHT_RESOURCES,
            })
            .collect();

        StatsReport {
            rows,
            total_resources: self.entries.iter().map(|s| s.resources_collected).sum(),
            total_events: self.entries.iter().map(|s| s.events_triggered).sum(),
            total_time_ms: self.entries.iter().map(|s| s.time_taken_ms).sum(),
        }
    }
}

/// One bar group in the journey chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub label: String,
    pub resources: u32,
    pub events: u32,
    pub seconds: u64,
    pub highlighted: bool,
}

/// Summary handed to the reporting collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub rows: Vec<StatsRow>,
    pub total_resources: u32,
    pub total_events: u32,
    pub total_time_ms: u64,
}

impl StatsReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
