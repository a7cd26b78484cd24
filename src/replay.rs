//! Replay log of recent drops
//!
//! Persisted to LocalStorage, keeps the last 20 drops. A saved entry holds
//! everything needed to re-simulate the drop bit-for-bit on the same board.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::settings::SimSettings;
use crate::sim::{BoardGeometry, DropRequest, SimulatedDrop, simulate_drop};

/// Maximum number of drops to keep
pub const MAX_REPLAY_ENTRIES: usize = 20;

/// A single saved drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEntry {
    pub request: DropRequest,
    /// Bucket the ball finished in
    pub final_slot: usize,
    /// Unix timestamp (ms) of the drop
    pub timestamp: f64,
}

impl ReplayEntry {
    pub fn from_drop(request: DropRequest, drop: &SimulatedDrop, timestamp: f64) -> Self {
        Self {
            request,
            final_slot: drop.final_slot(),
            timestamp,
        }
    }
}

/// Saved drops, newest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplayLog {
    pub entries: Vec<ReplayEntry>,
}

impl ReplayLog {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "plinko_drop_replays";

    /// Create empty log
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a drop, evicting the oldest entry when full
    pub fn record(&mut self, entry: ReplayEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_REPLAY_ENTRIES);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Most recent drop (if any)
    pub fn latest(&self) -> Option<&ReplayEntry> {
        self.entries.first()
    }

    /// Re-run a saved drop
    pub fn replay(
        &self,
        index: usize,
        geometry: &BoardGeometry,
        settings: &SimSettings,
    ) -> Result<SimulatedDrop, SimError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(SimError::UnknownReplay { index })?;
        log::info!(
            "Replaying drop {} (seed {}, slot {})",
            index,
            entry.request.seed,
            entry.request.target_slot
        );
        simulate_drop(geometry, settings, &entry.request)
    }

    /// Load replays from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(log) = serde_json::from_str::<ReplayLog>(&json) {
                    log::info!("Loaded {} saved drops", log.entries.len());
                    return log;
                }
            }
        }

        log::info!("No saved drops found, starting fresh");
        Self::new()
    }

    /// Save replays to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Saved drops stored ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BoardConfig, DropPosition, DropZone};

    fn entry(seed: u64, timestamp: f64) -> ReplayEntry {
        ReplayEntry {
            request: DropRequest::new(seed, 4, DropPosition::Zone(DropZone::Center)),
            final_slot: 4,
            timestamp,
        }
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let mut log = ReplayLog::new();
        for i in 0..(MAX_REPLAY_ENTRIES as u64 + 5) {
            log.record(entry(i, i as f64));
        }
        assert_eq!(log.len(), MAX_REPLAY_ENTRIES);
        assert_eq!(log.latest().unwrap().request.seed, MAX_REPLAY_ENTRIES as u64 + 4);
        assert_eq!(log.entries.last().unwrap().request.seed, 5);
    }

    #[test]
    fn test_replay_reproduces_drop() {
        let geometry = BoardGeometry::new(BoardConfig::default()).unwrap();
        let settings = SimSettings::default();
        let request = DropRequest::new(2024, 7, DropPosition::X(300.0));
        let original = simulate_drop(&geometry, &settings, &request).unwrap();

        let mut log = ReplayLog::new();
        log.record(ReplayEntry::from_drop(request, &original, 0.0));
        let replayed = log.replay(0, &geometry, &settings).unwrap();
        assert_eq!(replayed.trajectory(), original.trajectory());
        assert_eq!(replayed.cache(), original.cache());
    }

    #[test]
    fn test_unknown_index() {
        let geometry = BoardGeometry::new(BoardConfig::default()).unwrap();
        let log = ReplayLog::new();
        assert!(matches!(
            log.replay(3, &geometry, &SimSettings::default()),
            Err(SimError::UnknownReplay { index: 3 })
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut log = ReplayLog::new();
        log.record(entry(1, 10.0));
        log.record(ReplayEntry {
            request: DropRequest::new(2, 0, DropPosition::X(55.5)),
            final_slot: 0,
            timestamp: 20.0,
        });
        let json = serde_json::to_string(&log).unwrap();
        let back: ReplayLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, log.entries);
    }
}
