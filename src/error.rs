//! Error types for board layout, simulation, render cache, and settings

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("board {name} must be positive and finite, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("board needs at least one peg row")]
    NoRows,

    #[error("css border {border} leaves no content area on a {width}x{height} board")]
    BorderTooWide { border: f32, width: f32, height: f32 },

    #[error("peg gap {gap:.2} is narrower than the ball diameter {required:.2}")]
    NarrowGap { gap: f32, required: f32 },

    #[error("{rows} peg rows do not fit in {available:.2}px of playable height")]
    RowsDoNotFit { rows: u16, available: f32 },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("render cache rejected trajectory: {0}")]
    Cache(#[from] CacheError),

    #[error("target slot {index} is outside 0..{slot_count}")]
    SlotOutOfRange { index: usize, slot_count: usize },

    #[error("drop position {x} is outside the content area [{left}, {right}]")]
    DropOutOfBounds { x: f32, left: f32, right: f32 },

    #[error("slot bounds [{left}, {right}] cannot hold a resting ball")]
    UnreachableSlot { left: f32, right: f32 },

    #[error("ball did not settle within {max_ticks} ticks")]
    NonTermination { max_ticks: u32 },

    #[error("no run settled in slot {target_slot} after {attempts} attempts")]
    OutcomeUnreachable { target_slot: usize, attempts: u32 },

    #[error("no saved drop at replay index {index}")]
    UnknownReplay { index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
    #[error("{buffer} has {actual} entries, trajectory has {expected}")]
    LengthMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{buffer}[{frame}] = {value} is outside its clamp range")]
    OutOfRange {
        buffer: &'static str,
        frame: usize,
        value: f32,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("setting `{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}
