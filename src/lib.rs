//! Plinko Drop - deterministic ball-drop trajectory simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, collisions, trajectory, render cache)
//! - `settings`: Data-driven physics tuning with presets
//! - `replay`: Saved drops that can be re-simulated bit-for-bit
//! - `error`: Typed errors surfaced to the caller
//! - `web`: wasm-bindgen entry points for the browser renderer

pub mod error;
pub mod replay;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{BoardError, CacheError, SettingsError, SimError};
pub use replay::ReplayLog;
pub use settings::{SimSettings, TuningPreset};

/// Board and physics constants
pub mod consts {
    /// Fixed simulation tick rate (matches the renderer's 60 FPS target)
    pub const SIM_TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_TICK_RATE as f32;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 7.0;
    /// Peg radius
    pub const PEG_RADIUS: f32 = 4.0;
    /// Ball center must stay this far from a peg center
    pub const COLLISION_RADIUS: f32 = BALL_RADIUS + PEG_RADIUS;
    /// Frames before the same peg can register another hit
    pub const COOLDOWN_FRAMES: u32 = 10;

    /// Thickness of the dividers between buckets
    pub const BUCKET_WALL_THICKNESS: f32 = 4.0;
    /// Height of the bucket zone above the bottom border
    pub const BUCKET_HEIGHT: f32 = 48.0;
    /// Clear space between the top border and the first peg row
    pub const DROP_ZONE_HEIGHT: f32 = 40.0;
    /// Clear band between the last peg row and the bucket tops
    pub const PEG_BOTTOM_MARGIN: f32 = 44.0;

    /// Bounce randomness bounds (radians of angular perturbation)
    pub const BOUNCE_RANDOMNESS_MIN: f32 = 0.0;
    pub const BOUNCE_RANDOMNESS_MAX: f32 = 0.6;

    /// Squash/stretch limits for the render cache
    pub const MAX_SQUASH: f32 = 0.18;
    pub const MAX_STRETCH: f32 = 0.3;
    /// Upper bound for the configurable trail length
    pub const TRAIL_LENGTH_LIMIT: u16 = 64;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
