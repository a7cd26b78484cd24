//! Simulation types
//!
//! Everything a drop produces is plain data: pegs and trajectory points are
//! serialized straight to the renderer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A fixed peg in the staggered lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub row: u16,
    pub col: u16,
    pub x: f32,
    pub y: f32,
}

impl Peg {
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Instantaneous ball state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BallState {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl BallState {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
        }
    }
}

/// A peg collision registered on a given frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PegHit {
    pub row: u16,
    pub col: u16,
}

/// Which board wall was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    Left,
    Right,
}

/// One simulated frame, as handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPoint {
    pub frame: u32,
    pub x: f32,
    pub y: f32,
    /// Accumulated rolling angle (radians, [-π, π))
    pub rotation: f32,
    pub vx: f32,
    pub vy: f32,
    /// Pegs whose hit was registered on this frame
    pub pegs_hit: Vec<PegHit>,
    pub wall_hit: Option<WallSide>,
    pub bucket_wall_hit: bool,
    pub bucket_floor_hit: bool,
}

impl TrajectoryPoint {
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    /// True if any collision was recorded on this frame
    pub fn has_contact(&self) -> bool {
        !self.pegs_hit.is_empty() || self.wall_hit.is_some() || self.bucket_wall_hit || self.bucket_floor_hit
    }
}

/// Stage of a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPhase {
    /// Above the bucket tops, bouncing through the peg field
    Falling,
    /// Inside the bucket zone, not yet at rest
    EnteringBucket,
    /// At rest on a bucket floor (terminal)
    Settled,
}
