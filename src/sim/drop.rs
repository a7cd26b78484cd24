//! Whole-drop simulation with the outcome constraint
//!
//! A drop is steered toward its target slot while it falls. If a run still
//! settles outside the slot, or runs out of ticks, the bounce draws are
//! reseeded from the request seed and the drop is re-run with stronger
//! steering, up to `SimSettings::steering_attempts` times. Every attempt is a
//! pure function of the request, so the accepted trajectory replays
//! bit-for-bit.

use serde::{Deserialize, Serialize, Serializer};

use super::board::{BoardGeometry, DropZone, SlotBounds};
use super::cache::TrajectoryCache;
use super::events::{ContactEvent, contact_events};
use super::rng::derive_seed;
use super::state::{Peg, TrajectoryPoint};
use super::tick::{DropRun, tick};
use crate::consts::BALL_RADIUS;
use crate::error::SimError;
use crate::settings::SimSettings;

/// Where the ball starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropPosition {
    /// Explicit x in board pixels
    X(f32),
    Zone(DropZone),
}

impl DropPosition {
    /// Horizontal start position, checked against the content area
    pub fn resolve(&self, geometry: &BoardGeometry) -> Result<f32, SimError> {
        let x = match *self {
            DropPosition::X(x) => x,
            DropPosition::Zone(zone) => geometry.drop_zone_x(zone),
        };
        let left = geometry.inner_left + BALL_RADIUS;
        let right = geometry.inner_right - BALL_RADIUS;
        if !x.is_finite() || x < left || x > right {
            return Err(SimError::DropOutOfBounds { x, left, right });
        }
        Ok(x)
    }
}

/// Everything the caller decides before the animation plays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub seed: u64,
    /// Bucket the ball must finish in (the already-decided outcome)
    pub target_slot: usize,
    pub position: DropPosition,
    /// Bounds from the prize layout; defaults to the board's own bucket
    #[serde(default)]
    pub slot_bounds: Option<SlotBounds>,
}

impl DropRequest {
    pub fn new(seed: u64, target_slot: usize, position: DropPosition) -> Self {
        Self {
            seed,
            target_slot,
            position,
            slot_bounds: None,
        }
    }

    pub fn with_slot_bounds(mut self, bounds: SlotBounds) -> Self {
        self.slot_bounds = Some(bounds);
        self
    }
}

/// A finished drop: immutable, ready to hand to any number of renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedDrop {
    pegs: Vec<Peg>,
    trajectory: Vec<TrajectoryPoint>,
    cache: TrajectoryCache,
    target_slot: usize,
    slot_bounds: SlotBounds,
    final_slot: usize,
    /// Seed from the request (a string in JSON: JS numbers stop at 2^53)
    #[serde(serialize_with = "u64_as_string")]
    seed: u64,
    /// Seed of the accepted attempt
    #[serde(serialize_with = "u64_as_string")]
    effective_seed: u64,
    attempts: u32,
    tick_rate: u32,
}

impl SimulatedDrop {
    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    pub fn trajectory(&self) -> &[TrajectoryPoint] {
        &self.trajectory
    }

    pub fn cache(&self) -> &TrajectoryCache {
        &self.cache
    }

    pub fn target_slot(&self) -> usize {
        self.target_slot
    }

    pub fn slot_bounds(&self) -> SlotBounds {
        self.slot_bounds
    }

    /// Board bucket the ball came to rest in
    pub fn final_slot(&self) -> usize {
        self.final_slot
    }

    pub fn final_point(&self) -> Option<&TrajectoryPoint> {
        self.trajectory.last()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn effective_seed(&self) -> u64 {
        self.effective_seed
    }

    /// Attempts used, including the accepted one
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn frame_count(&self) -> usize {
        self.trajectory.len()
    }

    /// Simulated duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.trajectory.len() as f32 / self.tick_rate as f32
    }

    pub fn peg_hit_count(&self) -> usize {
        self.trajectory.iter().map(|p| p.pegs_hit.len()).sum()
    }

    pub fn contact_events(&self) -> Vec<ContactEvent> {
        contact_events(&self.trajectory)
    }
}

fn u64_as_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Simulate a drop that finishes inside the requested slot
pub fn simulate_drop(
    geometry: &BoardGeometry,
    settings: &SimSettings,
    request: &DropRequest,
) -> Result<SimulatedDrop, SimError> {
    settings.validate()?;

    let board_bounds = geometry.slot_bounds(request.target_slot)?;
    let target = match request.slot_bounds {
        Some(bounds) => {
            geometry.validate_slot_bounds(bounds)?;
            // A prize bucket drawn over another slot would settle the ball there
            if !board_bounds.contains(bounds.center()) {
                return Err(SimError::UnreachableSlot {
                    left: bounds.left,
                    right: bounds.right,
                });
            }
            bounds
        }
        None => board_bounds,
    };
    let drop_x = request.position.resolve(geometry)?;

    let mut stalled = 0;
    for attempt in 0..settings.steering_attempts {
        let seed = derive_seed(request.seed, attempt);
        log::debug!(
            "Drop attempt {} (seed {:#018x}) from x={:.1} toward slot {}",
            attempt,
            seed,
            drop_x,
            request.target_slot
        );

        let Some(trajectory) = run_attempt(geometry, settings, drop_x, target, seed, attempt) else {
            stalled += 1;
            continue;
        };
        let Some(last) = trajectory.last() else {
            continue;
        };

        let final_slot = geometry.slot_of(last.x);
        if final_slot != request.target_slot || !target.contains(last.x) {
            log::warn!(
                "Attempt {} settled in slot {} (x={:.1}), wanted slot {}; reseeding",
                attempt,
                final_slot,
                last.x,
                request.target_slot
            );
            continue;
        }

        let cache = TrajectoryCache::build(&trajectory, settings.max_speed, settings.max_trail_length)?;
        log::info!(
            "Drop settled in slot {} after {} ticks ({} attempt(s))",
            final_slot,
            trajectory.len(),
            attempt + 1
        );
        return Ok(SimulatedDrop {
            pegs: geometry.pegs().to_vec(),
            trajectory,
            cache,
            target_slot: request.target_slot,
            slot_bounds: target,
            final_slot,
            seed: request.seed,
            effective_seed: seed,
            attempts: attempt + 1,
            tick_rate: settings.tick_rate,
        });
    }

    if stalled == settings.steering_attempts {
        log::error!(
            "No attempt from x={:.1} settled within {} ticks",
            drop_x,
            settings.max_ticks
        );
        return Err(SimError::NonTermination {
            max_ticks: settings.max_ticks,
        });
    }
    log::error!(
        "No attempt settled in slot {} ({} of {} ran out of ticks)",
        request.target_slot,
        stalled,
        settings.steering_attempts
    );
    Err(SimError::OutcomeUnreachable {
        target_slot: request.target_slot,
        attempts: settings.steering_attempts,
    })
}

/// Step one attempt until the ball settles; `None` if the tick budget runs out
fn run_attempt(
    geometry: &BoardGeometry,
    settings: &SimSettings,
    drop_x: f32,
    target: SlotBounds,
    seed: u64,
    attempt: u32,
) -> Option<Vec<TrajectoryPoint>> {
    let mut run = DropRun::new(geometry, drop_x, target, seed, 1.0 + attempt as f32);
    let mut points = Vec::with_capacity(settings.tick_rate as usize * 4);

    while !run.is_settled() {
        if run.frame >= settings.max_ticks {
            log::warn!(
                "Attempt {} did not settle within {} ticks (ball at {:?}); reseeding",
                attempt,
                settings.max_ticks,
                run.ball.pos
            );
            return None;
        }
        points.push(tick(&mut run, geometry, settings));
    }

    Some(points)
}
