//! Fixed timestep simulation tick
//!
//! Advances one drop deterministically: gravity, steering, integration, then
//! pegs, walls, and buckets, in that order.

use glam::Vec2;

use super::board::{BoardGeometry, SlotBounds};
use super::collision::{
    BounceParams, CooldownTable, FloorContact, detect_and_handle_peg_collisions,
    resolve_bucket_collisions, resolve_wall_collisions, resting_on_peg, separate_from_pegs,
};
use super::rng::DropRng;
use super::state::{BallState, DropPhase, TrajectoryPoint};
use crate::consts::*;
use crate::normalize_angle;
use crate::settings::SimSettings;

/// Peak sideways speed of the ball as it leaves the drop zone (px/s)
const DROP_JITTER: f32 = 25.0;
/// Horizontal speed below which a grounded ball counts as still (px/s)
const SETTLE_SPEED: f32 = 4.0;
/// Consecutive still ticks on a bucket floor before the drop is settled
const REST_TICKS: u32 = 8;
/// Longest fall the aim estimate will look ahead, in seconds
const AIM_HORIZON_SECS: u32 = 10;
/// Peg/wall alternations allowed when a clamp lands in a peg
const WALL_SEPARATION_PASSES: usize = 3;

/// Mutable state of one simulation attempt
///
/// Owned by a single run and dropped once the trajectory is produced.
#[derive(Debug, Clone)]
pub struct DropRun {
    pub ball: BallState,
    /// Rolling angle (radians)
    pub rotation: f32,
    pub phase: DropPhase,
    /// Index of the next frame to emit
    pub frame: u32,
    target: SlotBounds,
    /// Multiplier on the steering forces (grows with each reseed)
    steer_gain: f32,
    rest_ticks: u32,
    cooldowns: CooldownTable,
    rng: DropRng,
}

impl DropRun {
    pub fn new(
        geometry: &BoardGeometry,
        drop_x: f32,
        target: SlotBounds,
        seed: u64,
        steer_gain: f32,
    ) -> Self {
        let mut rng = DropRng::new(seed);
        let vx = rng.signed_unit() * DROP_JITTER;
        Self {
            ball: BallState::new(drop_x, geometry.top + BALL_RADIUS, vx, 0.0),
            rotation: 0.0,
            phase: DropPhase::Falling,
            frame: 0,
            target,
            steer_gain,
            rest_ticks: 0,
            cooldowns: CooldownTable::new(geometry.config.peg_rows as usize, geometry.max_cols()),
            rng,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.phase == DropPhase::Settled
    }
}

/// Advance the drop by one fixed timestep and return the emitted frame
pub fn tick(run: &mut DropRun, geometry: &BoardGeometry, settings: &SimSettings) -> TrajectoryPoint {
    let dt = settings.dt();
    let old = run.ball;
    let target_x = run.target.center();

    let mut ball = old;
    ball.vel.y += settings.gravity * dt;
    ball.vel = ball.vel.clamp_length_max(settings.max_speed);
    // No guidance while sitting on a peg: pulling toward a target above the
    // peg's apex would hold the ball there
    if run.phase == DropPhase::Falling && !resting_on_peg(old.pos, geometry.pegs()) {
        steer(&mut ball, geometry, settings, target_x, run.steer_gain, dt);
    }
    ball.pos += ball.vel * dt;

    let bounce = BounceParams {
        restitution: settings.peg_restitution,
        friction: settings.peg_friction,
        randomness: settings.bounce_randomness,
        bias: (lean_toward(ball.pos.x, target_x, geometry) * settings.bounce_bias * run.steer_gain)
            .clamp(-1.0, 1.0),
    };
    let pegs = detect_and_handle_peg_collisions(
        ball,
        old,
        geometry.pegs(),
        &mut run.cooldowns,
        run.frame,
        &bounce,
        &mut run.rng,
    );
    let (mut ball, wall_hit) = resolve_wall_collisions(pegs.state, geometry, settings.wall_restitution);
    // A wall clamp can nudge the ball back into a peg flush with the wall
    for _ in 0..WALL_SEPARATION_PASSES {
        let Some(separated) = separate_from_pegs(ball, geometry.pegs()) else {
            break;
        };
        ball = resolve_wall_collisions(separated, geometry, settings.wall_restitution).0;
    }
    let bucket = resolve_bucket_collisions(
        ball,
        old,
        geometry,
        settings.wall_restitution,
        settings.floor_restitution,
        settings.rest_speed,
    );
    let mut ball = bucket.state;

    if bucket.floor == FloorContact::Resting {
        ball.vel.x *= settings.floor_friction;
    }

    match run.phase {
        DropPhase::Falling => {
            if ball.pos.y + BALL_RADIUS >= geometry.bucket_top {
                run.phase = DropPhase::EnteringBucket;
            }
        }
        DropPhase::EnteringBucket => {
            if bucket.floor == FloorContact::Resting && ball.vel.x.abs() < SETTLE_SPEED {
                run.rest_ticks += 1;
            } else {
                run.rest_ticks = 0;
            }
            if run.rest_ticks >= REST_TICKS {
                ball.vel = Vec2::ZERO;
                run.phase = DropPhase::Settled;
            }
        }
        DropPhase::Settled => {}
    }

    run.rotation = normalize_angle(run.rotation + ball.vel.x * dt / BALL_RADIUS);
    run.ball = ball;

    let point = TrajectoryPoint {
        frame: run.frame,
        x: ball.pos.x,
        y: ball.pos.y,
        rotation: run.rotation,
        vx: ball.vel.x,
        vy: ball.vel.y,
        pegs_hit: pegs.pegs_hit,
        wall_hit,
        bucket_wall_hit: bucket.wall_hit,
        bucket_floor_hit: bucket.floor == FloorContact::Bounce,
    };
    run.frame += 1;
    point
}

/// Pull the ball toward the target slot
///
/// Inside the peg field the horizontal velocity is eased toward whatever drift
/// would carry the ball to the target by the time it reaches the buckets,
/// limited by `guidance_accel` and ramping up with depth. Below the last row
/// there is nothing left to bounce off, so the drift is set exactly.
fn steer(
    ball: &mut BallState,
    geometry: &BoardGeometry,
    settings: &SimSettings,
    target_x: f32,
    gain: f32,
    dt: f32,
) {
    let aim_y = geometry.bucket_top - BALL_RADIUS;
    if ball.pos.y >= aim_y {
        return;
    }
    let ticks = ticks_until(ball.pos.y, ball.vel.y, aim_y, settings.gravity, dt, settings.tick_rate);
    let wanted = (target_x - ball.pos.x) / (ticks as f32 * dt);

    if ball.pos.y > geometry.last_row_y + COLLISION_RADIUS {
        let limit = settings.max_speed * gain;
        ball.vel.x = wanted.clamp(-limit, limit);
        return;
    }

    let span = (geometry.last_row_y - geometry.first_row_y).max(1.0);
    let depth = ((ball.pos.y - geometry.first_row_y) / span).clamp(0.0, 1.0);
    let max_delta = settings.guidance_accel * gain * (0.25 + 0.75 * depth) * dt;
    ball.vel.x += (wanted - ball.vel.x).clamp(-max_delta, max_delta);
}

/// Ticks until a free-falling ball's center reaches `target_y`
///
/// Mirrors the integration order in [`tick`]: the current tick's gravity is
/// already in `vy`.
fn ticks_until(y: f32, vy: f32, target_y: f32, gravity: f32, dt: f32, tick_rate: u32) -> u32 {
    let limit = tick_rate.saturating_mul(AIM_HORIZON_SECS).max(1);
    let (mut y, mut vy) = (y, vy);
    for n in 1..=limit {
        y += vy * dt;
        if y >= target_y {
            return n;
        }
        vy += gravity * dt;
    }
    limit
}

/// Direction toward the target in [-1, 1], saturating one peg spacing away
fn lean_toward(x: f32, target_x: f32, geometry: &BoardGeometry) -> f32 {
    ((target_x - x) / geometry.peg_spacing).clamp(-1.0, 1.0)
}
