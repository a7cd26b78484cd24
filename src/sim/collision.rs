//! Collision detection and response for pegs, walls, and buckets
//!
//! The tricky part of the drop: the ball can move further than a peg's
//! diameter in one tick, so every test sweeps the segment from the previous
//! position to the tentative one instead of sampling the endpoint.

use glam::Vec2;

use super::board::BoardGeometry;
use super::rng::DropRng;
use super::state::{BallState, Peg, PegHit, WallSide};
use crate::consts::*;

/// Gap left between a corrected ball and the surface it was pushed out of
const CONTACT_SLOP: f32 = 0.01;
/// Minimum sideways component of an upward contact normal
const MIN_LATERAL_NORMAL: f32 = 0.12;
/// Extra overlap-resolution sweeps after the swept contacts
const SEPARATION_PASSES: usize = 4;
/// Distance beyond contact at which a ball still counts as sitting on a peg
const PERCH_MARGIN: f32 = 2.0;

/// Frame of the last registered hit, per peg
///
/// Dense table keyed by `row * cols + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownTable {
    cols: usize,
    last_hit: Vec<Option<u32>>,
}

impl CooldownTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            last_hit: vec![None; rows * cols],
        }
    }

    /// Table large enough for every `(row, col)` in `pegs`
    pub fn for_pegs(pegs: &[Peg]) -> Self {
        let rows = pegs.iter().map(|p| p.row as usize + 1).max().unwrap_or(0);
        let cols = pegs.iter().map(|p| p.col as usize + 1).max().unwrap_or(0);
        Self::new(rows, cols)
    }

    #[inline]
    fn key(&self, row: u16, col: u16) -> Option<usize> {
        let col = col as usize;
        if col >= self.cols {
            return None;
        }
        let key = row as usize * self.cols + col;
        (key < self.last_hit.len()).then_some(key)
    }

    pub fn last_hit(&self, row: u16, col: u16) -> Option<u32> {
        self.key(row, col).and_then(|k| self.last_hit[k])
    }

    /// True while a hit on this peg would be a re-trigger
    pub fn is_cooling(&self, row: u16, col: u16, frame: u32) -> bool {
        self.last_hit(row, col)
            .is_some_and(|last| frame.saturating_sub(last) < COOLDOWN_FRAMES)
    }

    fn record(&mut self, row: u16, col: u16, frame: u32) {
        if let Some(k) = self.key(row, col) {
            self.last_hit[k] = Some(frame);
        }
    }
}

/// How a registered peg hit changes the ball's velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceParams {
    /// Fraction of the normal speed kept
    pub restitution: f32,
    /// Fraction of the tangential speed kept
    pub friction: f32,
    /// Peak angular perturbation (radians)
    pub randomness: f32,
    /// Lean of the perturbation in [-1, 1]; positive pushes toward +x
    pub bias: f32,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            restitution: 0.55,
            friction: 0.92,
            randomness: 0.25,
            bias: 0.0,
        }
    }
}

/// Result of one tick of peg collision handling
#[derive(Debug, Clone, PartialEq)]
pub struct PegCollisionOutcome {
    pub state: BallState,
    pub pegs_hit: Vec<PegHit>,
}

/// Resting/bouncing contact with a bucket floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloorContact {
    #[default]
    None,
    /// Struck the floor fast enough to bounce
    Bounce,
    /// Lying on the floor
    Resting,
}

/// Result of one tick of bucket handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketContact {
    pub state: BallState,
    pub wall_hit: bool,
    pub floor: FloorContact,
}

/// Earliest fraction `t` in [0, 1] along `start -> end` at which a point comes
/// within `radius` of `center`
pub fn segment_contact(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let f = start - center;
    let c = f.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let d = end - start;
    let a = d.length_squared();
    if a < 1e-12 {
        return None;
    }
    let half_b = f.dot(d);
    let disc = half_b * half_b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-half_b - disc.sqrt()) / a;
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Detect and resolve peg collisions for one tick
///
/// A peg within `COLLISION_RADIUS` of the swept segment always pushes the ball
/// out. It only registers a hit (and a bounce) when it is not cooling down.
/// The returned position overlaps no peg.
pub fn detect_and_handle_peg_collisions(
    state: BallState,
    old_state: BallState,
    pegs: &[Peg],
    cooldowns: &mut CooldownTable,
    frame: u32,
    bounce: &BounceParams,
    rng: &mut DropRng,
) -> PegCollisionOutcome {
    let mut ball = state;
    let mut pegs_hit = Vec::new();
    let start = old_state.pos;

    for peg in pegs {
        // Cull by the vertical extent of the swept segment
        let lo = start.y.min(ball.pos.y) - COLLISION_RADIUS;
        let hi = start.y.max(ball.pos.y) + COLLISION_RADIUS;
        if peg.y < lo || peg.y > hi {
            continue;
        }

        let center = peg.pos();
        let Some(t) = segment_contact(start, ball.pos, center, COLLISION_RADIUS) else {
            continue;
        };
        let contact = start.lerp(ball.pos, t);
        let normal = push_out(
            &mut ball.pos,
            contact,
            center,
            COLLISION_RADIUS + CONTACT_SLOP,
            ball.vel,
        );

        if cooldowns.is_cooling(peg.row, peg.col, frame) {
            // Grazing contact: stop the ball sinking into the peg, nothing more
            let vn = ball.vel.dot(normal);
            if vn < 0.0 {
                ball.vel -= normal * vn;
            }
            continue;
        }

        cooldowns.record(peg.row, peg.col, frame);
        pegs_hit.push(PegHit {
            row: peg.row,
            col: peg.col,
        });
        ball.vel = bounce_off(ball.vel, lean_normal(normal, bounce.bias), bounce, rng);
    }

    for _ in 0..SEPARATION_PASSES {
        match separate_from_pegs(ball, pegs) {
            Some(separated) => ball = separated,
            None => break,
        }
    }

    PegCollisionOutcome {
        state: ball,
        pegs_hit,
    }
}

/// Push the ball radially out of every peg it overlaps
///
/// Removes the inward velocity component but registers nothing. Returns `None`
/// when the ball was already clear.
pub fn separate_from_pegs(state: BallState, pegs: &[Peg]) -> Option<BallState> {
    let mut ball = state;
    let mut moved = false;
    for peg in pegs {
        if (peg.y - ball.pos.y).abs() >= COLLISION_RADIUS {
            continue;
        }
        let offset = ball.pos - peg.pos();
        if offset.length_squared() >= COLLISION_RADIUS * COLLISION_RADIUS {
            continue;
        }
        let normal = offset.try_normalize().unwrap_or(Vec2::NEG_Y);
        ball.pos = peg.pos() + normal * (COLLISION_RADIUS + CONTACT_SLOP);
        let vn = ball.vel.dot(normal);
        if vn < 0.0 {
            ball.vel -= normal * vn;
        }
        moved = true;
    }
    moved.then_some(ball)
}

/// True when the ball sits on (or just above) a peg below its center
pub fn resting_on_peg(pos: Vec2, pegs: &[Peg]) -> bool {
    let reach = COLLISION_RADIUS + PERCH_MARGIN;
    pegs.iter()
        .filter(|peg| peg.y > pos.y && peg.y - pos.y < reach)
        .any(|peg| peg.pos().distance_squared(pos) < reach * reach)
}

/// Move `pos` out of a circle while keeping the tangential part of its motion
///
/// The tentative position is projected onto the circle when it lies on the
/// side the ball came from; a ball that crossed the whole circle in one tick
/// goes back to the entry point. Returns the outward normal at the new position.
fn push_out(pos: &mut Vec2, contact: Vec2, center: Vec2, radius: f32, vel: Vec2) -> Vec2 {
    let entry = (contact - center)
        .try_normalize()
        .or_else(|| (-vel).try_normalize())
        .unwrap_or(Vec2::NEG_Y);
    let to_end = *pos - center;
    let (normal, dist) = match to_end.try_normalize() {
        Some(n) if n.dot(entry) > 0.0 => (n, to_end.length().max(radius)),
        _ => (entry, radius),
    };
    *pos = center + normal * dist;
    normal
}

/// Normal used for the velocity response
///
/// A ball landing dead-center on top of a round obstacle would balance there,
/// so upward normals keep a small sideways lean (toward `bias` when level).
/// Only velocities see the lean; positions always use the true normal.
fn lean_normal(n: Vec2, bias: f32) -> Vec2 {
    if n.y < 0.0 && n.x.abs() < MIN_LATERAL_NORMAL {
        let side = if n.x != 0.0 {
            n.x.signum()
        } else if bias < 0.0 {
            -1.0
        } else {
            1.0
        };
        return Vec2::new(side * MIN_LATERAL_NORMAL, n.y).normalize();
    }
    n
}

/// Bounce impulse plus the randomized angular perturbation
fn bounce_off(vel: Vec2, normal: Vec2, bounce: &BounceParams, rng: &mut DropRng) -> Vec2 {
    let vn = vel.dot(normal);
    let out = if vn < 0.0 {
        let normal_part = normal * vn;
        let tangent = vel - normal_part;
        tangent * bounce.friction - normal_part * bounce.restitution
    } else {
        vel
    };

    // Always draw so the sequence does not depend on the tuning
    let lean = (rng.signed_unit() + bounce.bias).clamp(-1.0, 1.0);
    let angle = bounce.randomness * lean;
    // Rotating a falling ball clockwise pushes it toward -x
    let angle = if out.y >= 0.0 { -angle } else { angle };
    Vec2::from_angle(angle).rotate(out)
}

/// Keep the ball between the board walls and under the top border
pub fn resolve_wall_collisions(
    state: BallState,
    geometry: &BoardGeometry,
    restitution: f32,
) -> (BallState, Option<WallSide>) {
    let mut ball = state;
    let mut wall = None;

    let left = geometry.inner_left + BALL_RADIUS;
    let right = geometry.inner_right - BALL_RADIUS;
    if ball.pos.x < left {
        ball.pos.x = left;
        if ball.vel.x < 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
            wall = Some(WallSide::Left);
        }
    } else if ball.pos.x > right {
        ball.pos.x = right;
        if ball.vel.x > 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
            wall = Some(WallSide::Right);
        }
    }

    let ceiling = geometry.top + BALL_RADIUS;
    if ball.pos.y < ceiling {
        ball.pos.y = ceiling;
        ball.vel.y = ball.vel.y.abs() * restitution;
    }

    (ball, wall)
}

/// Bucket dividers and the bucket floor
pub fn resolve_bucket_collisions(
    state: BallState,
    old_state: BallState,
    geometry: &BoardGeometry,
    wall_restitution: f32,
    floor_restitution: f32,
    rest_speed: f32,
) -> BucketContact {
    let mut ball = state;
    let mut wall_hit = false;
    let reach = BALL_RADIUS + BUCKET_WALL_THICKNESS * 0.5;

    if ball.pos.y + reach >= geometry.bucket_top {
        for wall_x in geometry.bucket_walls() {
            let dx_new = ball.pos.x - wall_x;
            let dx_old = old_state.pos.x - wall_x;

            if ball.pos.y >= geometry.bucket_top {
                let crossed = old_state.pos.y >= geometry.bucket_top
                    && dx_new.signum() != dx_old.signum();
                if dx_new.abs() >= reach && !crossed {
                    continue;
                }
                // Push back to the side the ball came from
                let side = if dx_old != 0.0 {
                    dx_old.signum()
                } else if ball.vel.x > 0.0 {
                    -1.0
                } else {
                    1.0
                };
                ball.pos.x = wall_x + side * reach;
                if ball.vel.x * side < 0.0 {
                    ball.vel.x = -ball.vel.x * wall_restitution;
                    wall_hit = true;
                }
            } else {
                let cap = Vec2::new(wall_x, geometry.bucket_top);
                let Some(t) = segment_contact(old_state.pos, ball.pos, cap, reach) else {
                    continue;
                };
                let contact = old_state.pos.lerp(ball.pos, t);
                let normal = push_out(&mut ball.pos, contact, cap, reach + CONTACT_SLOP, ball.vel);
                let normal = lean_normal(normal, dx_old);
                let vn = ball.vel.dot(normal);
                if vn < 0.0 {
                    let reflected = reflect_velocity(ball.vel, normal);
                    // Only the normal component loses energy
                    ball.vel = reflected - normal * (-vn) * (1.0 - wall_restitution);
                    wall_hit = true;
                }
            }
        }
    }

    let mut floor = FloorContact::None;
    let rest_y = geometry.floor_y - BALL_RADIUS;
    if ball.pos.y >= rest_y {
        ball.pos.y = rest_y;
        if ball.vel.y > rest_speed {
            ball.vel.y = -ball.vel.y * floor_restitution;
            floor = FloorContact::Bounce;
        } else {
            ball.vel.y = ball.vel.y.min(0.0);
            floor = FloorContact::Resting;
        }
    }

    BucketContact {
        state: ball,
        wall_hit,
        floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::BoardConfig;

    fn single_peg() -> Vec<Peg> {
        vec![Peg {
            row: 0,
            col: 0,
            x: 100.0,
            y: 100.0,
        }]
    }

    fn run(
        state: BallState,
        old: BallState,
        pegs: &[Peg],
        table: &mut CooldownTable,
        frame: u32,
        rng: &mut DropRng,
    ) -> PegCollisionOutcome {
        detect_and_handle_peg_collisions(
            state,
            old,
            pegs,
            table,
            frame,
            &BounceParams::default(),
            rng,
        )
    }

    #[test]
    fn test_cooldown_suppresses_retrigger() {
        let pegs = single_peg();
        let mut table = CooldownTable::for_pegs(&pegs);
        let mut rng = DropRng::new(1);

        let approach = BallState::new(100.0, 85.0, 0.0, 50.0);
        let inside = BallState::new(100.0, 92.0, 0.0, 50.0);

        let hit = run(inside, approach, &pegs, &mut table, 0, &mut rng);
        assert_eq!(hit.pegs_hit, vec![PegHit { row: 0, col: 0 }]);

        for frame in [1, 9] {
            let out = run(inside, inside, &pegs, &mut table, frame, &mut rng);
            assert!(out.pegs_hit.is_empty(), "frame {frame} re-triggered");
        }

        let again = run(inside, inside, &pegs, &mut table, 10, &mut rng);
        assert_eq!(again.pegs_hit, vec![PegHit { row: 0, col: 0 }]);
        assert_eq!(table.last_hit(0, 0), Some(10));
    }

    #[test]
    fn test_cooling_contact_still_blocks() {
        let pegs = single_peg();
        let mut table = CooldownTable::for_pegs(&pegs);
        let mut rng = DropRng::new(3);
        let inside = BallState::new(100.0, 92.0, 0.0, 50.0);

        run(inside, BallState::new(100.0, 85.0, 0.0, 50.0), &pegs, &mut table, 0, &mut rng);
        let rng_before = rng.clone();
        let out = run(inside, inside, &pegs, &mut table, 3, &mut rng);

        let dist = out.state.pos.distance(Vec2::new(100.0, 100.0));
        assert!(dist >= COLLISION_RADIUS);
        // No inward velocity left, no randomness consumed
        let normal = (out.state.pos - Vec2::new(100.0, 100.0)).normalize();
        assert!(out.state.vel.dot(normal) >= -1e-4);
        assert_eq!(rng, rng_before);
    }

    #[test]
    fn test_independent_cooldowns() {
        let pegs = vec![
            Peg { row: 0, col: 0, x: 100.0, y: 100.0 },
            Peg { row: 0, col: 1, x: 130.0, y: 100.0 },
            Peg { row: 0, col: 2, x: 160.0, y: 100.0 },
        ];
        let mut table = CooldownTable::for_pegs(&pegs);
        let mut rng = DropRng::new(5);
        let near = |x: f32| BallState::new(x, 92.0, 0.0, 50.0);

        assert_eq!(run(near(100.0), near(100.0), &pegs, &mut table, 0, &mut rng).pegs_hit.len(), 1);
        assert_eq!(
            run(near(130.0), near(130.0), &pegs, &mut table, 5, &mut rng).pegs_hit,
            vec![PegHit { row: 0, col: 1 }]
        );
        assert_eq!(
            run(near(160.0), near(160.0), &pegs, &mut table, 8, &mut rng).pegs_hit,
            vec![PegHit { row: 0, col: 2 }]
        );

        // At frame 15: first peg expired (15 - 0), third still cooling (15 - 8)
        assert!(!table.is_cooling(0, 0, 15));
        assert!(!table.is_cooling(0, 1, 15));
        assert!(table.is_cooling(0, 2, 15));

        assert_eq!(
            run(near(100.0), near(100.0), &pegs, &mut table, 15, &mut rng).pegs_hit,
            vec![PegHit { row: 0, col: 0 }]
        );
        assert!(run(near(160.0), near(160.0), &pegs, &mut table, 15, &mut rng)
            .pegs_hit
            .is_empty());
    }

    #[test]
    fn test_fast_ball_does_not_tunnel() {
        let pegs = single_peg();
        let mut table = CooldownTable::for_pegs(&pegs);
        let mut rng = DropRng::new(9);

        // Both endpoints are 50px from the peg; only the segment crosses it
        let old = BallState::new(100.0, 50.0, 0.0, 6000.0);
        let new = BallState::new(100.0, 150.0, 0.0, 6000.0);
        let out = run(new, old, &pegs, &mut table, 0, &mut rng);
        assert_eq!(out.pegs_hit.len(), 1);
        assert!(out.state.pos.y < 100.0, "ball should stay above the peg");
        assert!(out.state.vel.y < 0.0, "ball should bounce back up");
    }

    #[test]
    fn test_ball_rolls_across_peg_top() {
        let pegs = single_peg();
        let mut table = CooldownTable::for_pegs(&pegs);
        let mut rng = DropRng::new(17);
        let dt = SIM_DT;

        // Just left of the apex, moving right
        let mut ball = BallState::new(97.0, 100.0 - 11.2, 150.0, 0.0);
        for frame in 0..8 {
            let old = ball;
            let mut next = old;
            next.vel.y += 1400.0 * dt;
            next.pos += next.vel * dt;

            ball = run(next, old, &pegs, &mut table, frame, &mut rng).state;
            assert!(
                ball.pos.x > old.pos.x + 0.5,
                "frame {frame}: x stalled at {} (was {})",
                ball.pos.x,
                old.pos.x
            );
            assert!(ball.pos.distance(Vec2::new(100.0, 100.0)) >= COLLISION_RADIUS);
        }
    }

    #[test]
    fn test_push_out_keeps_tangential_motion() {
        let center = Vec2::new(100.0, 100.0);
        let mut pos = Vec2::new(103.0, 90.0);
        let normal = push_out(&mut pos, Vec2::new(101.0, 88.95), center, COLLISION_RADIUS, Vec2::X);
        // Projected radially from the tentative position, not snapped to the entry point
        assert!((pos.distance(center) - COLLISION_RADIUS).abs() < 1e-3);
        assert!(pos.x > 102.0);
        assert!((normal - (pos - center) / COLLISION_RADIUS).length() < 1e-4);
    }

    #[test]
    fn test_separation_clears_every_peg() {
        let geometry = BoardGeometry::new(BoardConfig::default()).unwrap();
        let pegs = geometry.pegs();
        let mut x = geometry.inner_left;
        while x < geometry.inner_right {
            let mut y = geometry.first_row_y - 20.0;
            while y < geometry.last_row_y + 20.0 {
                let ball = BallState::new(x, y, 30.0, 200.0);
                let mut out = ball;
                for _ in 0..SEPARATION_PASSES {
                    match separate_from_pegs(out, pegs) {
                        Some(next) => out = next,
                        None => break,
                    }
                }
                for peg in pegs {
                    assert!(
                        out.pos.distance(peg.pos()) >= COLLISION_RADIUS,
                        "({x}, {y}) left overlapping peg ({}, {})",
                        peg.row,
                        peg.col
                    );
                }
                y += 3.0;
            }
            x += 3.0;
        }
    }

    #[test]
    fn test_resting_on_peg() {
        let pegs = single_peg();
        assert!(resting_on_peg(Vec2::new(101.0, 100.0 - COLLISION_RADIUS - 1.0), &pegs));
        // Beside or below the peg does not count
        assert!(!resting_on_peg(Vec2::new(100.0, 100.0 + COLLISION_RADIUS), &pegs));
        assert!(!resting_on_peg(Vec2::new(130.0, 95.0), &pegs));
    }

    #[test]
    fn test_segment_grazing_threshold() {
        let center = Vec2::new(100.0, 100.0);
        let graze = segment_contact(Vec2::new(110.0, 0.0), Vec2::new(110.0, 200.0), center, COLLISION_RADIUS);
        assert!(graze.is_some());
        let miss = segment_contact(Vec2::new(112.0, 0.0), Vec2::new(112.0, 200.0), center, COLLISION_RADIUS);
        assert!(miss.is_none());
        // Peg behind the segment's end
        let short = segment_contact(Vec2::new(100.0, 0.0), Vec2::new(100.0, 50.0), center, COLLISION_RADIUS);
        assert!(short.is_none());
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_bounce_bias_leans_toward_target() {
        let bounce = BounceParams {
            restitution: 1.0,
            friction: 1.0,
            randomness: 0.5,
            bias: 1.0,
        };
        let mut rng = DropRng::new(11);
        for _ in 0..100 {
            // Falling straight down onto a flat surface
            let out = bounce_off(Vec2::new(0.0, 300.0), Vec2::NEG_Y, &bounce, &mut rng);
            assert!(out.x >= 0.0);
            assert!(out.y < 0.0);
        }
    }

    #[test]
    fn test_board_walls() {
        let geometry = BoardGeometry::new(BoardConfig::default()).unwrap();

        let escaping = BallState::new(geometry.inner_left - 3.0, 200.0, -120.0, 50.0);
        let (ball, wall) = resolve_wall_collisions(escaping, &geometry, 0.5);
        assert_eq!(wall, Some(WallSide::Left));
        assert_eq!(ball.pos.x, geometry.inner_left + BALL_RADIUS);
        assert!((ball.vel.x - 60.0).abs() < 1e-4);

        let right = BallState::new(geometry.inner_right, 200.0, 80.0, 0.0);
        let (_, wall) = resolve_wall_collisions(right, &geometry, 0.5);
        assert_eq!(wall, Some(WallSide::Right));

        let free = BallState::new(200.0, 200.0, 80.0, 0.0);
        assert_eq!(resolve_wall_collisions(free, &geometry, 0.5), (free, None));
    }

    #[test]
    fn test_bucket_divider_blocks_crossing() {
        let geometry = BoardGeometry::new(BoardConfig::default()).unwrap();
        let wall_x = geometry.bucket_walls().next().unwrap();
        let y = geometry.bucket_top + 20.0;

        let old = BallState::new(wall_x - 10.0, y, 400.0, 0.0);
        let new = BallState::new(wall_x + 2.0, y, 400.0, 0.0);
        let contact = resolve_bucket_collisions(new, old, &geometry, 0.6, 0.35, 40.0);
        assert!(contact.wall_hit);
        assert!(contact.state.pos.x < wall_x);
        assert!(contact.state.vel.x < 0.0);
    }

    #[test]
    fn test_bucket_floor_bounce_then_rest() {
        let geometry = BoardGeometry::new(BoardConfig::default()).unwrap();
        let x = geometry.slot_bounds(2).unwrap().center();
        let rest_y = geometry.floor_y - BALL_RADIUS;

        let old = BallState::new(x, rest_y - 5.0, 0.0, 600.0);
        let new = BallState::new(x, rest_y + 5.0, 0.0, 600.0);
        let contact = resolve_bucket_collisions(new, old, &geometry, 0.6, 0.35, 40.0);
        assert_eq!(contact.floor, FloorContact::Bounce);
        assert!(!contact.wall_hit);
        assert!((contact.state.vel.y + 210.0).abs() < 1e-3);

        let slow = BallState::new(x, rest_y + 0.3, 0.0, 20.0);
        let contact = resolve_bucket_collisions(slow, slow, &geometry, 0.6, 0.35, 40.0);
        assert_eq!(contact.floor, FloorContact::Resting);
        assert_eq!(contact.state.vel.y, 0.0);
        assert_eq!(contact.state.pos.y, rest_y);
    }
}
