//! Deterministic simulation module
//!
//! All drop physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pegs in row-major order)
//! - No rendering or platform dependencies

pub mod board;
pub mod cache;
pub mod collision;
pub mod drop;
pub mod events;
pub mod rng;
pub mod state;
pub mod tick;

pub use board::{BoardConfig, BoardGeometry, DropZone, SlotBounds, generate_peg_layout};
pub use cache::{FrameSample, TrajectoryCache};
pub use collision::{
    BounceParams, CooldownTable, PegCollisionOutcome, detect_and_handle_peg_collisions,
    reflect_velocity, segment_contact,
};
pub use drop::{DropPosition, DropRequest, SimulatedDrop, simulate_drop};
pub use events::{ContactEvent, ContactKind, contact_events};
pub use rng::{DropRng, derive_seed};
pub use state::{BallState, DropPhase, Peg, PegHit, TrajectoryPoint, WallSide};
pub use tick::{DropRun, tick};
