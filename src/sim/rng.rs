//! Seeded random source for the simulator
//!
//! PCG32 (`rand_pcg::Pcg32`) seeded through `SeedableRng::seed_from_u64`.
//! Unit draws take 53 bits from two consecutive 32-bit outputs, so a saved
//! seed replays the same sequence on every platform.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Explicit generator state, owned by one simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRng {
    seed: u64,
    inner: Pcg32,
}

impl DropRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        let hi = u64::from(self.inner.next_u32() >> 5);
        let lo = u64::from(self.inner.next_u32() >> 6);
        ((hi << 26) | lo) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform draw in [-1, 1)
    #[inline]
    pub fn signed_unit(&mut self) -> f32 {
        (self.next_f64() * 2.0 - 1.0) as f32
    }
}

/// Seed for reseed attempt `attempt` of a drop (SplitMix64 finalizer)
pub fn derive_seed(seed: u64, attempt: u32) -> u64 {
    if attempt == 0 {
        return seed;
    }
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15u64.wrapping_mul(u64::from(attempt)));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
