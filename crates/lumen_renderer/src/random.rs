//! Deterministic per-worker random streams.
//!
//! Every tile owns one [`RandomSeries`]; nothing here is global or
//! thread-local, so a render is reproducible from its master seed alone.

use lumen_math::{near_zero, unit_vector, Vec3};
use rand::{RngCore, SeedableRng};

/// Mixed into every seed so that a zero seed never reaches the generator.
/// Zero is a fixed point of xorshift and would yield a constant stream.
const SEED_PERTURBATION: u32 = 0x9E37_79B9;

/// 2^32, so `uniform()` stays strictly below one even for `u32::MAX`.
const STATE_RANGE: f64 = 4_294_967_296.0;

/// Xorshift32 pseudorandom stream.
///
/// Cheap enough to call several times per bounce. Owned by exactly one
/// worker; it is `Send` but deliberately not shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSeries {
    state: u32,
}

impl RandomSeries {
    /// Create a stream from an arbitrary seed (zero included).
    pub fn new(seed: u32) -> Self {
        let mut state = seed ^ SEED_PERTURBATION;
        if state == 0 {
            state = SEED_PERTURBATION;
        }
        Self { state }
    }

    /// Current generator state. Never zero.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Derive an independent stream, advancing this one by a single draw.
    ///
    /// The render orchestrator uses this to hand every tile its own seed.
    pub fn fork(&mut self) -> RandomSeries {
        RandomSeries::new(self.next_state())
    }

    /// Advance the generator and return the new state.
    #[inline]
    pub fn next_state(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform double in [0, 1).
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.next_state() as f64 / STATE_RANGE
    }

    /// Uniform double in [min, max).
    #[inline]
    pub fn uniform_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.uniform()
    }

    /// Vector with each component uniform in [0, 1).
    pub fn vec3(&mut self) -> Vec3 {
        Vec3::new(self.uniform(), self.uniform(), self.uniform())
    }

    /// Vector with each component uniform in [min, max).
    pub fn vec3_range(&mut self, min: f64, max: f64) -> Vec3 {
        Vec3::new(
            self.uniform_range(min, max),
            self.uniform_range(min, max),
            self.uniform_range(min, max),
        )
    }

    /// Uniform point inside the unit disk in the XY plane (z = 0).
    pub fn in_unit_disk(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(self.uniform_range(-1.0, 1.0), self.uniform_range(-1.0, 1.0), 0.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Uniform point inside the unit ball.
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = self.vec3_range(-1.0, 1.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Uniform direction on the unit sphere.
    ///
    /// Ball samples that are too short to normalize are redrawn.
    pub fn unit_vector(&mut self) -> Vec3 {
        loop {
            let p = self.in_unit_sphere();
            if !near_zero(p) {
                return unit_vector(p);
            }
        }
    }
}

impl RngCore for RandomSeries {
    fn next_u32(&mut self) -> u32 {
        self.next_state()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_state());
        let hi = u64::from(self.next_state());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_state().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for RandomSeries {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        RandomSeries::new(u32::from_le_bytes(seed))
    }
}
