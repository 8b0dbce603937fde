//! Random sources.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents never share RNG state, so the order in which concurrently polled
//! agent ticks make progress cannot change any sampled value.
//!
//! Simulation code never talks to `rand` directly; it goes through the
//! [`RandomSource`] trait so tests can substitute scripted sources.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RandomSource ──────────────────────────────────────────────────────────────

/// The sampling operations the simulation needs.
pub trait RandomSource {
    /// Sample `N(mean, dev)`.  A non-positive `dev` returns `mean`.
    fn normal(&mut self, mean: f64, dev: f64) -> f64;

    /// Sample uniformly in `[min, max)`.  Returns `min` when the range is
    /// empty.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` for an empty slice, a negative or non-finite weight,
    /// or when every weight is zero.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize>;

    /// Pick one character of `pool` uniformly.  `pool` must be non-empty
    /// ASCII; an empty pool yields `'?'`.
    fn pick_char(&mut self, pool: &str) -> char;
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Each agent owns exactly one; the type is `!Sync` to prevent accidental
/// sharing across tasks.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

impl RandomSource for AgentRng {
    fn normal(&mut self, mean: f64, dev: f64) -> f64 {
        if !(dev > 0.0) || !dev.is_finite() {
            return mean;
        }
        match Normal::new(mean, dev) {
            Ok(n) => n.sample(&mut self.0),
            Err(_) => mean,
        }
    }

    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if !(max > min) {
            return min;
        }
        self.0.gen_range(min..max)
    }

    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        WeightedIndex::new(weights)
            .ok()
            .map(|dist| dist.sample(&mut self.0))
    }

    fn pick_char(&mut self, pool: &str) -> char {
        let bytes = pool.as_bytes();
        if bytes.is_empty() {
            return '?';
        }
        bytes[self.0.gen_range(0..bytes.len())] as char
    }
}
