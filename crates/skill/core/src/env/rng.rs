//! RNG oracle for deterministic action resolution.
//!
//! Every random draw the engine makes (success roll, critical roll, per-reward
//! drop roll) goes through one [`RngOracle`]. Seeds are derived from the
//! session seed, the engine's attempt counter, the skill, and the roll
//! context, so a resolution is reproducible from saved state alone.

use std::collections::VecDeque;
use std::sync::Mutex;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    fn roll_unit(&self, seed: u64) -> f64 {
        self.next_u32(seed) as f64 / (u32::MAX as f64 + 1.0)
    }

    /// True with probability `chance`; chances at or above 1 always pass.
    fn chance(&self, seed: u64, chance: f64) -> bool {
        self.roll_unit(seed) < chance
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. Same seed, same output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Replays a fixed sequence of values regardless of seed.
///
/// Values are consumed in draw order: success roll, then critical roll (only
/// after a success), then one drop roll per reward that has a drop chance.
/// Once the script is exhausted `fallback` is returned forever.
#[derive(Debug)]
pub struct ScriptedRng {
    script: Mutex<VecDeque<u32>>,
    fallback: u32,
}

impl ScriptedRng {
    /// Value that passes every chance above zero.
    pub const PASS: u32 = 0;
    /// Value that fails every chance below one.
    pub const FAIL: u32 = u32::MAX;

    pub fn new(script: impl IntoIterator<Item = u32>, fallback: u32) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
        }
    }

    /// Returns `value` for every draw.
    pub fn always(value: u32) -> Self {
        Self::new([], value)
    }

    /// Every attempt succeeds without a critical hit; drops never happen.
    pub fn success_without_critical() -> Self {
        Self::new([Self::PASS, Self::FAIL], Self::FAIL)
    }

    /// Success and critical both pass, then everything fails.
    pub fn critical_success() -> Self {
        Self::new([Self::PASS, Self::PASS], Self::FAIL)
    }

    /// Appends values to the script.
    pub fn push(&self, values: impl IntoIterator<Item = u32>) {
        if let Ok(mut script) = self.script.lock() {
            script.extend(values);
        }
    }

    /// Number of values left before falling back.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|script| script.len()).unwrap_or(0)
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(self.fallback)
    }
}

/// Compute deterministic seed from session state components.
///
/// # Arguments
///
/// * `session_seed` - Base seed chosen by the host (for replay/determinism)
/// * `nonce` - Attempt sequence number of the engine
/// * `skill_tag` - [`SkillId::tag`](crate::SkillId::tag) of the acting skill
/// * `context` - Distinguishes independent rolls within one attempt
///
/// # Context Values
///
/// - `0`: success roll
/// - `1`: critical roll
/// - `2 + i`: drop roll for reward `i`
pub fn compute_seed(session_seed: u64, nonce: u64, skill_tag: u32, context: u32) -> u64 {
    let mut hash = session_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (skill_tag as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn roll_unit_stays_below_one() {
        let rng = ScriptedRng::always(u32::MAX);
        let roll = rng.roll_unit(0);
        assert!(roll < 1.0 && roll > 0.999);
        assert_eq!(ScriptedRng::always(0).roll_unit(0), 0.0);
    }

    #[test]
    fn scripted_rng_replays_then_falls_back() {
        let rng = ScriptedRng::new([1, 2], 9);
        assert_eq!(rng.next_u32(0), 1);
        assert_eq!(rng.next_u32(0), 2);
        assert_eq!(rng.next_u32(0), 9);
        rng.push([5]);
        assert_eq!(rng.remaining(), 1);
        assert_eq!(rng.next_u32(0), 5);
    }

    #[test]
    fn seeds_differ_per_context() {
        let success = compute_seed(7, 3, 11, 0);
        let critical = compute_seed(7, 3, 11, 1);
        assert_ne!(success, critical);
        assert_eq!(success, compute_seed(7, 3, 11, 0));
    }
}
