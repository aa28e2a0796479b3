//! Randomized break schedule generation.
//!
//! A schedule is a strictly increasing list of minute offsets from session
//! start. Offsets stay inside the eligible window
//! `[no_break_at_start, focus_duration - no_break_at_end]` and consecutive
//! gaps are drawn from `[min_interval, max_interval]`, shortened near the end
//! of the window by the room that is left.

use std::collections::VecDeque;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use super::config::SessionConfig;

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Uniform integer in `[min, max]`, both inclusive. Callers guarantee `min <= max`.
    fn int_inclusive(&mut self, min: u32, max: u32) -> u32;
}

/// PCG-backed random source.
#[derive(Debug, Clone)]
pub struct PcgSource {
    rng: Mcg128Xsl64,
}

impl PcgSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Reproducible source, handy for dry runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }
}

impl Default for PcgSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for PcgSource {
    fn int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed queue of values.
///
/// Each value is clamped into the requested range; once the queue is empty
/// the lower bound is returned.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    values: VecDeque<u32>,
}

impl FixedSource {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for FixedSource {
    fn int_inclusive(&mut self, min: u32, max: u32) -> u32 {
        self.values
            .pop_front()
            .map(|v| v.clamp(min, max))
            .unwrap_or(min)
    }
}

/// Generate break offsets for a focus session.
///
/// Returns an empty schedule when the eligible window is empty. A break that
/// lands exactly on the last eligible minute is kept.
pub fn generate_break_schedule<R: RandomSource>(
    focus_duration: u32,
    no_break_at_start: u32,
    no_break_at_end: u32,
    min_interval: u32,
    max_interval: u32,
    rng: &mut R,
) -> Vec<u32> {
    let start = i64::from(no_break_at_start);
    let end = i64::from(focus_duration) - i64::from(no_break_at_end);
    if start >= end {
        return Vec::new();
    }

    // A zero interval would never advance.
    let min_interval = i64::from(min_interval.max(1));
    let max_interval = i64::from(max_interval);

    let mut breaks = Vec::new();
    let mut current = start;
    while current + min_interval <= end {
        let max_delta = max_interval.min(end - current);
        if max_delta < min_interval {
            break;
        }
        // Both bounds are within (0, end - start], which fits in u32.
        let delta = rng.int_inclusive(min_interval as u32, max_delta as u32);
        current += i64::from(delta);
        if current <= end {
            breaks.push(current as u32);
        } else {
            break;
        }
    }
    breaks
}

impl SessionConfig {
    /// Draw a break schedule for this configuration.
    pub fn break_schedule<R: RandomSource>(&self, rng: &mut R) -> Vec<u32> {
        generate_break_schedule(
            self.focus_duration_min,
            self.no_break_at_start_min,
            self.no_break_at_end_min,
            self.min_break_interval_min,
            self.max_break_interval_min,
            rng,
        )
    }
}
