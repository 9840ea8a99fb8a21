//! 24h cast throughput from rod durability.
//!
//! Durability regenerates at one cast per [`FAST_REGEN_SECS_PER_CAST`] while
//! at or above the 20% floor and one per [`SLOW_REGEN_SECS_PER_CAST`] below
//! it. Two scenarios are projected over a day: keep spending only what sits
//! above the floor (fast regen all day), or spend everything (slow regen all
//! day). No minute-by-minute simulation.

use serde::Serialize;

use crate::constants::*;

/// Smallest durability that is still at least 20% of `max`; anything below
/// regenerates slowly.
pub fn durability_floor(max: u32) -> u32 {
    (max as u64 * DURABILITY_FLOOR_PERCENT as u64).div_ceil(100) as u32
}

/// Casts regenerated per second at the current durability.
pub fn regen_rate_per_sec(current: u32, max: u32) -> f64 {
    if current >= durability_floor(max) {
        1.0 / FAST_REGEN_SECS_PER_CAST as f64
    } else {
        1.0 / SLOW_REGEN_SECS_PER_CAST as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DurabilityProjection {
    pub floor: u32,
    /// Durability above the floor that can be spent right now.
    pub buffer_above_floor: u32,
    pub stay_above_casts: u64,
    pub let_drop_casts: u64,
    pub stay_above_fish: f64,
    pub let_drop_fish: f64,
}

impl DurabilityProjection {
    pub fn project(current: u32, max: u32, fish_per_cast: f64) -> Self {
        let current = current.min(max);
        let floor = durability_floor(max);
        let buffer_above_floor = current.saturating_sub(floor);

        let fast_daily = SECONDS_PER_DAY / FAST_REGEN_SECS_PER_CAST;
        let slow_daily = SECONDS_PER_DAY / SLOW_REGEN_SECS_PER_CAST;

        let stay_above_casts = buffer_above_floor as u64 + fast_daily;
        let let_drop_casts = current as u64 + slow_daily;

        Self {
            floor,
            buffer_above_floor,
            stay_above_casts,
            let_drop_casts,
            stay_above_fish: stay_above_casts as f64 * fish_per_cast,
            let_drop_fish: let_drop_casts as f64 * fish_per_cast,
        }
    }

    /// The better of the two daily projections, in FISH.
    pub fn best_daily_fish(&self) -> f64 {
        self.stay_above_fish.max(self.let_drop_fish)
    }
}
