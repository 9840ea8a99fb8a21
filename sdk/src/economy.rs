//! Fish-per-cast economy model.
//!
//! A statistical expectation, not a cast simulation: every cast is credited
//! with the blended rarity multiplier of its level instead of a sampled
//! outcome. Buckets above a level's rarity gate still count, but at the
//! gate's multiplier rather than their own.

use crate::constants::*;
use crate::error::{Result, SdkError};

/// Rod power at `level`. Levels 1..=10 come straight from the table; each
/// level above 10 multiplies by [`ROD_POWER_SCALE`] and floors, saturating
/// at [`MAX_ROD_POWER`].
pub fn rod_power(level: u32) -> Result<u32> {
    if level == 0 {
        return Err(SdkError::InvalidLevel(level));
    }
    if level as usize <= ROD_POWERS_BASE.len() {
        return Ok(ROD_POWERS_BASE[level as usize - 1]);
    }

    let mut power = ROD_POWERS_BASE[ROD_POWERS_BASE.len() - 1];
    for _ in (ROD_POWERS_BASE.len() as u32 + 1)..=level {
        power = (power as f64 * ROD_POWER_SCALE).floor() as u32;
        if power >= MAX_ROD_POWER {
            return Ok(MAX_ROD_POWER);
        }
    }
    Ok(power)
}

/// Probability in (0, 1] that a cast catches anything.
pub fn catch_chance(level: u32) -> f64 {
    let last = CATCH_RATE_BONUSES_BPS.len() - 1;
    let idx = (level.saturating_sub(1) as usize).min(last);
    (BASE_CATCH_RATE_BPS + CATCH_RATE_BONUSES_BPS[idx]) as f64 / BPS_DENOMINATOR as f64
}

/// Turn cumulative thresholds into per-bucket weights summing to 10_000.
pub fn rarity_buckets(thresholds_bps: &[u32; 6]) -> [u32; 6] {
    let mut buckets = [0u32; 6];
    let mut prev = 0u32;
    for (bucket, &t) in buckets.iter_mut().zip(thresholds_bps.iter()) {
        *bucket = t.saturating_sub(prev);
        prev = t;
    }

    let sum: u32 = buckets.iter().sum();
    if sum != BPS_DENOMINATOR {
        let last = buckets.len() - 1;
        buckets[last] = (buckets[last] + BPS_DENOMINATOR).saturating_sub(sum);
    }
    buckets
}

/// Highest multiplier tier a rod of this level can realize.
pub fn rarity_gate(level: u32) -> usize {
    (level.saturating_sub(1) as usize).min(RARITY_MULTIPLIERS_TENTHS.len() - 1)
}

/// Blended multiplier in tenths, never below 1.0x (10).
pub fn expected_multiplier_tenths(level: u32) -> u32 {
    let buckets = rarity_buckets(&RARITY_THRESHOLDS_BPS);
    let gate = rarity_gate(level);

    let weighted: u64 = buckets
        .iter()
        .enumerate()
        .map(|(i, &weight)| weight as u64 * RARITY_MULTIPLIERS_TENTHS[i.min(gate)] as u64)
        .sum();

    // Half-up rounding of weighted / 10_000
    let denom = BPS_DENOMINATOR as u64;
    let rounded = (weighted + denom / 2) / denom;
    (rounded as u32).max(RARITY_MULTIPLIERS_TENTHS[0])
}

/// Expected FISH (not raw units) per cast at `level` and network `difficulty`.
/// A difficulty of 0 is treated as 1.
pub fn expected_fish_per_cast(level: u32, difficulty: u64) -> Result<f64> {
    let chance = catch_chance(level);
    let safe_difficulty = difficulty.max(1);
    let power = rod_power(level)?;

    let emission_per_catch_raw =
        (power as f64 * BASE_EMISSION_RATE as f64) / safe_difficulty as f64;

    let multiplier_tenths = expected_multiplier_tenths(level);
    let emission_per_catch =
        emission_per_catch_raw * multiplier_tenths as f64 / 10.0 / RAW_PER_FISH as f64;

    Ok(chance * emission_per_catch)
}

/// One row of the calculator: everything shown for a `(level, difficulty)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CastEstimate {
    pub level: u32,
    pub difficulty: u64,
    pub rod_power: u32,
    pub catch_chance: f64,
    pub multiplier_tenths: u32,
    pub fish_per_cast: f64,
}

impl CastEstimate {
    pub fn new(level: u32, difficulty: u64) -> Result<Self> {
        Ok(Self {
            level,
            difficulty: difficulty.max(1),
            rod_power: rod_power(level)?,
            catch_chance: catch_chance(level),
            multiplier_tenths: expected_multiplier_tenths(level),
            fish_per_cast: expected_fish_per_cast(level, difficulty)?,
        })
    }
}

/// Fish-per-cast curve for levels `1..=max_level` at a fixed difficulty.
pub fn fish_per_cast_curve(max_level: u32, difficulty: u64) -> Result<Vec<(u32, f64)>> {
    (1..=max_level)
        .map(|level| expected_fish_per_cast(level, difficulty).map(|y| (level, y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rod_power_table_boundary() {
        assert_eq!(rod_power(1).unwrap(), 100);
        assert_eq!(rod_power(10).unwrap(), 236);
        // floor(236 * 1.0294) = floor(242.9384)
        assert_eq!(rod_power(11).unwrap(), 242);
        // floor(242 * 1.0294) = floor(249.1148)
        assert_eq!(rod_power(12).unwrap(), 249);
    }

    #[test]
    fn test_rod_power_rejects_level_zero() {
        assert!(matches!(rod_power(0), Err(SdkError::InvalidLevel(0))));
        assert!(expected_fish_per_cast(0, 1_000).is_err());
    }

    #[test]
    fn test_rod_power_saturates() {
        let first_cap = (1..=200).find(|&l| rod_power(l).unwrap() == MAX_ROD_POWER).unwrap();
        assert!(first_cap > 10);
        for level in first_cap..=200 {
            assert_eq!(rod_power(level).unwrap(), MAX_ROD_POWER);
        }
        assert_eq!(rod_power(u32::MAX).unwrap(), MAX_ROD_POWER);
    }

    #[test]
    fn test_catch_chance() {
        assert!((catch_chance(1) - 0.1430).abs() < 1e-12);
        assert!((catch_chance(10) - 0.3330).abs() < 1e-12);
        assert_eq!(catch_chance(10), catch_chance(60));
        assert_eq!(catch_chance(0), catch_chance(1));
        for level in 1..10 {
            assert!(catch_chance(level) <= catch_chance(level + 1));
        }
    }

    #[test]
    fn test_rarity_buckets() {
        assert_eq!(rarity_buckets(&RARITY_THRESHOLDS_BPS), [7_000, 2_000, 750, 200, 45, 5]);
        // Thresholds that stop short of 10_000 get topped up in the last bucket
        assert_eq!(
            rarity_buckets(&[7_000, 9_000, 9_750, 9_950, 9_995, 9_998]),
            [7_000, 2_000, 750, 200, 45, 5]
        );
    }

    #[test]
    fn test_gate_collapses_upper_buckets() {
        // Level 1: every bucket pays the common multiplier
        assert_eq!(expected_multiplier_tenths(1), 10);
        // Level 2: 7000 * 10 + 3000 * 30 = 160_000 -> 16
        assert_eq!(expected_multiplier_tenths(2), 16);
        // Level 6+: full table
        // 7000*10 + 2000*30 + 750*80 + 200*250 + 45*1000 + 5*5000 = 310_000 -> 31
        assert_eq!(expected_multiplier_tenths(6), 31);
        assert_eq!(expected_multiplier_tenths(40), 31);
    }

    #[test]
    fn test_expected_fish_level_one() {
        // raw = 100 * 80e6 / 1_000 = 8e6 -> 8 FISH per catch at 1.0x
        let y = expected_fish_per_cast(1, 1_000).unwrap();
        assert!((y - 1.144).abs() < 1e-9, "{y}");
    }

    #[test]
    fn test_zero_difficulty_clamps_to_one() {
        for level in [1, 5, 10, 30] {
            assert_eq!(
                expected_fish_per_cast(level, 0).unwrap(),
                expected_fish_per_cast(level, 1).unwrap()
            );
        }
    }

    #[test]
    fn test_cast_estimate_row() {
        let row = CastEstimate::new(10, 0).unwrap();
        assert_eq!(row.difficulty, 1);
        assert_eq!(row.rod_power, 236);
        assert_eq!(row.multiplier_tenths, 31);
        assert_eq!(fish_per_cast_curve(60, 5_000).unwrap().len(), 60);
    }

    proptest! {
        #[test]
        fn prop_rod_power_monotone(level in 1u32..200) {
            let a = rod_power(level).unwrap();
            let b = rod_power(level + 1).unwrap();
            prop_assert!(a <= b);
            prop_assert!(b <= MAX_ROD_POWER);
        }

        #[test]
        fn prop_fish_non_increasing_in_difficulty(level in 1u32..80, d in 1u64..1_000_000_000) {
            let easy = expected_fish_per_cast(level, d).unwrap();
            let hard = expected_fish_per_cast(level, d + 1).unwrap();
            prop_assert!(hard <= easy);
            prop_assert!(hard >= 0.0);
        }

        #[test]
        fn prop_fish_non_decreasing_in_level(level in 1u32..120, d in 1u64..1_000_000_000) {
            let low = expected_fish_per_cast(level, d).unwrap();
            let high = expected_fish_per_cast(level + 1, d).unwrap();
            prop_assert!(high >= low);
        }
    }
}
