//! Aggregate statistics over a scan of decoded PlayerState accounts.

use std::collections::BTreeMap;

use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::state::PlayerState;

/// The fields of a PlayerState the stats need; also what a saved scan keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSample {
    pub owner: Pubkey,
    pub rod_level: u8,
    pub unprocessed_fish: u64,
}

impl From<&PlayerState> for PlayerSample {
    fn from(p: &PlayerState) -> Self {
        Self {
            owner: p.owner,
            rod_level: p.rod_level,
            unprocessed_fish: p.unprocessed_fish,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RodLevelStats {
    pub samples: usize,
    pub counts_by_level: BTreeMap<u8, u64>,
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub avg: Option<f64>,
    pub median: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnprocessedStats {
    pub samples: usize,
    pub total: u128,
    pub min: u64,
    pub max: u64,
    /// Floored mean.
    pub avg: u64,
    pub median: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopHolder {
    pub rank: usize,
    pub owner: Pubkey,
    pub rod_level: u8,
    pub unprocessed: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoreStats {
    pub players: usize,
    pub rod: RodLevelStats,
    pub unprocessed: UnprocessedStats,
    pub top10: Vec<TopHolder>,
}

impl RodLevelStats {
    /// The `n` most common levels, most common first; ties go to the lower level.
    pub fn most_common(&self, n: usize) -> Vec<(u8, u64)> {
        let mut counts: Vec<(u8, u64)> = self.counts_by_level.iter().map(|(&l, &c)| (l, c)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }
}

pub fn rod_level_stats(players: &[PlayerSample]) -> RodLevelStats {
    let mut levels: Vec<u8> = players.iter().map(|p| p.rod_level).collect();
    levels.sort_unstable();

    let mut counts_by_level = BTreeMap::new();
    for &level in &levels {
        *counts_by_level.entry(level).or_insert(0u64) += 1;
    }

    let n = levels.len();
    let avg = (n > 0).then(|| levels.iter().map(|&l| l as f64).sum::<f64>() / n as f64);
    let median = match n {
        0 => None,
        _ if n % 2 == 1 => Some(levels[n / 2] as f64),
        _ => Some((levels[n / 2 - 1] as f64 + levels[n / 2] as f64) / 2.0),
    };

    RodLevelStats {
        samples: n,
        counts_by_level,
        min: levels.first().copied(),
        max: levels.last().copied(),
        avg,
        median,
    }
}

pub fn unprocessed_stats(players: &[PlayerSample]) -> UnprocessedStats {
    let mut amounts: Vec<u64> = players.iter().map(|p| p.unprocessed_fish).collect();
    amounts.sort_unstable();

    let n = amounts.len();
    let total: u128 = amounts.iter().map(|&a| a as u128).sum();
    let median = match n {
        0 => 0,
        _ if n % 2 == 1 => amounts[n / 2],
        _ => ((amounts[n / 2 - 1] as u128 + amounts[n / 2] as u128) / 2) as u64,
    };

    UnprocessedStats {
        samples: n,
        total,
        min: amounts.first().copied().unwrap_or(0),
        max: amounts.last().copied().unwrap_or(0),
        avg: if n == 0 { 0 } else { (total / n as u128) as u64 },
        median,
    }
}

pub fn compute_core_stats(players: &[PlayerSample]) -> CoreStats {
    let mut by_unprocessed: Vec<&PlayerSample> = players.iter().collect();
    // Stable sort keeps scan order among equal balances
    by_unprocessed.sort_by(|a, b| b.unprocessed_fish.cmp(&a.unprocessed_fish));

    let top10 = by_unprocessed
        .into_iter()
        .take(10)
        .enumerate()
        .map(|(i, p)| TopHolder {
            rank: i + 1,
            owner: p.owner,
            rod_level: p.rod_level,
            unprocessed: p.unprocessed_fish,
        })
        .collect();

    CoreStats {
        players: players.len(),
        rod: rod_level_stats(players),
        unprocessed: unprocessed_stats(players),
        top10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(rod_level: u8, unprocessed_fish: u64) -> PlayerSample {
        PlayerSample {
            owner: Pubkey::new_unique(),
            rod_level,
            unprocessed_fish,
        }
    }

    #[test]
    fn test_empty_scan() {
        let stats = compute_core_stats(&[]);
        assert_eq!(stats.players, 0);
        assert_eq!(stats.rod.samples, 0);
        assert_eq!(stats.rod.min, None);
        assert_eq!(stats.rod.median, None);
        assert_eq!(stats.unprocessed.total, 0);
        assert_eq!(stats.unprocessed.avg, 0);
        assert!(stats.top10.is_empty());
    }

    #[test]
    fn test_core_stats() {
        let players = vec![player(1, 10), player(3, 40), player(1, 5), player(2, 25)];
        let stats = compute_core_stats(&players);

        assert_eq!(stats.players, 4);
        assert_eq!(stats.rod.min, Some(1));
        assert_eq!(stats.rod.max, Some(3));
        assert_eq!(stats.rod.avg, Some(1.75));
        assert_eq!(stats.rod.median, Some(1.5));
        assert_eq!(stats.rod.counts_by_level.get(&1), Some(&2));
        assert_eq!(stats.rod.most_common(1), vec![(1, 2)]);

        assert_eq!(stats.unprocessed.total, 80);
        assert_eq!(stats.unprocessed.min, 5);
        assert_eq!(stats.unprocessed.max, 40);
        assert_eq!(stats.unprocessed.avg, 20);
        // sorted 5, 10, 25, 40 -> (10 + 25) / 2
        assert_eq!(stats.unprocessed.median, 17);

        let ranks: Vec<u64> = stats.top10.iter().map(|h| h.unprocessed).collect();
        assert_eq!(ranks, vec![40, 25, 10, 5]);
        assert_eq!(stats.top10[0].rank, 1);
        assert_eq!(stats.top10[0].rod_level, 3);
    }

    #[test]
    fn test_top10_truncates() {
        let players: Vec<PlayerSample> = (0..25).map(|i| player(1, i)).collect();
        let stats = compute_core_stats(&players);
        assert_eq!(stats.top10.len(), 10);
        assert_eq!(stats.top10[9].unprocessed, 15);
    }
}
