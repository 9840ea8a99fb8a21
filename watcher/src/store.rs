//! Player scan snapshot on disk, so `stats` can run without touching the RPC.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fishing_sdk::stats::PlayerSample;
use fishing_sdk::state::{GlobalState, PlayerState};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::warn;

use crate::error::Result;

/// Raw amounts are strings so readers in any language keep full precision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanRow {
    pub owner: String,
    pub rod_level: u8,
    pub unprocessed_fish_raw: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanGlobal {
    pub total_unprocessed_fish_raw: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScan {
    /// Unix milliseconds.
    pub fetched_at: u64,
    pub rows: Vec<ScanRow>,
    pub global: Option<ScanGlobal>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl PlayerScan {
    pub fn from_scan(players: &[PlayerState], global: Option<&GlobalState>) -> Self {
        Self {
            fetched_at: now_ms(),
            rows: players
                .iter()
                .map(|p| ScanRow {
                    owner: p.owner.to_string(),
                    rod_level: p.rod_level,
                    unprocessed_fish_raw: p.unprocessed_fish.to_string(),
                })
                .collect(),
            global: global.map(|g| ScanGlobal {
                total_unprocessed_fish_raw: g.total_unprocessed_fish.to_string(),
            }),
        }
    }

    /// Rows with an unreadable owner or amount are dropped with a warning.
    pub fn samples(&self) -> Vec<PlayerSample> {
        self.rows
            .iter()
            .filter_map(|row| {
                let owner = Pubkey::from_str(&row.owner).ok();
                let unprocessed = row.unprocessed_fish_raw.parse::<u64>().ok();
                match (owner, unprocessed) {
                    (Some(owner), Some(unprocessed_fish)) => Some(PlayerSample {
                        owner,
                        rod_level: row.rod_level,
                        unprocessed_fish,
                    }),
                    _ => {
                        warn!(owner = %row.owner, "dropping unreadable scan row");
                        None
                    }
                }
            })
            .collect()
    }

    /// Whether the scan is younger than `ttl` at `now_ms`. A zero `ttl`
    /// never counts as fresh.
    pub fn is_fresh(&self, ttl: Duration, now_ms: u64) -> bool {
        !ttl.is_zero() && u128::from(now_ms.saturating_sub(self.fetched_at)) < ttl.as_millis()
    }

    pub fn total_unprocessed(&self) -> Option<u64> {
        self.global
            .as_ref()
            .and_then(|g| g.total_unprocessed_fish_raw.parse().ok())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// `Ok(None)` when no scan has been saved yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The saved scan when it is still within `ttl`, otherwise `None`.
    pub fn load_fresh(path: &Path, ttl: Duration) -> Result<Option<Self>> {
        if ttl.is_zero() {
            return Ok(None);
        }
        let now = now_ms();
        Ok(Self::load(path)?.filter(|scan| scan.is_fresh(ttl, now)))
    }

    pub fn clear(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
