//! The tracked player's share of ProcessFish fees.

use std::time::{Duration, Instant};

use fishing_sdk::processing::yield_share;
use fishing_sdk::state::{GlobalState, PlayerState};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::error::Result;
use crate::fetch::{fetch_global_state, fetch_player_state};
use crate::source::ChainSource;

pub struct YieldContext {
    active_owner: Option<Pubkey>,
    player: Option<PlayerState>,
    global: Option<GlobalState>,
    last_refresh: Option<Instant>,
    min_refresh: Duration,
}

impl YieldContext {
    pub fn new(active_owner: Option<Pubkey>, min_refresh: Duration) -> Self {
        Self {
            active_owner,
            player: None,
            global: None,
            last_refresh: None,
            min_refresh,
        }
    }

    pub fn active_owner(&self) -> Option<&Pubkey> {
        self.active_owner.as_ref()
    }

    #[cfg(test)]
    fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    #[cfg(test)]
    fn global(&self) -> Option<&GlobalState> {
        self.global.as_ref()
    }

    /// Switching owner drops the old player's snapshots.
    #[cfg(test)]
    fn set_owner(&mut self, owner: Pubkey) {
        if self.active_owner != Some(owner) {
            self.active_owner = Some(owner);
            self.player = None;
            self.global = None;
            self.last_refresh = None;
        }
    }

    #[cfg(test)]
    fn clear_owner(&mut self) {
        self.active_owner = None;
        self.player = None;
        self.global = None;
        self.last_refresh = None;
    }

    /// Re-reads the owner's PlayerState and the GlobalState. Returns whether a
    /// fetch happened; calls inside `min_refresh` are skipped unless `force`.
    /// On failure the previous snapshots stay in place.
    pub fn refresh<S: ChainSource + ?Sized>(&mut self, source: &S, force: bool) -> Result<bool> {
        let Some(owner) = self.active_owner else {
            return Ok(false);
        };
        if !force {
            if let Some(at) = self.last_refresh {
                if at.elapsed() < self.min_refresh {
                    return Ok(false);
                }
            }
        }

        let fetched = fetch_player_state(source, &owner)
            .and_then(|player| Ok((player, fetch_global_state(source)?)));
        match fetched {
            Ok((player, global)) => {
                debug!(%owner, has_player = player.is_some(), "yield context refreshed");
                self.player = player;
                self.global = Some(global);
                self.last_refresh = Some(Instant::now());
                Ok(true)
            }
            Err(e) => {
                warn!(%owner, "yield context refresh failed, keeping last snapshot: {e}");
                Err(e)
            }
        }
    }

    /// Raw FISH the tracked player earns from a processing fee, pro rata to
    /// their unprocessed balance.
    pub fn yield_from_fee(&self, fee: u128) -> Option<u128> {
        let player = self.player.as_ref()?;
        let global = self.global.as_ref()?;
        yield_share(fee, player.unprocessed_fish, global.total_unprocessed_fish)
    }
}
