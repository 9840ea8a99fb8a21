//! ProcessFish payout split and the pro-rata fee share of unprocessed fish.

use serde::Serialize;

use crate::constants::PROCESS_PLAYER_SHARE_PERCENT;

/// Raw token amounts of one processing payout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessFishSplit {
    /// Minted to the player.
    pub net: u128,
    /// Amount processed before the fee.
    pub gross: u128,
    /// Kept back and shared among holders of unprocessed fish.
    pub fee: u128,
}

impl ProcessFishSplit {
    /// Rebuild the split from the player's balance delta. The player gets
    /// 90% of the gross, so `gross = ceil(net * 100 / 90)`.
    pub fn from_net(net: i128) -> Option<Self> {
        let net = u128::try_from(net).ok()?;
        let gross = (net.checked_mul(100)? + PROCESS_PLAYER_SHARE_PERCENT - 1)
            / PROCESS_PLAYER_SHARE_PERCENT;
        Some(Self {
            net,
            gross,
            fee: gross - net,
        })
    }
}

/// `fee * mine / total`, floored. `None` when nothing is unprocessed or the
/// product overflows.
pub fn yield_share(fee: u128, mine: u64, total: u64) -> Option<u128> {
    if total == 0 {
        return None;
    }
    Some(fee.checked_mul(mine as u128)? / total as u128)
}
