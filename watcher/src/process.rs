//! Reconstructs a ProcessFish payout from the transaction's token balances.

use fishing_sdk::events::is_process_fish;
use fishing_sdk::processing::ProcessFishSplit;

use crate::source::{TokenBalance, TxSummary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessFishEvent {
    pub signature: String,
    /// Token account owner of the mint destination, when the RPC reports it.
    pub owner: Option<String>,
    pub decimals: u8,
    pub split: ProcessFishSplit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Decoded(ProcessFishEvent),
    /// A ProcessFish ran but the payout could not be located.
    Undecoded { signature: String },
}

fn balance_at(balances: &[TokenBalance], index: usize) -> Option<&TokenBalance> {
    balances.iter().find(|b| b.account_index == index)
}

/// `None` for failed transactions and anything that is not a ProcessFish.
pub fn summarize_process_fish(tx: &TxSummary) -> Option<ProcessOutcome> {
    if tx.failed || !is_process_fish(&tx.logs) {
        return None;
    }
    let undecoded = || ProcessOutcome::Undecoded {
        signature: tx.signature.clone(),
    };

    let Some(mint) = tx.mints.iter().max_by_key(|m| m.amount) else {
        return Some(undecoded());
    };
    let Some(index) = tx.account_keys.iter().position(|k| *k == mint.account) else {
        return Some(undecoded());
    };

    let pre = balance_at(&tx.pre_token_balances, index);
    let post = balance_at(&tx.post_token_balances, index);
    let Some(reference) = post.or(pre) else {
        return Some(undecoded());
    };

    let net = post.map_or(0, |b| b.amount as i128) - pre.map_or(0, |b| b.amount as i128);
    let Some(split) = ProcessFishSplit::from_net(net) else {
        return Some(undecoded());
    };

    Some(ProcessOutcome::Decoded(ProcessFishEvent {
        signature: tx.signature.clone(),
        owner: post.and_then(|b| b.owner.clone()).or_else(|| pre.and_then(|b| b.owner.clone())),
        decimals: reference.decimals,
        split,
    }))
}
