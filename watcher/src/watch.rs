//! Polls the program's signatures and reports catches and processing payouts.

use fishing_sdk::constants::FISH_DECIMALS;
use fishing_sdk::events::fish_caught_events;
use fishing_sdk::format::{format_fish, format_token_amount, short_addr};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::health::SharedStatus;
use crate::process::{summarize_process_fish, ProcessOutcome};
use crate::source::{ChainSource, TxSummary};
use crate::yield_ctx::YieldContext;

/// Signatures requested per poll.
pub const SIGNATURE_PAGE: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub transactions: usize,
    pub fish_caught: usize,
    pub processed: usize,
}

/// Where the next poll resumes.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Cursor {
    /// No poll yet; the first one only records the newest signature.
    Unstarted,
    /// Started with no history, so everything seen next is new.
    Empty,
    At(String),
}

impl Cursor {
    fn signature(&self) -> Option<&str> {
        match self {
            Cursor::At(sig) => Some(sig),
            _ => None,
        }
    }
}

pub struct Watcher<S> {
    source: S,
    cursor: Cursor,
    yield_ctx: YieldContext,
    status: SharedStatus,
}

impl<S: ChainSource> Watcher<S> {
    pub fn new(source: S, yield_ctx: YieldContext, status: SharedStatus) -> Self {
        Self {
            source,
            cursor: Cursor::Unstarted,
            yield_ctx,
            status,
        }
    }

    #[cfg(test)]
    fn cursor(&self) -> Option<&str> {
        self.cursor.signature()
    }

    /// The first poll only records the newest signature; history before the
    /// watcher started is not replayed.
    pub fn poll_once(&mut self) -> Result<PollSummary> {
        let mut summary = PollSummary::default();

        if self.cursor == Cursor::Unstarted {
            let newest = self.source.signatures_since(None, 1)?;
            self.cursor = match newest.into_iter().next() {
                Some(s) => Cursor::At(s.signature),
                None => Cursor::Empty,
            };
            info!(cursor = ?self.cursor.signature(), "watching from the newest signature");
            self.record(&summary);
            return Ok(summary);
        }

        let until = self.cursor.signature().map(str::to_string);
        let sigs = self.source.signatures_since(until.as_deref(), SIGNATURE_PAGE)?;
        if sigs.len() == SIGNATURE_PAGE {
            warn!("{SIGNATURE_PAGE} new signatures in one poll, older ones may be missed");
        }

        for info in sigs.iter().rev() {
            if info.failed {
                debug!(signature = %info.signature, slot = info.slot, "skipping failed transaction");
                continue;
            }
            match self.source.transaction(&info.signature) {
                Ok(tx) => self.handle_transaction(&tx, &mut summary),
                Err(e) => warn!(signature = %info.signature, "transaction fetch failed: {e}"),
            }
            summary.transactions += 1;
        }

        if let Some(newest) = sigs.first() {
            self.cursor = Cursor::At(newest.signature.clone());
        }
        self.record(&summary);
        Ok(summary)
    }

    fn handle_transaction(&mut self, tx: &TxSummary, summary: &mut PollSummary) {
        if tx.failed {
            return;
        }

        for event in fish_caught_events(&tx.logs) {
            match event {
                Ok(ev) => {
                    summary.fish_caught += 1;
                    info!(
                        player = %short_addr(&ev.player.to_string()),
                        rarity = %ev.rarity,
                        amount = %format_fish(ev.amount as u128),
                        cast = ev.cast_count,
                        "[CATCH]"
                    );
                }
                Err(e) => warn!(signature = %tx.signature, "bad FishCaught payload: {e}"),
            }
        }

        match summarize_process_fish(tx) {
            Some(ProcessOutcome::Decoded(ev)) => {
                summary.processed += 1;
                let decimals = ev.decimals as u32;
                info!(
                    owner = %ev.owner.as_deref().map(short_addr).unwrap_or_default(),
                    net = %format_token_amount(ev.split.net, decimals, decimals),
                    gross = %format_token_amount(ev.split.gross, decimals, decimals),
                    fee = %format_token_amount(ev.split.fee, decimals, decimals),
                    signature = %ev.signature,
                    slot = tx.slot,
                    "[PROCESS]"
                );
                self.report_yield(ev.split.fee);
            }
            Some(ProcessOutcome::Undecoded { signature }) => {
                summary.processed += 1;
                warn!(%signature, "[PROCESS] payout not found in token balances");
            }
            None => {}
        }
    }

    fn report_yield(&mut self, fee: u128) {
        if self.yield_ctx.active_owner().is_none() {
            return;
        }
        if let Err(e) = self.yield_ctx.refresh(&self.source, false) {
            self.record_error(&e.to_string());
        }
        match self.yield_ctx.yield_from_fee(fee) {
            Some(mine) => info!(
                yield_fish = %format_token_amount(mine, FISH_DECIMALS, FISH_DECIMALS),
                "[YIELD]"
            ),
            None => debug!("no yield snapshot for the tracked owner"),
        }
    }

    fn record(&self, summary: &PollSummary) {
        if let Ok(mut status) = self.status.lock() {
            status.polls += 1;
            status.fish_caught += summary.fish_caught as u64;
            status.processed += summary.processed as u64;
            status.last_signature = self.cursor.signature().map(str::to_string);
        }
    }

    pub fn record_error(&self, error: &str) {
        if let Ok(mut status) = self.status.lock() {
            status.last_error = Some(error.to_string());
        }
    }
}
