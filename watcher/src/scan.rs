//! Whole-program scans of PlayerState accounts.
//!
//! Large RPC nodes refuse an unbounded `getProgramAccounts`. When that
//! happens the scan is split into 256 partitions on the first byte of the
//! owner key and the results merged.

use std::collections::BTreeSet;

use fishing_sdk::constants::{PLAYER_OWNER_OFFSET, PLAYER_STATE_DISCRIMINATOR};
use fishing_sdk::state::PlayerState;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::source::{ChainSource, DataSlice, MemcmpFilter};

/// Accounts per `getMultipleAccounts` request.
pub const FETCH_BATCH: usize = 100;
/// Progress is reported once per this many keys.
pub const PROGRESS_CHUNK: usize = 250;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanProgress {
    pub done: usize,
    pub total: usize,
    pub ok: usize,
    pub skipped: usize,
}

#[derive(Clone, Debug, Default)]
pub struct PlayerScanResult {
    pub players: Vec<PlayerState>,
    pub ok: usize,
    pub skipped: usize,
}

fn discriminator_filter() -> MemcmpFilter {
    MemcmpFilter {
        offset: 0,
        bytes: PLAYER_STATE_DISCRIMINATOR.to_vec(),
    }
}

/// Every PlayerState account, returning only the window `slice` of each.
fn scan_players_sliced<S: ChainSource + ?Sized>(
    source: &S,
    slice: DataSlice,
) -> Result<Vec<(Pubkey, Vec<u8>)>> {
    match source.program_accounts(&[discriminator_filter()], Some(slice)) {
        Ok(accounts) => return Ok(accounts),
        Err(e) if e.is_scan_limit() => {
            warn!("full player scan refused ({e}), partitioning by owner byte");
        }
        Err(e) => return Err(e),
    }

    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for byte in 0..=u8::MAX {
        let filters = [
            discriminator_filter(),
            MemcmpFilter {
                offset: PLAYER_OWNER_OFFSET,
                bytes: vec![byte],
            },
        ];
        let part = source.program_accounts(&filters, Some(slice))?;
        debug!(partition = byte, accounts = part.len(), "partition scanned");
        for (key, data) in part {
            if seen.insert(key) {
                out.push((key, data));
            }
        }
    }
    Ok(out)
}

pub fn scan_player_account_keys<S: ChainSource + ?Sized>(source: &S) -> Result<Vec<Pubkey>> {
    let empty = DataSlice {
        offset: 0,
        length: 0,
    };
    Ok(scan_players_sliced(source, empty)?
        .into_iter()
        .map(|(key, _)| key)
        .collect())
}

/// Unique owners of every PlayerState, read from a 32-byte slice.
pub fn scan_player_owners<S: ChainSource + ?Sized>(source: &S) -> Result<Vec<Pubkey>> {
    let owner_slice = DataSlice {
        offset: PLAYER_OWNER_OFFSET,
        length: 32,
    };
    let mut owners = BTreeSet::new();
    for (key, data) in scan_players_sliced(source, owner_slice)? {
        match <[u8; 32]>::try_from(data.as_slice()) {
            Ok(bytes) => {
                owners.insert(Pubkey::new_from_array(bytes));
            }
            Err(_) => warn!(%key, len = data.len(), "owner slice has the wrong length"),
        }
    }
    Ok(owners.into_iter().collect())
}

/// Decodes every PlayerState. Accounts that vanish between the key scan and
/// the fetch, or fail to decode, are counted as skipped.
pub fn scan_player_states<S, F>(source: &S, mut on_progress: F) -> Result<PlayerScanResult>
where
    S: ChainSource + ?Sized,
    F: FnMut(ScanProgress),
{
    let keys = scan_player_account_keys(source)?;
    let total = keys.len();
    info!(total, "player accounts found");

    let mut result = PlayerScanResult::default();
    for chunk in keys.chunks(PROGRESS_CHUNK) {
        for batch in chunk.chunks(FETCH_BATCH) {
            let datas = source.multiple_account_data(batch)?;
            for (pda, data) in batch.iter().zip(datas) {
                let Some(data) = data else {
                    result.skipped += 1;
                    continue;
                };
                match PlayerState::try_from_account_data(&data) {
                    Ok(player) => {
                        result.ok += 1;
                        result.players.push(player);
                    }
                    Err(e) => {
                        warn!(%pda, "skipping player account: {e}");
                        result.skipped += 1;
                    }
                }
            }
        }
        on_progress(ScanProgress {
            done: result.ok + result.skipped,
            total,
            ok: result.ok,
            skipped: result.skipped,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fixtures::player;
    use crate::source::memory::MemorySource;

    fn owner_with_first_byte(b: u8) -> Pubkey {
        let mut bytes = Pubkey::new_unique().to_bytes();
        bytes[0] = b;
        Pubkey::new_from_array(bytes)
    }

    fn populated(n: u8, scan_limit: bool) -> MemorySource {
        let mut source = MemorySource {
            scan_limit,
            ..MemorySource::default()
        };
        for i in 0..n {
            let p = player(owner_with_first_byte(i.wrapping_mul(37)), 1 + i % 5, i as u64 * 10);
            source.insert_program_account(Pubkey::new_unique(), p.to_account_data().unwrap());
        }
        // Not a player: filtered out by the discriminator
        source.insert_program_account(Pubkey::new_unique(), vec![7u8; 152]);
        source
    }

    #[test]
    fn test_scan_decodes_all_players() {
        let source = populated(12, false);
        let mut reports = Vec::new();
        let result = scan_player_states(&source, |p| reports.push(p)).unwrap();

        assert_eq!(result.ok, 12);
        assert_eq!(result.skipped, 0);
        assert_eq!(source.program_scans.get(), 1);
        assert_eq!(reports.last().unwrap().done, 12);
        assert_eq!(reports.last().unwrap().total, 12);
    }

    #[test]
    fn test_scan_limit_falls_back_to_partitions() {
        let source = populated(20, true);
        let keys = scan_player_account_keys(&source).unwrap();
        assert_eq!(keys.len(), 20);
        // One refused scan, then one per owner byte
        assert_eq!(source.program_scans.get(), 257);

        let owners = scan_player_owners(&source).unwrap();
        assert_eq!(owners.len(), 20);
    }

    #[test]
    fn test_undecodable_account_is_skipped() {
        let mut source = populated(3, false);
        let mut broken = player(Pubkey::new_unique(), 1, 0).to_account_data().unwrap();
        broken.truncate(60);
        source.insert_program_account(Pubkey::new_unique(), broken);

        let result = scan_player_states(&source, |_| {}).unwrap();
        assert_eq!(result.ok, 3);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_progress_per_chunk() {
        let source = populated(255, false);
        let mut reports = Vec::new();
        scan_player_states(&source, |p| reports.push(p)).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].done, PROGRESS_CHUNK);
        assert_eq!(reports[1].done, 255);
    }
}
