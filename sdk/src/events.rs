//! FishCaught event decoding and `Program data:` log parsing.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::BorshSerialize;
use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::constants::*;
use crate::error::Result;
use crate::reader::AccountReader;

// ── Rarity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythical,
    Legendary,
    Lunker,
    Unknown(u8),
}

impl Rarity {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Rarity::Common,
            1 => Rarity::Uncommon,
            2 => Rarity::Rare,
            3 => Rarity::Mythical,
            4 => Rarity::Legendary,
            5 => Rarity::Lunker,
            other => Rarity::Unknown(other),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Mythical => 3,
            Rarity::Legendary => 4,
            Rarity::Lunker => 5,
            Rarity::Unknown(i) => i,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match RARITY_NAMES.get(self.index() as usize) {
            Some(name) => f.write_str(name),
            None => write!(f, "Unknown({})", self.index()),
        }
    }
}

impl Serialize for Rarity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── FishCaught ──────────────────────────────────────────────────────────────

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FishCaughtEvent {
    pub player: Pubkey,
    pub rarity: Rarity,
    pub amount: u64,
    pub cast_count: u64,
    pub timestamp: i64,
}

/// Wire layout of the event body, used for encoding.
#[derive(BorshSerialize)]
struct FishCaughtBody {
    player: Pubkey,
    rarity: u8,
    amount: u64,
    cast_count: u64,
    timestamp: i64,
}

impl FishCaughtEvent {
    pub const LEN: usize = DISCRIMINATOR_LEN + 32 + 1 + 3 * 8;

    pub fn to_event_data(&self) -> Result<Vec<u8>> {
        let body = FishCaughtBody {
            player: self.player,
            rarity: self.rarity.index(),
            amount: self.amount,
            cast_count: self.cast_count,
            timestamp: self.timestamp,
        };
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&FISH_CAUGHT_DISCRIMINATOR);
        body.serialize(&mut data)?;
        Ok(data)
    }
}

/// Decode a FishCaught payload. The discriminator is skipped, not checked:
/// callers dispatch on it before getting here.
pub fn decode_fish_caught_event(data: &[u8]) -> Result<FishCaughtEvent> {
    let mut r = AccountReader::new(data);
    r.skip(DISCRIMINATOR_LEN)?;

    Ok(FishCaughtEvent {
        player: r.read_pubkey()?,
        rarity: Rarity::from_index(r.read_u8()?),
        amount: r.read_u64()?,
        cast_count: r.read_u64()?,
        timestamp: r.read_i64()?,
    })
}

// ── Log Parsing ─────────────────────────────────────────────────────────────

/// Base64 payload of a `Program data: <base64>` line, decoded.
/// Returns `None` for any other line.
pub fn program_data_payload(line: &str) -> Option<Result<Vec<u8>>> {
    let rest = line.strip_prefix(PROGRAM_DATA_PREFIX)?;
    // At least one whitespace char between the prefix and the payload
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let encoded = rest.trim();
    if encoded.is_empty() {
        return None;
    }
    Some(STANDARD.decode(encoded).map_err(Into::into))
}

/// All FishCaught events in a transaction's log messages, in log order.
///
/// Lines that are not `Program data:` or carry another event are skipped;
/// malformed payloads surface as errors in place.
pub fn fish_caught_events<S: AsRef<str>>(logs: &[S]) -> Vec<Result<FishCaughtEvent>> {
    logs.iter()
        .filter_map(|line| program_data_payload(line.as_ref()))
        .filter_map(|payload| match payload {
            Ok(raw) if raw.starts_with(&FISH_CAUGHT_DISCRIMINATOR) => {
                Some(decode_fish_caught_event(&raw))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}

pub fn is_process_fish<S: AsRef<str>>(logs: &[S]) -> bool {
    logs.iter()
        .any(|line| line.as_ref().contains(PROCESS_FISH_LOG_MARKER))
}
