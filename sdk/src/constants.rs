//! Fishing program ID, PDA seeds, account discriminators and economy tables.

use solana_program::pubkey::Pubkey;

// ── Program ID ──────────────────────────────────────────────────────────────

/// Fishing game program on Fogo mainnet.
pub const PROGRAM_ID: Pubkey =
    solana_program::pubkey!("SEAyjT1FUx3JyXJnWt5NtjELDwuU9XsoZeZVPVvweU4");

/// Public Fogo mainnet RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.fogo.io";

// ── PDA Seeds ───────────────────────────────────────────────────────────────

pub const GLOBAL_STATE_SEED: &[u8] = b"global-state";
pub const PLAYER_SEED: &[u8] = b"player";

// ── Discriminators (first 8 bytes, from the program IDL) ────────────────────

pub const DISCRIMINATOR_LEN: usize = 8;

pub const GLOBAL_STATE_DISCRIMINATOR: [u8; 8] = [163, 46, 74, 168, 216, 123, 133, 98];
pub const PLAYER_STATE_DISCRIMINATOR: [u8; 8] = [56, 3, 60, 86, 174, 16, 244, 195];
pub const FISH_CAUGHT_DISCRIMINATOR: [u8; 8] = [103, 248, 14, 11, 150, 185, 50, 179];

/// Byte offset of `PlayerState.owner`, used by memcmp scan filters.
pub const PLAYER_OWNER_OFFSET: usize = DISCRIMINATOR_LEN;

// ── Token ───────────────────────────────────────────────────────────────────

/// FISH mint decimals.
pub const FISH_DECIMALS: u32 = 6;

/// Raw units per FISH (10^6).
pub const RAW_PER_FISH: u64 = 1_000_000;

/// Basis-point denominator used by every probability table.
pub const BPS_DENOMINATOR: u32 = 10_000;

// ── Rod Power ───────────────────────────────────────────────────────────────

/// Rod power for levels 1..=10.
pub const ROD_POWERS_BASE: [u32; 10] = [100, 110, 121, 133, 146, 161, 177, 195, 214, 236];

/// Per-level growth above level 10.
pub const ROD_POWER_SCALE: f64 = 1.0294;

pub const MAX_ROD_POWER: u32 = 1_000;

// ── Catch Rate ──────────────────────────────────────────────────────────────

pub const BASE_CATCH_RATE_BPS: u32 = 1_430;

/// Bonus on top of the base rate, indexed by `level - 1`; the last entry
/// applies to every level past 10.
pub const CATCH_RATE_BONUSES_BPS: [u32; 10] = [0, 0, 0, 230, 230, 570, 570, 1_070, 1_070, 1_900];

// ── Emission & Rarity ───────────────────────────────────────────────────────

/// Raw emission per catch at difficulty 1 and rod power 1.
pub const BASE_EMISSION_RATE: u64 = 80_000_000;

/// Cumulative rarity thresholds in basis points. Must end at 10_000.
pub const RARITY_THRESHOLDS_BPS: [u32; 6] = [7_000, 9_000, 9_750, 9_950, 9_995, 10_000];

/// Reward multiplier per rarity tier, in tenths (10 = 1.0x).
pub const RARITY_MULTIPLIERS_TENTHS: [u32; 6] = [10, 30, 80, 250, 1_000, 5_000];

pub const RARITY_NAMES: [&str; 6] = ["Common", "Uncommon", "Rare", "Mythical", "Legendary", "Lunker"];

// ── Durability ──────────────────────────────────────────────────────────────

/// Below this share of max durability, regeneration drops to the slow rate.
pub const DURABILITY_FLOOR_PERCENT: u32 = 20;

/// Seconds per fast-regenerated cast (1/3 cast per second).
pub const FAST_REGEN_SECS_PER_CAST: u64 = 3;

/// Seconds per slow-regenerated cast (1/12 cast per second).
pub const SLOW_REGEN_SECS_PER_CAST: u64 = 12;

pub const SECONDS_PER_DAY: u64 = 86_400;

// ── Processing ──────────────────────────────────────────────────────────────

/// Share of a processed amount paid to the player, in percent. The rest is
/// the processing fee distributed to holders of unprocessed fish.
pub const PROCESS_PLAYER_SHARE_PERCENT: u128 = 90;

/// Log line emitted by the program for every ProcessFish instruction.
pub const PROCESS_FISH_LOG_MARKER: &str = "Instruction: ProcessFish";

/// Log prefix carrying base64 Anchor event payloads.
pub const PROGRAM_DATA_PREFIX: &str = "Program data:";
