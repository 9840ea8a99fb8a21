//! GlobalState / PlayerState account decoders and PDA helpers.
//!
//! Both accounts are Anchor accounts: an 8-byte discriminator followed by the
//! Borsh layout of the struct and a few reserved bytes. Decoding goes through
//! [`AccountReader`] field by field; encoding reuses the Borsh derive so the
//! two directions are checked against each other in tests.

use borsh::BorshSerialize;
use serde::Serialize;
use solana_program::pubkey::Pubkey;

use crate::constants::*;
use crate::error::{Result, SdkError};
use crate::reader::AccountReader;

// ── Account Kinds ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountKind {
    GlobalState,
    PlayerState,
    FishCaught,
}

impl AccountKind {
    pub const ALL: [AccountKind; 3] = [
        AccountKind::GlobalState,
        AccountKind::PlayerState,
        AccountKind::FishCaught,
    ];

    pub fn discriminator(self) -> &'static [u8; 8] {
        match self {
            AccountKind::GlobalState => &GLOBAL_STATE_DISCRIMINATOR,
            AccountKind::PlayerState => &PLAYER_STATE_DISCRIMINATOR,
            AccountKind::FishCaught => &FISH_CAUGHT_DISCRIMINATOR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AccountKind::GlobalState => "GlobalState",
            AccountKind::PlayerState => "PlayerState",
            AccountKind::FishCaught => "FishCaught",
        }
    }

    /// Identify a blob by its leading 8 bytes.
    pub fn from_discriminator(data: &[u8]) -> Option<AccountKind> {
        let disc = data.get(..DISCRIMINATOR_LEN)?;
        Self::ALL
            .into_iter()
            .find(|kind| kind.discriminator().as_slice() == disc)
    }
}

/// Fail unless `data` starts with the discriminator of `kind`.
pub fn check_discriminator(data: &[u8], kind: AccountKind) -> Result<()> {
    match data.get(..DISCRIMINATOR_LEN) {
        Some(disc) if disc == kind.discriminator().as_slice() => Ok(()),
        other => Err(SdkError::DiscriminatorMismatch {
            kind: kind.name(),
            found: other.unwrap_or(data).to_vec(),
        }),
    }
}

// ── GlobalState ─────────────────────────────────────────────────────────────

#[derive(BorshSerialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GlobalState {
    pub authority: Pubkey,
    pub fish_mint: Pubkey,
    pub fogo_mint: Pubkey,
    pub fogo_treasury: Pubkey,
    pub fish_burn_vault: Pubkey,
    pub current_difficulty: u64,
    pub total_network_power: u64,
    pub last_difficulty_adjustment: i64,
    pub base_emission_rate: u64,
    pub emission_decay_rate: u64,
    pub daily_target_emission: u64,
    pub total_fogo_collected: u128,
    pub total_fish_minted: u64,
    pub total_unprocessed_fish: u64,
    pub accumulated_processing_fees: u64,
    pub fees_per_unprocessed_fish: u128,
    pub bump: u8,
    pub halving_count: u8,
}

impl GlobalState {
    pub const RESERVED_LEN: usize = 6;
    /// 8 disc + 5 pubkeys + 9 x 8-byte ints + 2 x u128 + 2 bytes + reserved.
    pub const LEN: usize = DISCRIMINATOR_LEN + 5 * 32 + 9 * 8 + 2 * 16 + 2 + Self::RESERVED_LEN;

    pub fn try_from_account_data(data: &[u8]) -> Result<Self> {
        check_discriminator(data, AccountKind::GlobalState)?;

        let mut r = AccountReader::new(data);
        r.skip(DISCRIMINATOR_LEN)?;

        let state = Self {
            authority: r.read_pubkey()?,
            fish_mint: r.read_pubkey()?,
            fogo_mint: r.read_pubkey()?,
            fogo_treasury: r.read_pubkey()?,
            fish_burn_vault: r.read_pubkey()?,
            current_difficulty: r.read_u64()?,
            total_network_power: r.read_u64()?,
            last_difficulty_adjustment: r.read_i64()?,
            base_emission_rate: r.read_u64()?,
            emission_decay_rate: r.read_u64()?,
            daily_target_emission: r.read_u64()?,
            total_fogo_collected: r.read_u128()?,
            total_fish_minted: r.read_u64()?,
            total_unprocessed_fish: r.read_u64()?,
            accumulated_processing_fees: r.read_u64()?,
            fees_per_unprocessed_fish: r.read_u128()?,
            bump: r.read_u8()?,
            halving_count: r.read_u8()?,
        };
        r.skip(Self::RESERVED_LEN)?;

        Ok(state)
    }

    /// Discriminator + Borsh body + zeroed reserved bytes.
    pub fn to_account_data(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&GLOBAL_STATE_DISCRIMINATOR);
        BorshSerialize::serialize(self, &mut data)?;
        data.extend_from_slice(&[0u8; Self::RESERVED_LEN]);
        Ok(data)
    }

    /// Difficulty as the calculator takes it; zero reads as one.
    pub fn difficulty_for_calculator(&self) -> u64 {
        self.current_difficulty.max(1)
    }
}

// ── PlayerState ─────────────────────────────────────────────────────────────

#[derive(BorshSerialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub owner: Pubkey,
    pub rod_level: u8,
    pub boat_tier: u8,
    pub bump: u8,
    pub cast_count: u64,
    pub fish_caught_all_time: u64,
    pub power: u64,
    pub max_durability: u32,
    pub current_durability: u32,
    pub supercast_remaining_casts: u32,
    pub last_durability_ts: i64,
    pub unprocessed_fish: u64,
    pub last_claim_fees_snapshot: u128,
    pub last_recorded_unprocessed: u64,
    pub upgrade_in_progress: bool,
    pub upgrade_target_level: u8,
    pub upgrade_casts_at_start: u64,
    pub last_ata_creation_slot: u64,
    pub last_cast_slot: u64,
    pub ata_subsidy_claimed: bool,
    pub is_honeypot: bool,
    pub first_process_fee_paid: bool,
}

impl PlayerState {
    pub const RESERVED_LEN: usize = 4;
    pub const LEN: usize = DISCRIMINATOR_LEN
        + 32 // owner
        + 3 // rod_level, boat_tier, bump
        + 3 * 8 // cast_count, fish_caught_all_time, power
        + 3 * 4 // durability, supercast
        + 8 // last_durability_ts
        + 8 // unprocessed_fish
        + 16 // last_claim_fees_snapshot
        + 8 // last_recorded_unprocessed
        + 2 // upgrade_in_progress, upgrade_target_level
        + 3 * 8 // upgrade_casts_at_start, last_ata_creation_slot, last_cast_slot
        + 3 // flags
        + Self::RESERVED_LEN;

    pub fn try_from_account_data(data: &[u8]) -> Result<Self> {
        check_discriminator(data, AccountKind::PlayerState)?;

        let mut r = AccountReader::new(data);
        r.skip(DISCRIMINATOR_LEN)?;

        let state = Self {
            owner: r.read_pubkey()?,
            rod_level: r.read_u8()?,
            boat_tier: r.read_u8()?,
            bump: r.read_u8()?,
            cast_count: r.read_u64()?,
            fish_caught_all_time: r.read_u64()?,
            power: r.read_u64()?,
            max_durability: r.read_u32()?,
            current_durability: r.read_u32()?,
            supercast_remaining_casts: r.read_u32()?,
            last_durability_ts: r.read_i64()?,
            unprocessed_fish: r.read_u64()?,
            last_claim_fees_snapshot: r.read_u128()?,
            last_recorded_unprocessed: r.read_u64()?,
            upgrade_in_progress: r.read_bool()?,
            upgrade_target_level: r.read_u8()?,
            upgrade_casts_at_start: r.read_u64()?,
            last_ata_creation_slot: r.read_u64()?,
            last_cast_slot: r.read_u64()?,
            ata_subsidy_claimed: r.read_bool()?,
            is_honeypot: r.read_bool()?,
            first_process_fee_paid: r.read_bool()?,
        };
        r.skip(Self::RESERVED_LEN)?;

        Ok(state)
    }

    pub fn to_account_data(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&PLAYER_STATE_DISCRIMINATOR);
        BorshSerialize::serialize(self, &mut data)?;
        data.extend_from_slice(&[0u8; Self::RESERVED_LEN]);
        Ok(data)
    }
}

// ── Dispatch ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedAccount {
    Global(GlobalState),
    Player(PlayerState),
}

/// Decode a program account of either kind, dispatching on its discriminator.
pub fn decode_account(data: &[u8]) -> Result<DecodedAccount> {
    match AccountKind::from_discriminator(data) {
        Some(AccountKind::GlobalState) => {
            GlobalState::try_from_account_data(data).map(DecodedAccount::Global)
        }
        Some(AccountKind::PlayerState) => {
            PlayerState::try_from_account_data(data).map(DecodedAccount::Player)
        }
        _ => Err(SdkError::UnknownDiscriminator(
            data.iter().take(DISCRIMINATOR_LEN).copied().collect(),
        )),
    }
}

// ── PDA Helpers ─────────────────────────────────────────────────────────────

pub fn find_global_state() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GLOBAL_STATE_SEED], &PROGRAM_ID)
}

pub fn find_player_state(owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PLAYER_SEED, owner.as_ref()], &PROGRAM_ID)
}
