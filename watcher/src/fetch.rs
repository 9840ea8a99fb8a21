use fishing_sdk::state::{find_global_state, find_player_state, GlobalState, PlayerState};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::{Result, WatcherError};
use crate::source::ChainSource;

pub fn fetch_global_state<S: ChainSource + ?Sized>(source: &S) -> Result<GlobalState> {
    let (pda, _) = find_global_state();
    let data = source
        .account_data(&pda)?
        .ok_or(WatcherError::AccountNotFound("GlobalState"))?;
    Ok(GlobalState::try_from_account_data(&data)?)
}

/// `None` when the owner has never cast.
pub fn fetch_player_state<S: ChainSource + ?Sized>(
    source: &S,
    owner: &Pubkey,
) -> Result<Option<PlayerState>> {
    let (pda, _) = find_player_state(owner);
    match source.account_data(&pda)? {
        Some(data) => Ok(Some(PlayerState::try_from_account_data(&data)?)),
        None => Ok(None),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ChainState {
    pub global: GlobalState,
    pub player: Option<PlayerState>,
    pub difficulty: u64,
}

pub fn load_chain_state<S: ChainSource + ?Sized>(
    source: &S,
    owner: Option<&Pubkey>,
) -> Result<ChainState> {
    let global = fetch_global_state(source)?;
    let player = match owner {
        Some(owner) => fetch_player_state(source, owner)?,
        None => None,
    };
    Ok(ChainState {
        difficulty: global.difficulty_for_calculator(),
        global,
        player,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::source::memory::MemorySource;

    #[test]
    fn test_missing_global_state() {
        let source = MemorySource::default();
        assert!(matches!(
            fetch_global_state(&source),
            Err(WatcherError::AccountNotFound("GlobalState"))
        ));
    }

    #[test]
    fn test_load_chain_state() {
        let source = MemorySource::default();
        let owner = Pubkey::new_unique();
        let g = global(1_000, 0);
        let p = player(owner, 4, 250);
        {
            let mut accounts = source.accounts.borrow_mut();
            accounts.insert(find_global_state().0, g.to_account_data().unwrap());
            accounts.insert(find_player_state(&owner).0, p.to_account_data().unwrap());
        }

        let state = load_chain_state(&source, Some(&owner)).unwrap();
        assert_eq!(state.global, g);
        assert_eq!(state.player, Some(p));
        assert_eq!(state.difficulty, 1);

        let stranger = Pubkey::new_unique();
        assert_eq!(load_chain_state(&source, Some(&stranger)).unwrap().player, None);
        assert_eq!(load_chain_state(&source, None).unwrap().player, None);
    }

    #[test]
    fn test_corrupt_player_is_a_decode_error() {
        let source = MemorySource::default();
        let owner = Pubkey::new_unique();
        source
            .accounts
            .borrow_mut()
            .insert(find_player_state(&owner).0, vec![0u8; 40]);
        assert!(matches!(
            fetch_player_state(&source, &owner),
            Err(WatcherError::Decode(_))
        ));
    }
}
