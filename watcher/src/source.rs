//! The narrow view of the chain the watcher needs, and its JSON-RPC backing.

use std::str::FromStr;

use fishing_sdk::constants::PROGRAM_ID;
use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::{
    rpc_client::{GetConfirmedSignaturesForAddress2Config, RpcClient},
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcTransactionConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};
use solana_transaction_status::{
    option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
    EncodedTransaction, UiInstruction, UiMessage, UiParsedInstruction, UiTransactionEncoding,
    UiTransactionTokenBalance,
};

use crate::error::{Result, WatcherError};

// ── Plain Chain Types ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataSlice {
    pub offset: usize,
    pub length: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    pub failed: bool,
}

/// SPL token `mintTo`, outer or inner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintTo {
    pub account: String,
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBalance {
    pub account_index: usize,
    pub owner: Option<String>,
    pub amount: u128,
    pub decimals: u8,
}

/// What the watcher reads out of a confirmed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxSummary {
    pub signature: String,
    pub slot: u64,
    pub failed: bool,
    pub logs: Vec<String>,
    pub account_keys: Vec<String>,
    pub mints: Vec<MintTo>,
    pub pre_token_balances: Vec<TokenBalance>,
    pub post_token_balances: Vec<TokenBalance>,
}

// ── Source Trait ────────────────────────────────────────────────────────────

pub trait ChainSource {
    /// Raw data of one account, `None` if it does not exist.
    fn account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>>;

    fn multiple_account_data(&self, keys: &[Pubkey]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Program accounts matching every filter. With a `slice`, only that
    /// window of each account's data is returned.
    fn program_accounts(
        &self,
        filters: &[MemcmpFilter],
        slice: Option<DataSlice>,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    /// Program signatures newer than `until`, newest first.
    fn signatures_since(&self, until: Option<&str>, limit: usize) -> Result<Vec<SignatureInfo>>;

    fn transaction(&self, signature: &str) -> Result<TxSummary>;
}

// ── RPC Source ──────────────────────────────────────────────────────────────

pub struct RpcSource {
    client: RpcClient,
    program_id: Pubkey,
}

impl RpcSource {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
            program_id: PROGRAM_ID,
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

impl ChainSource for RpcSource {
    fn account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_account_with_commitment(key, self.client.commitment())?;
        Ok(response.value.map(|account| account.data))
    }

    fn multiple_account_data(&self, keys: &[Pubkey]) -> Result<Vec<Option<Vec<u8>>>> {
        let response = self
            .client
            .get_multiple_accounts_with_commitment(keys, self.client.commitment())?;
        Ok(response
            .value
            .into_iter()
            .map(|account| account.map(|a| a.data))
            .collect())
    }

    fn program_accounts(
        &self,
        filters: &[MemcmpFilter],
        slice: Option<DataSlice>,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(
                filters
                    .iter()
                    .map(|f| RpcFilterType::Memcmp(Memcmp::new_raw_bytes(f.offset, f.bytes.clone())))
                    .collect(),
            ),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: slice.map(|s| UiDataSliceConfig {
                    offset: s.offset,
                    length: s.length,
                }),
                commitment: Some(self.client.commitment()),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        let accounts = self
            .client
            .get_program_accounts_with_config(&self.program_id, config)?;
        Ok(accounts
            .into_iter()
            .map(|(key, account)| (key, account.data))
            .collect())
    }

    fn signatures_since(&self, until: Option<&str>, limit: usize) -> Result<Vec<SignatureInfo>> {
        let until = until
            .map(|s| Signature::from_str(s).map_err(|e| WatcherError::InvalidSignature(e.to_string())))
            .transpose()?;

        let sigs = self.client.get_signatures_for_address_with_config(
            &self.program_id,
            GetConfirmedSignaturesForAddress2Config {
                before: None,
                until,
                limit: Some(limit),
                commitment: Some(self.client.commitment()),
            },
        )?;

        Ok(sigs
            .into_iter()
            .map(|s| SignatureInfo {
                signature: s.signature,
                slot: s.slot,
                failed: s.err.is_some(),
            })
            .collect())
    }

    fn transaction(&self, signature: &str) -> Result<TxSummary> {
        let sig = Signature::from_str(signature)
            .map_err(|e| WatcherError::InvalidSignature(e.to_string()))?;

        let tx = self.client.get_transaction_with_config(
            &sig,
            RpcTransactionConfig {
                encoding: Some(UiTransactionEncoding::JsonParsed),
                commitment: Some(self.client.commitment()),
                max_supported_transaction_version: Some(0),
            },
        )?;

        Ok(summarize_transaction(signature, tx))
    }
}

// ── Transaction Summary ─────────────────────────────────────────────────────

fn present<T>(value: OptionSerializer<T>) -> Option<T> {
    match value {
        OptionSerializer::Some(v) => Some(v),
        _ => None,
    }
}

fn token_balances(balances: OptionSerializer<Vec<UiTransactionTokenBalance>>) -> Vec<TokenBalance> {
    present(balances)
        .unwrap_or_default()
        .into_iter()
        .map(|b| TokenBalance {
            account_index: b.account_index as usize,
            owner: present(b.owner),
            amount: b.ui_token_amount.amount.parse().unwrap_or(0),
            decimals: b.ui_token_amount.decimals,
        })
        .collect()
}

fn mint_to(ix: &UiInstruction) -> Option<MintTo> {
    let UiInstruction::Parsed(UiParsedInstruction::Parsed(parsed)) = ix else {
        return None;
    };
    if parsed.parsed.get("type")?.as_str()? != "mintTo" {
        return None;
    }
    let info = parsed.parsed.get("info")?;
    Some(MintTo {
        account: info.get("account")?.as_str()?.to_string(),
        amount: info.get("amount")?.as_str()?.parse().ok()?,
    })
}

fn summarize_transaction(signature: &str, tx: EncodedConfirmedTransactionWithStatusMeta) -> TxSummary {
    let mut summary = TxSummary {
        signature: signature.to_string(),
        slot: tx.slot,
        ..TxSummary::default()
    };

    let mut instructions: Vec<UiInstruction> = Vec::new();
    if let EncodedTransaction::Json(ui_tx) = tx.transaction.transaction {
        match ui_tx.message {
            UiMessage::Parsed(msg) => {
                summary.account_keys = msg.account_keys.into_iter().map(|k| k.pubkey).collect();
                instructions.extend(msg.instructions);
            }
            UiMessage::Raw(msg) => summary.account_keys = msg.account_keys,
        }
    }

    if let Some(meta) = tx.transaction.meta {
        summary.failed = meta.err.is_some();
        summary.logs = present(meta.log_messages).unwrap_or_default();
        for inner in present(meta.inner_instructions).unwrap_or_default() {
            instructions.extend(inner.instructions);
        }
        summary.pre_token_balances = token_balances(meta.pre_token_balances);
        summary.post_token_balances = token_balances(meta.post_token_balances);
    }

    summary.mints = instructions.iter().filter_map(mint_to).collect();
    summary
}

// ── In-Memory Source (tests) ────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use solana_client::client_error::{ClientError, ClientErrorKind};

    use super::*;

    /// Serves accounts and transactions from maps. `scan_limit` makes every
    /// unpartitioned program scan fail the way a busy RPC node does.
    #[derive(Default)]
    pub struct MemorySource {
        pub accounts: RefCell<HashMap<Pubkey, Vec<u8>>>,
        pub program_keys: Vec<Pubkey>,
        pub signatures: Vec<SignatureInfo>,
        pub transactions: HashMap<String, TxSummary>,
        pub scan_limit: bool,
        pub fail_accounts: Cell<bool>,
        pub program_scans: Cell<usize>,
    }

    impl MemorySource {
        pub fn insert_program_account(&mut self, key: Pubkey, data: Vec<u8>) {
            self.accounts.borrow_mut().insert(key, data);
            self.program_keys.push(key);
        }

        fn offline() -> WatcherError {
            ClientError::from(ClientErrorKind::Custom("connection refused".to_string())).into()
        }
    }

    impl ChainSource for MemorySource {
        fn account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>> {
            if self.fail_accounts.get() {
                return Err(Self::offline());
            }
            Ok(self.accounts.borrow().get(key).cloned())
        }

        fn multiple_account_data(&self, keys: &[Pubkey]) -> Result<Vec<Option<Vec<u8>>>> {
            keys.iter().map(|k| self.account_data(k)).collect()
        }

        fn program_accounts(
            &self,
            filters: &[MemcmpFilter],
            slice: Option<DataSlice>,
        ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
            self.program_scans.set(self.program_scans.get() + 1);
            if self.scan_limit && filters.len() < 2 {
                return Err(ClientError::from(ClientErrorKind::Custom(
                    "scan aborted: exceeded the limit of accumulated scan results".to_string(),
                ))
                .into());
            }

            let accounts = self.accounts.borrow();
            let mut out = Vec::new();
            for key in &self.program_keys {
                let data = &accounts[key];
                let matches = filters.iter().all(|f| {
                    data.get(f.offset..f.offset + f.bytes.len()) == Some(f.bytes.as_slice())
                });
                if !matches {
                    continue;
                }
                let window = match slice {
                    Some(s) => data
                        .get(s.offset..(s.offset + s.length).min(data.len()))
                        .unwrap_or_default()
                        .to_vec(),
                    None => data.clone(),
                };
                out.push((*key, window));
            }
            Ok(out)
        }

        fn signatures_since(&self, until: Option<&str>, limit: usize) -> Result<Vec<SignatureInfo>> {
            Ok(self
                .signatures
                .iter()
                .take_while(|s| Some(s.signature.as_str()) != until)
                .take(limit)
                .cloned()
                .collect())
        }

        fn transaction(&self, signature: &str) -> Result<TxSummary> {
            self.transactions
                .get(signature)
                .cloned()
                .ok_or_else(|| WatcherError::InvalidSignature(signature.to_string()))
        }
    }
}
