use fishing_sdk::SdkError;
use solana_client::client_error::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Decode error: {0}")]
    Decode(#[from] SdkError),
    #[error("RPC error: {0}")]
    Rpc(#[from] Box<ClientError>),
    #[error("{0} account not found")]
    AccountNotFound(&'static str),
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    #[error("Scan file error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ClientError> for WatcherError {
    fn from(e: ClientError) -> Self {
        WatcherError::Rpc(Box::new(e))
    }
}

impl WatcherError {
    /// RPC nodes abort large `getProgramAccounts` scans with one of these.
    pub fn is_scan_limit(&self) -> bool {
        match self {
            WatcherError::Rpc(e) => {
                let msg = e.to_string().to_lowercase();
                msg.contains("exceeded the limit") || msg.contains("scan aborted")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, WatcherError>;
