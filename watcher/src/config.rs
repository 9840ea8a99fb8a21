use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use fishing_sdk::constants::DEFAULT_RPC_URL;
use solana_sdk::pubkey::Pubkey;

/// Connection and polling settings shared by every subcommand. Each flag can
/// also be set through the environment variable named next to it.
#[derive(Args, Debug, Clone)]
pub struct WatcherConfig {
    /// JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC_URL, global = true)]
    pub rpc_url: String,

    /// Player wallet to track as "me"
    #[arg(long, env = "OWNER", global = true)]
    pub owner: Option<Pubkey>,

    /// Delay between polls of the program's transactions
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2_000, global = true)]
    pub poll_interval_ms: u64,

    /// Health check port for `watch`
    #[arg(long, env = "HEALTH_PORT", default_value_t = 9_090, global = true)]
    pub health_port: u16,

    /// Where `scan` writes and `stats` reads the player snapshot
    #[arg(long, env = "SCAN_FILE", default_value = "player_scan.json", global = true)]
    pub scan_file: PathBuf,

    /// `scan` keeps the saved scan file if it is younger than this (0 always rescans)
    #[arg(long, env = "SCAN_CACHE_MS", default_value_t = 0, global = true)]
    pub scan_cache_ms: u64,

    /// Minimum delay between refreshes of the tracked player's accounts
    #[arg(long, env = "MIN_REFRESH_MS", default_value_t = 10_000, global = true)]
    pub min_refresh_ms: u64,
}

impl WatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn scan_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.scan_cache_ms)
    }

    pub fn min_refresh(&self) -> Duration {
        Duration::from_millis(self.min_refresh_ms)
    }
}
