//! Fogo Fishing chain watcher.
//!
//! Reads the fishing program's accounts and transaction logs over JSON-RPC:
//! - `calc`: fish-per-cast and 24h durability projection for a rod level
//! - `snapshot`: GlobalState and the tracked player's PlayerState
//! - `scan`: every PlayerState, saved to the scan file
//! - `stats`: aggregate statistics over the saved scan
//! - `watch`: live FishCaught and ProcessFish feed with a health endpoint

mod config;
mod error;
mod fetch;
mod health;
mod process;
mod scan;
mod source;
mod store;
mod watch;
mod yield_ctx;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use clap::{Parser, Subcommand};
use fishing_sdk::durability::DurabilityProjection;
use fishing_sdk::economy::{fish_per_cast_curve, CastEstimate};
use fishing_sdk::format::{format_fish, format_percent_of, group_thousands, short_addr};
use fishing_sdk::stats::compute_core_stats;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::WatcherConfig;
use crate::error::Result;
use crate::fetch::load_chain_state;
use crate::health::{bind_health, start_health_server, SharedStatus, WatcherStatus};
use crate::source::RpcSource;
use crate::store::PlayerScan;
use crate::watch::Watcher;
use crate::yield_ctx::YieldContext;

#[derive(Parser)]
#[command(name = "fishing-watcher")]
#[command(version = "0.1.0")]
#[command(about = "Fogo Fishing chain watcher", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: WatcherConfig,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fish per cast and 24h projection for a rod level
    Calc {
        /// Rod level (1 or more)
        #[arg(short, long)]
        level: u32,

        /// Network difficulty; read from GlobalState when omitted
        #[arg(short, long)]
        difficulty: Option<u64>,

        /// Current rod durability
        #[arg(long, requires = "max_durability")]
        durability: Option<u32>,

        /// Maximum rod durability
        #[arg(long)]
        max_durability: Option<u32>,

        /// Also print the curve for levels 1..=N
        #[arg(long)]
        curve: Option<u32>,
    },

    /// Print GlobalState and the tracked player's PlayerState as JSON
    Snapshot,

    /// Decode every PlayerState and save the scan file
    Scan {
        /// Only count unique owners, do not decode or save
        #[arg(long)]
        owners_only: bool,
    },

    /// Statistics over the saved scan file
    Stats {
        /// Delete the scan file instead
        #[arg(long)]
        clear: bool,
    },

    /// Follow FishCaught and ProcessFish events
    Watch,
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────────

fn run_calc(
    config: &WatcherConfig,
    level: u32,
    difficulty: Option<u64>,
    durability: Option<u32>,
    max_durability: Option<u32>,
    curve: Option<u32>,
) -> Result<()> {
    let difficulty = match difficulty {
        Some(d) => d,
        None => {
            let source = RpcSource::new(&config.rpc_url);
            let state = load_chain_state(&source, None)?;
            info!(difficulty = state.difficulty, "difficulty read from GlobalState");
            state.difficulty
        }
    };

    let est = CastEstimate::new(level, difficulty)?;
    println!("=== Rod level {} ===", est.level);
    println!("Difficulty:      {}", group_thousands(&est.difficulty.to_string()));
    println!("Rod power:       {}", est.rod_power);
    println!("Catch chance:    {:.2}%", est.catch_chance * 100.0);
    println!("Avg multiplier:  {:.1}x", est.multiplier_tenths as f64 / 10.0);
    println!("Fish per cast:   {:.6}", est.fish_per_cast);

    if let Some(max) = max_durability {
        let current = durability.unwrap_or(max);
        let p = DurabilityProjection::project(current, max, est.fish_per_cast);
        println!();
        println!("Durability:      {}/{} (floor {})", current.min(max), max, p.floor);
        println!(
            "Stay above:      {} casts, {:.2} FISH/day",
            group_thousands(&p.stay_above_casts.to_string()),
            p.stay_above_fish
        );
        println!(
            "Let it drop:     {} casts, {:.2} FISH/day",
            group_thousands(&p.let_drop_casts.to_string()),
            p.let_drop_fish
        );
        println!("Best:            {:.2} FISH/day", p.best_daily_fish());
    }

    if let Some(max_level) = curve {
        println!();
        for (lvl, fish) in fish_per_cast_curve(max_level, difficulty)? {
            println!("  L{lvl:<4} {fish:.6}");
        }
    }
    Ok(())
}

fn run_snapshot(config: &WatcherConfig) -> Result<()> {
    let source = RpcSource::new(&config.rpc_url);
    let state = load_chain_state(&source, config.owner.as_ref())?;
    if config.owner.is_some() && state.player.is_none() {
        warn!("tracked owner has no PlayerState yet");
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn run_scan(config: &WatcherConfig, owners_only: bool) -> Result<()> {
    let source = RpcSource::new(&config.rpc_url);
    info!(rpc = %source.url(), "scanning player accounts");

    if owners_only {
        let owners = scan::scan_player_owners(&source)?;
        println!("Unique owners: {}", group_thousands(&owners.len().to_string()));
        return Ok(());
    }

    if let Some(saved) = PlayerScan::load_fresh(&config.scan_file, config.scan_cache_ttl())? {
        info!(
            players = saved.rows.len(),
            fetched_at = saved.fetched_at,
            file = %config.scan_file.display(),
            "[SCAN] saved scan is still fresh, not rescanning"
        );
        return Ok(());
    }

    let scanned = scan::scan_player_states(&source, |p| {
        info!(done = p.done, total = p.total, ok = p.ok, skipped = p.skipped, "[SCAN]");
    })?;
    let global = fetch::fetch_global_state(&source)?;

    let scan = PlayerScan::from_scan(&scanned.players, Some(&global));
    scan.save(&config.scan_file)?;
    info!(
        ok = scanned.ok,
        skipped = scanned.skipped,
        file = %config.scan_file.display(),
        "scan saved"
    );
    Ok(())
}

fn run_stats(config: &WatcherConfig, clear: bool) -> Result<()> {
    if clear {
        PlayerScan::clear(&config.scan_file)?;
        info!(file = %config.scan_file.display(), "scan file cleared");
        return Ok(());
    }

    let Some(scan) = PlayerScan::load(&config.scan_file)? else {
        warn!(file = %config.scan_file.display(), "no saved scan, run `scan` first");
        return Ok(());
    };

    let samples = scan.samples();
    let stats = compute_core_stats(&samples);
    let total = scan.total_unprocessed().map(u128::from).unwrap_or(stats.unprocessed.total);

    println!("=== Player scan ({} players) ===", group_thousands(&stats.players.to_string()));
    if let (Some(min), Some(max), Some(avg), Some(median)) =
        (stats.rod.min, stats.rod.max, stats.rod.avg, stats.rod.median)
    {
        println!("Rod level:       min {min}  max {max}  avg {avg:.2}  median {median}");
    }
    for (level, count) in stats.rod.most_common(5) {
        println!("  L{level:<4} {}", group_thousands(&count.to_string()));
    }
    println!("Unprocessed:     {} FISH", format_fish(stats.unprocessed.total));
    println!(
        "  min {}  max {}  avg {}  median {}",
        format_fish(stats.unprocessed.min as u128),
        format_fish(stats.unprocessed.max as u128),
        format_fish(stats.unprocessed.avg as u128),
        format_fish(stats.unprocessed.median as u128),
    );
    println!();
    println!("Top holders:");
    for holder in &stats.top10 {
        let share = format_percent_of(holder.unprocessed as u128, total, 2).unwrap_or_default();
        println!(
            "  {:>2}. {}  L{:<3} {:>20} FISH  {}",
            holder.rank,
            short_addr(&holder.owner.to_string()),
            holder.rod_level,
            format_fish(holder.unprocessed as u128),
            share
        );
    }
    Ok(())
}

fn run_watch(config: &WatcherConfig) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let status: SharedStatus = Arc::new(Mutex::new(WatcherStatus::default()));

    let source = RpcSource::new(&config.rpc_url);
    info!(
        rpc = %source.url(),
        owner = ?config.owner,
        poll_ms = config.poll_interval_ms,
        health_port = config.health_port,
        "starting watcher"
    );

    match bind_health(config.health_port) {
        Ok(listener) => {
            start_health_server(listener, status.clone(), running.clone());
        }
        Err(e) => warn!(port = config.health_port, "health endpoint disabled: {e}"),
    }

    let mut yield_ctx = YieldContext::new(config.owner, config.min_refresh());
    if let Err(e) = yield_ctx.refresh(&source, true) {
        warn!("initial yield snapshot failed: {e}");
    }

    let mut watcher = Watcher::new(source, yield_ctx, status);
    while running.load(Ordering::Relaxed) {
        match watcher.poll_once() {
            Ok(summary) if summary.transactions > 0 => info!(
                transactions = summary.transactions,
                caught = summary.fish_caught,
                processed = summary.processed,
                "[POLL]"
            ),
            Ok(_) => {}
            Err(e) => {
                error!("[POLL] {e}");
                watcher.record_error(&e.to_string());
            }
        }
        thread::sleep(config.poll_interval());
    }
    Ok(())
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Calc {
            level,
            difficulty,
            durability,
            max_durability,
            curve,
        } => run_calc(&cli.config, level, difficulty, durability, max_durability, curve),
        Commands::Snapshot => run_snapshot(&cli.config),
        Commands::Scan { owners_only } => run_scan(&cli.config, owners_only),
        Commands::Stats { clear } => run_stats(&cli.config, clear),
        Commands::Watch => run_watch(&cli.config),
    };

    if let Err(e) = result {
        error!(rpc = %cli.config.rpc_url, "{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calc_with_global_flags() {
        let cli = Cli::try_parse_from([
            "fishing-watcher",
            "calc",
            "--level",
            "12",
            "--difficulty",
            "1000",
            "--poll-interval-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(cli.config.poll_interval_ms, 500);
        match cli.command {
            Commands::Calc { level, difficulty, .. } => {
                assert_eq!(level, 12);
                assert_eq!(difficulty, Some(1_000));
            }
            _ => panic!("expected calc"),
        }
    }

    #[test]
    fn test_durability_requires_max() {
        assert!(Cli::try_parse_from(["fishing-watcher", "calc", "-l", "3", "--durability", "50"]).is_err());
    }
}
