// # stockwatch - OVH availability watcher
//
// This binary is a thin integration layer. It is responsible for:
// 1. Loading a `.env` file if present, then reading the environment
// 2. Initializing tracing and the runtime
// 3. Wiring the OVH source, the Discord notifier and the file store
// 4. Running one check and mapping the outcome to an exit code
//
// It is meant to be scheduled externally (cron, systemd timer); each
// invocation performs exactly one check.
//
// ## Configuration
//
// - `DISCORD_WEBHOOK_URL`: Discord webhook (only needed when something changed)
// - `STOCKWATCH_PLANS`: Comma-separated `name=code` pairs (default `KS-A=24ska01`)
// - `STOCKWATCH_DATACENTERS`: Comma-separated datacenter ids, `*` for all (default `bhs`)
// - `STOCKWATCH_STATE_PATH`: State file (default `server_status.json`)
// - `STOCKWATCH_API_BASE`: OVH API base URL (default `https://ca.api.ovh.com`)
// - `STOCKWATCH_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// ## Example
//
// ```bash
// export DISCORD_WEBHOOK_URL=https://discord.com/api/webhooks/...
// export STOCKWATCH_PLANS=KS-A=24ska01,KS-LE-B=24skleb01
// export STOCKWATCH_DATACENTERS=bhs,gra
//
// stockwatch
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use stockwatch_core::config::{
    DEFAULT_API_BASE, DEFAULT_DATACENTERS, DEFAULT_PLANS, parse_datacenters,
};
use stockwatch_core::state::DEFAULT_STATE_PATH;
use stockwatch_core::{ChangeEngine, FileStatusStore, PlanSet, RunReport, WatchConfig};
use stockwatch_notify_discord::{DiscordNotifier, WEBHOOK_URL_ENV};
use stockwatch_provider_ovh::OvhInventorySource;

/// Exit codes for the possible outcomes of a run
///
/// - 0: Check completed
/// - 1: Configuration error
/// - 2: Runtime error (provider, transport, state file)
#[derive(Debug, Clone, Copy)]
enum WatchExitCode {
    /// Check completed (delivery failures included)
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<WatchExitCode> for ExitCode {
    fn from(code: WatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    watch: WatchConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from a variable lookup
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Unset or blank falls back to the default
        let var_or = |key: &str, default: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let plans: PlanSet = var_or("STOCKWATCH_PLANS", DEFAULT_PLANS)
            .parse()
            .context("Invalid STOCKWATCH_PLANS")?;

        let mut watch = WatchConfig::new(plans)
            .with_state_path(var_or("STOCKWATCH_STATE_PATH", DEFAULT_STATE_PATH));
        // Set but empty means "all datacenters", same as `*`
        let datacenters =
            var("STOCKWATCH_DATACENTERS").unwrap_or_else(|| DEFAULT_DATACENTERS.to_string());
        watch.datacenters = parse_datacenters(&datacenters);
        watch.api_base = var_or("STOCKWATCH_API_BASE", DEFAULT_API_BASE);
        watch.webhook_url = var(WEBHOOK_URL_ENV).filter(|url| !url.trim().is_empty());

        Ok(Self {
            watch,
            log_level: var_or("STOCKWATCH_LOG_LEVEL", "info"),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.watch.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "STOCKWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    // Secrets file is optional
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return WatchExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return WatchExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WatchExitCode::ConfigError.into();
    }

    if dotenv_loaded {
        info!("Loaded environment from .env");
    }
    info!(
        "Watching {} plan(s) in {}",
        config.watch.plans.len(),
        config
            .watch
            .datacenters
            .as_ref()
            .map_or_else(|| "all datacenters".to_string(), |dcs| dcs.join(", "))
    );
    if config.watch.webhook_url.is_none() {
        warn!("{} is not set; the run fails if anything changed", WEBHOOK_URL_ENV);
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WatchExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async move {
        match run_once(config.watch).await {
            Ok(report) => {
                info!(
                    "Check complete: {} record(s), {} change(s), {} delivered",
                    report.records_seen,
                    report.transitions.len(),
                    report.delivered()
                );
                WatchExitCode::Success
            }
            Err(e) if e.is_config() => {
                error!("Configuration error: {}", e);
                WatchExitCode::ConfigError
            }
            Err(e) => {
                error!("Check failed: {}", e);
                WatchExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire the components and run a single check
async fn run_once(watch: WatchConfig) -> stockwatch_core::Result<RunReport> {
    let engine = ChangeEngine::new(
        Box::new(OvhInventorySource::new(watch.api_base.as_str())),
        Box::new(DiscordNotifier::new(watch.webhook_url)),
        Box::new(FileStatusStore::new(&watch.state_path)),
    );

    engine
        .run(&watch.plans, watch.datacenters.as_deref())
        .await
}
