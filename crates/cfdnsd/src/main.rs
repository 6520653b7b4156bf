// # cfdnsd - one-shot TXT record upsert
//
// Thin integration layer: reads configuration from the environment, builds
// the Cloudflare client, and upserts the `cfdns-test` TXT record with the
// current timestamp. All record logic lives in cfdns-core.
//
// ## Configuration
//
// - `CF_API_TOKEN`: Cloudflare API token
// - `CF_ZONE_ID`: Target zone ID
// - `CFDNS_API_BASE`: API base URL override (optional)
// - `CFDNS_HTTP_TIMEOUT_SECS`: Per-request timeout (default 30)
// - `CFDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export CF_API_TOKEN=your_token
// export CF_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
//
// cfdnsd
// ```
//
// Exits with a failure status if the upsert fails or is interrupted.

use anyhow::{Context, Result};
use cfdns_core::{TxtRecordUpserter, UpsertOutcome, UpserterConfig};
use cfdns_provider_cloudflare::CloudflareZoneApi;
use chrono::{DateTime, Local};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Name of the record this binary maintains
const RECORD_NAME: &str = "cfdns-test";

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match UpserterConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    if config.api_token.is_empty() || config.zone_id.is_empty() {
        warn!("CF_API_TOKEN or CF_ZONE_ID is empty; the API will reject the request");
    }

    // Remote calls run strictly one after another
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(config)) {
        Ok(outcome) => {
            info!("TXT record {} is up to date ({:?})", RECORD_NAME, outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Upsert failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Upsert the record once, cancelling on SIGINT/SIGTERM
async fn run(config: UpserterConfig) -> Result<UpsertOutcome> {
    let api = CloudflareZoneApi::from_config(&config).context("build Cloudflare client")?;
    let upserter = TxtRecordUpserter::new(Box::new(api), config.zone_id.clone());

    let value = record_value(Local::now());
    info!("Upserting TXT record {} in zone {}", RECORD_NAME, upserter.zone_id());

    upsert_until_shutdown(&upserter, &value, wait_for_shutdown()).await
}

/// Upsert `RECORD_NAME`, cancelling the in-flight call once `shutdown` resolves
///
/// A shutdown future that fails only logs; the upsert then runs to completion.
async fn upsert_until_shutdown<S>(
    upserter: &TxtRecordUpserter,
    value: &str,
    shutdown: S,
) -> Result<UpsertOutcome>
where
    S: Future<Output = Result<&'static str>>,
{
    let cancel = CancellationToken::new();
    let upsert = upserter.update_or_create(RECORD_NAME, value, &cancel);
    tokio::pin!(upsert);

    let result = tokio::select! {
        result = &mut upsert => result,
        signal = shutdown => {
            match signal {
                Ok(name) => {
                    warn!("Received {}, cancelling upsert", name);
                    cancel.cancel();
                }
                Err(e) => warn!("{}; upsert can no longer be interrupted", e),
            }
            upsert.await
        }
    };

    result.with_context(|| format!("upsert TXT record {}", RECORD_NAME))
}

/// TXT content written on each run
fn record_value(now: DateTime<Local>) -> String {
    now.to_rfc3339()
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
