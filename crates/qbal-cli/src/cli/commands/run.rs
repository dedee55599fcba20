//! `qbal run` – drive the rebalance loop against the configured Web UI.

use anyhow::{Context, Result};
use qbal_core::client::QbClient;
use qbal_core::config::QbalConfig;
use qbal_core::control::StopToken;
use qbal_core::scheduler::{run_loop, run_once, Rebalancer};
use std::time::Duration;

pub async fn run_rebalancer(cfg: &QbalConfig, once: bool) -> Result<()> {
    let client = QbClient::new(cfg)?;
    let client = tokio::task::spawn_blocking(move || -> Result<QbClient> {
        let mut client = client;
        client.login()?;
        Ok(client)
    })
    .await
    .context("login task join")??;

    let engine = Rebalancer::new(cfg);

    if once {
        let (_, _, outcome) = run_once(engine, client).await?;
        let summary = outcome.context("queue snapshot fetch failed")?;
        println!(
            "tick complete: {} item(s), full check: {}, stalled demoted: {}, decision: {:?}",
            summary.queue_len, summary.full_check, summary.stalled_demoted, summary.decision
        );
        return Ok(());
    }

    let stop = StopToken::new();
    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current tick");
            ctrl_c_stop.request_stop();
        }
    });

    tracing::info!(
        tick_secs = cfg.tick_interval_secs,
        full_check_secs = cfg.full_check_interval_secs,
        "rebalance loop starting"
    );
    run_loop(
        engine,
        client,
        Duration::from_secs(cfg.tick_interval_secs),
        stop,
    )
    .await
}
