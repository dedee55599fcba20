//! Async driver for the rebalance loop: real timing and cooperative stop.

use anyhow::{Context, Result};
use std::time::Duration;

use super::{Rebalancer, TickSummary};
use crate::client::QueueClient;
use crate::control::StopToken;
use crate::error::TransportError;

/// Runs the rebalance loop until `stop` is requested.
///
/// Each tick executes on the blocking pool (the queue client is synchronous
/// curl work); the stop token is checked only between ticks, so a request
/// arriving mid-tick takes effect after that tick's mutations are applied.
/// A failed snapshot fetch is logged and costs only that tick.
pub async fn run_loop<C>(
    mut engine: Rebalancer,
    mut client: C,
    tick_interval: Duration,
    stop: StopToken,
) -> Result<()>
where
    C: QueueClient + Send + 'static,
{
    loop {
        if stop.is_stopped() {
            tracing::info!("stop requested, exiting rebalance loop");
            return Ok(());
        }

        let (eng, cl, outcome) = run_once(engine, client).await?;
        engine = eng;
        client = cl;
        match outcome {
            Ok(summary) => log_tick(&summary),
            Err(e) => tracing::warn!(error = %e, "tick aborted: could not fetch queue snapshot"),
        }

        tokio::time::sleep(tick_interval).await;
    }
}

/// Executes exactly one tick on the blocking pool, handing the engine and
/// client back to the caller. Used by the loop above and by `--once` mode.
pub async fn run_once<C>(
    mut engine: Rebalancer,
    mut client: C,
) -> Result<(Rebalancer, C, Result<TickSummary, TransportError>)>
where
    C: QueueClient + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let outcome = engine.tick(&mut client);
        (engine, client, outcome)
    })
    .await
    .context("tick task join")
}

fn log_tick(summary: &TickSummary) {
    tracing::info!(
        queue_len = summary.queue_len,
        full_check = summary.full_check,
        stalled_demoted = summary.stalled_demoted,
        decision = ?summary.decision,
        "tick complete"
    );
}
