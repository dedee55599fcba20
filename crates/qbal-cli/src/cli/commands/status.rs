//! `qbal status` – one-shot snapshot of the active queue.

use anyhow::{Context, Result};
use qbal_core::client::{QbClient, QueueClient};
use qbal_core::config::QbalConfig;
use qbal_core::format::format_speed;
use qbal_core::queue::ActiveQueue;

pub async fn run_status(cfg: &QbalConfig) -> Result<()> {
    let client = QbClient::new(cfg)?;
    let queue = tokio::task::spawn_blocking(move || -> Result<ActiveQueue> {
        let mut client = client;
        client.login()?;
        let items = client.list_eligible_items()?;
        Ok(ActiveQueue::new(items))
    })
    .await
    .context("status task join")??;

    if queue.is_empty() {
        println!("No eligible items in the queue.");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<12} {}", "SLOT", "STATE", "SPEED", "NAME");
    for (idx, item) in queue.iter().enumerate() {
        println!(
            "{:<6} {:<12} {:<12} {}",
            idx + 1,
            format!("{:?}", item.state).to_lowercase(),
            format_speed(item.dlspeed as f64),
            item.name
        );
    }
    Ok(())
}
