//! Full-window stall check: demote monitored slots with zero sustained
//! throughput.
//!
//! Monitoring is anchored to queue position, not item identity, on purpose:
//! after a demotion the item that rotates into the freed slot is the next
//! one observed, so repeated sweeps walk through a stalled backlog on their
//! own.

use crate::client::QueueClient;
use crate::format::format_speed;
use crate::history::SpeedHistory;
use crate::queue::{ActiveQueue, ItemId};

/// Items in monitored slots whose full-window average is exactly zero,
/// in snapshot order. Pure function of the current history and snapshot;
/// slots beyond the queue length are skipped silently.
pub fn find_stalled(
    history: &SpeedHistory,
    queue: &ActiveQueue,
    monitored_slots: &[usize],
) -> Vec<ItemId> {
    let mut stalled = Vec::new();
    for &slot in monitored_slots {
        let Some(item) = queue.slot(slot) else {
            continue;
        };
        let avg = history.average(&item.id);
        tracing::debug!(slot, name = %item.name, avg = %format_speed(avg), "full-window check");
        if avg == 0.0 {
            stalled.push(item.id.clone());
        }
    }
    stalled
}

/// Applies move-to-end to every stalled item. Each mutation is attempted
/// independently; a transport failure on one item does not abort the rest.
/// Returns the number of demotions that succeeded.
pub fn demote_stalled<C: QueueClient>(client: &mut C, stalled: &[ItemId]) -> usize {
    let mut applied = 0;
    for id in stalled {
        match client.move_to_end(id) {
            Ok(()) => {
                tracing::info!(item = %id, "no sustained throughput, moved to end of queue");
                applied += 1;
            }
            Err(e) => {
                tracing::warn!(item = %id, error = %e, "failed to demote stalled item");
            }
        }
    }
    applied
}
