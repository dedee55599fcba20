//! Frequent check: compare the candidate slot against the weakest monitored
//! slot and trade ranks when the candidate is clearly faster.
//!
//! The candidate's effective speed is max(instantaneous, rolling average):
//! a momentarily-strong reading beats a stale average, but only upward. The
//! comparison against the slowest monitored average uses strict `>`, so a
//! tie falls through to the mild-demotion branch.

use crate::client::QueueClient;
use crate::format::format_speed;
use crate::history::SpeedHistory;
use crate::queue::{ActiveQueue, ItemId};

/// Outcome of one frequent check. Computed purely from history + snapshot,
/// then applied as at most one bounded priority exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Candidate slot (or every monitored slot) is absent from the snapshot.
    Skip,
    /// Candidate shows no throughput at all: send it to the back.
    DemoteToEnd { candidate: ItemId },
    /// Candidate beats the weakest monitored slot: one-step rank exchange.
    Swap { candidate: ItemId, slowest: ItemId },
    /// No clearly better candidate: nudge it one step back so it cannot
    /// camp the boundary slot.
    NudgeBack { candidate: ItemId },
}

/// Evaluates the candidate slot against the monitored slots.
pub fn decide(
    history: &SpeedHistory,
    queue: &ActiveQueue,
    candidate_slot: usize,
    monitored_slots: &[usize],
) -> Decision {
    let Some(candidate) = queue.slot(candidate_slot) else {
        return Decision::Skip;
    };

    let avg = history.average(&candidate.id);
    let instant = candidate.dlspeed as f64;
    let effective = if instant > avg { instant } else { avg };

    tracing::debug!(
        slot = candidate_slot,
        name = %candidate.name,
        instant = %format_speed(instant),
        avg = %format_speed(avg),
        "candidate check"
    );

    if effective == 0.0 {
        return Decision::DemoteToEnd {
            candidate: candidate.id.clone(),
        };
    }

    // Weakest monitored slot by rolling average; first seen wins on ties.
    let mut slowest: Option<(&ItemId, f64)> = None;
    for &slot in monitored_slots {
        let Some(item) = queue.slot(slot) else {
            continue;
        };
        let item_avg = history.average(&item.id);
        match slowest {
            Some((_, speed)) if item_avg >= speed => {}
            _ => slowest = Some((&item.id, item_avg)),
        }
    }

    let Some((slowest_id, slowest_speed)) = slowest else {
        // No monitored slot present at all: no priority change either way.
        return Decision::Skip;
    };

    if effective > slowest_speed {
        Decision::Swap {
            candidate: candidate.id.clone(),
            slowest: slowest_id.clone(),
        }
    } else {
        Decision::NudgeBack {
            candidate: candidate.id.clone(),
        }
    }
}

/// Applies a decision. The two mutations of a swap are attempted
/// independently so a transport failure on one leg never blocks the other.
pub fn apply<C: QueueClient>(client: &mut C, decision: &Decision) {
    match decision {
        Decision::Skip => {}
        Decision::DemoteToEnd { candidate } => {
            if let Err(e) = client.move_to_end(candidate) {
                tracing::warn!(item = %candidate, error = %e, "failed to demote candidate to end");
            } else {
                tracing::info!(item = %candidate, "candidate has no throughput, moved to end of queue");
            }
        }
        Decision::Swap { candidate, slowest } => {
            tracing::info!(candidate = %candidate, slowest = %slowest, "promoting candidate over slowest slot");
            if let Err(e) = client.increase_priority(candidate) {
                tracing::warn!(item = %candidate, error = %e, "failed to raise candidate priority");
            }
            if let Err(e) = client.decrease_priority(slowest) {
                tracing::warn!(item = %slowest, error = %e, "failed to lower slowest item priority");
            }
        }
        Decision::NudgeBack { candidate } => {
            tracing::info!(item = %candidate, "candidate not faster than monitored slots, nudging back");
            if let Err(e) = client.decrease_priority(candidate) {
                tracing::warn!(item = %candidate, error = %e, "failed to nudge candidate back");
            }
        }
    }
}
