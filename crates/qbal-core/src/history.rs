//! Rolling per-item speed history and moving average.
//!
//! The store owns a bounded FIFO window of the last [`WINDOW`] throughput
//! samples per item, keyed by item identity. It lives for the process
//! lifetime and is reset only by restart. Exactly one actor (the scheduler)
//! reads and writes it, so no locking is needed.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::queue::{ActiveQueue, ItemId};

/// Number of samples retained per item.
pub const WINDOW: usize = 10;

/// Bounded rolling window of throughput samples per item.
#[derive(Debug, Default)]
pub struct SpeedHistory {
    samples: HashMap<ItemId, VecDeque<u64>>,
}

impl SpeedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample for `id`, evicting the oldest past [`WINDOW`].
    pub fn record(&mut self, id: &ItemId, bytes_per_sec: u64) {
        let window = self.samples.entry(id.clone()).or_default();
        window.push_back(bytes_per_sec);
        if window.len() > WINDOW {
            window.pop_front();
        }
    }

    /// Records the instantaneous speed of every item in the snapshot.
    pub fn record_queue(&mut self, queue: &ActiveQueue) {
        for item in queue.iter() {
            self.record(&item.id, item.dlspeed);
        }
    }

    /// Arithmetic mean of the stored samples. Returns 0 when no samples
    /// exist; "no data" and "zero throughput throughout" deliberately read
    /// the same.
    pub fn average(&self, id: &ItemId) -> f64 {
        match self.samples.get(id) {
            Some(window) if !window.is_empty() => {
                window.iter().sum::<u64>() as f64 / window.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Number of samples currently held for `id`.
    pub fn sample_count(&self, id: &ItemId) -> usize {
        self.samples.get(id).map_or(0, VecDeque::len)
    }
}
