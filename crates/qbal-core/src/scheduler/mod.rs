//! Rebalance scheduler: the tick loop that interleaves history updates, the
//! frequent candidate check, and the periodic full-window stall check.
//!
//! One tick is a discrete, independently callable unit ([`Rebalancer::tick`])
//! so tests can drive N ticks without wall-clock delay; the async loop that
//! adds real timing and cancellation lives in [`run_loop`].

mod run;

pub use run::{run_loop, run_once};

use crate::client::QueueClient;
use crate::config::QbalConfig;
use crate::error::TransportError;
use crate::history::SpeedHistory;
use crate::promote::{self, Decision};
use crate::queue::ActiveQueue;
use crate::stall;

/// What one tick did, for logging and the `--once` mode.
#[derive(Debug)]
pub struct TickSummary {
    /// Eligible items in this tick's snapshot.
    pub queue_len: usize,
    /// Whether the full-window stall check ran this tick.
    pub full_check: bool,
    /// Stalled items successfully demoted by the full-window check.
    pub stalled_demoted: usize,
    /// Outcome of the frequent candidate check.
    pub decision: Decision,
}

/// Owns the speed history and the full-check cadence counter; drives one
/// complete observation/decision cycle per [`tick`](Self::tick) call.
pub struct Rebalancer {
    history: SpeedHistory,
    monitored_slots: Vec<usize>,
    candidate_slot: usize,
    full_check_every: u64,
    ticks_since_full: u64,
}

impl Rebalancer {
    /// `cfg` must already be validated; the cadence is
    /// `full_check_interval_secs / tick_interval_secs` ticks.
    pub fn new(cfg: &QbalConfig) -> Self {
        let full_check_every = cfg.full_check_every_ticks();
        Self {
            history: SpeedHistory::new(),
            monitored_slots: cfg.monitored_slots.clone(),
            candidate_slot: cfg.candidate_slot,
            // Counter starts saturated so the very first tick performs the
            // full-window check instead of waiting a whole interval.
            ticks_since_full: full_check_every,
            full_check_every,
        }
    }

    /// Runs one tick: snapshot, record samples, frequent check, and (every
    /// Kth tick) the full-window stall check.
    ///
    /// A failed snapshot fetch aborts only this tick: nothing is recorded,
    /// the cadence counter keeps its value, and the error propagates to the
    /// caller to log. Every decision within a successful tick sees the
    /// freshest sample, because recording completes before any average is
    /// read.
    pub fn tick<C: QueueClient>(&mut self, client: &mut C) -> Result<TickSummary, TransportError> {
        let items = client.list_eligible_items()?;
        let queue = ActiveQueue::new(items);
        self.history.record_queue(&queue);

        let decision = promote::decide(
            &self.history,
            &queue,
            self.candidate_slot,
            &self.monitored_slots,
        );
        promote::apply(client, &decision);

        let full_check = self.ticks_since_full >= self.full_check_every;
        let mut stalled_demoted = 0;
        if full_check {
            let stalled = stall::find_stalled(&self.history, &queue, &self.monitored_slots);
            stalled_demoted = stall::demote_stalled(client, &stalled);
            self.ticks_since_full = 0;
        }
        self.ticks_since_full += 1;

        Ok(TickSummary {
            queue_len: queue.len(),
            full_check,
            stalled_demoted,
            decision,
        })
    }

    /// Read access for status output and tests.
    pub fn history(&self) -> &SpeedHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{test_item, Item, ItemId};

    /// In-memory queue service with one-step qBittorrent-like semantics:
    /// priorities are the dense ranks 1..=n.
    struct FakeQueue {
        items: Vec<Item>,
        fail_list: bool,
    }

    impl FakeQueue {
        fn new(items: Vec<Item>) -> Self {
            Self {
                items,
                fail_list: false,
            }
        }

        fn renumber(&mut self) {
            self.items.sort_by_key(|i| i.priority);
            for (idx, item) in self.items.iter_mut().enumerate() {
                item.priority = idx as i64 + 1;
            }
        }

        fn rank_of(&self, id: &str) -> i64 {
            self.items
                .iter()
                .find(|i| i.id.0 == id)
                .map(|i| i.priority)
                .unwrap()
        }

        fn position(&mut self, id: &ItemId) -> Option<usize> {
            self.items.iter().position(|i| &i.id == id)
        }
    }

    impl QueueClient for FakeQueue {
        fn list_eligible_items(&mut self) -> Result<Vec<Item>, TransportError> {
            if self.fail_list {
                return Err(TransportError::Status {
                    action: "torrents/info",
                    status: 503,
                });
            }
            Ok(self.items.clone())
        }

        fn move_to_end(&mut self, id: &ItemId) -> Result<(), TransportError> {
            if let Some(pos) = self.position(id) {
                let max = self.items.iter().map(|i| i.priority).max().unwrap_or(0);
                self.items[pos].priority = max + 1;
                self.renumber();
            }
            Ok(())
        }

        fn increase_priority(&mut self, id: &ItemId) -> Result<(), TransportError> {
            if let Some(pos) = self.position(id) {
                let p = self.items[pos].priority;
                if let Some(above) = self.items.iter().position(|i| i.priority == p - 1) {
                    self.items[above].priority = p;
                    self.items[pos].priority = p - 1;
                    self.renumber();
                }
            }
            Ok(())
        }

        fn decrease_priority(&mut self, id: &ItemId) -> Result<(), TransportError> {
            if let Some(pos) = self.position(id) {
                let p = self.items[pos].priority;
                if let Some(below) = self.items.iter().position(|i| i.priority == p + 1) {
                    self.items[below].priority = p;
                    self.items[pos].priority = p + 1;
                    self.renumber();
                }
            }
            Ok(())
        }
    }

    fn cfg(monitored: Vec<usize>, candidate: usize, every: u64) -> QbalConfig {
        QbalConfig {
            monitored_slots: monitored,
            candidate_slot: candidate,
            full_check_interval_secs: every * 60,
            tick_interval_secs: 60,
            ..QbalConfig::default()
        }
    }

    #[test]
    fn first_tick_always_runs_the_full_check() {
        let mut fake = FakeQueue::new(vec![test_item("a", 1, 10)]);
        let mut rb = Rebalancer::new(&cfg(vec![1], 2, 10));
        let summary = rb.tick(&mut fake).unwrap();
        assert!(summary.full_check);
    }

    #[test]
    fn full_check_runs_every_kth_tick() {
        let mut fake = FakeQueue::new(vec![test_item("a", 1, 10)]);
        let mut rb = Rebalancer::new(&cfg(vec![1], 2, 3));
        let ran: Vec<bool> = (0..7)
            .map(|_| rb.tick(&mut fake).unwrap().full_check)
            .collect();
        assert_eq!(ran, [true, false, false, true, false, false, true]);
    }

    #[test]
    fn failed_fetch_records_nothing_and_keeps_cadence() {
        let mut fake = FakeQueue::new(vec![test_item("a", 1, 10)]);
        let mut rb = Rebalancer::new(&cfg(vec![1], 2, 3));
        rb.tick(&mut fake).unwrap(); // full check consumed

        fake.fail_list = true;
        assert!(rb.tick(&mut fake).is_err());
        assert!(rb.tick(&mut fake).is_err());
        assert_eq!(rb.history().sample_count(&ItemId("a".into())), 1);

        // Two failed ticks did not advance the cadence: two more successful
        // ticks are needed before the next full check.
        fake.fail_list = false;
        assert!(!rb.tick(&mut fake).unwrap().full_check);
        assert!(!rb.tick(&mut fake).unwrap().full_check);
        assert!(rb.tick(&mut fake).unwrap().full_check);
    }

    #[test]
    fn promotion_is_a_single_step_rank_exchange() {
        // Queue of 12, monitored 1..=9, candidate slot 12. Candidate is
        // fast, slot 9 is the slowest monitored item.
        let items: Vec<Item> = (1..=12)
            .map(|p| {
                let speed = if p == 12 {
                    500
                } else if p == 9 {
                    50
                } else {
                    200
                };
                test_item(&format!("t{p}"), p, speed)
            })
            .collect();
        let mut fake = FakeQueue::new(items);
        let mut rb = Rebalancer::new(&cfg((1..=9).collect(), 12, 100));

        let summary = rb.tick(&mut fake).unwrap();
        assert!(matches!(summary.decision, Decision::Swap { .. }));
        // Exactly one rank better / one rank worse.
        assert_eq!(fake.rank_of("t12"), 11);
        assert_eq!(fake.rank_of("t9"), 10);
        assert_eq!(fake.rank_of("t11"), 12);
        assert_eq!(fake.rank_of("t8"), 8);
    }

    #[test]
    fn dead_candidate_is_moved_to_the_end() {
        let items: Vec<Item> = (1..=4)
            .map(|p| test_item(&format!("t{p}"), p, if p == 4 { 0 } else { 100 }))
            .collect();
        let mut fake = FakeQueue::new(items);
        let mut rb = Rebalancer::new(&cfg(vec![1, 2], 4, 100));

        let summary = rb.tick(&mut fake).unwrap();
        assert!(matches!(summary.decision, Decision::DemoteToEnd { .. }));
        assert_eq!(fake.rank_of("t4"), 4);

        // After renumbering t4 is still last; a second tick re-evaluates the
        // same slot occupant (position-indexed monitoring).
        let summary = rb.tick(&mut fake).unwrap();
        assert!(matches!(summary.decision, Decision::DemoteToEnd { .. }));
    }

    #[test]
    fn stalled_monitored_items_sink_on_the_full_check() {
        // t1 stalled, t2 healthy, t3 stalled but unmonitored.
        let items = vec![
            test_item("t1", 1, 0),
            test_item("t2", 2, 300),
            test_item("t3", 3, 0),
        ];
        let mut fake = FakeQueue::new(items);
        // Candidate slot beyond the queue keeps the frequent check out of
        // the way.
        let mut rb = Rebalancer::new(&cfg(vec![1, 2], 9, 1));

        let summary = rb.tick(&mut fake).unwrap();
        assert!(summary.full_check);
        assert_eq!(summary.stalled_demoted, 1);
        assert_eq!(fake.rank_of("t1"), 3);
        assert_eq!(fake.rank_of("t2"), 1);
        assert_eq!(fake.rank_of("t3"), 2);
    }

    #[test]
    fn empty_queue_is_a_quiet_noop() {
        let mut fake = FakeQueue::new(Vec::new());
        let mut rb = Rebalancer::new(&cfg((1..=10).collect(), 12, 10));
        let summary = rb.tick(&mut fake).unwrap();
        assert_eq!(summary.queue_len, 0);
        assert_eq!(summary.decision, Decision::Skip);
        assert_eq!(summary.stalled_demoted, 0);
    }
}
