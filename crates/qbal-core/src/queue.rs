//! Active-queue data model: items, lifecycle states, and the point-in-time
//! priority-ordered snapshot.
//!
//! An [`ActiveQueue`] is a view, not a persisted structure: it is rebuilt
//! fresh from the queue service on every observation, and all slot lookups
//! are 1-based positions into that snapshot.

/// Stable torrent identity (the info-hash reported by the Web API).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(pub String);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle states counted as eligible for rebalancing.
///
/// Anything else (completed, errored, paused) never enters the active queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Actively transferring data.
    Downloading,
    /// Active but currently receiving no data.
    Stalled,
    /// Waiting for a download slot.
    Queued,
}

impl ItemState {
    /// Maps a Web API state name to an eligible state; any other state
    /// (paused, checking, errored, ...) is `None` and filtered out.
    pub fn from_api(state: &str) -> Option<Self> {
        match state {
            "downloading" => Some(Self::Downloading),
            "stalledDL" => Some(Self::Stalled),
            "queuedDL" => Some(Self::Queued),
            _ => None,
        }
    }
}

/// One eligible queue entry at observation time.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub state: ItemState,
    /// Queue rank, lower = higher priority, unique within the active set.
    pub priority: i64,
    /// Instantaneous download throughput in bytes per second.
    pub dlspeed: u64,
}

/// Priority-ordered snapshot of the eligible items.
#[derive(Debug, Clone, Default)]
pub struct ActiveQueue {
    items: Vec<Item>,
}

impl ActiveQueue {
    /// Builds a snapshot: sorts ascending by priority rank. Insertion order
    /// of the result is priority order.
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_by_key(|i| i.priority);
        Self { items }
    }

    /// Item at a 1-based slot position, or `None` when the queue is shorter.
    /// A missing slot is always "skip, no action" downstream, never an error.
    pub fn slot(&self, position: usize) -> Option<&Item> {
        if position == 0 {
            return None;
        }
        self.items.get(position - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

#[cfg(test)]
pub(crate) fn test_item(id: &str, priority: i64, dlspeed: u64) -> Item {
    Item {
        id: ItemId(id.to_string()),
        name: format!("torrent-{id}"),
        state: ItemState::Downloading,
        priority,
        dlspeed,
    }
}
