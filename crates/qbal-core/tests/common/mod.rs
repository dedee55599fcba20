//! In-memory stand-in for the qBittorrent queue, with one-step priority
//! semantics: priorities are kept as the dense ranks 1..=n.

use qbal_core::client::QueueClient;
use qbal_core::error::TransportError;
use qbal_core::queue::{Item, ItemId, ItemState};

pub struct FakeQueue {
    items: Vec<Item>,
    /// When set, `list_eligible_items` fails with an HTTP 503 status.
    pub fail_list: bool,
    /// Ids whose priority mutations fail (simulates partial application).
    pub fail_mutations_for: Vec<String>,
}

impl FakeQueue {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            fail_list: false,
            fail_mutations_for: Vec::new(),
        }
    }

    pub fn item(id: &str, priority: i64, dlspeed: u64) -> Item {
        Item {
            id: ItemId(id.to_string()),
            name: id.to_string(),
            state: ItemState::Downloading,
            priority,
            dlspeed,
        }
    }

    /// Current rank of an item (1 = front).
    pub fn rank_of(&self, id: &str) -> i64 {
        self.items
            .iter()
            .find(|i| i.id.0 == id)
            .map(|i| i.priority)
            .expect("item present")
    }

    pub fn set_speed(&mut self, id: &str, dlspeed: u64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id.0 == id) {
            item.dlspeed = dlspeed;
        }
    }

    fn renumber(&mut self) {
        self.items.sort_by_key(|i| i.priority);
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.priority = idx as i64 + 1;
        }
    }

    fn mutation_allowed(&self, id: &ItemId) -> Result<(), TransportError> {
        if self.fail_mutations_for.iter().any(|f| f == &id.0) {
            return Err(TransportError::Status {
                action: "torrents/prio",
                status: 502,
            });
        }
        Ok(())
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
        self.mutation_allowed(id)?;
        if let Some(pos) = self.items.iter().position(|i| &i.id == id) {
            let max = self.items.iter().map(|i| i.priority).max().unwrap_or(0);
            self.items[pos].priority = max + 1;
            self.renumber();
        }
        Ok(())
    }

    fn increase_priority(&mut self, id: &ItemId) -> Result<(), TransportError> {
        self.mutation_allowed(id)?;
        if let Some(pos) = self.items.iter().position(|i| &i.id == id) {
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
        self.mutation_allowed(id)?;
        if let Some(pos) = self.items.iter().position(|i| &i.id == id) {
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
