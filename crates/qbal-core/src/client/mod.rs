//! Capability surface of the external queue service.
//!
//! The rebalancer only ever needs four operations: observe the eligible
//! items and nudge priorities in three ways. Everything else about the
//! service (session handling, its own scheduling) stays behind this trait,
//! which also lets tests drive the whole loop with an in-memory fake.

mod qbittorrent;

pub use qbittorrent::QbClient;

use crate::error::TransportError;
use crate::queue::{Item, ItemId};

/// Operations the rebalancer consumes from the queue service.
///
/// Each mutation either succeeds or fails independently with a
/// [`TransportError`]; partial application across a batch is expected and
/// tolerated. An empty item list is not an error.
pub trait QueueClient {
    /// All items in an eligible lifecycle state (unsorted; the caller builds
    /// the priority-ordered snapshot).
    fn list_eligible_items(&mut self) -> Result<Vec<Item>, TransportError>;

    /// Moves the item to the lowest priority (end of queue).
    fn move_to_end(&mut self, id: &ItemId) -> Result<(), TransportError>;

    /// Raises the item's priority by one step.
    fn increase_priority(&mut self, id: &ItemId) -> Result<(), TransportError>;

    /// Lowers the item's priority by one step.
    fn decrease_priority(&mut self, id: &ItemId) -> Result<(), TransportError>;
}
