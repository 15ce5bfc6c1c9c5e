//! Store Statistics Module
//!
//! Point-in-time size counters for a memory store.

use serde::{Deserialize, Serialize};

// == Store Stats ==
/// Snapshot of a memory store's contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Key-value entries physically present, including expired ones not yet reaped
    pub entries: usize,
    /// Number of non-empty queues
    pub queues: usize,
    /// Elements across all queues
    pub queued_items: usize,
    /// Entries removed by the reaper since the store was created
    pub purged: u64,
}
