//! Queue Table Module
//!
//! Named FIFO queues behind a lock independent of the key-value table.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

// == Queue Table ==
/// Maps queue names to FIFO sequences.
///
/// A queue that drains to zero elements is removed from the map, so an
/// empty queue and a missing one are the same state.
#[derive(Debug)]
pub struct QueueTable<T> {
    queues: RwLock<HashMap<String, VecDeque<T>>>,
}

impl<T> QueueTable<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
        }
    }

    // == Push ==
    /// Appends to the tail, creating the queue if needed. Returns the new length.
    pub fn push(&self, name: &str, value: T) -> usize {
        let mut queues = self.queues.write();
        let queue = queues.entry(name.to_string()).or_default();
        queue.push_back(value);
        queue.len()
    }

    // == Pop ==
    /// Removes and returns the head element.
    pub fn pop(&self, name: &str) -> Option<T> {
        let mut queues = self.queues.write();
        let queue = queues.get_mut(name)?;
        let value = queue.pop_front();

        if queue.is_empty() {
            queues.remove(name);
        }

        value
    }

    // == Remove ==
    /// Drops the head element without returning it.
    ///
    /// Returns false if the queue did not exist.
    pub fn remove(&self, name: &str) -> bool {
        self.pop(name).is_some()
    }

    // == Length ==
    /// Element count, 0 for a queue that does not exist.
    pub fn len(&self, name: &str) -> usize {
        self.queues.read().get(name).map_or(0, VecDeque::len)
    }

    // == Stats ==
    /// Number of existing (non-empty) queues.
    pub fn queue_count(&self) -> usize {
        self.queues.read().len()
    }

    /// Total number of elements across all queues.
    pub fn item_count(&self) -> usize {
        self.queues.read().values().map(VecDeque::len).sum()
    }
}

impl<T: Clone> QueueTable<T> {
    // == Peek ==
    /// Returns a copy of the head element without removing it.
    pub fn peek(&self, name: &str) -> Option<T> {
        self.queues
            .read()
            .get(name)
            .and_then(|queue| queue.front().cloned())
    }
}

impl<T> Default for QueueTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
