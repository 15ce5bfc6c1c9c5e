//! Storage Entry Module
//!
//! Defines the structure for individual key-value entries with TTL support.

use std::time::{Duration, Instant};

// == Entry ==
/// A stored value with an optional absolute expiry instant.
///
/// Entries are never mutated after creation; a new `set` replaces the
/// whole entry.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// The stored value
    pub value: T,
    /// Absolute expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    // == Constructor ==
    /// Creates a new entry.
    ///
    /// A zero `ttl` means the entry never expires; otherwise the expiry is
    /// fixed at `now + ttl`. A `ttl` too large to represent as an instant
    /// also never expires.
    pub fn new(value: T, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Instant::now().checked_add(ttl)
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant, so a sweep can use
    /// one clock reading for the whole table.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
