//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a store.
//!
//! # Tasks
//! - Expiry reaper: Removes expired key-value entries at a fixed interval

mod reaper;

pub use reaper::spawn_reaper;
