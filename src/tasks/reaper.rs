//! Expiry Reaper Task
//!
//! Background task that periodically removes expired key-value entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use crate::storage::KvTable;

/// Spawns a background task that sweeps expired entries out of `table`.
///
/// The task holds only a weak reference to the table and stops at the first
/// of:
/// - `true` sent on `shutdown`, or the sender being dropped
/// - the table itself being dropped
///
/// A stop signal takes priority over a pending tick, and a sweep that has
/// started always runs to completion before the task exits.
///
/// # Panics
/// Panics if `interval` is zero or if called outside a Tokio runtime.
pub fn spawn_reaper<T>(
    table: Weak<KvTable<T>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Expiry reaper started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // happens one full interval after start.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let Some(table) = table.upgrade() else {
                        break;
                    };

                    let removed = table.purge_expired();
                    if removed > 0 {
                        debug!(removed, remaining = table.len(), "Reaper swept expired entries");
                    } else {
                        trace!("Reaper sweep found no expired entries");
                    }
                }
            }
        }

        info!("Expiry reaper stopped");
    })
}
