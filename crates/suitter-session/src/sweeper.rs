//! Periodic eviction of expired sessions.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing;

use crate::manager::SessionManager;

/// Background task that sweeps expired sessions on a fixed interval.
#[derive(Debug, Clone)]
pub struct SessionSweeper {
    /// Manager whose registry is swept.
    manager: SessionManager,
    /// Time between sweeps.
    interval: Duration,
}

impl SessionSweeper {
    /// Create a sweeper for `manager`.
    pub fn new(manager: SessionManager, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Run the sweep loop until the shutdown flag becomes `true`.
    ///
    /// The first sweep runs immediately, then once per interval. Dropping
    /// the sender also stops the loop.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Session sweeper started, interval={}s",
            self.interval.as_secs()
        );

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let evicted = self.manager.sweep();
                    tracing::trace!(evicted, "Session sweep tick");
                }
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Session sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Spawn [`SessionSweeper::run`] on the current runtime.
    pub fn spawn(self, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}
