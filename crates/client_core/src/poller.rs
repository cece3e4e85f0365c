//! Fixed-period status reconciliation source.
//!
//! One request per tick, awaited inside the tick body: a slow backend delays
//! the next tick instead of overlapping it. Every outcome carries a
//! monotonically increasing sequence number so consumers can discard a
//! result that lost the race against a newer one.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

use shared::protocol::StatusSnapshot;

use crate::DashboardClient;

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub enum PollOutcome {
    Snapshot(StatusSnapshot),
    /// Network failure or a non-2xx answer; the reason is display text only.
    Offline(String),
}

#[derive(Debug, Clone)]
pub struct PollUpdate {
    pub seq: u64,
    pub outcome: PollOutcome,
}

pub struct StatusPoller {
    client: Arc<DashboardClient>,
    period: Duration,
    updates: broadcast::Sender<PollUpdate>,
    seq: AtomicU64,
}

impl StatusPoller {
    pub fn new(client: Arc<DashboardClient>, period: Duration) -> Arc<Self> {
        let (updates, _) = broadcast::channel(64);
        Arc::new(Self {
            client,
            period,
            updates,
            seq: AtomicU64::new(0),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PollUpdate> {
        self.updates.subscribe()
    }

    /// Runs until the returned handle is aborted. Updates to a channel with
    /// no live subscribers are dropped silently.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let poller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(poller.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let seq = poller.seq.fetch_add(1, Ordering::Relaxed) + 1;
                let outcome = match poller.client.fetch_status().await {
                    Ok(snapshot) => PollOutcome::Snapshot(snapshot),
                    Err(err) => {
                        debug!(seq, "status poll failed: {err}");
                        PollOutcome::Offline(err.to_string())
                    }
                };
                let _ = poller.updates.send(PollUpdate { seq, outcome });
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/poller_tests.rs"]
mod tests;
