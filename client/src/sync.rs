//! Periodic lobby polling, decoupled from whatever renders the rows.
//!
//! The agent pulls the game list on a timer and hands rows to the
//! presentation side over a channel; it never touches presentation state
//! directly. One failed poll is logged and skipped, never fatal; the
//! next tick proceeds as if nothing happened.

use crate::network::RemoteGameClient;
use log::{debug, warn};
use shared::protocol::GamePublicData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, sleep};

/// Grace delay between a tick firing and the fetch going out, so a
/// rescheduled agent cannot hammer the server back-to-back.
pub const PRE_FETCH_DELAY: Duration = Duration::from_millis(500);

/// Updates queued toward the presentation side before new ones are
/// dropped. A consumer this far behind is gone, not slow.
const UPDATE_QUEUE_DEPTH: usize = 64;

/// Row updates handed to the presentation side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyUpdate {
    /// Timer path: drop every existing row, then show these.
    Replace(Vec<GamePublicData>),
    /// One-shot refresh: keep existing rows and add these after them.
    Append(Vec<GamePublicData>),
}

/// The timer-driven polling loop.
pub struct ClientSyncAgent {
    client: Arc<RemoteGameClient>,
    updates: mpsc::Sender<LobbyUpdate>,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

/// Cheap handle for operations that run outside the timer cadence.
#[derive(Clone)]
pub struct SyncHandle {
    client: Arc<RemoteGameClient>,
    updates: mpsc::Sender<LobbyUpdate>,
}

impl ClientSyncAgent {
    /// Builds the agent together with the update stream and the shutdown
    /// switch. Flipping (or dropping) the switch stops scheduling; an
    /// in-flight request is not aborted, it is simply never rescheduled.
    pub fn new(
        client: Arc<RemoteGameClient>,
        poll_interval: Duration,
    ) -> (Self, mpsc::Receiver<LobbyUpdate>, watch::Sender<bool>) {
        let (update_tx, update_rx) = mpsc::channel(UPDATE_QUEUE_DEPTH);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let agent = ClientSyncAgent {
            client,
            updates: update_tx,
            poll_interval,
            shutdown: shutdown_rx,
        };
        (agent, update_rx, shutdown_tx)
    }

    pub fn handle(&self) -> SyncHandle {
        SyncHandle {
            client: Arc::clone(&self.client),
            updates: self.updates.clone(),
        }
    }

    /// Polls until the shutdown switch flips.
    pub async fn run(mut self) {
        let mut ticker = interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.poll_cycle().await {
                        break;
                    }
                }
                _ = self.shutdown.changed() => {
                    debug!("lobby polling stopped");
                    break;
                }
            }
        }
    }

    /// One cycle: delay, fetch, publish. Returns false when the delay was
    /// interrupted by shutdown, so the caller stops scheduling.
    async fn poll_cycle(&mut self) -> bool {
        tokio::select! {
            _ = sleep(PRE_FETCH_DELAY) => {}
            _ = self.shutdown.changed() => {
                warn!("poll delay interrupted, skipping cycle");
                return false;
            }
        }

        match self.client.list_games().await {
            Ok(rows) => {
                debug!("lobby poll: {} game(s)", rows.len());
                publish(&self.updates, LobbyUpdate::Replace(rows));
            }
            Err(e) => warn!("lobby poll failed: {}", e),
        }
        true
    }
}

impl SyncHandle {
    /// One-shot refresh outside the timer cadence. Rows are appended to
    /// whatever the table already shows, not replaced, so repeating the
    /// refresh repeats the rows.
    pub async fn refresh_now(&self) {
        match self.client.list_games().await {
            Ok(rows) => publish(&self.updates, LobbyUpdate::Append(rows)),
            Err(e) => warn!("manual refresh failed: {}", e),
        }
    }
}

/// Queues one update without ever blocking the fetch path. A full queue
/// drops the update; the next cycle carries a fresh snapshot anyway.
fn publish(updates: &mpsc::Sender<LobbyUpdate>, update: LobbyUpdate) {
    if let Err(e) = updates.try_send(update) {
        warn!("lobby update dropped: {}", e);
    }
}
