//! Background reconcile loop.
//!
//! Each client polls the store on a fixed interval. The loop runs as a tokio
//! task and is cancelled through its [`PollerHandle`]: explicitly with
//! `stop()`, implicitly when the handle is dropped, or by the target itself
//! returning [`PollStatus::Stop`] (room closed, match over, client left).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Whether the poll loop should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
    Continue,
    Stop,
}

/// Something a poller ticks.
pub trait PollTarget: Send + 'static {
    /// One reconcile pass. Must not block for long: the target is locked for
    /// the duration of the call.
    fn poll_once(&mut self) -> PollStatus;
}

/// Cancellation handle for a running poller.
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Ask the loop to stop after the current tick.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// True until the loop has exited.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Wait for the loop to exit on its own or after `stop()`.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Poller task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Spawn a poll loop on the current tokio runtime.
///
/// The first pass runs one full `period` after spawning.
pub fn spawn_poller<T: PollTarget>(target: Arc<Mutex<T>>, period: Duration) -> PollerHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Started poller (interval: {:?})", period);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; the first real pass waits a full period
        interval.tick().await;

        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        debug!("Poller cancelled");
                        break;
                    }
                }
                _ = interval.tick() => {
                    let status = match target.lock() {
                        Ok(mut target) => target.poll_once(),
                        Err(_) => {
                            warn!("Poll target lock poisoned");
                            PollStatus::Stop
                        }
                    };
                    if status == PollStatus::Stop {
                        break;
                    }
                }
            }
        }
        info!("Stopped poller");
    });

    PollerHandle {
        stop_tx,
        task: Some(task),
    }
}
