//! Round Clock Task
//!
//! A spawned task that delivers one tick signal per second until
//! cancelled. Cancellation is an owned, explicit signal rather than a
//! conditional check inside a callback: the host cancels the task on
//! every transition out of awaiting-guess, and the engine additionally
//! treats any tick that slips through as a guarded no-op.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Handle to a running one-second tick task.
///
/// The task stops when [`cancel`](Self::cancel) is called, when the
/// handle is dropped, or when the tick receiver goes away - a dangling
/// timer can never outlive its session.
#[derive(Debug)]
pub struct RoundTimer {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RoundTimer {
    /// Spawn a tick task sending one signal per second into `ticks`.
    ///
    /// The first signal arrives one second after spawn, not
    /// immediately.
    pub fn spawn(ticks: mpsc::Sender<()>) -> Self {
        let (cancel, mut cancelled) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut clock = interval(Duration::from_secs(1));
            clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval's first tick completes immediately; consume
            // it so the first delivered tick lands a second from now.
            clock.tick().await;

            loop {
                tokio::select! {
                    _ = clock.tick() => {
                        if ticks.send(()).await.is_err() {
                            break;
                        }
                    }
                    changed = cancelled.changed() => {
                        if changed.is_err() || *cancelled.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel, task }
    }

    /// Stop the tick task. Safe to call more than once.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Whether the task has fully stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}
