//! Background task plumbing shared by the session and the feeds.
//!
//! [`spawn_periodic`] runs a closure on a fixed tokio interval; the returned
//! [`PollHandle`] is the only way to stop it and aborts the task when
//! dropped, so a poller never outlives the object that owns its handle.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

// ── PollHandle ────────────────────────────────────────────────────────────────

/// Owner of a background task. Aborts the task on [`abort`](Self::abort) or
/// drop.
#[derive(Debug)]
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Immediately abort the task.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// `true` once the task has exited or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ── spawn_periodic ────────────────────────────────────────────────────────────

/// Run `task` every `period`, starting one period from now.
///
/// Each run is awaited before the next tick is taken, so slow runs delay
/// rather than overlap.
pub fn spawn_periodic<F, Fut>(period: Duration, mut task: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // The first tick fires immediately; callers fetch eagerly themselves.
        interval.tick().await;

        loop {
            interval.tick().await;
            task().await;
        }
    });
    PollHandle::new(handle)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
