//! Fixed-interval repetition of the capture pipeline.

use log::info;
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::task::JoinHandle;

/// Repeats a run at a fixed interval until stopped.
///
/// The loop runs once immediately, sleeps the interval, re-checks the
/// cancellation signal and repeats. Stopping only prevents the next
/// scheduled run; a run already in progress (its upload fan-out included)
/// always completes. Runs never overlap: each one is awaited before the
/// interval sleep starts.
#[derive(Default)]
pub struct LoopScheduler {
    cancel_sig: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
}

impl LoopScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins the run/sleep loop.
    ///
    /// Returns `None` without doing anything when a loop is already
    /// active, so concurrent `start` calls are no-ops.
    pub fn start<F, Fut>(&self, interval: Duration, mut run_fn: F) -> Option<JoinHandle<()>>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        if self.active.swap(true, Ordering::SeqCst) {
            return None;
        }
        self.cancel_sig.store(false, Ordering::SeqCst);

        let cancel_sig = self.cancel_sig.clone();
        let active = self.active.clone();

        Some(tokio::spawn(async move {
            loop {
                run_fn().await;

                tokio::time::sleep(interval).await;
                if cancel_sig.load(Ordering::Relaxed) {
                    break;
                }
            }

            active.store(false, Ordering::SeqCst);
            info!("capture loop stopped");
        }))
    }

    /// Requests the loop to stop before its next scheduled run.
    pub fn stop(&self) {
        self.cancel_sig.store(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
