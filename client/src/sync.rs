//! Periodic sync scheduling.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::app::App;

/// Periodic sync driver: one cycle immediately, then one per interval.
///
/// Only one timer is armed at a time. Starting a second scheduler while
/// one is running is the caller's responsibility to guard; `stop` disarms
/// the timer but does not cancel a cycle already in flight - an in-flight
/// fetch simply completes and commits normally.
pub struct Scheduler {
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Start syncing. Takes ownership of the app: the scheduler's task is
    /// the collection's single writer until it is stopped.
    pub fn start(mut app: App, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                match app.sync_once().await {
                    Ok(Some(outcome)) => {
                        if outcome.conflicts.is_empty() {
                            tracing::info!(added = outcome.added, "synced with server, no conflicts");
                        } else {
                            tracing::info!(
                                conflicts = outcome.conflicts.len(),
                                added = outcome.added,
                                "synced with server, server versions applied by default"
                            );
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::error!("sync cycle failed to commit: {err}");
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Disarm the timer. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
