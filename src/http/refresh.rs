//! Single-flight coordination of session refresh calls.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use tokio::sync::oneshot;

use super::error::ApiError;

type Outcome = Result<(), ApiError>;

/// Coordinates concurrent session renewals onto a single in-flight refresh
/// call.
///
/// The first caller to observe an expired session becomes the leader and
/// performs the actual refresh; every caller that arrives while that
/// refresh is in flight is queued and settles with the leader's outcome
/// instead of issuing a second network call. The queue is drained and the
/// in-progress flag cleared once the refresh settles, whether it succeeded
/// or not, so a failed refresh releases all waiters instead of leaving
/// them stuck.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    // `Some` while a refresh is in flight, holding the waiters queued
    // behind it. Never held across an await point.
    waiters: Mutex<Option<Vec<oneshot::Sender<Outcome>>>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `refresh` unless one is already in flight, in which case the
    /// caller waits for that one instead. Returns the shared outcome.
    pub async fn run<F, Fut>(&self, refresh: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        let rx = {
            let mut state = self.lock();
            match state.as_mut() {
                Some(queue) => {
                    let (tx, rx) = oneshot::channel();
                    queue.push(tx);
                    Some(rx)
                }
                None => {
                    *state = Some(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = rx {
            debug!("Session refresh already in flight, waiting for its outcome...");
            // The sender side is dropped without sending only when the
            // leader was cancelled before settling; treat that as failure.
            return rx.await.unwrap_or_else(|_| Err(ApiError::session_expired()));
        }

        debug!("Starting session refresh...");
        let guard = SettleGuard { coordinator: self, settled: false };
        let outcome = refresh().await;
        guard.settle(&outcome);
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Option<Vec<oneshot::Sender<Outcome>>>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the queued waiters and clears the in-progress flag.
    fn drain(&self) -> Vec<oneshot::Sender<Outcome>> {
        self.lock().take().unwrap_or_default()
    }
}

/// Releases the queued waiters when the leader settles, including when the
/// leader's future is dropped mid-refresh.
struct SettleGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl SettleGuard<'_> {
    fn settle(mut self, outcome: &Outcome) {
        self.settled = true;
        let waiters = self.coordinator.drain();
        if !waiters.is_empty() {
            debug!("Releasing {} queued refresh waiter(s)", waiters.len());
        }
        for tx in waiters {
            let _ = tx.send(outcome.clone());
        }
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("Session refresh was cancelled before settling, releasing queued waiters");
        for tx in self.coordinator.drain() {
            let _ = tx.send(Err(ApiError::session_expired()));
        }
    }
}
