//! Single-flight coordination of access token refreshes.
//!
//! The first caller to hit an authorization failure becomes the leader and
//! performs the refresh. Callers arriving while the leader is busy are
//! queued and receive the leader's outcome through a one-shot channel.

use std::collections::VecDeque;

use parking_lot::Mutex;
use parley_domain::RefreshError;
use tokio::sync::oneshot;

/// Result of one refresh cycle: the new access token or the failure.
pub type RefreshOutcome = Result<String, RefreshError>;

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    pending: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Refresh flag and queue of waiting callers.
///
/// The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Role handed out by [`RefreshCoordinator::begin`].
#[derive(Debug)]
pub enum RefreshTicket<'a> {
    /// No refresh was running; the caller must perform it.
    Leader(RefreshLeader<'a>),
    /// A refresh is running; the caller waits for its outcome.
    Follower(PendingRefresh),
}

/// Obligation to finish the current refresh cycle.
///
/// Dropping it unfinished rejects every queued caller with
/// [`RefreshError::Abandoned`] and clears the flag.
#[derive(Debug)]
#[must_use = "dropping the leader abandons the refresh"]
pub struct RefreshLeader<'a> {
    coordinator: &'a RefreshCoordinator,
    finished: bool,
}

/// A caller queued behind an in-flight refresh.
#[derive(Debug)]
pub struct PendingRefresh {
    receiver: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshCoordinator {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the current refresh cycle, starting one if none is running.
    pub fn begin(&self) -> RefreshTicket<'_> {
        let mut state = self.state.lock();
        if state.refreshing {
            let (sender, receiver) = oneshot::channel();
            state.pending.push_back(sender);
            RefreshTicket::Follower(PendingRefresh { receiver })
        } else {
            state.refreshing = true;
            RefreshTicket::Leader(RefreshLeader {
                coordinator: self,
                finished: false,
            })
        }
    }

    /// Returns true while a refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of callers queued behind the in-flight refresh.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Delivers the outcome to every queued caller in FIFO order, then
    /// clears the flag. Returns how many callers were queued.
    fn complete(&self, outcome: &RefreshOutcome) -> usize {
        let mut state = self.state.lock();
        let waiters = state.pending.len();
        for sender in state.pending.drain(..) {
            // The receiver is gone if that caller was cancelled.
            let _ = sender.send(outcome.clone());
        }
        state.refreshing = false;
        waiters
    }
}

impl RefreshLeader<'_> {
    /// Ends the cycle, handing `outcome` to every queued caller.
    /// Returns how many callers were released.
    pub fn finish(mut self, outcome: &RefreshOutcome) -> usize {
        self.finished = true;
        self.coordinator.complete(outcome)
    }
}

impl Drop for RefreshLeader<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("refresh leader dropped before finishing, releasing waiters");
            self.coordinator.complete(&Err(RefreshError::Abandoned));
        }
    }
}

impl PendingRefresh {
    /// Waits for the leader's outcome.
    pub async fn wait(self) -> RefreshOutcome {
        self.receiver
            .await
            .unwrap_or(Err(RefreshError::Abandoned))
    }
}
