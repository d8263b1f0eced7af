//! Scheduled fake replies.
//!
//! The dashboard simulates an agent answering a moment after the user
//! writes. [`PendingReply`] reproduces that: it runs a delivery closure
//! after a delay unless cancelled first. Dropping the handle cancels the
//! delivery, so a reply never outlives the view that scheduled it.

use std::time::Duration;
use tokio::task::JoinHandle;

/// How long the fake agent "thinks" before replying.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Handle to a reply scheduled for later delivery.
#[derive(Debug)]
pub struct PendingReply {
    handle: JoinHandle<()>,
}

impl PendingReply {
    /// Schedules `deliver` to run after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(delay: Duration, deliver: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            deliver();
        });
        Self { handle }
    }

    /// Cancels the delivery if it has not happened yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Returns true once the reply was delivered or cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
