//! Lifecycle notification port
//!
//! Defines callbacks fired after the task lifecycle commits a change.

use annotation_domain::{ConsensusResult, DiscussionId, TaskId, Transition, UserId};

/// Callbacks for lifecycle events
///
/// Implementations live in the presentation layer (console output) or in
/// tests. Every method has a no-op default.
pub trait LifecycleNotifier: Send + Sync {
    /// Called after a submission was stored
    fn on_submitted(
        &self,
        _discussion_id: &DiscussionId,
        _task: TaskId,
        _user: &UserId,
        _count: usize,
        _required: usize,
    ) {
    }

    /// Called once per committed status change, cascades included
    fn on_status_changed(&self, _discussion_id: &DiscussionId, _transition: &Transition) {}

    /// Called after a submission brought the task to its quota
    fn on_quota_reached(&self, _discussion_id: &DiscussionId, _task: TaskId, _result: &ConsensusResult) {}
}

/// No-op notifier for when notifications are not needed
pub struct NoLifecycleNotifier;

impl LifecycleNotifier for NoLifecycleNotifier {}
