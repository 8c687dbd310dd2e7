//! Console lifecycle notices

use annotation_application::LifecycleNotifier;
use annotation_domain::{ConsensusResult, DiscussionId, TaskId, Transition, Trigger};
use colored::Colorize;

/// Prints cascades and quota events to stderr so stdout stays parseable
pub struct ConsoleLifecycleNotifier;

impl ConsoleLifecycleNotifier {
    fn describe(discussion_id: &DiscussionId, transition: &Transition) -> String {
        let verb = match transition.trigger {
            Trigger::Quota => "quota reached",
            Trigger::Cascade => "unlocked by previous task",
            Trigger::Reviewer => "set by reviewer",
        };
        format!(
            "{} {}/{} {} -> {} ({})",
            "->".cyan(),
            discussion_id,
            transition.task,
            transition.from,
            transition.to.as_str().bold(),
            verb
        )
    }
}

impl LifecycleNotifier for ConsoleLifecycleNotifier {
    fn on_status_changed(&self, discussion_id: &DiscussionId, transition: &Transition) {
        eprintln!("{}", Self::describe(discussion_id, transition));
    }

    fn on_quota_reached(&self, discussion_id: &DiscussionId, task: TaskId, result: &ConsensusResult) {
        let label = if result.agreement {
            result.status().label().green()
        } else {
            result.status().label().yellow()
        };
        eprintln!(
            "{} {}/{} aggregated from {} annotation(s): {}",
            "*".cyan(),
            discussion_id,
            task,
            result.annotators,
            label
        );
    }
}
