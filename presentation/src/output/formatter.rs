//! Output formatter trait and the JSON implementation

use super::console::ConsoleFormatter;
use annotation_application::{DiscussionOverview, FormEditOutcome, ImportReport, SubmitOutcome};
use annotation_domain::{
    ConsensusAnnotation, ConsensusResult, Discussion, DiscussionId, OutputFormat, TaskId,
};
use serde::Serialize;
use serde_json::json;

/// Trait for rendering command results
pub trait OutputFormatter {
    fn discussions(&self, discussions: &[Discussion]) -> String;

    fn overview(&self, overview: &DiscussionOverview) -> String;

    fn submitted(&self, outcome: &SubmitOutcome) -> String;

    /// A task status after a reviewer changed it
    fn status_changed(&self, discussion: &Discussion, task: TaskId) -> String;

    fn consensus_result(
        &self,
        discussion_id: &DiscussionId,
        task: TaskId,
        result: &ConsensusResult,
    ) -> String;

    fn consensus_record(&self, record: Option<&ConsensusAnnotation>) -> String;

    fn imported(&self, report: &ImportReport) -> String;

    /// Task 3 data after a form was added or duplicated
    fn form_edited(&self, outcome: &FormEditOutcome) -> String;
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Pretty-printed JSON, one document per command
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn discussions(&self, discussions: &[Discussion]) -> String {
        Self::render(discussions)
    }

    fn overview(&self, overview: &DiscussionOverview) -> String {
        Self::render(overview)
    }

    fn submitted(&self, outcome: &SubmitOutcome) -> String {
        Self::render(&json!({
            "annotation": outcome.annotation,
            "admission": outcome.admission.as_str(),
            "annotator_count": outcome.annotator_count,
            "required_annotators": outcome.discussion.task(outcome.annotation.task_id).required_annotators,
            "status": outcome.discussion.task(outcome.annotation.task_id).status,
            "transitions": outcome.transitions,
            "cascaded": outcome.cascaded,
            "consensus": outcome.consensus,
            "draft_saved": outcome.draft_saved,
        }))
    }

    fn status_changed(&self, discussion: &Discussion, task: TaskId) -> String {
        Self::render(&json!({
            "discussion_id": discussion.id,
            "task": task,
            "tasks": discussion.tasks,
        }))
    }

    fn consensus_result(
        &self,
        discussion_id: &DiscussionId,
        task: TaskId,
        result: &ConsensusResult,
    ) -> String {
        Self::render(&json!({
            "discussion_id": discussion_id,
            "task": task,
            "status": result.status().label(),
            "result": result,
        }))
    }

    fn consensus_record(&self, record: Option<&ConsensusAnnotation>) -> String {
        Self::render(&record)
    }

    fn imported(&self, report: &ImportReport) -> String {
        Self::render(report)
    }

    fn form_edited(&self, outcome: &FormEditOutcome) -> String {
        Self::render(outcome)
    }
}
