//! Console output formatter for annotation results

use crate::output::formatter::OutputFormatter;
use annotation_application::{DiscussionOverview, FormEditOutcome, ImportReport, SubmitOutcome};
use annotation_domain::{
    AgreementStatus, AnnotationData, ConsensusAnnotation, ConsensusResult, Discussion,
    DiscussionId, FieldOutcome, TaskId, TaskState, TaskStatus, Transition,
};
use colored::{ColoredString, Colorize};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per discussion with the status of every task
    pub fn format_discussions(discussions: &[Discussion]) -> String {
        if discussions.is_empty() {
            return format!("{}\n", "No discussions found.".dimmed());
        }

        let mut output = String::new();
        for discussion in discussions {
            let tasks = discussion
                .tasks
                .iter()
                .map(|(task, state)| format!("{}:{}", task.number(), Self::status(state.status)))
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!(
                "{}  {}  {}  {}\n",
                discussion.id.as_str().yellow().bold(),
                tasks,
                discussion.title,
                format!("({})", discussion.repository).dimmed()
            ));
        }
        output.push_str(&format!(
            "\n{}\n",
            format!("{} discussion(s)", discussions.len()).dimmed()
        ));
        output
    }

    /// Full view of one discussion
    pub fn format_overview(overview: &DiscussionOverview) -> String {
        let discussion = &overview.discussion;
        let mut output = String::new();

        output.push_str(&Self::header(discussion.id.as_str()));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), discussion.title));
        output.push_str(&format!("{} {}\n", "URL:".cyan().bold(), discussion.url));
        output.push_str(&format!(
            "{} {}{}\n",
            "Repository:".cyan().bold(),
            discussion.repository,
            discussion
                .language
                .as_deref()
                .map(|l| format!(" [{}]", l))
                .unwrap_or_default()
        ));
        if let Some(batch) = &discussion.batch {
            output.push_str(&format!("{} {}\n", "Batch:".cyan().bold(), batch));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Created:".cyan().bold(),
            discussion.created_at.format("%Y-%m-%d %H:%M UTC")
        ));

        for task in &overview.tasks {
            output.push_str(&Self::section_header(task.task.display_name()));
            output.push_str(&format!("  {}\n", Self::task_line(&task.state)));

            if !task.annotators.is_empty() {
                let names = task
                    .annotators
                    .iter()
                    .map(|u| u.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                output.push_str(&format!("  {} {}\n", "Annotators:".bold(), names));
            }

            if let Some(record) = &task.consensus {
                output.push_str(&format!(
                    "  {} {} by {}\n",
                    "Consensus:".bold(),
                    record.origin.as_str(),
                    record.user_id
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_submitted(outcome: &SubmitOutcome) -> String {
        let task = outcome.annotation.task_id;
        let state = outcome.discussion.task(task);
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} {} for {} ({})\n",
            "v".green(),
            "Saved".bold(),
            task,
            outcome.annotation.discussion_id,
            outcome.admission.as_str().replace('_', " ")
        ));
        output.push_str(&format!("  {}\n", Self::task_line(state)));

        if !outcome.cascaded.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Set to N/A:".dimmed(),
                outcome.cascaded.join(", ")
            ));
        }

        for transition in &outcome.transitions {
            output.push_str(&format!("  {}\n", Self::transition(transition)));
        }

        if let Some(result) = &outcome.consensus {
            output.push('\n');
            output.push_str(&Self::format_consensus_result(
                &outcome.annotation.discussion_id,
                task,
                result,
            ));
            if outcome.draft_saved {
                output.push_str(&format!("{}\n", "Draft consensus saved.".dimmed()));
            }
        }

        output
    }

    pub fn format_status_changed(discussion: &Discussion, task: TaskId) -> String {
        let mut output = format!(
            "{} {} of {} is now {}\n",
            "v".green(),
            task,
            discussion.id,
            Self::status(discussion.task(task).status)
        );
        if let Some(next) = task.next() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{}:", next).dimmed(),
                Self::status(discussion.task(next).status)
            ));
        }
        output
    }

    /// Aggregated consensus with per-field provenance
    pub fn format_consensus_result(
        discussion_id: &DiscussionId,
        task: TaskId,
        result: &ConsensusResult,
    ) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} / {} ({} annotation(s))\n",
            "Consensus:".cyan().bold(),
            discussion_id,
            task,
            result.annotators
        ));
        output.push_str(&format!("  {}\n", Self::agreement(result.status())));

        for (key, outcome) in &result.fields {
            let line = format!("{}: {}", key, outcome.summary());
            let line = match outcome {
                FieldOutcome::Resolved { agreed: true, .. } => line.normal(),
                FieldOutcome::Resolved { .. } | FieldOutcome::Tied { .. } => line.yellow(),
                FieldOutcome::NoAgreement { .. } => line.red(),
                FieldOutcome::Merged { .. } | FieldOutcome::FirstText { .. } => line.dimmed(),
            };
            output.push_str(&format!("  * {}\n", line));
        }

        let unresolved = result.unresolved();
        if !unresolved.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Needs a reviewer:".yellow().bold(),
                unresolved.join(", ")
            ));
        }

        output
    }

    pub fn format_consensus_record(record: Option<&ConsensusAnnotation>) -> String {
        let Some(record) = record else {
            return format!("{}\n", "No consensus saved yet.".dimmed());
        };

        let mut output = format!(
            "{} {} / {} ({} by {}, {})\n",
            "Consensus:".cyan().bold(),
            record.discussion_id,
            record.task_id,
            record.origin.as_str(),
            record.user_id,
            record.timestamp.format("%Y-%m-%d %H:%M UTC")
        );
        if let Some(agreement) = record.agreement {
            output.push_str(&format!(
                "  {}\n",
                Self::agreement(AgreementStatus::from_bool(agreement))
            ));
        }
        if let Some(stars) = record.stars {
            output.push_str(&format!("  {} {}\n", "Stars:".bold(), "*".repeat(stars as usize)));
        }
        if let Some(comment) = &record.comment {
            output.push_str(&format!("  {} {}\n", "Comment:".bold(), comment));
        }
        output.push_str(&Self::data(&record.data));
        output
    }

    pub fn format_imported(report: &ImportReport) -> String {
        let mut output = format!(
            "{} Imported {} of {} discussion(s)\n",
            "v".green(),
            report.imported.len(),
            report.total()
        );
        if !report.skipped.is_empty() {
            let skipped = report
                .skipped
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("  {} {}\n", "Skipped (already present):".dimmed(), skipped));
        }
        output
    }

    /// Summary line plus the edited data, ready to pass to `submit --file`
    pub fn format_form_edited(outcome: &FormEditOutcome) -> String {
        let forms = outcome
            .forms
            .iter()
            .map(|f| format!("{} {}", f.number, f.kind))
            .collect::<Vec<_>>()
            .join(", ");
        let mut output = format!(
            "{} Form {} ({}) on {} / task3\n",
            "+".green(),
            outcome.number,
            outcome.kind,
            outcome.discussion_id
        );
        output.push_str(&format!("  {} {}\n", "Forms:".bold(), forms));
        output.push_str(&serde_json::to_string_pretty(&outcome.data).unwrap_or_else(|_| "{}".to_string()));
        output.push('\n');
        output
    }

    /// Configuration file locations, marking the ones that exist
    pub fn format_config_sources(sources: &[(String, bool)]) -> String {
        let mut output = format!("{}\n", "Configuration files:".cyan().bold());
        for (path, exists) in sources {
            let mark = if *exists { "v".green() } else { "-".dimmed() };
            output.push_str(&format!("  {} {}\n", mark, path));
        }
        output
    }

    fn data(data: &AnnotationData) -> String {
        data.iter()
            .map(|(key, value)| format!("  * {}: {}\n", key, value.display()))
            .collect()
    }

    fn task_line(state: &TaskState) -> String {
        format!(
            "{} {}/{} annotator(s)",
            Self::status(state.status),
            state.annotator_count,
            state.required_annotators
        )
    }

    fn transition(transition: &Transition) -> String {
        format!(
            "{} {}: {} -> {} ({})",
            "->".cyan(),
            transition.task,
            transition.from,
            Self::status(transition.to),
            transition.trigger
        )
    }

    fn status(status: TaskStatus) -> ColoredString {
        let label = status.as_str();
        match status {
            TaskStatus::Locked => label.dimmed(),
            TaskStatus::Unlocked => label.cyan(),
            TaskStatus::Completed => label.green(),
            TaskStatus::Rework => label.yellow(),
            TaskStatus::Blocked => label.red(),
            TaskStatus::ReadyForNext => label.green().bold(),
        }
    }

    fn agreement(status: AgreementStatus) -> ColoredString {
        match status {
            AgreementStatus::Agreement => status.label().green().bold(),
            AgreementStatus::NoAgreement => status.label().yellow().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn discussions(&self, discussions: &[Discussion]) -> String {
        Self::format_discussions(discussions)
    }

    fn overview(&self, overview: &DiscussionOverview) -> String {
        Self::format_overview(overview)
    }

    fn submitted(&self, outcome: &SubmitOutcome) -> String {
        Self::format_submitted(outcome)
    }

    fn status_changed(&self, discussion: &Discussion, task: TaskId) -> String {
        Self::format_status_changed(discussion, task)
    }

    fn consensus_result(
        &self,
        discussion_id: &DiscussionId,
        task: TaskId,
        result: &ConsensusResult,
    ) -> String {
        Self::format_consensus_result(discussion_id, task, result)
    }

    fn consensus_record(&self, record: Option<&ConsensusAnnotation>) -> String {
        Self::format_consensus_record(record)
    }

    fn imported(&self, report: &ImportReport) -> String {
        Self::format_imported(report)
    }

    fn form_edited(&self, outcome: &FormEditOutcome) -> String {
        Self::format_form_edited(outcome)
    }
}
