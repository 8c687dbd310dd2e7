//! Discussion query filters.

use super::entities::Discussion;
use super::status::TaskStatus;
use super::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Criteria for listing discussions. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscussionFilter {
    /// Only discussions whose given task is in the given status
    pub status: Option<(TaskId, TaskStatus)>,
    /// Case-insensitive substring of the title or repository
    pub search: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    /// Repository language, compared case-insensitively
    pub language: Option<String>,
    pub batch: Option<String>,
}

impl DiscussionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, task: TaskId, status: TaskStatus) -> Self {
        self.status = Some((task, status));
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_from = from;
        self.created_to = to;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn matches(&self, discussion: &Discussion) -> bool {
        if let Some((task, status)) = self.status {
            if discussion.task(task).status != status {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !discussion.title.to_lowercase().contains(&needle)
                && !discussion.repository.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if self.created_from.is_some_and(|from| discussion.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| discussion.created_at > to) {
            return false;
        }

        if let Some(language) = &self.language {
            let matches_language = discussion
                .language
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(language));
            if !matches_language {
                return false;
            }
        }

        if let Some(batch) = &self.batch {
            if discussion.batch.as_deref() != Some(batch.as_str()) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Discussion {
        Discussion::new(
            "d1",
            "Async runtime panics on shutdown",
            "https://github.com/acme/runtime/discussions/1",
            "acme/runtime",
        )
        .with_language("Rust")
        .with_batch("batch-7")
        .with_created_at(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_filter_matches() {
        assert!(DiscussionFilter::new().matches(&sample()));
    }

    #[test]
    fn test_search_title_and_repository() {
        assert!(DiscussionFilter::new().with_search("PANICS").matches(&sample()));
        assert!(DiscussionFilter::new().with_search("acme/run").matches(&sample()));
        assert!(!DiscussionFilter::new().with_search("database").matches(&sample()));
    }

    #[test]
    fn test_status_filter() {
        let discussion = sample();
        assert!(
            DiscussionFilter::new()
                .with_status(TaskId::Task1, TaskStatus::Unlocked)
                .matches(&discussion)
        );
        assert!(
            !DiscussionFilter::new()
                .with_status(TaskId::Task2, TaskStatus::Unlocked)
                .matches(&discussion)
        );
    }

    #[test]
    fn test_date_language_and_batch() {
        let discussion = sample();
        let before = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        assert!(
            DiscussionFilter::new()
                .with_created_between(Some(before), Some(after))
                .matches(&discussion)
        );
        assert!(
            !DiscussionFilter::new()
                .with_created_between(Some(after), None)
                .matches(&discussion)
        );
        assert!(DiscussionFilter::new().with_language("rust").matches(&discussion));
        assert!(!DiscussionFilter::new().with_language("Go").matches(&discussion));
        assert!(DiscussionFilter::new().with_batch("batch-7").matches(&discussion));
        assert!(!DiscussionFilter::new().with_batch("batch-8").matches(&discussion));
    }
}
