//! Per-annotation N/A cascades.
//!
//! A cascade is a rule "when `field` is answered `value`, the subtasks in
//! `scope` no longer apply". Rules are evaluated in order and the first match
//! wins. The synthetic consensus field is never touched.

use super::schema::{InputKind, TaskSchema};
use crate::annotation::data::AnnotationData;
use crate::annotation::value::FieldValue;

/// Which subtasks a cascade marks `N/A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeScope {
    /// Every other task-level subtask
    AllOthers,
    /// Subtasks ordered after the trigger field
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeRule {
    pub field: String,
    pub value: String,
    pub scope: CascadeScope,
}

impl CascadeRule {
    pub fn new(field: impl Into<String>, value: impl Into<String>, scope: CascadeScope) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            scope,
        }
    }

    fn triggered_by(&self, schema: &TaskSchema, data: &AnnotationData) -> bool {
        let Some(def) = schema.subtask(&self.field) else {
            return false;
        };
        data.get(&self.field)
            .and_then(|value| def.normalized_choice(value))
            .is_some_and(|choice| choice == self.value)
    }

    fn targets<'a>(&self, schema: &'a TaskSchema) -> Vec<&'a str> {
        let start = match self.scope {
            CascadeScope::AllOthers => 0,
            CascadeScope::After => match schema.position(&self.field) {
                Some(index) => index + 1,
                None => return Vec::new(),
            },
        };

        schema.subtasks[start..]
            .iter()
            .filter(|s| s.id != self.field)
            .filter(|s| s.kind != InputKind::Consensus)
            .filter(|s| !s.scope.is_form_scoped())
            .map(|s| s.id.as_str())
            .collect()
    }
}

/// Apply the schema's cascade rules to `data` in place.
///
/// Returns the ids of the subtasks that were set to `N/A`.
pub fn apply_cascade(schema: &TaskSchema, data: &mut AnnotationData) -> Vec<String> {
    let Some(rule) = schema
        .cascades
        .iter()
        .find(|rule| rule.triggered_by(schema, data))
    else {
        return Vec::new();
    };

    let targets: Vec<String> = rule.targets(schema).into_iter().map(String::from).collect();
    for id in &targets {
        data.insert(id.clone(), FieldValue::not_applicable());
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::task::TaskId;

    fn task1() -> TaskSchema {
        TaskSchema::for_task(TaskId::Task1)
    }

    #[test]
    fn test_relevance_no_marks_everything_else() {
        let mut data = AnnotationData::new()
            .with("relevance", "No")
            .with("learning", "Yes")
            .with("clarity", "Yes")
            .with("grounded", true)
            .with("consensus", "Agreement");

        let changed = apply_cascade(&task1(), &mut data);

        assert_eq!(changed, vec!["learning", "clarity", "grounded"]);
        assert!(data.get("learning").unwrap().is_not_applicable());
        assert!(data.get("clarity").unwrap().is_not_applicable());
        assert!(data.get("grounded").unwrap().is_not_applicable());
        assert_eq!(data.text("relevance"), Some("No"));
        assert_eq!(data.text("consensus"), Some("Agreement"));
    }

    #[test]
    fn test_learning_no_marks_later_subtasks_only() {
        let mut data = AnnotationData::new()
            .with("relevance", "Yes")
            .with("learning", "No")
            .with("clarity", "Yes");

        let changed = apply_cascade(&task1(), &mut data);

        assert_eq!(changed, vec!["clarity", "grounded"]);
        assert_eq!(data.text("relevance"), Some("Yes"));
        assert_eq!(data.text("learning"), Some("No"));
        assert!(data.get("clarity").unwrap().is_not_applicable());
        assert!(data.get("grounded").unwrap().is_not_applicable());
        assert!(!data.contains_key("consensus"));
    }

    #[test]
    fn test_relevance_rule_wins_over_learning_rule() {
        let mut data = AnnotationData::new()
            .with("relevance", "No")
            .with("learning", "No");

        apply_cascade(&task1(), &mut data);

        assert!(data.get("learning").unwrap().is_not_applicable());
    }

    #[test]
    fn test_no_trigger_leaves_data_untouched() {
        let mut data = AnnotationData::new()
            .with("relevance", "Yes")
            .with("learning", "Yes")
            .with("clarity", "No");
        let before = data.clone();

        assert!(apply_cascade(&task1(), &mut data).is_empty());
        assert_eq!(data, before);
    }

    #[test]
    fn test_tasks_without_rules() {
        let mut data = AnnotationData::new().with("aspects", "No");
        assert!(apply_cascade(&TaskSchema::for_task(TaskId::Task2), &mut data).is_empty());
    }
}
