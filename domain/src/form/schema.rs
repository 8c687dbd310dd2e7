//! Subtask definitions and key resolution.

use super::cascade::CascadeRule;
use super::forms::parse_form_key;
use crate::annotation::data::{AnnotationData, companion_base};
use crate::annotation::value::{FieldValue, NOT_APPLICABLE, ValueKind};
use crate::core::error::DomainError;
use crate::discussion::task::TaskId;

/// Input modality of a subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// One option out of `options` (booleans allowed when labelled)
    SingleSelect,
    /// Any subset of `options`
    MultiSelect,
    FreeText,
    /// `short_answer_list`: claims with weights
    Claims,
    /// `supporting_docs`: link/paragraph pairs
    SupportingDocs,
    /// The synthetic task-level agreement field
    Consensus,
}

/// Where a subtask lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldScope {
    /// Once per task
    Task,
    /// Once per form, in every form
    Question,
    /// Once per form, only in question+answer forms
    Answer,
}

impl FieldScope {
    pub fn is_form_scoped(&self) -> bool {
        !matches!(self, FieldScope::Task)
    }
}

/// Labels a boolean answer is normalized to before voting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolLabels {
    pub truthy: String,
    pub falsy: String,
}

impl BoolLabels {
    pub fn new(truthy: impl Into<String>, falsy: impl Into<String>) -> Self {
        Self {
            truthy: truthy.into(),
            falsy: falsy.into(),
        }
    }

    pub fn label(&self, value: bool) -> &str {
        if value { &self.truthy } else { &self.falsy }
    }
}

impl Default for BoolLabels {
    fn default() -> Self {
        Self::new("True", "False")
    }
}

/// Definition of one subtask (field) of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskDef {
    pub id: String,
    pub label: String,
    pub kind: InputKind,
    pub options: Vec<String>,
    pub bool_labels: Option<BoolLabels>,
    pub scope: FieldScope,
}

impl SubTaskDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: InputKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            bool_labels: None,
            scope: FieldScope::Task,
        }
    }

    pub fn single_select(id: &str, label: &str, options: &[&str]) -> Self {
        Self::new(id, label, InputKind::SingleSelect).with_options(options)
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_bool_labels(mut self, truthy: &str, falsy: &str) -> Self {
        self.bool_labels = Some(BoolLabels::new(truthy, falsy));
        self
    }

    pub fn in_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// Value stored for a freshly added, unanswered field
    pub fn blank_value(&self) -> FieldValue {
        match self.kind {
            InputKind::SingleSelect | InputKind::FreeText | InputKind::Consensus => {
                FieldValue::text("")
            }
            InputKind::MultiSelect => FieldValue::List(Vec::new()),
            InputKind::Claims => FieldValue::Claims(Vec::new()),
            InputKind::SupportingDocs => FieldValue::Docs(Vec::new()),
        }
    }

    /// Text a single-select value counts as when voting.
    ///
    /// Booleans are mapped to the field's own labels (or `True`/`False`).
    pub fn normalized_choice(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Bool(b) => Some(
                self.bool_labels
                    .clone()
                    .unwrap_or_default()
                    .label(*b)
                    .to_string(),
            ),
            FieldValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn check_value(&self, key: &str, value: &FieldValue) -> Result<(), DomainError> {
        let mismatch = |expected: &str| DomainError::InvalidFieldValue {
            key: key.to_string(),
            reason: format!("expected {}, got {}", expected, value.kind()),
        };

        match (self.kind, value) {
            (InputKind::SingleSelect, FieldValue::Text(s)) => {
                if s.trim().is_empty() || self.options.is_empty() || self.options.contains(s) {
                    Ok(())
                } else {
                    Err(DomainError::InvalidOption {
                        key: key.to_string(),
                        value: s.clone(),
                    })
                }
            }
            (InputKind::SingleSelect, FieldValue::Bool(_)) if self.bool_labels.is_some() => Ok(()),
            (InputKind::SingleSelect, _) => Err(mismatch(ValueKind::Text.as_str())),
            (InputKind::MultiSelect, FieldValue::List(items)) => {
                match items
                    .iter()
                    .find(|item| !self.options.is_empty() && !self.options.contains(item))
                {
                    Some(item) => Err(DomainError::InvalidOption {
                        key: key.to_string(),
                        value: item.clone(),
                    }),
                    None => Ok(()),
                }
            }
            (InputKind::MultiSelect, FieldValue::Text(s)) if s == NOT_APPLICABLE => Ok(()),
            (InputKind::MultiSelect, _) => Err(mismatch(ValueKind::List.as_str())),
            (InputKind::FreeText | InputKind::Consensus, FieldValue::Text(_)) => Ok(()),
            (InputKind::FreeText | InputKind::Consensus, _) => {
                Err(mismatch(ValueKind::Text.as_str()))
            }
            (InputKind::Claims, FieldValue::Claims(_)) => Ok(()),
            (InputKind::SupportingDocs, FieldValue::Docs(_)) => Ok(()),
            // `[]` decodes as an empty string list
            (InputKind::Claims | InputKind::SupportingDocs, FieldValue::List(items))
                if items.is_empty() =>
            {
                Ok(())
            }
            (InputKind::Claims, _) => Err(mismatch(ValueKind::Claims.as_str())),
            (InputKind::SupportingDocs, _) => Err(mismatch(ValueKind::Docs.as_str())),
        }
    }
}

/// A data key resolved against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub def: &'a SubTaskDef,
    /// Form number for task 3 keys (`form2/rewrite` → 2)
    pub form: Option<u32>,
    /// Whether the key is the `_text` companion of `def`
    pub companion: bool,
}

/// The ordered subtasks of a task, plus its N/A cascade rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSchema {
    pub task: TaskId,
    pub subtasks: Vec<SubTaskDef>,
    pub cascades: Vec<CascadeRule>,
}

impl TaskSchema {
    pub fn new(task: TaskId, subtasks: Vec<SubTaskDef>) -> Self {
        Self {
            task,
            subtasks,
            cascades: Vec::new(),
        }
    }

    pub fn with_cascade(mut self, rule: CascadeRule) -> Self {
        self.cascades.push(rule);
        self
    }

    /// Built-in schema of a task
    pub fn for_task(task: TaskId) -> Self {
        super::catalog::schema_for(task)
    }

    pub fn subtask(&self, id: &str) -> Option<&SubTaskDef> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.subtasks.iter().position(|s| s.id == id)
    }

    /// Id of the synthetic agreement field
    pub fn consensus_key(&self) -> &str {
        self.subtasks
            .iter()
            .find(|s| s.kind == InputKind::Consensus)
            .map(|s| s.id.as_str())
            .unwrap_or("consensus")
    }

    /// Whether the task is organised as a list of forms
    pub fn has_forms(&self) -> bool {
        self.subtasks.iter().any(|s| s.scope.is_form_scoped())
    }

    /// Resolve a data key (`clarity`, `clarity_text`, `form1/rewrite`, ...)
    pub fn resolve<'a>(&'a self, key: &str) -> Option<FieldRef<'a>> {
        let (form, rest) = match parse_form_key(key) {
            Some((number, rest)) => (Some(number), rest),
            None => (None, key),
        };

        let (def, companion) = match self.subtask(rest) {
            Some(def) => (def, false),
            None => (self.subtask(companion_base(rest)?)?, true),
        };

        if def.scope.is_form_scoped() != form.is_some() {
            return None;
        }

        Some(FieldRef {
            def,
            form,
            companion,
        })
    }

    /// Check every key and value of `data` against this schema
    pub fn validate(&self, data: &AnnotationData) -> Result<(), DomainError> {
        for (key, value) in data.iter() {
            let field = self.resolve(key).ok_or_else(|| DomainError::UnknownField {
                task: self.task.to_string(),
                key: key.clone(),
            })?;

            if field.companion {
                if value.kind() != ValueKind::Text {
                    return Err(DomainError::InvalidFieldValue {
                        key: key.clone(),
                        reason: format!("companion text must be a string, got {}", value.kind()),
                    });
                }
                continue;
            }

            field.def.check_value(key, value)?;
        }
        Ok(())
    }
}
