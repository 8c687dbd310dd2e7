//! Task 3 forms.
//!
//! Task 3 annotations hold a variable-length list of forms. Each form is an
//! independent set of subtasks stored under `form<N>/<field>` keys, with
//! `N` starting at 1. A *question-only* form carries the question fields; a
//! *question+answer* form carries the answer fields as well.

use super::schema::{FieldScope, TaskSchema};
use crate::annotation::data::AnnotationData;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FORM_PREFIX: &str = "form";

/// Key of `field` inside form `number`
pub fn form_key(number: u32, field: &str) -> String {
    format!("{FORM_PREFIX}{number}/{field}")
}

/// Split `form<N>/<field>` into `(N, field)`
pub fn parse_form_key(key: &str) -> Option<(u32, &str)> {
    let rest = key.strip_prefix(FORM_PREFIX)?;
    let (number, field) = rest.split_once('/')?;
    let number: u32 = number.parse().ok()?;
    if number == 0 || field.is_empty() {
        return None;
    }
    Some((number, field))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    QuestionOnly,
    QuestionAnswer,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::QuestionOnly => "question_only",
            FormKind::QuestionAnswer => "question_answer",
        }
    }

    fn includes(&self, scope: FieldScope) -> bool {
        match scope {
            FieldScope::Task => false,
            FieldScope::Question => true,
            FieldScope::Answer => matches!(self, FormKind::QuestionAnswer),
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub number: u32,
    pub kind: FormKind,
}

/// The forms present in one annotation, ordered by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSet {
    forms: Vec<Form>,
}

impl FormSet {
    /// Inspect `data`; a form with any answer field counts as question+answer
    pub fn from_data(schema: &TaskSchema, data: &AnnotationData) -> Self {
        let mut kinds: BTreeMap<u32, FormKind> = BTreeMap::new();

        for key in data.keys() {
            let Some(field) = schema.resolve(key) else {
                continue;
            };
            let Some(number) = field.form else {
                continue;
            };
            let kind = kinds.entry(number).or_insert(FormKind::QuestionOnly);
            if field.def.scope == FieldScope::Answer {
                *kind = FormKind::QuestionAnswer;
            }
        }

        Self {
            forms: kinds
                .into_iter()
                .map(|(number, kind)| Form { number, kind })
                .collect(),
        }
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn get(&self, number: u32) -> Option<&Form> {
        self.forms.iter().find(|f| f.number == number)
    }

    /// Number the next added form receives
    pub fn next_number(&self) -> Result<u32, DomainError> {
        let last = self.forms.iter().map(|f| f.number).max().unwrap_or(0);
        last.checked_add(1).ok_or(DomainError::FormLimit(last))
    }
}

/// Append an empty form of `kind` to `data`; returns its number
pub fn add_form(
    schema: &TaskSchema,
    data: &mut AnnotationData,
    kind: FormKind,
) -> Result<u32, DomainError> {
    let number = FormSet::from_data(schema, data).next_number()?;
    for def in schema.subtasks.iter().filter(|s| kind.includes(s.scope)) {
        data.insert(form_key(number, &def.id), def.blank_value());
    }
    Ok(number)
}

/// Copy form `source` into a new form of `kind`; returns its number.
///
/// A question-only duplicate copies the question fields (and their
/// companions). A question+answer duplicate copies everything, adding blank
/// answer fields when the source had none.
pub fn duplicate_form(
    schema: &TaskSchema,
    data: &mut AnnotationData,
    source: u32,
    kind: FormKind,
) -> Result<u32, DomainError> {
    let forms = FormSet::from_data(schema, data);
    if forms.get(source).is_none() {
        return Err(DomainError::UnknownForm(source));
    }
    let number = forms.next_number()?;

    let copied: Vec<_> = data
        .iter()
        .filter_map(|(key, value)| {
            let field = schema.resolve(key)?;
            if field.form != Some(source) || !kind.includes(field.def.scope) {
                return None;
            }
            let (_, rest) = parse_form_key(key)?;
            Some((form_key(number, rest), value.clone()))
        })
        .collect();

    for def in schema.subtasks.iter().filter(|s| kind.includes(s.scope)) {
        data.insert(form_key(number, &def.id), def.blank_value());
    }
    for (key, value) in copied {
        data.insert(key, value);
    }

    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::value::{Claim, FieldValue};
    use crate::discussion::task::TaskId;

    fn schema() -> TaskSchema {
        TaskSchema::for_task(TaskId::Task3)
    }

    #[test]
    fn test_parse_form_key() {
        assert_eq!(parse_form_key("form3/rewrite"), Some((3, "rewrite")));
        assert_eq!(parse_form_key("form12/classify_text"), Some((12, "classify_text")));
        assert_eq!(parse_form_key("form0/rewrite"), None);
        assert_eq!(parse_form_key("formx/rewrite"), None);
        assert_eq!(parse_form_key("rewrite"), None);
        assert_eq!(form_key(2, "long_answer"), "form2/long_answer");
    }

    #[test]
    fn test_form_set_infers_kinds() {
        let data = AnnotationData::new()
            .with("form1/rewrite", "What is X?")
            .with("form2/rewrite", "How does Y work?")
            .with("form2/long_answer", "Y works by...")
            .with("consensus", "");

        let forms = FormSet::from_data(&schema(), &data);

        assert_eq!(forms.len(), 2);
        assert_eq!(forms.get(1).unwrap().kind, FormKind::QuestionOnly);
        assert_eq!(forms.get(2).unwrap().kind, FormKind::QuestionAnswer);
        assert_eq!(forms.next_number(), Ok(3));
    }

    #[test]
    fn test_add_form() {
        let schema = schema();
        let mut data = AnnotationData::new();

        assert_eq!(add_form(&schema, &mut data, FormKind::QuestionOnly), Ok(1));
        assert_eq!(add_form(&schema, &mut data, FormKind::QuestionAnswer), Ok(2));

        assert!(data.contains_key("form1/rewrite"));
        assert!(!data.contains_key("form1/long_answer"));
        assert!(data.contains_key("form2/long_answer"));
        assert!(schema.validate(&data).is_ok());
    }

    #[test]
    fn test_duplicate_question_only_drops_answers() {
        let schema = schema();
        let mut data = AnnotationData::new()
            .with("form1/rewrite", "What is X?")
            .with("form1/classify", FieldValue::List(vec!["Search".to_string()]))
            .with("form1/classify_text", "Looks like lookup")
            .with(
                "form1/short_answer_list",
                FieldValue::Claims(vec![Claim::new("X is a crate", 1.0)]),
            );

        let number = duplicate_form(&schema, &mut data, 1, FormKind::QuestionOnly).unwrap();

        assert_eq!(number, 2);
        assert_eq!(data.text("form2/rewrite"), Some("What is X?"));
        assert_eq!(data.text("form2/classify_text"), Some("Looks like lookup"));
        assert!(!data.contains_key("form2/short_answer_list"));
    }

    #[test]
    fn test_duplicate_question_answer_copies_everything() {
        let schema = schema();
        let mut data = AnnotationData::new()
            .with("form1/rewrite", "What is X?")
            .with("form1/long_answer", "X is...");

        let number = duplicate_form(&schema, &mut data, 1, FormKind::QuestionAnswer).unwrap();

        assert_eq!(data.text("form2/long_answer"), Some("X is..."));
        assert!(data.contains_key(&format!("form{number}/supporting_docs")));
    }

    #[test]
    fn test_duplicate_unknown_form() {
        let mut data = AnnotationData::new();
        assert_eq!(
            duplicate_form(&schema(), &mut data, 4, FormKind::QuestionOnly),
            Err(DomainError::UnknownForm(4))
        );
    }

    #[test]
    fn test_highest_form_number_cannot_grow() {
        let schema = schema();
        let mut data = AnnotationData::new().with(form_key(u32::MAX, "rewrite"), "What is X?");

        assert_eq!(
            FormSet::from_data(&schema, &data).next_number(),
            Err(DomainError::FormLimit(u32::MAX))
        );
        assert_eq!(
            add_form(&schema, &mut data, FormKind::QuestionOnly),
            Err(DomainError::FormLimit(u32::MAX))
        );
        assert_eq!(
            duplicate_form(&schema, &mut data, u32::MAX, FormKind::QuestionOnly),
            Err(DomainError::FormLimit(u32::MAX))
        );
        assert_eq!(data.len(), 1);
    }
}
