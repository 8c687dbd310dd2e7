//! Task 3 form editing
//!
//! Produces task 3 annotation data with one more form, either blank or
//! copied from an existing form. Nothing is stored here; the edited data is
//! submitted like any other annotation.

use crate::ports::annotation_repository::AnnotationRepository;
use crate::ports::discussion_repository::DiscussionRepository;
use crate::ports::repository::RepositoryError;
use annotation_domain::{
    AnnotationData, DiscussionId, DomainError, Form, FormKind, FormSet, TaskId, TaskSchema,
    UserId, add_form, duplicate_form,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while editing forms
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Discussion not found: {0}")]
    DiscussionNotFound(DiscussionId),

    #[error("Invalid form data: {0}")]
    InvalidForm(#[source] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The change to make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEdit {
    /// Append a blank form
    Add(FormKind),
    /// Copy form `source` into a new form
    Duplicate { source: u32, kind: FormKind },
}

impl FormEdit {
    pub fn kind(&self) -> FormKind {
        match self {
            FormEdit::Add(kind) | FormEdit::Duplicate { kind, .. } => *kind,
        }
    }
}

/// Input for [`EditFormsUseCase::execute`]
#[derive(Debug, Clone)]
pub struct FormEditInput {
    pub discussion_id: DiscussionId,
    pub user_id: UserId,
    /// Data to edit; the user's stored task 3 annotation when absent
    pub base: Option<AnnotationData>,
    pub edit: FormEdit,
}

impl FormEditInput {
    pub fn new(discussion_id: impl Into<DiscussionId>, user_id: impl Into<UserId>, edit: FormEdit) -> Self {
        Self {
            discussion_id: discussion_id.into(),
            user_id: user_id.into(),
            base: None,
            edit,
        }
    }

    pub fn with_base(mut self, data: AnnotationData) -> Self {
        self.base = Some(data);
        self
    }
}

/// Edited data and the forms it now holds
#[derive(Debug, Clone, Serialize)]
pub struct FormEditOutcome {
    pub discussion_id: DiscussionId,
    /// Number of the new form
    pub number: u32,
    pub kind: FormKind,
    pub forms: Vec<Form>,
    pub data: AnnotationData,
}

/// Use case for adding and duplicating task 3 forms
pub struct EditFormsUseCase {
    discussions: Arc<dyn DiscussionRepository>,
    annotations: Arc<dyn AnnotationRepository>,
}

impl EditFormsUseCase {
    pub fn new(
        discussions: Arc<dyn DiscussionRepository>,
        annotations: Arc<dyn AnnotationRepository>,
    ) -> Self {
        Self {
            discussions,
            annotations,
        }
    }

    pub async fn execute(&self, input: FormEditInput) -> Result<FormEditOutcome, FormError> {
        let FormEditInput {
            discussion_id,
            user_id,
            base,
            edit,
        } = input;

        if self.discussions.get(&discussion_id).await?.is_none() {
            return Err(FormError::DiscussionNotFound(discussion_id));
        }

        let schema = TaskSchema::for_task(TaskId::Task3);
        let mut data = match base {
            Some(data) => {
                schema.validate(&data).map_err(FormError::InvalidForm)?;
                data
            }
            None => self
                .annotations
                .get(&discussion_id, TaskId::Task3, &user_id)
                .await?
                .map(|annotation| annotation.data)
                .unwrap_or_default(),
        };

        let number = match edit {
            FormEdit::Add(kind) => add_form(&schema, &mut data, kind),
            FormEdit::Duplicate { source, kind } => duplicate_form(&schema, &mut data, source, kind),
        }
        .map_err(FormError::InvalidForm)?;

        let forms = FormSet::from_data(&schema, &data);
        debug!(
            "Form {} ({}) added for {} on {}; {} form(s)",
            number,
            edit.kind(),
            user_id,
            discussion_id,
            forms.len()
        );

        Ok(FormEditOutcome {
            discussion_id,
            number,
            kind: edit.kind(),
            forms: forms.forms().to_vec(),
            data,
        })
    }
}
