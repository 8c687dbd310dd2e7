//! Task decomposition into subtasks and forms.
//!
//! Every task is an ordered list of [`SubTaskDef`]s. Task 3 additionally
//! repeats its question/answer subtasks once per form (see [`forms`]).

pub mod cascade;
mod catalog;
pub mod forms;
pub mod schema;

pub use cascade::{CascadeRule, CascadeScope, apply_cascade};
pub use forms::{Form, FormKind, FormSet, add_form, duplicate_form, form_key, parse_form_key};
pub use schema::{BoolLabels, FieldRef, FieldScope, InputKind, SubTaskDef, TaskSchema};
