//! Built-in subtask catalog for the three tasks.

use super::cascade::{CascadeRule, CascadeScope};
use super::schema::{FieldScope, InputKind, SubTaskDef, TaskSchema};
use crate::annotation::value::NOT_APPLICABLE;
use crate::discussion::task::TaskId;

pub(crate) fn schema_for(task: TaskId) -> TaskSchema {
    match task {
        TaskId::Task1 => task1(),
        TaskId::Task2 => task2(),
        TaskId::Task3 => task3(),
    }
}

fn consensus() -> SubTaskDef {
    SubTaskDef::new("consensus", "Consensus", InputKind::Consensus)
}

fn task1() -> TaskSchema {
    TaskSchema::new(
        TaskId::Task1,
        vec![
            SubTaskDef::single_select("relevance", "Is the question relevant?", &["Yes", "No"]),
            SubTaskDef::single_select(
                "learning",
                "Does the discussion teach something?",
                &["Yes", "No", NOT_APPLICABLE],
            ),
            SubTaskDef::single_select(
                "clarity",
                "Is the question clear?",
                &["Yes", "No", NOT_APPLICABLE],
            ),
            SubTaskDef::single_select(
                "grounded",
                "Is the answer grounded in the discussion?",
                &["True", "False", NOT_APPLICABLE],
            )
            .with_bool_labels("True", "False"),
            consensus(),
        ],
    )
    .with_cascade(CascadeRule::new("relevance", "No", CascadeScope::AllOthers))
    .with_cascade(CascadeRule::new("learning", "No", CascadeScope::After))
}

fn task2() -> TaskSchema {
    TaskSchema::new(
        TaskId::Task2,
        vec![
            SubTaskDef::single_select(
                "aspects",
                "Does the answer address all aspects?",
                &["Yes", "No"],
            ),
            SubTaskDef::single_select(
                "explanation",
                "Is the answer explained?",
                &["Yes", "No"],
            ),
            SubTaskDef::single_select(
                "execution",
                "Does the code execute?",
                &["Executable", "Not Executable", NOT_APPLICABLE],
            ),
            SubTaskDef::new("short_answer_list", "Short answer claims", InputKind::Claims),
            SubTaskDef::new("supporting_docs", "Supporting documents", InputKind::SupportingDocs),
            consensus(),
        ],
    )
}

fn task3() -> TaskSchema {
    TaskSchema::new(
        TaskId::Task3,
        vec![
            SubTaskDef::new("rewrite", "Rewritten question", InputKind::FreeText)
                .in_scope(FieldScope::Question),
            SubTaskDef::new("classify", "Question type", InputKind::MultiSelect)
                .with_options(&["Search", "Reasoning", "Multi-hop", "Open-ended"])
                .in_scope(FieldScope::Question),
            SubTaskDef::new("short_answer_list", "Short answer claims", InputKind::Claims)
                .in_scope(FieldScope::Answer),
            SubTaskDef::new("long_answer", "Long answer", InputKind::FreeText)
                .in_scope(FieldScope::Answer),
            SubTaskDef::new("supporting_docs", "Supporting documents", InputKind::SupportingDocs)
                .in_scope(FieldScope::Answer),
            consensus(),
        ],
    )
}
