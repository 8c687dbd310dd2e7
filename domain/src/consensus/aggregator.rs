//! Field-by-field consensus aggregation.
//!
//! Each key found in any annotation is reduced independently:
//!
//! | Field | Reduction |
//! |-------|-----------|
//! | single-select, multi-select | vote ([`Tally`]) |
//! | `*_text` companions, free text | first non-empty text |
//! | `short_answer_list` | concatenate claims |
//! | `supporting_docs` | union, first-seen order |
//!
//! Annotations are processed in submission order (timestamp, then user id),
//! which is what "earliest" means for tie-breaks and first-text selection.

use super::outcome::{AgreementStatus, ConsensusResult, FieldOutcome};
use super::rule::AgreementRule;
use super::tally::{Tally, TallyDecision};
use crate::annotation::data::{AnnotationData, is_text_companion};
use crate::annotation::entities::Annotation;
use crate::annotation::value::{FieldValue, SupportingDoc};
use crate::form::schema::{BoolLabels, InputKind, SubTaskDef, TaskSchema};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    Vote,
    FirstText,
    ConcatClaims,
    UnionDocs,
}

/// Reduces a task's annotations to one consensus record
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusAggregator {
    rule: AgreementRule,
}

impl ConsensusAggregator {
    pub fn new(rule: AgreementRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> AgreementRule {
        self.rule
    }

    /// Aggregate `annotations` for the task described by `schema`.
    ///
    /// An empty slice yields empty data and no agreement.
    pub fn aggregate(&self, schema: &TaskSchema, annotations: &[Annotation]) -> ConsensusResult {
        let consensus_key = schema.consensus_key().to_string();

        let mut ordered: Vec<&Annotation> = annotations.iter().collect();
        ordered.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let keys: BTreeSet<&String> = ordered
            .iter()
            .flat_map(|a| a.data.keys())
            .filter(|key| **key != consensus_key)
            .collect();

        let mut data = AnnotationData::new();
        let mut fields = BTreeMap::new();

        for key in keys {
            let Some(reduction) = reduction_for(schema, key, &ordered) else {
                continue;
            };
            let def = schema.resolve(key).map(|field| field.def);

            let outcome = match reduction {
                Reduction::Vote => self.vote(key, def, &ordered, &mut data),
                Reduction::FirstText => first_text(key, &ordered, &mut data),
                Reduction::ConcatClaims => concat_claims(key, &ordered, &mut data),
                Reduction::UnionDocs => union_docs(key, &ordered, &mut data),
            };
            if let Some(outcome) = outcome {
                fields.insert(key.clone(), outcome);
            }
        }

        let agreement = !ordered.is_empty() && fields.values().all(FieldOutcome::agreed);
        data.insert(
            consensus_key,
            AgreementStatus::from_bool(agreement).label(),
        );

        ConsensusResult {
            data,
            agreement,
            annotators: ordered.len(),
            fields,
        }
    }

    fn vote(
        &self,
        key: &str,
        def: Option<&SubTaskDef>,
        ordered: &[&Annotation],
        data: &mut AnnotationData,
    ) -> Option<FieldOutcome> {
        let mut tally = Tally::new();
        for annotation in ordered {
            let Some(value) = annotation.data.get(key) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if let Some((vote_key, normalized)) = ballot(def, value) {
                tally.record(vote_key, normalized, &annotation.user_id);
            }
        }

        let voters = tally.total();
        match tally.decide() {
            TallyDecision::Empty => None,
            TallyDecision::Winner(entry) => {
                data.insert(key, entry.value.clone());
                Some(FieldOutcome::Resolved {
                    value: entry.value.clone(),
                    votes: entry.count(),
                    voters,
                    agreed: self.rule.is_satisfied(entry.count(), voters),
                })
            }
            TallyDecision::Tied { winner, contenders } => {
                data.insert(key, winner.value.clone());
                Some(FieldOutcome::Tied {
                    value: winner.value.clone(),
                    votes: winner.count(),
                    voters,
                    contenders: contenders.iter().map(|e| e.key.clone()).collect(),
                })
            }
            TallyDecision::NoAgreement => Some(FieldOutcome::NoAgreement {
                voters,
                values: tally.entries().iter().map(|e| e.key.clone()).collect(),
            }),
        }
    }
}

fn reduction_for(schema: &TaskSchema, key: &str, ordered: &[&Annotation]) -> Option<Reduction> {
    if let Some(field) = schema.resolve(key) {
        if field.companion {
            return Some(Reduction::FirstText);
        }
        return match field.def.kind {
            InputKind::SingleSelect | InputKind::MultiSelect => Some(Reduction::Vote),
            InputKind::FreeText => Some(Reduction::FirstText),
            InputKind::Claims => Some(Reduction::ConcatClaims),
            InputKind::SupportingDocs => Some(Reduction::UnionDocs),
            InputKind::Consensus => None,
        };
    }

    if is_text_companion(key) {
        return Some(Reduction::FirstText);
    }

    // Keys outside the schema fall back to the shape of the first real value
    let sample = ordered
        .iter()
        .filter_map(|a| a.data.get(key))
        .find(|v| !v.is_empty())?;
    Some(match sample {
        FieldValue::Bool(_) | FieldValue::Text(_) | FieldValue::List(_) => Reduction::Vote,
        FieldValue::Claims(_) => Reduction::ConcatClaims,
        FieldValue::Docs(_) => Reduction::UnionDocs,
    })
}

/// Comparison key and stored value of one vote
fn ballot(def: Option<&SubTaskDef>, value: &FieldValue) -> Option<(String, FieldValue)> {
    match value {
        FieldValue::Bool(b) => {
            let label = match def {
                Some(def) => def.bool_labels.clone().unwrap_or_default().label(*b).to_string(),
                None => BoolLabels::default().label(*b).to_string(),
            };
            Some((label.clone(), FieldValue::Text(label)))
        }
        FieldValue::Text(s) => Some((s.clone(), value.clone())),
        // Selections compare as sets
        FieldValue::List(items) => {
            let mut sorted = items.clone();
            sorted.sort();
            sorted.dedup();
            Some((sorted.join(", "), FieldValue::List(sorted)))
        }
        FieldValue::Claims(_) | FieldValue::Docs(_) => None,
    }
}

fn first_text(key: &str, ordered: &[&Annotation], data: &mut AnnotationData) -> Option<FieldOutcome> {
    let (author, text) = ordered.iter().find_map(|a| {
        a.data
            .text(key)
            .filter(|t| !t.trim().is_empty())
            .map(|t| (a.user_id.clone(), t.to_string()))
    })?;
    data.insert(key, text);
    Some(FieldOutcome::FirstText { author })
}

fn concat_claims(key: &str, ordered: &[&Annotation], data: &mut AnnotationData) -> Option<FieldOutcome> {
    let mut claims = Vec::new();
    let mut contributors = 0;
    for annotation in ordered {
        if let Some(FieldValue::Claims(own)) = annotation.data.get(key) {
            if !own.is_empty() {
                contributors += 1;
                claims.extend(own.iter().cloned());
            }
        }
    }
    if contributors == 0 {
        return None;
    }

    let entries = claims.len();
    data.insert(key, FieldValue::Claims(claims));
    Some(FieldOutcome::Merged {
        entries,
        contributors,
    })
}

fn union_docs(key: &str, ordered: &[&Annotation], data: &mut AnnotationData) -> Option<FieldOutcome> {
    let mut seen: HashSet<SupportingDoc> = HashSet::new();
    let mut docs = Vec::new();
    let mut contributors = 0;
    for annotation in ordered {
        if let Some(FieldValue::Docs(own)) = annotation.data.get(key) {
            if !own.is_empty() {
                contributors += 1;
            }
            for doc in own {
                if seen.insert(doc.clone()) {
                    docs.push(doc.clone());
                }
            }
        }
    }
    if contributors == 0 {
        return None;
    }

    let entries = docs.len();
    data.insert(key, FieldValue::Docs(docs));
    Some(FieldOutcome::Merged {
        entries,
        contributors,
    })
}
