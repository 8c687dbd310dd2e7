//! Annotations and consensus records.
//!
//! - [`value::FieldValue`] - tagged union of every answer kind
//! - [`data::AnnotationData`] - the field-keyed answers of one submission
//! - [`entities::Annotation`] / [`entities::ConsensusAnnotation`]

pub mod data;
pub mod entities;
pub mod value;

pub use data::{AnnotationData, companion_base, is_text_companion};
pub use entities::{Annotation, ConsensusAnnotation, ConsensusOrigin, validate_stars};
pub use value::{Claim, FieldValue, NOT_APPLICABLE, SupportingDoc, ValueKind};
