//! Consensus aggregation
//!
//! Turns the per-annotator records of one task into a single consensus
//! record plus a task-level agreement signal.
//!
//! - [`AgreementRule`] decides when a winning value counts as agreement
//! - [`Tally`] counts single-select votes in submission order
//! - [`ConsensusAggregator`] applies the per-field reductions

pub mod aggregator;
pub mod outcome;
pub mod rule;
pub mod tally;

pub use aggregator::ConsensusAggregator;
pub use outcome::{AgreementStatus, ConsensusResult, FieldOutcome};
pub use rule::AgreementRule;
pub use tally::{Tally, TallyDecision, TallyEntry};
