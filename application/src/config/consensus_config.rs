//! Consensus parameters - aggregation and draft control.
//!
//! [`ConsensusConfig`] groups the static parameters the lifecycle and
//! consensus use cases need. These are application-layer concerns; the
//! domain only sees the [`AgreementRule`].

use annotation_domain::{AgreementRule, ConsensusAggregator};
use serde::{Deserialize, Serialize};

/// Consensus behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Rule a winning value must satisfy to count as agreement.
    pub rule: AgreementRule,
    /// Store the aggregated draft when a task reaches its quota.
    pub auto_draft: bool,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            rule: AgreementRule::Majority,
            auto_draft: true,
        }
    }
}

impl ConsensusConfig {
    // ==================== Builder Methods ====================

    pub fn with_rule(mut self, rule: AgreementRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_auto_draft(mut self, auto_draft: bool) -> Self {
        self.auto_draft = auto_draft;
        self
    }

    /// Aggregator configured with this rule
    pub fn aggregator(&self) -> ConsensusAggregator {
        ConsensusAggregator::new(self.rule)
    }
}
