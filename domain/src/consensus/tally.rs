//! Vote tallies for single-select fields.

use crate::annotation::value::FieldValue;
use crate::core::ids::UserId;

/// One distinct value and who voted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TallyEntry {
    /// Normalized comparison key
    pub key: String,
    /// Value written to the consensus if this entry wins
    pub value: FieldValue,
    pub voters: Vec<UserId>,
}

impl TallyEntry {
    pub fn count(&self) -> usize {
        self.voters.len()
    }
}

/// What a tally decided.
#[derive(Debug, Clone, PartialEq)]
pub enum TallyDecision<'a> {
    /// Nobody answered
    Empty,
    /// A single value has the highest count (≥ 2)
    Winner(&'a TallyEntry),
    /// Several values share the highest count (≥ 2); the first one to
    /// appear wins the tie-break
    Tied {
        winner: &'a TallyEntry,
        contenders: Vec<&'a TallyEntry>,
    },
    /// Every distinct value was chosen once
    NoAgreement,
}

/// Counts votes in submission order.
///
/// Entries keep the order in which values first appeared, so the earliest
/// submitter's value always comes first among equals.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<TallyEntry>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vote. Must be called in submission order.
    pub fn record(&mut self, key: impl Into<String>, value: FieldValue, voter: &UserId) {
        let key = key.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.voters.push(voter.clone()),
            None => self.entries.push(TallyEntry {
                key,
                value,
                voters: vec![voter.clone()],
            }),
        }
    }

    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Number of votes recorded
    pub fn total(&self) -> usize {
        self.entries.iter().map(TallyEntry::count).sum()
    }

    pub fn decide(&self) -> TallyDecision<'_> {
        let Some(top) = self.entries.iter().map(TallyEntry::count).max() else {
            return TallyDecision::Empty;
        };
        if top < 2 {
            return TallyDecision::NoAgreement;
        }

        let leaders: Vec<&TallyEntry> = self.entries.iter().filter(|e| e.count() == top).collect();
        match leaders.as_slice() {
            [single] => TallyDecision::Winner(single),
            [first, ..] => TallyDecision::Tied {
                winner: first,
                contenders: leaders.clone(),
            },
            [] => TallyDecision::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(votes: &[&str]) -> Tally {
        let mut tally = Tally::new();
        for (i, vote) in votes.iter().enumerate() {
            tally.record(*vote, FieldValue::text(*vote), &UserId::new(format!("u{i}")));
        }
        tally
    }

    #[test]
    fn test_winner() {
        let tally = tally(&["Yes", "No", "Yes"]);
        match tally.decide() {
            TallyDecision::Winner(entry) => {
                assert_eq!(entry.key, "Yes");
                assert_eq!(entry.count(), 2);
            }
            other => panic!("expected winner, got {:?}", other),
        }
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let tally = tally(&["No", "Yes", "Yes", "No", "N/A"]);
        match tally.decide() {
            TallyDecision::Tied { winner, contenders } => {
                assert_eq!(winner.key, "No");
                assert_eq!(contenders.len(), 2);
            }
            other => panic!("expected tie, got {:?}", other),
        }
    }

    #[test]
    fn test_all_distinct_is_no_agreement() {
        assert_eq!(tally(&["A", "B", "C"]).decide(), TallyDecision::NoAgreement);
        assert_eq!(tally(&["A"]).decide(), TallyDecision::NoAgreement);
    }

    #[test]
    fn test_empty() {
        assert_eq!(Tally::new().decide(), TallyDecision::Empty);
    }
}
