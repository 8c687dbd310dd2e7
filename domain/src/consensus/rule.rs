//! Agreement rules for voted fields
//!
//! A voted field "agrees" when its winning value's count satisfies the
//! configured rule over the annotators who answered the field.

use serde::{Deserialize, Serialize};

/// Rule for deciding whether a winning value counts as agreement
///
/// - `Majority`: More than half of the voters (default)
/// - `Unanimous`: Every voter
/// - `AtLeast(n)`: At least n voters
/// - `Percentage(p)`: At least p% of the voters
///
/// # Example
///
/// ```
/// use annotation_domain::consensus::AgreementRule;
///
/// let rule = AgreementRule::Majority;
/// assert!(rule.is_satisfied(2, 3));  // 2/3 > 50%
/// assert!(!rule.is_satisfied(2, 4)); // 2/4 is not a majority
///
/// let strict = AgreementRule::Unanimous;
/// assert!(!strict.is_satisfied(2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgreementRule {
    /// More than half must agree (n/2 + 1)
    #[default]
    Majority,

    /// All voters must agree
    Unanimous,

    /// At least n voters must agree
    AtLeast(usize),

    /// At least this percentage must agree (0-100)
    Percentage(u8),
}

impl AgreementRule {
    /// Check if `agreeing` out of `total` voters satisfies the rule
    pub fn is_satisfied(&self, agreeing: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }

        match self {
            AgreementRule::Majority => agreeing > total / 2,
            AgreementRule::Unanimous => agreeing == total,
            AgreementRule::AtLeast(n) => agreeing >= *n,
            AgreementRule::Percentage(p) => agreeing >= Self::percentage_of(*p, total),
        }
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            AgreementRule::Majority => "majority (more than half)".to_string(),
            AgreementRule::Unanimous => "unanimous (all must agree)".to_string(),
            AgreementRule::AtLeast(n) => format!("at least {} agreeing", n),
            AgreementRule::Percentage(p) => format!("at least {}% agreeing", p),
        }
    }

    fn percentage_of(p: u8, total: usize) -> usize {
        (total as f64 * (p as f64 / 100.0)).ceil() as usize
    }
}

impl std::fmt::Display for AgreementRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for AgreementRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(AgreementRule::Majority),
            "unanimous" => Ok(AgreementRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                Ok(AgreementRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num_str = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num_str.parse().map_err(|_| "Invalid percentage")?;
                if p > 100 {
                    return Err(format!("Percentage out of range: {}", p));
                }
                Ok(AgreementRule::Percentage(p))
            }
            _ => Err(format!(
                "Unknown agreement rule: {}. Valid: majority, unanimous, atleast:N, percentage:N or N%",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_rule() {
        let rule = AgreementRule::Majority;

        // 3 voters: 2 needed
        assert!(!rule.is_satisfied(1, 3));
        assert!(rule.is_satisfied(2, 3));
        assert!(rule.is_satisfied(3, 3));

        // 5 voters: 3 needed
        assert!(!rule.is_satisfied(2, 5));
        assert!(rule.is_satisfied(3, 5));
    }

    #[test]
    fn test_unanimous_rule() {
        let rule = AgreementRule::Unanimous;

        assert!(!rule.is_satisfied(2, 3));
        assert!(rule.is_satisfied(3, 3));
    }

    #[test]
    fn test_at_least_and_percentage() {
        assert!(AgreementRule::AtLeast(2).is_satisfied(2, 5));
        assert!(!AgreementRule::AtLeast(3).is_satisfied(2, 5));

        // 5 voters at 60% = 3
        assert!(!AgreementRule::Percentage(60).is_satisfied(2, 5));
        assert!(AgreementRule::Percentage(60).is_satisfied(3, 5));
    }

    #[test]
    fn test_zero_total() {
        assert!(!AgreementRule::Majority.is_satisfied(0, 0));
        assert!(!AgreementRule::Unanimous.is_satisfied(0, 0));
        assert!(!AgreementRule::AtLeast(0).is_satisfied(0, 0));
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!("majority".parse::<AgreementRule>(), Ok(AgreementRule::Majority));
        assert_eq!("Unanimous".parse::<AgreementRule>(), Ok(AgreementRule::Unanimous));
        assert_eq!("atleast:2".parse::<AgreementRule>(), Ok(AgreementRule::AtLeast(2)));
        assert_eq!("80%".parse::<AgreementRule>(), Ok(AgreementRule::Percentage(80)));
        assert!("150%".parse::<AgreementRule>().is_err());
        assert!("plurality".parse::<AgreementRule>().is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(AgreementRule::default(), AgreementRule::Majority);
    }
}
