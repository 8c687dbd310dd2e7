//! Identity adapter.
//!
//! Reports a fixed caller resolved from CLI flags and the `[identity]`
//! config section. There is no authentication.

use annotation_application::IdentityProvider;
use annotation_domain::{Actor, Role, UserId};

/// Name used when neither a flag, the config nor the environment names a user
const FALLBACK_USER: &str = "anonymous";

/// Identity provider that always reports the same actor
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    actor: Actor,
}

impl StaticIdentityProvider {
    pub fn new(actor: Actor) -> Self {
        Self { actor }
    }

    /// Resolve the user from the first non-blank candidate, then `$USER`
    pub fn resolve(candidates: &[Option<&str>], role: Role) -> Self {
        let user = candidates
            .iter()
            .flatten()
            .map(|u| u.trim())
            .find(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| FALLBACK_USER.to_string());
        Self::new(Actor::new(UserId::new(user), role))
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_actor(&self) -> Actor {
        self.actor.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_blank_candidate_wins() {
        let provider =
            StaticIdentityProvider::resolve(&[None, Some("  "), Some("lead"), Some("bob")], Role::PodLead);
        let actor = provider.current_actor();
        assert_eq!(actor.user_id.as_str(), "lead");
        assert!(actor.is_reviewer());
    }

    #[test]
    fn test_fixed_actor() {
        let provider = StaticIdentityProvider::new(Actor::annotator("alice"));
        assert_eq!(provider.current_actor(), Actor::annotator("alice"));
    }
}
