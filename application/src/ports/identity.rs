//! Identity provider port
//!
//! Authentication is out of scope; adapters simply report who is calling.

use annotation_domain::Actor;

/// Supplies the caller's identity and role
pub trait IdentityProvider: Send + Sync {
    fn current_actor(&self) -> Actor;
}
