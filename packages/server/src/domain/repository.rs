//! Repository traits owned by the domain layer.
//!
//! Implementations live in `infrastructure::repository`; the domain and
//! usecase layers only see these traits (dependency inversion).

use super::{User, UserId, error::AuthError};

/// Issues and tracks user identities.
#[cfg_attr(test, mockall::automock)]
pub trait UserDirectory: Send + Sync {
    /// Issue a new identity for `display_name`.
    fn register(&self, display_name: &str) -> Result<User, AuthError>;

    /// Forget an identity. Returns `false` when it was unknown.
    fn release(&self, id: &UserId) -> bool;

    /// Number of identities currently issued.
    fn count(&self) -> usize;
}
