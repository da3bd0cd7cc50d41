//! Domain factories for creating identifiers.

use super::{
    RoomName, SessionId, UserId,
    error::ValueObjectError,
};

/// Factory for generating SessionId instances.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId from a random UUID v4 (128 bits).
    pub fn generate() -> SessionId {
        // A hyphenated UUID is never empty.
        SessionId(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for generating RoomName instances when the caller supplies none.
pub struct RoomNameFactory;

impl RoomNameFactory {
    /// Generate a new RoomName with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RoomName, ValueObjectError> {
        RoomName::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Factory for directory-issued user identifiers.
pub struct UserIdFactory;

impl UserIdFactory {
    /// Build `user_<sequence>_<unix_secs>`.
    pub fn from_sequence(sequence: u64, unix_secs: i64) -> UserId {
        UserId(format!("user_{sequence}_{unix_secs}"))
    }
}
