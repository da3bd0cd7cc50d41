//! Core domain entities for the chat server.

use serde::{Deserialize, Serialize};

use super::value_object::{DisplayName, Timestamp, UserId};

/// An identity issued by the user directory.
///
/// Connections hold a copy; the directory stays the owner of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory-assigned identifier
    pub id: UserId,
    /// Name shown next to chat messages
    pub display_name: DisplayName,
    /// When the directory issued this identity
    pub created_at: Timestamp,
}

impl User {
    /// Create a new user
    pub fn new(id: UserId, display_name: DisplayName, created_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            created_at,
        }
    }
}
