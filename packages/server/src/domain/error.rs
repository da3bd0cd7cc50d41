//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// SessionId validation error
    #[error("SessionId cannot be empty")]
    SessionIdEmpty,

    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,
}

/// Errors returned while authenticating a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The requested display name was empty
    #[error("display name cannot be empty")]
    EmptyDisplayName,

    /// The requested display name failed validation
    #[error("invalid display name: {0}")]
    InvalidDisplayName(ValueObjectError),

    /// The connection already carries an identity
    #[error("connection is already authenticated as '{0}'")]
    AlreadyAuthenticated(String),

    /// The user directory refused to issue an identity
    #[error("user directory rejected '{name}': {reason}")]
    Rejected { name: String, reason: String },
}

/// Errors related to Room membership
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// The room was reclaimed by the registry and accepts no new members
    #[error("room '{0}' has been retired")]
    Retired(String),
}

/// Errors related to the Connection lifecycle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// `start` was called more than once
    #[error("connection {0} has already been started")]
    AlreadyStarted(String),

    /// `start` was called after the connection closed
    #[error("connection {0} is closed")]
    Closed(String),
}

/// Errors reported by a transport implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying channel is already closed
    #[error("transport channel closed")]
    Closed,

    /// Any other I/O or protocol failure
    #[error("transport I/O error: {0}")]
    Io(String),
}
