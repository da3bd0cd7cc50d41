//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{AuthError, ConnectionError};

/// Errors returned when attaching a transport to a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The display name was refused; the transport has been closed
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),

    /// The connection could not be started; the transport has been closed
    #[error("connection failed: {0}")]
    Connection(#[from] ConnectionError),
}
