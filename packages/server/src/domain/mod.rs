//! Domain layer for the chat server.
//!
//! This module contains the room/connection core and the business rules
//! around it, independent of DTOs and of any concrete transport.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod format;
pub mod registry;
pub mod repository;
pub mod room;
pub mod transport;
pub mod value_object;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use connection::Connection;
pub use entity::User;
pub use error::{AuthError, ConnectionError, RoomError, TransportError, ValueObjectError};
pub use factory::{RoomNameFactory, SessionIdFactory, UserIdFactory};
pub use registry::{RoomRegistry, RoomSummary};
#[cfg(test)]
pub use repository::MockUserDirectory;
pub use repository::UserDirectory;
pub use room::Room;
pub use transport::{MessageSink, MessageSource, Transport};
pub use value_object::{DisplayName, RoomName, SessionId, Timestamp, UserId};

/// Lock a std mutex, recovering the data if a previous holder panicked.
///
/// Critical sections in this crate never leave state half-updated, so a
/// poisoned lock is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
