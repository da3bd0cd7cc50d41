//! Room: a named broadcast group.
//!
//! All membership changes and fan-outs for one room run under that room's
//! mutex, which gives every operation a consistent membership snapshot and
//! totally orders the broadcasts of a room. `Connection::deliver` only
//! enqueues, so holding the mutex during fan-out never waits on the network.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{
    Connection, RoomName, SessionId, Timestamp,
    error::RoomError,
    format::{self, ANONYMOUS_LABEL},
    lock,
};

#[derive(Default)]
struct Membership {
    members: HashMap<SessionId, Arc<Connection>>,
    /// Set by the registry when it reclaims the room; no further joins.
    retired: bool,
}

pub struct Room {
    name: RoomName,
    created_at: Timestamp,
    state: Mutex<Membership>,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            created_at: Timestamp::now(),
            state: Mutex::new(Membership::default()),
        }
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Add `connection` and announce it.
    ///
    /// Other members get the new head count, the joiner gets a welcome line.
    /// Joining twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Retired` if the registry already reclaimed this
    /// room; the caller should fetch a fresh one and retry.
    pub fn join(&self, connection: Arc<Connection>) -> Result<(), RoomError> {
        let mut state = lock(&self.state);
        if state.retired {
            return Err(RoomError::Retired(self.name.to_string()));
        }

        let session_id = connection.session_id().clone();
        if state.members.contains_key(&session_id) {
            tracing::debug!("Session '{}' is already in room '{}'", session_id, self.name);
            return Ok(());
        }
        state.members.insert(session_id.clone(), connection);

        let joined = format::joined_notice(state.members.len());
        let welcome = format::welcome_notice(self.name.as_str());
        for (id, member) in &state.members {
            if *id == session_id {
                member.deliver(welcome.clone());
            } else {
                member.deliver(joined.clone());
            }
        }

        tracing::info!(
            "Session '{}' joined room '{}' ({} members)",
            session_id,
            self.name,
            state.members.len()
        );
        Ok(())
    }

    /// Remove `connection` and tell the remaining members.
    ///
    /// Leaving a room the connection is not in is a no-op, which absorbs
    /// duplicate close events.
    pub fn leave(&self, connection: &Connection) {
        let mut state = lock(&self.state);
        if state.members.remove(connection.session_id()).is_none() {
            return;
        }

        let left = format::left_notice(state.members.len());
        for member in state.members.values() {
            member.deliver(left.clone());
        }

        tracing::info!(
            "Session '{}' left room '{}' ({} remaining)",
            connection.session_id(),
            self.name,
            state.members.len()
        );
    }

    /// Format `message` and deliver it to every member, sender included.
    ///
    /// `sender == None` marks a server-originated line.
    pub fn broadcast(&self, message: &str, sender: Option<&Connection>) {
        let sender_name = sender.map(|connection| {
            connection
                .display_name()
                .unwrap_or_else(|| ANONYMOUS_LABEL.to_string())
        });

        let state = lock(&self.state);
        let line = format::format_chat_line(
            sender_name.as_deref(),
            message,
            &roomcast_shared::time::now_local(),
        );
        for member in state.members.values() {
            member.deliver(line.clone());
        }

        tracing::debug!(
            "Broadcast in room '{}' to {} members",
            self.name,
            state.members.len()
        );
    }

    /// Current membership count.
    pub fn size(&self) -> usize {
        lock(&self.state).members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Membership snapshot. Callers may act on it without holding the room.
    pub fn members(&self) -> Vec<Arc<Connection>> {
        lock(&self.state).members.values().cloned().collect()
    }

    pub fn is_retired(&self) -> bool {
        lock(&self.state).retired
    }

    /// Retire the room if it has no members. Called by the registry while
    /// it holds its own table lock.
    pub(super) fn retire_if_empty(&self) -> bool {
        let mut state = lock(&self.state);
        if state.members.is_empty() {
            state.retired = true;
        }
        state.retired
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("name", &self.name)
            .field("size", &self.size())
            .finish()
    }
}
