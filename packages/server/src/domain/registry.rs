//! RoomRegistry: process-wide lookup of rooms by name.
//!
//! Lock order is always registry table, then room. The table lock is held
//! only for lookup, insert and erase; joins, leaves and broadcasts never
//! touch it.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use serde::Serialize;

use super::{Room, RoomName, RoomNameFactory, Timestamp, ValueObjectError, lock};

/// Advisory snapshot of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub name: RoomName,
    pub member_count: usize,
    pub created_at: Timestamp,
}

#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomName, Arc<Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room called `name`, creating and registering it if absent.
    pub fn get_or_create(&self, name: &RoomName) -> Arc<Room> {
        let mut rooms = lock(&self.rooms);
        if let Some(room) = rooms.get(name) {
            return Arc::clone(room);
        }

        let room = Arc::new(Room::new(name.clone()));
        rooms.insert(name.clone(), Arc::clone(&room));
        tracing::info!("Created room '{}'", name);
        room
    }

    /// Create and register an empty room under a freshly generated name.
    pub fn create_unique(&self) -> Result<Arc<Room>, ValueObjectError> {
        let mut rooms = lock(&self.rooms);
        let name = loop {
            let candidate = RoomNameFactory::generate()?;
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let room = Arc::new(Room::new(name.clone()));
        rooms.insert(name.clone(), Arc::clone(&room));
        tracing::info!("Created room '{}'", name);
        Ok(room)
    }

    /// Look up an existing room without creating it.
    pub fn get(&self, name: &RoomName) -> Option<Arc<Room>> {
        lock(&self.rooms).get(name).cloned()
    }

    /// Drop the registry entry for `name` if the room has no members.
    ///
    /// Emptiness is re-checked under the room's own lock while the table is
    /// held, and the room is retired in the same step. A join racing this
    /// call either lands first (the room stays) or sees the retired room and
    /// retries through [`RoomRegistry::get_or_create`].
    pub fn remove_if_empty(&self, name: &RoomName) -> bool {
        let mut rooms = lock(&self.rooms);
        let Some(room) = rooms.get(name) else {
            return false;
        };
        if !room.retire_if_empty() {
            return false;
        }

        rooms.remove(name);
        tracing::info!("Removed empty room '{}'", name);
        true
    }

    /// Retire and drop every empty room created at least `ttl` ago.
    ///
    /// Rooms normally go away when their last member leaves; this catches
    /// rooms that were created but never joined.
    pub fn reclaim_idle(&self, ttl: Duration) -> usize {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Timestamp::now().value().saturating_sub(ttl_millis);

        let mut rooms = lock(&self.rooms);
        let before = rooms.len();
        rooms.retain(|name, room| {
            if room.created_at().value() > cutoff || !room.retire_if_empty() {
                return true;
            }
            tracing::info!("Reclaimed idle room '{}'", name);
            false
        });
        before - rooms.len()
    }

    /// Snapshot of all rooms, sorted by name. Stale as soon as it returns.
    pub fn list(&self) -> Vec<RoomSummary> {
        let rooms = lock(&self.rooms);
        let mut summaries: Vec<RoomSummary> = rooms
            .values()
            .map(|room| RoomSummary {
                name: room.name().clone(),
                member_count: room.size(),
                created_at: room.created_at(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    pub fn len(&self) -> usize {
        lock(&self.rooms).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every member of every room, e.g. on server shutdown.
    ///
    /// Neither the table nor any room lock is held while closing, since the
    /// close callbacks re-enter `Room::leave` and `remove_if_empty`.
    pub fn close_all(&self) -> usize {
        let rooms: Vec<Arc<Room>> = lock(&self.rooms).values().cloned().collect();

        let mut closed = 0;
        for room in rooms {
            for member in room.members() {
                member.close();
                closed += 1;
            }
        }
        tracing::info!("Closed {} connections", closed);
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Connection,
        infrastructure::transport::channel_transport,
    };
    use std::collections::HashSet;

    fn name(value: &str) -> RoomName {
        RoomName::new(value.to_string()).unwrap()
    }

    fn member() -> Arc<Connection> {
        let (transport, _peer) = channel_transport();
        Arc::new(Connection::open(transport))
    }

    #[test]
    fn test_get_or_create_returns_same_room() {
        // テスト項目: 同じ名前で取得すると同一の Room が返される
        // given (前提条件):
        let registry = RoomRegistry::new();

        // when (操作):
        let first = registry.get_or_create(&name("lobby"));
        let second = registry.get_or_create(&name("lobby"));

        // then (期待する結果):
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_get_or_create_yields_one_room() {
        // テスト項目: 並行 get_or_create でも Room は 1 つしか作られない
        let registry = Arc::new(RoomRegistry::new());

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                Arc::as_ptr(&registry.get_or_create(&name("X"))) as usize
            }));
        }
        let mut pointers = HashSet::new();
        for task in tasks {
            pointers.insert(task.await.unwrap());
        }

        assert_eq!(pointers.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_if_empty_then_recreate_gives_fresh_room() {
        // テスト項目: 空になったルームを削除すると、次の取得で新しい空の Room が作られる
        // given (前提条件):
        let registry = RoomRegistry::new();
        let old = registry.get_or_create(&name("lobby"));
        let connection = member();
        old.join(connection.clone()).unwrap();
        old.leave(&connection);

        // when (操作):
        let removed = registry.remove_if_empty(&name("lobby"));
        let fresh = registry.get_or_create(&name("lobby"));

        // then (期待する結果):
        assert!(removed);
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(old.is_retired());
        assert!(!fresh.is_retired());
        assert_eq!(fresh.size(), 0);

        fresh.join(member()).unwrap();
        assert_eq!(old.size(), 0);
        assert_eq!(fresh.size(), 1);
    }

    #[tokio::test]
    async fn test_remove_if_empty_keeps_occupied_room() {
        let registry = RoomRegistry::new();
        let room = registry.get_or_create(&name("lobby"));
        room.join(member()).unwrap();

        assert!(!registry.remove_if_empty(&name("lobby")));
        assert!(!room.is_retired());
        assert!(registry.get(&name("lobby")).is_some());
    }

    #[test]
    fn test_create_unique_registers_distinct_rooms() {
        // テスト項目: 生成名のルームが毎回別名で登録される
        let registry = RoomRegistry::new();

        let first = registry.create_unique().unwrap();
        let second = registry.create_unique().unwrap();

        assert_ne!(first.name(), second.name());
        assert_eq!(registry.len(), 2);
        assert!(Arc::ptr_eq(&registry.get(first.name()).unwrap(), &first));
    }

    #[tokio::test]
    async fn test_reclaim_idle_drops_only_old_empty_rooms() {
        // テスト項目: 参加者のいない古いルームだけが回収される
        // given (前提条件):
        let registry = RoomRegistry::new();
        let unused = registry.create_unique().unwrap();
        let lobby = registry.get_or_create(&name("lobby"));
        lobby.join(member()).unwrap();

        // when (操作):
        let kept = registry.reclaim_idle(Duration::from_secs(3600));
        let reclaimed = registry.reclaim_idle(Duration::ZERO);

        // then (期待する結果):
        assert_eq!(kept, 0);
        assert_eq!(reclaimed, 1);
        assert!(unused.is_retired());
        assert!(registry.get(unused.name()).is_none());
        assert!(registry.get(&name("lobby")).is_some());
        assert!(!lobby.is_retired());
    }

    #[test]
    fn test_remove_if_empty_unknown_room() {
        let registry = RoomRegistry::new();
        assert!(!registry.remove_if_empty(&name("ghost")));
    }

    #[tokio::test]
    async fn test_list_reports_member_counts_sorted_by_name() {
        // テスト項目: ルーム一覧が名前順・参加人数付きで返される
        let registry = RoomRegistry::new();
        registry.get_or_create(&name("zeta"));
        let lobby = registry.get_or_create(&name("lobby"));
        lobby.join(member()).unwrap();
        lobby.join(member()).unwrap();

        let list = registry.list();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, name("lobby"));
        assert_eq!(list[0].member_count, 2);
        assert_eq!(list[1].name, name("zeta"));
        assert_eq!(list[1].member_count, 0);
    }

    #[tokio::test]
    async fn test_close_all_closes_members() {
        let registry = RoomRegistry::new();
        let lobby = registry.get_or_create(&name("lobby"));
        let a = member();
        let b = member();
        lobby.join(a.clone()).unwrap();
        lobby.join(b.clone()).unwrap();

        let closed = registry.close_all();

        assert_eq!(closed, 2);
        assert!(!a.is_open());
        assert!(!b.is_open());
    }
}
