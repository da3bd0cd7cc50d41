//! UseCase: セッションの接続・配信・切断
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SessionCoordinator::attach() メソッド
//! - 認証 → ルーム参加 → 受信メッセージの配信 → 切断時の退出とルーム回収
//!
//! ### なぜこのテストが必要か
//! - Connection / Room / RoomRegistry をつなぐ唯一の場所であり、
//!   コールバックの配線ミスはメッセージ欠落やルームの取り残しにつながる
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人が参加して会話し、順に退出する
//! - 異常系：表示名が空、ディレクトリが拒否
//! - エッジケース：最後の退出でルームが削除され、同名で新しいルームが作られる
//! - 競合：参加と空ルーム削除が別スレッドで同時に走っても、参加したルームが
//!   レジストリに登録されたルームと一致する

use std::sync::Arc;

use crate::domain::{
    Connection, Room, RoomError, RoomName, RoomRegistry, Transport, User, UserDirectory,
};

use super::error::SessionError;

/// A connection that has been authenticated, joined and started.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection: Arc<Connection>,
    pub room: Arc<Room>,
    pub user: User,
}

/// Wires accepted transports to rooms.
///
/// Holds no state of its own beyond the injected registry and directory.
#[derive(Clone)]
pub struct SessionCoordinator {
    registry: Arc<RoomRegistry>,
    directory: Arc<dyn UserDirectory>,
}

impl SessionCoordinator {
    /// 新しい SessionCoordinator を作成
    pub fn new(registry: Arc<RoomRegistry>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Authenticate `transport` as `display_name`, join it to `room_name`
    /// and start its I/O.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// On failure the transport is closed and no room has been touched.
    pub fn attach<T: Transport>(
        &self,
        transport: T,
        display_name: &str,
        room_name: &RoomName,
    ) -> Result<Session, SessionError> {
        let connection = Arc::new(Connection::open(transport));

        let user = match connection.authenticate(self.directory.as_ref(), display_name) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Rejecting session '{}': {}", connection.session_id(), e);
                connection.close();
                return Err(e.into());
            }
        };

        let room = self.join_room(&connection, room_name);
        self.register_callbacks(&connection, &room, &user);

        if let Err(e) = connection.start() {
            tracing::warn!("Could not start session '{}': {}", connection.session_id(), e);
            connection.close();
            return Err(e.into());
        }

        tracing::info!(
            "Session '{}' ({}) attached to room '{}'",
            connection.session_id(),
            user.display_name,
            room.name()
        );
        Ok(Session {
            connection,
            room,
            user,
        })
    }

    /// Join through the registry, retrying if the room we fetched was
    /// retired between lookup and join.
    fn join_room(&self, connection: &Arc<Connection>, room_name: &RoomName) -> Arc<Room> {
        loop {
            let room = self.registry.get_or_create(room_name);
            match room.join(Arc::clone(connection)) {
                Ok(()) => return room,
                Err(RoomError::Retired(name)) => {
                    tracing::debug!("Room '{}' retired during join, retrying", name);
                }
            }
        }
    }

    fn register_callbacks(&self, connection: &Arc<Connection>, room: &Arc<Room>, user: &User) {
        // Callbacks only hold a weak handle, the room owns the connection.
        let weak = Arc::downgrade(connection);
        let target = Arc::clone(room);
        connection.set_message_handler(move |text, session_id| {
            if text.is_empty() {
                tracing::debug!("Ignoring empty message from '{}'", session_id);
                return;
            }
            if let Some(sender) = weak.upgrade() {
                target.broadcast(&text, Some(&sender));
            }
        });

        let weak = Arc::downgrade(connection);
        let room = Arc::clone(room);
        let registry = Arc::clone(&self.registry);
        let directory = Arc::clone(&self.directory);
        let user_id = user.id.clone();
        connection.set_close_handler(move || {
            if let Some(connection) = weak.upgrade() {
                room.leave(&connection);
            }
            registry.remove_if_empty(room.name());
            directory.release(&user_id);
        });
    }
}
