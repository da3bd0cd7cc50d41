//! InMemory UserDirectory 実装
//!
//! ドメイン層が定義する UserDirectory trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセス再起動で内容は失われます。

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use roomcast_shared::time::get_unix_timestamp_secs;

use crate::domain::{
    AuthError, DisplayName, Timestamp, User, UserDirectory, UserId, UserIdFactory,
    ValueObjectError, lock,
};

/// インメモリ UserDirectory 実装
///
/// ID は `user_<連番>_<unix 秒>` 形式で発行します。
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<UserId, User>>,
    sequence: AtomicU64,
}

impl InMemoryUserDirectory {
    /// 新しい InMemoryUserDirectory を作成
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn register(&self, display_name: &str) -> Result<User, AuthError> {
        let display_name = DisplayName::new(display_name.to_string()).map_err(|e| match e {
            ValueObjectError::DisplayNameEmpty => AuthError::EmptyDisplayName,
            other => AuthError::InvalidDisplayName(other),
        })?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = UserIdFactory::from_sequence(sequence, get_unix_timestamp_secs());
        let user = User::new(id.clone(), display_name, Timestamp::now());

        lock(&self.users).insert(id, user.clone());
        tracing::debug!("Registered user '{}' as {}", user.display_name, user.id);
        Ok(user)
    }

    fn release(&self, id: &UserId) -> bool {
        lock(&self.users).remove(id).is_some()
    }

    fn count(&self) -> usize {
        lock(&self.users).len()
    }
}
