//! UseCase 層
//!
//! ドメイン層の部品（Connection / Room / RoomRegistry）を組み合わせるレイヤー。
//! UI 層から呼び出されます。

pub mod create_room;
pub mod error;
pub mod room_query;
pub mod session_coordinator;

pub use create_room::CreateRoomUseCase;
pub use error::SessionError;
pub use room_query::RoomQueryUseCase;
pub use session_coordinator::{Session, SessionCoordinator};
