//! UseCase: 生成名によるルーム作成
//!
//! 呼び出し側が名前を指定しない場合に、UUID v4 の名前で空のルームを作成する。
//! 作成されたルームは通常のルームと同じく、最後の参加者が退出した時点で回収される。

use std::sync::Arc;

use roomcast_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{RoomRegistry, ValueObjectError},
    infrastructure::dto::http::RoomSummaryDto,
};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    registry: Arc<RoomRegistry>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム作成を実行
    pub fn execute(&self) -> Result<RoomSummaryDto, ValueObjectError> {
        let room = self.registry.create_unique()?;
        Ok(RoomSummaryDto {
            name: room.name().to_string(),
            member_count: room.size(),
            created_at: timestamp_to_rfc3339(room.created_at().value()),
        })
    }
}
