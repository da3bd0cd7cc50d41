//! UseCase: ルーム情報の参照
//!
//! HTTP API 向けに RoomRegistry のスナップショットを DTO に変換する。
//! 返す値はすべて参考値であり、返した直後に古くなり得る。

use std::sync::Arc;

use roomcast_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{RoomName, RoomRegistry, UserDirectory},
    infrastructure::dto::http::{HealthDto, MemberDetailDto, RoomDetailDto, RoomSummaryDto},
};

/// ルーム参照のユースケース
pub struct RoomQueryUseCase {
    registry: Arc<RoomRegistry>,
    directory: Arc<dyn UserDirectory>,
}

impl RoomQueryUseCase {
    /// 新しい RoomQueryUseCase を作成
    pub fn new(registry: Arc<RoomRegistry>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// 全ルームの一覧（名前順）
    pub fn list_rooms(&self) -> Vec<RoomSummaryDto> {
        self.registry
            .list()
            .into_iter()
            .map(|summary| RoomSummaryDto {
                name: summary.name.into_string(),
                member_count: summary.member_count,
                created_at: timestamp_to_rfc3339(summary.created_at.value()),
            })
            .collect()
    }

    /// 指定ルームの詳細。存在しない場合は `None`
    pub fn room_detail(&self, name: &str) -> Option<RoomDetailDto> {
        let name = RoomName::new(name.to_string()).ok()?;
        let room = self.registry.get(&name)?;

        let mut members: Vec<MemberDetailDto> = room
            .members()
            .iter()
            .map(|member| MemberDetailDto {
                session_id: member.session_id().to_string(),
                display_name: member.display_name(),
                connected_at: timestamp_to_rfc3339(member.connected_at().value()),
            })
            .collect();
        members.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        Some(RoomDetailDto {
            name: room.name().to_string(),
            members,
            created_at: timestamp_to_rfc3339(room.created_at().value()),
        })
    }

    /// ヘルスチェック
    pub fn health(&self) -> HealthDto {
        HealthDto {
            status: "ok".to_string(),
            rooms: self.registry.len(),
            users: self.directory.count(),
        }
    }
}
