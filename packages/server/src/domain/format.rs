//! Text rendering for chat lines and system notices.
//!
//! Everything here is a pure function so that the room's critical section
//! only has to clone strings.

use chrono::Timelike;

/// Label used when a line has no sending user.
pub const SYSTEM_LABEL: &str = "SYSTEM";

/// Label used for a sender that never authenticated.
pub const ANONYMOUS_LABEL: &str = "anonymous";

/// `HH:MM [sender] text`, with `SYSTEM` when there is no sender.
pub fn format_chat_line(sender: Option<&str>, text: &str, at: &impl Timelike) -> String {
    format!(
        "{:02}:{:02} [{}] {}",
        at.hour(),
        at.minute(),
        sender.unwrap_or(SYSTEM_LABEL),
        text
    )
}

/// Sent to existing members after someone joins.
pub fn joined_notice(member_count: usize) -> String {
    format!("{SYSTEM_LABEL}: User joined the room ({member_count} users in room)")
}

/// Sent to the member that just joined.
pub fn welcome_notice(room_name: &str) -> String {
    format!("{SYSTEM_LABEL}: Welcome to room {room_name}")
}

/// Sent to the remaining members after someone leaves.
pub fn left_notice(member_count: usize) -> String {
    format!("{SYSTEM_LABEL}: User left the room ({member_count} users remaining)")
}
