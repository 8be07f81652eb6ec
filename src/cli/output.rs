//! Plain-text rendering of rooms and messages for stdout.

use chrono::{DateTime, Utc};

use crate::models::{Message, Room};

/// `[HH:MM:SS] user: text`, with `--:--:--` when the send time is unknown.
///
/// Multi-line messages are indented under the first line.
pub fn format_message(message: &Message) -> String {
    let time = message
        .sent
        .map(|sent| sent.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let author = message.author().unwrap_or("?");
    let text = message.text.trim_end().replace('\n', "\n    ");
    let edited = if message.is_edited() { " (edited)" } else { "" };

    format!("[{}] {}: {}{}", time, author, text, edited)
}

/// `id  name  (N unread)`
pub fn format_room(room: &Room) -> String {
    let mut line = format!("{}  {}", room.id, room.name);
    if room.unread_items > 0 {
        line.push_str(&format!("  ({} unread)", room.unread_items));
    }
    line
}

/// Local rendering of a timestamp for status lines.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::TimeZone;

    fn message() -> Message {
        let mut message = Message::new("m1", "hello");
        message.sent = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap());
        message.from_user = Some(User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            ..Default::default()
        });
        message
    }

    #[test]
    fn test_format_message() {
        assert_eq!(format_message(&message()), "[09:05:07] alice: hello");
    }

    #[test]
    fn test_format_message_without_metadata() {
        assert_eq!(
            format_message(&Message::new("m1", "hi")),
            "[--:--:--] ?: hi"
        );
    }

    #[test]
    fn test_format_message_multiline_and_edited() {
        let mut message = message();
        message.text = "one\ntwo\n".to_string();
        message.edited_at = message.sent;
        assert_eq!(
            format_message(&message),
            "[09:05:07] alice: one\n    two (edited)"
        );
    }

    #[test]
    fn test_format_room() {
        let room = Room {
            id: "r1".to_string(),
            name: "gitterhq/sandbox".to_string(),
            unread_items: 3,
            ..Default::default()
        };
        assert_eq!(format_room(&room), "r1  gitterhq/sandbox  (3 unread)");

        let quiet = Room {
            unread_items: 0,
            ..room
        };
        assert_eq!(format_room(&quiet), "r1  gitterhq/sandbox");
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01 09:05:07 UTC");
    }
}
