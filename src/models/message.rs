use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, User};

/// A chat message, both from the REST endpoints and from the real-time stream.
///
/// Only `id` and `text` are required; the stream may push records that carry
/// nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    /// HTML-rendered text
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub sent: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from_user: Option<User>,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub read_by: u64,
    #[serde(default)]
    pub urls: Vec<MessageUrl>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Version of the message record
    #[serde(default)]
    pub v: Option<u64>,
}

impl Message {
    /// Minimal message with only an id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            html: None,
            sent: None,
            edited_at: None,
            from_user: None,
            unread: false,
            read_by: 0,
            urls: Vec::new(),
            mentions: Vec::new(),
            issues: Vec::new(),
            v: None,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Username of the sender, if known.
    pub fn author(&self) -> Option<&str> {
        self.from_user.as_ref().map(|u| u.username.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageUrl {
    pub url: String,
}

/// A user mentioned in a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub screen_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Set for group mentions such as `@all`
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// An issue referenced from a message (`#123`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    #[serde(deserialize_with = "deserialize_id")]
    pub number: String,
}

/// Ids of unread messages and mentions in a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UnreadItems {
    #[serde(default)]
    pub chat: Vec<String>,
    #[serde(default)]
    pub mention: Vec<String>,
}

impl UnreadItems {
    pub fn is_empty(&self) -> bool {
        self.chat.is_empty() && self.mention.is_empty()
    }
}
