use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// A chat room the user has joined, or is joining.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: String,
    /// Room URI, e.g. `gitterHQ/gitter`
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub one_to_one: bool,
    /// The other participant of a one-to-one room
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub unread_items: u64,
    #[serde(default)]
    pub mentions: u64,
    #[serde(default)]
    pub last_access_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lurk: bool,
    #[serde(default)]
    pub url: Option<String>,
    /// `ONETOONE`, `REPO`, `ORG`, ...
    #[serde(default)]
    pub github_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub v: Option<u64>,
}

/// A GitHub organization the user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// The organization's room, if one exists
    #[serde(default)]
    pub room: Option<Room>,
}

/// A repository the user has access to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub private: bool,
    /// Whether a Gitter room exists for this repository
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub room: Option<Room>,
}
