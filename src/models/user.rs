use serde::{Deserialize, Serialize};

/// A Gitter user, as returned by `GET user` and embedded in messages and rooms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    /// Profile path relative to gitter.im
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_url_small: Option<String>,
    #[serde(default)]
    pub avatar_url_medium: Option<String>,
    /// Version of the user record
    #[serde(default)]
    pub v: Option<u64>,
}

impl User {
    /// Display name, falling back to the username when unset.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}
