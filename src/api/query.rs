//! Query shaping for `GET rooms/{id}/chatMessages`.

/// Default page size for room message history.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// Paging options for [`GitterClient::room_messages`](super::GitterClient::room_messages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub limit: u32,
    /// Return messages sent before this message id
    pub before_id: Option<String>,
    /// Return messages sent after this message id
    pub after_id: Option<String>,
    pub skip: u32,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MESSAGE_LIMIT,
            before_id: None,
            after_id: None,
            skip: 0,
        }
    }
}

impl MessageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn before(mut self, message_id: impl Into<String>) -> Self {
        self.before_id = Some(message_id.into());
        self
    }

    pub fn after(mut self, message_id: impl Into<String>) -> Self {
        self.after_id = Some(message_id.into());
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Render as `limit=N[&beforeId=..][&afterId=..][&skip=N]`.
    ///
    /// Blank ids and a zero skip are left out.
    pub fn to_query_string(&self) -> String {
        let mut query = format!("limit={}", self.limit);

        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        if let Some(before) = non_blank(&self.before_id) {
            query.push_str(&format!("&beforeId={}", urlencoding::encode(&before)));
        }
        if let Some(after) = non_blank(&self.after_id) {
            query.push_str(&format!("&afterId={}", urlencoding::encode(&after)));
        }
        if self.skip > 0 {
            query.push_str(&format!("&skip={}", self.skip));
        }

        query
    }
}
