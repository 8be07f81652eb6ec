//! The Gitter API client.

use serde_json::json;
use std::sync::Arc;

use super::query::MessageQuery;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::executor::RequestExecutor;
use crate::models::{Message, Organization, Repository, Room, UnreadItems, User};
use crate::stream::EventStream;
use crate::traits::{HttpClient, Method, RequestBody};

/// Client for the Gitter REST API and its real-time message stream.
///
/// Every REST call is a single request through the shared
/// [`RequestExecutor`]. [`realtime_messages`](Self::realtime_messages) returns
/// a cold [`EventStream`] that connects only when subscribed.
#[derive(Debug, Clone)]
pub struct GitterClient {
    executor: RequestExecutor,
}

impl GitterClient {
    /// Create a client using reqwest.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            executor: RequestExecutor::new(config),
        }
    }

    /// Create a client with default endpoints and the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(ClientConfig::new().with_token(token))
    }

    /// Create a client over a custom [`HttpClient`].
    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            executor: RequestExecutor::with_http_client(config, http),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn token(&self) -> Option<&str> {
        self.executor.config().bearer_token()
    }

    /// Replace the token used by subsequent calls.
    ///
    /// Streams already created keep the token they were created with.
    pub fn set_token(&mut self, token: Option<String>) {
        self.executor.config_mut().token = token;
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.executor.config().api_base_url, path)
    }

    fn stream_url(&self, path: &str) -> String {
        format!("{}{}", self.executor.config().stream_base_url, path)
    }

    // ---- User ----

    /// The authenticated user, or `None` if the server returned nobody.
    pub async fn current_user(&self) -> ApiResult<Option<User>> {
        let users: Vec<User> = self
            .executor
            .execute(Method::Get, &self.api_url("user"), None)
            .await?;
        Ok(users.into_iter().next())
    }

    pub async fn organizations(&self, user_id: &str) -> ApiResult<Vec<Organization>> {
        let url = self.api_url(&format!("user/{}/orgs", seg(user_id)));
        self.executor.execute(Method::Get, &url, None).await
    }

    pub async fn repositories(&self, user_id: &str) -> ApiResult<Vec<Repository>> {
        let url = self.api_url(&format!("user/{}/repos", seg(user_id)));
        self.executor.execute(Method::Get, &url, None).await
    }

    pub async fn unread_items(&self, user_id: &str, room_id: &str) -> ApiResult<UnreadItems> {
        let url = self.unread_items_url(user_id, room_id);
        self.executor.execute(Method::Get, &url, None).await
    }

    /// Mark the given chat messages as read.
    pub async fn mark_unread_items_read(
        &self,
        user_id: &str,
        room_id: &str,
        message_ids: &[String],
    ) -> ApiResult<()> {
        let url = self.unread_items_url(user_id, room_id);
        let body = RequestBody::Json(json!({ "chat": message_ids }));
        self.executor
            .execute_unit(Method::Post, &url, Some(&body))
            .await
    }

    fn unread_items_url(&self, user_id: &str, room_id: &str) -> String {
        self.api_url(&format!(
            "user/{}/rooms/{}/unreadItems",
            seg(user_id),
            seg(room_id)
        ))
    }

    // ---- Rooms ----

    /// Rooms the current user has joined.
    pub async fn rooms(&self) -> ApiResult<Vec<Room>> {
        self.executor
            .execute(Method::Get, &self.api_url("rooms"), None)
            .await
    }

    /// Join a room by its URI, e.g. `gitterhq/sandbox`.
    pub async fn join_room(&self, uri: &str) -> ApiResult<Room> {
        let body = RequestBody::form([("uri", uri)]);
        self.executor
            .execute(Method::Post, &self.api_url("rooms"), Some(&body))
            .await
    }

    // ---- Messages ----

    pub async fn room_messages(&self, room_id: &str, query: &MessageQuery) -> ApiResult<Vec<Message>> {
        let url = self.api_url(&format!(
            "rooms/{}/chatMessages?{}",
            seg(room_id),
            query.to_query_string()
        ));
        self.executor.execute(Method::Get, &url, None).await
    }

    pub async fn room_message(&self, room_id: &str, message_id: &str) -> ApiResult<Message> {
        let url = self.message_url(room_id, message_id);
        self.executor.execute(Method::Get, &url, None).await
    }

    pub async fn send_message(&self, room_id: &str, text: &str) -> ApiResult<Message> {
        let url = self.api_url(&format!("rooms/{}/chatMessages", seg(room_id)));
        let body = RequestBody::form([("text", text)]);
        self.executor.execute(Method::Post, &url, Some(&body)).await
    }

    pub async fn update_message(&self, room_id: &str, message_id: &str, text: &str) -> ApiResult<Message> {
        let url = self.message_url(room_id, message_id);
        let body = RequestBody::form([("text", text)]);
        self.executor.execute(Method::Put, &url, Some(&body)).await
    }

    fn message_url(&self, room_id: &str, message_id: &str) -> String {
        self.api_url(&format!(
            "rooms/{}/chatMessages/{}",
            seg(room_id),
            seg(message_id)
        ))
    }

    // ---- Streaming ----

    /// Messages posted to a room, as they arrive.
    ///
    /// Nothing is requested until the returned stream is subscribed, and every
    /// subscription opens its own connection.
    pub fn realtime_messages(&self, room_id: &str) -> EventStream<Message> {
        let url = self.stream_url(&format!("rooms/{}/chatMessages", seg(room_id)));
        EventStream::new(self.executor.clone(), url)
    }
}

/// Escape a path segment.
fn seg(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
