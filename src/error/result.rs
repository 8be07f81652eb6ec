//! Result type alias for API operations.

use super::api_error::ApiError;

/// Type alias for Results using [`ApiError`].
///
/// # Example
///
/// ```ignore
/// use gitter_stream::error::ApiResult;
///
/// async fn latest(client: &GitterClient, room: &str) -> ApiResult<Vec<Message>> {
///     client.room_messages(room, &MessageQuery::default()).await
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiError>;
