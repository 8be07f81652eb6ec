//! gitter-stream - a Gitter API client with a cancellable real-time message stream
//!
//! The layers, bottom up:
//!
//! - [`traits`] / [`adapters`]: the HTTP seam, with reqwest and mock implementations
//! - [`executor`]: typed request execution, auth headers and status checks
//! - [`stream`]: newline-delimited JSON framing and cold, cancellable subscriptions
//! - [`api`]: the conventional Gitter endpoints on top of both
//!
//! ```ignore
//! use futures::StreamExt;
//! use gitter_stream::GitterClient;
//!
//! let client = GitterClient::with_token("token");
//! let mut messages = client.realtime_messages("room-id").subscribe();
//! while let Some(message) = messages.next().await {
//!     println!("{}", message?.text);
//! }
//! ```

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod stream;
pub mod traits;

pub use api::{GitterClient, MessageQuery};
pub use config::{ClientConfig, MalformedFramePolicy};
pub use error::{ApiError, ApiResult, ErrorCategory};
pub use executor::RequestExecutor;
pub use stream::{CancelHandle, EventStream, Subscription, SubscriptionHandle};
