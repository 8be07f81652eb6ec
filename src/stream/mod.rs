//! Real-time event ingestion.
//!
//! - [`decoder`] splits a chunked byte stream into newline-delimited JSON
//!   frames, skipping keep-alive blank lines.
//! - [`subscription`] wraps that as a cold, cancellable [`EventStream`] whose
//!   subscriptions each own one connection.

pub mod decoder;
pub mod subscription;

pub use decoder::{decode_frame, decode_json_lines, LineDecoder};
pub use subscription::{
    CancelHandle, EventObserver, EventStream, StreamOptions, Subscription, SubscriptionHandle,
};
