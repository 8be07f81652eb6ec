//! Conventional Gitter endpoints and the real-time message stream.

pub mod client;
pub mod query;

pub use client::GitterClient;
pub use query::MessageQuery;
