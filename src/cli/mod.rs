//! CLI module for gitter-stream.
//!
//! - Argument parsing
//! - Version display
//! - Plain-text output of rooms and messages
//!
//! # Usage
//!
//! ```ignore
//! use gitter_stream::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Tail { room_id } => { /* subscribe */ }
//!     _ => {}
//! }
//! ```

pub mod args;
pub mod output;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use output::{format_message, format_room, format_timestamp};
pub use version::{version_string, VERSION};
