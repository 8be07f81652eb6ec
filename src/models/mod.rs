//! Domain records returned by the Gitter API.
//!
//! Field names follow the wire format (camelCase) through serde renames. Apart
//! from identifiers, fields are optional or defaulted so that partial records,
//! such as the minimal objects pushed over the streaming endpoint, still decode.

mod message;
mod room;
mod user;

pub use message::{Issue, Mention, Message, MessageUrl, UnreadItems};
pub use room::{Organization, Repository, Room};
pub use user::User;

use serde::Deserializer;

/// Helper to deserialize an identifier sent as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
