pub mod auth;
pub mod books;
pub mod transactions;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub type BookId = i64;
pub type TransactionId = i64;

/// Payload of operations whose reply carries nothing beyond the envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NoPayload {}

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// The server reads an empty string as "not given".
pub(crate) fn optional_time<S>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        Some(time) => serializer.collect_str(&time.format(ISO_FORMAT)),
        None => serializer.serialize_str(""),
    }
}

pub(crate) fn optional_text<S>(text: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(text.as_deref().unwrap_or_default())
}

pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
