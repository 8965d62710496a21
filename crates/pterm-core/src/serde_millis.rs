#![forbid(unsafe_code)]

//! Serialize a [`Duration`] as integer milliseconds.
//!
//! Use with `#[serde(with = "pterm_core::serde_millis")]` so config files
//! read `debounce = 500` rather than `{ secs = 0, nanos = 500000000 }`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
