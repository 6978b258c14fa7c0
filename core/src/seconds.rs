//! Serde adapter that stores [`Duration`] values as fractional seconds.
//!
//! Tunables are authored in seconds (`life_time = 2.5`), while the simulation
//! keeps exact [`Duration`] arithmetic for its timers. Authored values are
//! rounded to the nearest nanosecond so `0.1` reads back as exactly 100ms.
//! Negative or non-finite values are rejected while deserializing.

use std::time::Duration;

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

/// Serializes a duration as seconds.
pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}

/// Deserializes a duration from seconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    from_secs(value).ok_or_else(|| D::Error::custom(format!("invalid duration {value}s")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_secs(value: f64) -> Option<Duration> {
    let nanos = (value * NANOS_PER_SEC).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos as u64))
}

const NANOS_PER_SEC: f64 = 1_000_000_000.0;
