//! Conversion between `chrono` dates and the store's native timestamp.
//!
//! Firestore keeps timestamps as seconds + nanoseconds since the Unix epoch and
//! exchanges them as RFC 3339 UTC strings. The mapping is direct with no
//! timezone normalization. Sub-microsecond digits are dropped, since the store
//! keeps only microseconds.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    /// Truncates to whole microseconds.
    pub fn from_date(date: DateTime<Utc>) -> Self {
        let nanos = date.timestamp_subsec_nanos();
        Self {
            seconds: date.timestamp(),
            nanos: nanos - nanos % 1_000,
        }
    }

    pub fn to_date(self) -> DateTime<Utc> {
        // seconds/nanos always originate from a valid DateTime
        DateTime::from_timestamp(self.seconds, self.nanos).unwrap_or_default()
    }

    pub fn now() -> Self {
        Self::from_date(Utc::now())
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Parse the RFC 3339 form used on the wire.
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self::from_date(dt.with_timezone(&Utc)))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(date: DateTime<Utc>) -> Self {
        Self::from_date(date)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.to_date()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_date().to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
