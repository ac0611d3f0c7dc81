//! Application time zone used to stamp new records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::error::{DomainError, DomainResult};

/// An IANA time zone, e.g. `Asia/Manila`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppTimezone(Tz);

impl AppTimezone {
    /// Parse an IANA zone name.
    pub fn parse(name: &str) -> DomainResult<Self> {
        Tz::from_str(name.trim())
            .map(Self)
            .map_err(|_| DomainError::validation(format!("Unknown time zone: {}", name)))
    }

    /// Current instant expressed in this zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.localize(Utc::now())
    }

    /// Express a UTC instant in this zone.
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0).fixed_offset()
    }

    /// Re-express a timestamp read back from storage (often at `+00:00`)
    /// in this zone. The instant itself is unchanged.
    pub fn to_local(&self, stored: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        self.localize(stored.with_timezone(&Utc))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for AppTimezone {
    fn default() -> Self {
        Self(Tz::UTC)
    }
}

impl FromStr for AppTimezone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
