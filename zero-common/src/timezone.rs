//! Time zone handling for day boundaries and date stamps.
//!
//! Freshness checks and memory archives both need "what wall-clock time is it
//! here" without reading the host locale implicitly. [`Zone`] names the zone
//! explicitly; [`Zone::Local`] is the system zone and the default.

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Step used to walk forward out of a DST gap.
const GAP_STEP_MINUTES: i64 = 15;

/// Upper bound on gap steps (one full day).
const MAX_GAP_STEPS: i64 = 24 * 60 / GAP_STEP_MINUTES;

/// A time zone used to interpret instants as wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The host's system time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
    /// An IANA zone such as `Europe/Berlin`.
    Named(Tz),
}

impl Zone {
    /// Wall-clock date and time of `instant` in this zone.
    pub fn local_naive(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Utc => instant.naive_utc(),
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Map a wall-clock time in this zone back to an instant.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant. Times
    /// that do not exist (DST spring-forward) resolve to the first valid
    /// wall-clock time after the gap.
    pub fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Local => resolve_in(&Local, naive),
            Self::Utc => Utc.from_utc_datetime(&naive),
            Self::Named(tz) => resolve_in(tz, naive),
        }
    }

    /// `YYYY-MM-DD` for `instant` in this zone.
    pub fn date_stamp(&self, instant: DateTime<Utc>) -> String {
        self.local_naive(instant).format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD HH:MM:SS` (24-hour) for `instant` in this zone.
    pub fn date_time_stamp(&self, instant: DateTime<Utc>) -> String {
        self.local_naive(instant)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    /// Parse an optional zone name, falling back to [`Zone::Local`] with a
    /// warning when the name is unknown.
    pub fn parse_or_local(name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::Local,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(timezone = %raw, error = %e, "Unknown timezone, using system local");
                Self::Local
            }),
        }
    }
}

fn resolve_in<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = naive;
    for _ in 0..=MAX_GAP_STEPS {
        if let Some(dt) = zone.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
        candidate += TimeDelta::minutes(GAP_STEP_MINUTES);
    }
    // No zone has a day-long gap; treat the wall-clock time as UTC.
    Utc.from_utc_datetime(&naive)
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" | "system" => Ok(Self::Local),
            "utc" | "z" => Ok(Self::Utc),
            _ => trimmed
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|e| Error::Config(format!("unknown timezone '{trimmed}': {e}"))),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}
