use alloc::string::String;
use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
// `%Y` signs years outside 0..=9999, which RFC 3339 cannot express.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

// -----------------------------------------------------------------------------
// TemporalKind

/// Which temporal type a literal holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// [`NaiveDate`], `2024-02-29`.
    Date,
    /// [`NaiveTime`], `13:45:00.25`.
    Time,
    /// [`NaiveDateTime`], `2024-02-29T13:45:00`.
    DateTime,
    /// [`DateTime<Utc>`], `2024-02-29T13:45:00Z`.
    Instant,
}

impl TemporalKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::Instant => "instant",
        }
    }

    /// Kind byte on the wire.
    pub const fn code(self) -> u8 {
        match self {
            Self::Date => 0,
            Self::Time => 1,
            Self::DateTime => 2,
            Self::Instant => 3,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Date),
            1 => Some(Self::Time),
            2 => Some(Self::DateTime),
            3 => Some(Self::Instant),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Temporal

/// A temporal value together with its kind.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vc_record::info::{Temporal, TemporalKind};
///
/// let date = Temporal::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(date.to_canonical(), "2024-02-29");
/// assert_eq!(Temporal::parse(TemporalKind::Date, "2024-02-29"), Some(date));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
}

impl Temporal {
    pub const fn kind(&self) -> TemporalKind {
        match self {
            Self::Date(_) => TemporalKind::Date,
            Self::Time(_) => TemporalKind::Time,
            Self::DateTime(_) => TemporalKind::DateTime,
            Self::Instant(_) => TemporalKind::Instant,
        }
    }

    /// The ISO-8601 text written to the wire.
    pub fn to_canonical(&self) -> String {
        match self {
            Self::Date(v) => v.format(DATE_FORMAT).to_string(),
            Self::Time(v) => v.format(TIME_FORMAT).to_string(),
            Self::DateTime(v) => v.format(DATE_TIME_FORMAT).to_string(),
            Self::Instant(v) => v.format(INSTANT_FORMAT).to_string(),
        }
    }

    /// Parse canonical text of the given kind.
    pub fn parse(kind: TemporalKind, text: &str) -> Option<Self> {
        match kind {
            TemporalKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(Self::Date),
            TemporalKind::Time => NaiveTime::parse_from_str(text, TIME_FORMAT)
                .ok()
                .map(Self::Time),
            TemporalKind::DateTime => NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
                .ok()
                .map(Self::DateTime),
            TemporalKind::Instant => NaiveDateTime::parse_from_str(text, INSTANT_FORMAT)
                .ok()
                .map(|v| Self::Instant(v.and_utc())),
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}
