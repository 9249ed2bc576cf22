//! Time-of-day schedule: HH:MM values and the daily on-window.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// An hour:minute pair with no date component, in the UTC time base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseTimeOfDayError {
    #[error("expected HH:MM")]
    Malformed,
    #[error("hour out of range")]
    HourRange,
    #[error("minute out of range")]
    MinuteRange,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ParseTimeOfDayError> {
        if hour > 23 {
            return Err(ParseTimeOfDayError::HourRange);
        }
        if minute > 59 {
            return Err(ParseTimeOfDayError::MinuteRange);
        }
        Ok(Self { hour, minute })
    }

    /// Projects a unix timestamp onto its UTC time of day, discarding the date.
    pub fn from_unix(unix: i64) -> Self {
        let sod = unix.rem_euclid(SECS_PER_DAY);
        Self {
            hour: (sod / 3600) as u8,
            minute: (sod % 3600 / 60) as u8,
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_from_midnight(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    pub fn seconds_from_midnight(self) -> i64 {
        i64::from(self.minutes_from_midnight()) * 60
    }
}

fn parse_field(s: &str) -> Result<u8, ParseTimeOfDayError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseTimeOfDayError::Malformed);
    }
    s.parse().map_err(|_| ParseTimeOfDayError::Malformed)
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s.split_once(':').ok_or(ParseTimeOfDayError::Malformed)?;
        if minute.contains(':') {
            return Err(ParseTimeOfDayError::Malformed);
        }
        Self::new(parse_field(hour)?, parse_field(minute)?)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The daily interval during which the relay is ON.
///
/// No ordering is required between the two bounds: `stop < start` means the
/// window crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: TimeOfDay,
    pub stop: TimeOfDay,
}

impl Window {
    pub const fn new(start: TimeOfDay, stop: TimeOfDay) -> Self {
        Self { start, stop }
    }

    /// Whether `now` falls inside the window, at minute granularity.
    ///
    /// Both bounds are exclusive: the exact start and stop minutes are outside
    /// the window. A window with `start == stop` takes the non-wrapping branch
    /// and therefore never contains anything.
    pub fn contains(&self, now: TimeOfDay) -> bool {
        let start = self.start.minutes_from_midnight();
        let stop = self.stop.minutes_from_midnight();
        let now = now.minutes_from_midnight();
        if start > stop {
            now > start || now < stop
        } else {
            now > start && now < stop
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}
