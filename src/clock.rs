//! One-shot clock correction from a network time sample.

use embassy_time::Instant;

use crate::schedule::TimeOfDay;

/// The local uptime clock shifted by a single offset so that it reports unix
/// time consistent with a trusted network sample.
///
/// The offset is computed once at startup; no drift correction or periodic
/// re-sync happens afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncedClock {
    /// Seconds to add to the uptime clock to obtain unix time.
    offset: i64,
}

impl SyncedClock {
    /// Builds the clock from a network-reported unix time and the local
    /// uptime instant at which the sample was received.
    pub fn from_sample(network_unix: i64, local_at_receipt: Instant) -> Self {
        Self {
            offset: network_unix - local_at_receipt.as_secs() as i64,
        }
    }

    pub fn unix(&self, local: Instant) -> i64 {
        local.as_secs() as i64 + self.offset
    }

    pub fn time_of_day(&self, local: Instant) -> TimeOfDay {
        TimeOfDay::from_unix(self.unix(local))
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrected_reads_track_the_sample() {
        let clock = SyncedClock::from_sample(1_000, Instant::from_secs(50));
        assert_eq!(clock.unix(Instant::from_secs(50)), 1_000);
        assert_eq!(clock.unix(Instant::from_secs(60)), 1_010);
    }

    #[test]
    fn negative_offset_when_uptime_exceeds_sample() {
        let clock = SyncedClock::from_sample(10, Instant::from_secs(50));
        assert_eq!(clock.offset(), -40);
        assert_eq!(clock.unix(Instant::from_secs(90)), 50);
    }

    #[test]
    fn projects_time_of_day_in_utc() {
        // 2024-06-01 12:00:00 UTC
        let clock = SyncedClock::from_sample(1_717_243_200, Instant::from_secs(0));
        assert_eq!(
            clock.time_of_day(Instant::from_secs(0)),
            "12:00".parse().unwrap()
        );
        assert_eq!(
            clock.time_of_day(Instant::from_secs(6 * 3600)),
            "18:00".parse().unwrap()
        );
    }
}
