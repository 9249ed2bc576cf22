//! Self-re-arming daily alarms.

use embassy_time::{Duration, Instant};

use crate::clock::SyncedClock;
use crate::schedule::TimeOfDay;

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

const SECS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Idle,
    Armed(Instant),
}

/// A single-shot timer that fires once per day at a fixed time of day.
///
/// Armed fresh at startup to the next occurrence of its time of day, then
/// perpetually re-armed 24 hours ahead by the callback that runs when it
/// fires.
#[derive(Debug)]
pub struct RecurringAlarm {
    state: AlarmState,
}

impl RecurringAlarm {
    pub const fn new() -> Self {
        Self {
            state: AlarmState::Idle,
        }
    }

    /// Arms the alarm for the next occurrence of `at`: today if that time of
    /// day has not yet passed, otherwise tomorrow. An exact match fires
    /// immediately.
    pub fn arm_next(&mut self, at: TimeOfDay, clock: &SyncedClock) {
        let now = Instant::now();
        let wait = seconds_until(clock.unix(now), at);
        self.state = AlarmState::Armed(now + Duration::from_secs(wait));
        log::info!("alarm for {at} firing in {wait}s");
    }

    /// Re-arms an armed alarm to fire `after` from now, discarding the
    /// pending fire. On an idle alarm this is a no-op.
    pub fn reset(&mut self, after: Duration) {
        if let AlarmState::Armed(_) = self.state {
            self.state = AlarmState::Armed(Instant::now() + after);
        }
    }

    pub fn fire_at(&self) -> Option<Instant> {
        match self.state {
            AlarmState::Idle => None,
            AlarmState::Armed(at) => Some(at),
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }
}

impl Default for RecurringAlarm {
    fn default() -> Self {
        Self::new()
    }
}

/// Seconds from `now_unix` until the next occurrence of `at`, in [0, 24h).
fn seconds_until(now_unix: i64, at: TimeOfDay) -> u64 {
    let mut wait = at.seconds_from_midnight() - now_unix.rem_euclid(SECS_PER_DAY);
    if wait < 0 {
        wait += SECS_PER_DAY;
    }
    wait as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tod(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    // 2024-06-01 00:00:00 UTC
    const MIDNIGHT: i64 = 1_717_200_000;

    #[test]
    fn next_occurrence_later_today() {
        assert_eq!(seconds_until(MIDNIGHT + 10 * 3600, tod("10:30")), 30 * 60);
    }

    #[test]
    fn next_occurrence_tomorrow_when_already_passed() {
        assert_eq!(
            seconds_until(MIDNIGHT + 11 * 3600, tod("10:30")),
            23 * 3600 + 30 * 60
        );
    }

    #[test]
    fn exact_match_fires_immediately() {
        assert_eq!(seconds_until(MIDNIGHT + 10 * 3600 + 30 * 60, tod("10:30")), 0);
    }

    #[test]
    fn reset_is_a_no_op_while_idle() {
        let mut alarm = RecurringAlarm::new();
        alarm.reset(DAY);
        assert_eq!(alarm.state(), AlarmState::Idle);
        assert_eq!(alarm.fire_at(), None);
    }

    #[test]
    fn reset_re_arms_one_day_from_now() {
        let clock = SyncedClock::from_sample(MIDNIGHT, Instant::now());
        let mut alarm = RecurringAlarm::new();
        alarm.arm_next(tod("10:30"), &clock);

        let before = Instant::now();
        alarm.reset(DAY);
        let wait = alarm.fire_at().unwrap() - before;
        assert!(wait >= DAY && wait <= DAY + Duration::from_secs(1));
    }

    #[test]
    fn arm_next_schedules_against_the_synced_clock() {
        let now = Instant::now();
        // Corrected clock reads 10:00:00; the 10:30 alarm is 30 min out.
        let clock = SyncedClock::from_sample(MIDNIGHT + 10 * 3600, now);
        let mut alarm = RecurringAlarm::new();
        alarm.arm_next(tod("10:30"), &clock);

        let wait = (alarm.fire_at().unwrap() - now).as_secs();
        assert!((1_799..=1_801).contains(&wait), "wait was {wait}s");
    }
}
