//! Startup configuration: schedule bounds and the time source host.

use core::str::FromStr;

use heapless::String;

use crate::FatalError;
use crate::schedule::{TimeOfDay, Window};

pub const DEFAULT_NTP_HOST: &str = "0.pool.ntp.org:123";

pub const MAX_HOST_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub window: Window,
    pub ntp_host: String<MAX_HOST_LEN>,
    /// Run the short on/off diagnostic sequence after time sync.
    pub demo_blink: bool,
}

impl Config {
    /// Parses the raw configuration strings. A malformed schedule time or an
    /// oversized host is fatal: the controller cannot run without a schedule.
    pub fn new(start: &str, stop: &str, ntp_host: &str) -> Result<Self, FatalError> {
        let start: TimeOfDay = start.parse()?;
        let stop: TimeOfDay = stop.parse()?;
        let ntp_host = String::from_str(ntp_host).map_err(|_| FatalError::HostTooLong)?;
        Ok(Self {
            window: Window::new(start, stop),
            ntp_host,
            demo_blink: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ParseTimeOfDayError;

    #[test]
    fn parses_schedule_and_host() {
        let config = Config::new("22:00", "06:00", DEFAULT_NTP_HOST).unwrap();
        assert_eq!(config.window.start, "22:00".parse().unwrap());
        assert_eq!(config.window.stop, "06:00".parse().unwrap());
        assert_eq!(config.ntp_host.as_str(), DEFAULT_NTP_HOST);
        assert!(!config.demo_blink);
    }

    #[test]
    fn malformed_schedule_time_is_fatal() {
        assert!(matches!(
            Config::new("2200", "06:00", DEFAULT_NTP_HOST),
            Err(FatalError::Config(ParseTimeOfDayError::Malformed))
        ));
        assert!(matches!(
            Config::new("22:00", "25:00", DEFAULT_NTP_HOST),
            Err(FatalError::Config(ParseTimeOfDayError::HourRange))
        ));
    }

    #[test]
    fn oversized_host_is_fatal() {
        let host = "x".repeat(MAX_HOST_LEN + 1);
        assert!(matches!(
            Config::new("22:00", "06:00", &host),
            Err(FatalError::HostTooLong)
        ));
    }
}
