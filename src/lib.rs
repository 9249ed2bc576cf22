//! NTP-synced daily relay timer.
//!
//! Synchronizes the local clock once from an NTP server at startup, then
//! switches a relay on at `start` and off at `stop` every day. Each alarm
//! re-arms itself 24 hours after it fires. The physical pin and the network
//! link are collaborators passed in by the platform glue.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod alarm;
pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod relay;
pub mod schedule;
pub mod sntp;

use thiserror::Error;

/// Startup errors. All of them abort the process: the controller cannot run
/// with an unknown clock or an unparsed schedule.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("network connect failed")]
    Connect,
    #[error("time source session failed")]
    Session,
    #[error("time sync failed: {0}")]
    Sntp(#[from] sntp::SntpError),
    #[error("bad schedule time: {0}")]
    Config(#[from] schedule::ParseTimeOfDayError),
    #[error("time source host too long")]
    HostTooLong,
}
