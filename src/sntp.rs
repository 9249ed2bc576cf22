//! Minimal SNTP exchange: one request, one response, one timestamp.

use embedded_io_async::{Error as _, ErrorKind, Read, Write};
use thiserror::Error;

pub const PACKET_SIZE: usize = 48;

/// Seconds between the NTP epoch (1900-01-01) and the unix epoch (1970-01-01).
const EPOCH_DELTA: i64 = 2_208_988_800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SntpError {
    #[error("request send failed: {0:?}")]
    Send(ErrorKind),
    #[error("response receive failed: {0:?}")]
    Recv(ErrorKind),
    #[error("expected a 48 byte response, got {0}")]
    PacketSize(usize),
}

/// Connectivity collaborator for the one-shot time acquisition. The session
/// is a connected datagram link to the time source.
#[allow(async_fn_in_trait)]
pub trait TimeNetwork {
    type Error: core::fmt::Debug;
    type Session<'a>: Read + Write
    where
        Self: 'a;

    async fn connect(&mut self) -> Result<(), Self::Error>;
    async fn open(&mut self, host: &str) -> Result<Self::Session<'_>, Self::Error>;
    async fn disconnect(&mut self);
}

/// Requests one time sample and returns it as unix seconds.
///
/// The response must be exactly one 48 byte packet; anything else is fatal to
/// the caller.
pub async fn fetch<L>(link: &mut L) -> Result<i64, SntpError>
where
    L: Read + Write,
{
    let request = request_packet();
    let sent = link
        .write(&request)
        .await
        .map_err(|e| SntpError::Send(e.kind()))?;
    if sent != PACKET_SIZE {
        return Err(SntpError::Send(ErrorKind::Other));
    }

    let mut response = [0u8; PACKET_SIZE];
    let received = link
        .read(&mut response)
        .await
        .map_err(|e| SntpError::Recv(e.kind()))?;
    if received != PACKET_SIZE {
        return Err(SntpError::PacketSize(received));
    }

    Ok(transmit_unix(&response))
}

/// LI=3 (unsynchronized), version 4, client mode; everything else zero.
pub fn request_packet() -> [u8; PACKET_SIZE] {
    let mut packet = [0u8; PACKET_SIZE];
    packet[0] = 0xE3;
    packet
}

/// The transmit timestamp starts at byte 40: a big-endian u32 counting
/// seconds since 1900-01-01, shifted once onto the unix epoch.
pub fn transmit_unix(packet: &[u8; PACKET_SIZE]) -> i64 {
    let secs = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]);
    i64::from(secs) - EPOCH_DELTA
}
