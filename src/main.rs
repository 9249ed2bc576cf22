//! Host binary: drives the controller with a UDP time link and a logged
//! stand-in for the relay pin.
//!
//! Configuration comes from the environment: `RELAY_START` and `RELAY_STOP`
//! (HH:MM, UTC), `NTP_HOST`, and `RELAY_DEMO` to enable the diagnostic blink.

use core::convert::Infallible;
use std::net::UdpSocket;

use embassy_executor::Spawner;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::OutputPin;
use static_cell::StaticCell;

use ntp_synced_relay_rs::FatalError;
use ntp_synced_relay_rs::bootstrap;
use ntp_synced_relay_rs::config::{Config, DEFAULT_NTP_HOST};
use ntp_synced_relay_rs::relay::{AlarmKind, ControllerMutex, RelayController};
use ntp_synced_relay_rs::sntp::TimeNetwork;

/// Stand-in for the relay drive; a board port swaps in its GPIO pin here.
struct LogPin;

impl embedded_hal::digital::ErrorType for LogPin {
    type Error = Infallible;
}

impl OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        log::debug!("relay pin low");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        log::debug!("relay pin high");
        Ok(())
    }
}

/// Network collaborator backed by the host stack. The OS keeps the interface
/// up, so connect/disconnect have nothing to do; the session is a connected
/// UDP socket read with a blocking timeout.
struct HostNetwork;

struct UdpLink {
    socket: UdpSocket,
}

impl TimeNetwork for HostNetwork {
    type Error = std::io::Error;
    type Session<'a> = UdpLink;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn open(&mut self, host: &str) -> Result<UdpLink, Self::Error> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(host)?;
        socket.set_read_timeout(Some(std::time::Duration::from_secs(10)))?;
        Ok(UdpLink { socket })
    }

    async fn disconnect(&mut self) {}
}

impl embedded_io_async::ErrorType for UdpLink {
    type Error = std::io::Error;
}

impl embedded_io_async::Read for UdpLink {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.socket.recv(buf)
    }
}

impl embedded_io_async::Write for UdpLink {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.socket.send(buf)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

type HostController = ControllerMutex<LogPin>;

static CONTROLLER: StaticCell<HostController> = StaticCell::new();

#[embassy_executor::task(pool_size = 2)]
async fn alarm_task(controller: &'static HostController, kind: AlarmKind) -> ! {
    bootstrap::alarm_task(controller, kind).await
}

fn config_from_env() -> Result<Config, FatalError> {
    let start = std::env::var("RELAY_START").unwrap_or_else(|_| "18:00".into());
    let stop = std::env::var("RELAY_STOP").unwrap_or_else(|_| "23:00".into());
    let host = std::env::var("NTP_HOST").unwrap_or_else(|_| DEFAULT_NTP_HOST.into());
    let mut config = Config::new(&start, &stop, &host)?;
    config.demo_blink = std::env::var_os("RELAY_DEMO").is_some();
    Ok(config)
}

fn fatal(err: FatalError) -> ! {
    log::error!("fatal: {err}");
    std::process::exit(1);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match config_from_env() {
        Ok(config) => config,
        Err(err) => fatal(err),
    };
    log::info!("schedule window {} (UTC)", config.window);

    let controller = CONTROLLER.init(Mutex::new(RelayController::new(LogPin, config.window)));

    let mut net = HostNetwork;
    if let Err(err) = bootstrap::run(&config, &mut net, controller).await {
        fatal(err);
    }

    spawner
        .spawn(alarm_task(controller, AlarmKind::Start))
        .unwrap();
    spawner
        .spawn(alarm_task(controller, AlarmKind::Stop))
        .unwrap();

    // Everything from here on is alarm-driven.
    core::future::pending::<()>().await;
}
