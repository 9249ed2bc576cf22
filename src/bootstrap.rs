//! Startup orchestration: sync the clock once, set the initial relay state,
//! arm both alarms. After this the alarm tasks drive everything.

use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::OutputPin;

use crate::FatalError;
use crate::clock::SyncedClock;
use crate::config::Config;
use crate::relay::{AlarmKind, ControllerMutex};
use crate::sntp::{self, TimeNetwork};

const DEMO_CYCLES: usize = 2;
const DEMO_PAUSE: Duration = Duration::from_secs(2);

/// Runs the one-shot startup sequence. Every network step is fatal on error:
/// the controller cannot run with an unknown clock.
///
/// The controller must be freshly constructed (relay off, alarms idle). On
/// return the relay matches the schedule window and both alarms are armed;
/// the caller then spawns one [`alarm_task`] per alarm and parks.
pub async fn run<N, P>(
    config: &Config,
    net: &mut N,
    controller: &ControllerMutex<P>,
) -> Result<SyncedClock, FatalError>
where
    N: TimeNetwork,
    P: OutputPin,
{
    net.connect().await.map_err(|e| {
        log::error!("network connect failed: {e:?}");
        FatalError::Connect
    })?;

    log::info!("requesting time from {}", config.ntp_host.as_str());
    let unix = {
        let mut session = net.open(config.ntp_host.as_str()).await.map_err(|e| {
            log::error!("opening time source session failed: {e:?}");
            FatalError::Session
        })?;
        sntp::fetch(&mut session).await?
    };
    net.disconnect().await;

    let clock = SyncedClock::from_sample(unix, Instant::now());
    log::info!(
        "time synced: unix {unix}, local time of day {}",
        clock.time_of_day(Instant::now())
    );

    // Diagnostic blink. The alarms are still idle, so the embedded reset
    // calls do not arm anything.
    if config.demo_blink {
        for _ in 0..DEMO_CYCLES {
            controller.lock().await.on();
            Timer::after(DEMO_PAUSE).await;
            controller.lock().await.off();
            Timer::after(DEMO_PAUSE).await;
        }
    }

    let mut ctrl = controller.lock().await;
    if ctrl.window().contains(clock.time_of_day(Instant::now())) {
        ctrl.on();
    }
    ctrl.arm_alarms(&clock);

    Ok(clock)
}

/// Dispatch loop for one alarm: sleep until the armed instant, then switch
/// the relay, which re-arms the alarm 24h ahead.
pub async fn alarm_task<P: OutputPin>(controller: &ControllerMutex<P>, kind: AlarmKind) -> ! {
    loop {
        let Some(at) = controller.lock().await.fire_at(kind) else {
            Timer::after(Duration::from_secs(1)).await;
            continue;
        };
        Timer::at(at).await;

        let mut ctrl = controller.lock().await;
        // A reset while we slept replaced the pending fire; sleep on the new
        // deadline instead of firing.
        if ctrl.fire_at(kind) == Some(at) {
            ctrl.fire(kind);
        }
    }
}
