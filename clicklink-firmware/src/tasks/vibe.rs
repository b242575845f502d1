//! Vibration motor task

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Timer};

use crate::channels::VIBE_PULSES;

/// Drives the motor for `pulse_ms` once per queued request
///
/// Requests arriving mid-pulse wait their turn. Consecutive pulses are
/// separated by a gap of the same length.
#[embassy_executor::task]
pub async fn vibe_task(mut motor: Output<'static>, pulse_ms: u16) {
    info!("Vibe task started");

    loop {
        VIBE_PULSES.receive().await;
        motor.set_high();
        Timer::after(Duration::from_millis(pulse_ms as u64)).await;
        motor.set_low();
        trace!("Short pulse done");
        Timer::after(Duration::from_millis(pulse_ms as u64)).await;
    }
}
