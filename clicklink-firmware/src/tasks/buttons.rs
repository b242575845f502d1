//! Button tasks
//!
//! One task per forwarded button. Only single clicks are reported; a press
//! held past the long-press threshold is swallowed.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Timer};

use clicklink_protocol::ButtonId;

use crate::channels::BUTTON_EVENTS;

const DEBOUNCE_MS: u64 = 20;
const RELEASE_DEBOUNCE_MS: u64 = 50;
const LONG_PRESS_MS: u64 = 500;

#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(mut pin: Input<'static>, button: ButtonId) {
    info!("Button task started: {}", button.label());

    loop {
        pin.wait_for_falling_edge().await;

        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        if pin.is_high() {
            continue;
        }

        match with_timeout(Duration::from_millis(LONG_PRESS_MS), pin.wait_for_high()).await {
            Ok(()) => {
                debug!("Button: {}", button.label());
                if BUTTON_EVENTS.try_send(button).is_err() {
                    warn!("Button channel full, dropping click");
                }
            }
            Err(_) => {
                trace!("Button: {} held, ignored", button.label());
                pin.wait_for_high().await;
            }
        }

        Timer::after(Duration::from_millis(RELEASE_DEBOUNCE_MS)).await;
    }
}
