//! Display refresh task
//!
//! Redraws the label into a frame buffer and pushes it to the OLED whenever
//! the application changes it.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;

use clicklink_display::{render, FrameBuffer};

use crate::channels::{DISPLAY_REFRESH, LABEL};
use crate::sh1106::Sh1106;

pub type Oled = Sh1106<I2c<'static, I2C0, Async>>;

#[embassy_executor::task]
pub async fn display_task(mut oled: Oled) {
    info!("Display task started");

    if let Err(e) = oled.init().await {
        error!("Failed to initialize display: {:?}", e);
    } else {
        info!("OLED initialized");
    }

    let mut frame = FrameBuffer::new();

    loop {
        DISPLAY_REFRESH.wait().await;

        let changed = LABEL.lock(|cell| {
            let mut layer = cell.borrow_mut();
            if !layer.is_dirty() {
                return false;
            }
            render(&layer, &mut frame).ok();
            layer.mark_clean();
            true
        });

        if changed {
            match oled.flush(&frame).await {
                Ok(()) => trace!("Display updated"),
                Err(e) => warn!("Display flush failed: {:?}", e),
            }
        }
    }
}
