//! Link UART receive task
//!
//! Reassembles frames from the phone bridge and hands them to the app task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use clicklink_protocol::FrameParser;

use crate::channels::LINK_RX;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    let item = match parser.feed(byte) {
                        Ok(Some(frame)) => Ok(frame),
                        Ok(None) => continue,
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                            Err(e)
                        }
                    };
                    if LINK_RX.try_send(item).is_err() {
                        warn!("Link RX queue full, dropping frame");
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                parser.reset();
            }
        }
    }
}
