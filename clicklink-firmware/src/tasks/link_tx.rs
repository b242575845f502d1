//! Link UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use clicklink_protocol::messages::frame_bytes;

use crate::channels::LINK_TX;

#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let frame = LINK_TX.receive().await;

        let bytes = match frame_bytes(&frame) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode frame: {:?}", e);
                continue;
            }
        };

        match tx.write_all(&bytes).await {
            Ok(()) => trace!("TX: kind {=u8:#x}, {} bytes", frame.kind, bytes.len()),
            Err(e) => warn!("UART write error: {:?}", e),
        }
    }
}
