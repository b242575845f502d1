//! Firmware implementations of the application's collaborator traits
//!
//! Each handle is a zero-sized token that forwards to a static channel, so
//! the application never blocks on a peripheral.

use defmt::*;

use clicklink_core::traits::{AppMessageResult, Haptics, TextDisplay};
use clicklink_core::FrameSink;
use clicklink_protocol::Frame;

use crate::channels::{DISPLAY_REFRESH, LABEL, LINK_TX, VIBE_PULSES};

/// Writes the shared label and wakes the display task
pub struct LabelHandle;

impl TextDisplay for LabelHandle {
    fn set_text(&mut self, text: &str) {
        LABEL.lock(|layer| layer.borrow_mut().set_text(text));
        DISPLAY_REFRESH.signal(());
    }
}

/// Requests pulses from the vibration task
pub struct VibeHandle;

impl Haptics for VibeHandle {
    fn short_pulse(&mut self) {
        if VIBE_PULSES.try_send(()).is_err() {
            warn!("Vibe queue full, dropping pulse");
        }
    }
}

/// Queues outgoing frames for the UART writer
pub struct UartSink;

impl FrameSink for UartSink {
    fn submit(&mut self, frame: Frame) -> Result<(), AppMessageResult> {
        LINK_TX.try_send(frame).map_err(|_| {
            warn!("Link TX queue full, dropping frame");
            AppMessageResult::Busy
        })
    }
}
