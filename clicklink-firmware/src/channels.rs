//! Inter-task communication channels
//!
//! Peripheral tasks only move data through these; every handler runs on
//! the application task.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use clicklink_display::TextLayer;
use clicklink_protocol::dictionary::MAX_TUPLES;
use clicklink_protocol::{ButtonId, Frame, FrameError};

/// Channel capacity for button clicks
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Channel capacity for frames in each direction
const LINK_CHANNEL_SIZE: usize = 4;

/// Room for one pulse per tuple of the largest inbound dictionary
const VIBE_QUEUE_SIZE: usize = MAX_TUPLES;

/// Single clicks from the button tasks
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonId, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Frames (or envelope errors) received from the phone
pub static LINK_RX: Channel<
    CriticalSectionRawMutex,
    Result<Frame, FrameError>,
    LINK_CHANNEL_SIZE,
> = Channel::new();

/// Frames waiting for the UART writer
pub static LINK_TX: Channel<CriticalSectionRawMutex, Frame, LINK_CHANNEL_SIZE> = Channel::new();

/// Signal that the label changed and the panel should be redrawn
pub static DISPLAY_REFRESH: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// One entry per requested short pulse; requests are never merged
pub static VIBE_PULSES: Channel<CriticalSectionRawMutex, (), VIBE_QUEUE_SIZE> = Channel::new();

/// The watch face label, written by the app task and read by the display task
pub static LABEL: Mutex<CriticalSectionRawMutex, RefCell<TextLayer>> =
    Mutex::new(RefCell::new(TextLayer::new()));
