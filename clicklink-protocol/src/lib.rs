//! ClickLink watch ↔ phone messaging protocol
//!
//! This crate defines the wire contract between the watch application and
//! the paired phone application. The phone side reaches the watch through a
//! serial bridge, so every AppMessage travels inside a small checked frame:
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ KIND │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! A PUSH payload carries a transaction id, the target app UUID and a
//! dictionary of typed key/value tuples. The watch only ever exchanges
//! two keys: `BUTTON` (watch → phone) and `VIBRATE` (phone → watch).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod frame;
pub mod keys;
pub mod messages;

pub use dictionary::{Dictionary, DictionaryError, IntWidth, Tuple, TupleValue};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use keys::{ButtonId, MessageKey};
pub use messages::{AppMessage, AppUuid, MessageError, APP_MESSAGE_SIZE_MAXIMUM};
