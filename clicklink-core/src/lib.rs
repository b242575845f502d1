//! Board-agnostic application logic for the ClickLink watch app
//!
//! This crate contains everything that does not depend on a specific board:
//!
//! - Collaborator traits (label display, haptics, outbox, log sink)
//! - Message channel adapter and input dispatcher
//! - Application context, handler table and run loop
//! - AppMessage link session (transaction ids, ACK/NACK, timeouts)
//! - Configuration types and the `watch.toml` reader

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod channel;
pub mod config;
pub mod input;
pub mod link;
pub mod traits;

#[cfg(test)]
mod testing;

pub use app::{dispatch, run, App, AppEvent, AppHandlers, EventLoop};
pub use channel::{MessageChannel, VIBRATE_TEXT};
pub use link::{FrameSink, LinkSession};
