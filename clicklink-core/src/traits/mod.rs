//! Collaborator traits
//!
//! These traits define the interface between the application logic and
//! whatever owns the screen, the vibration motor, the message transport and
//! the log output.

pub mod display;
pub mod haptics;
pub mod log;
pub mod outbox;

pub use display::TextDisplay;
pub use haptics::Haptics;
pub use log::{AppLog, Diagnostic, LogLevel};
pub use outbox::{AppMessageResult, Outbox};
