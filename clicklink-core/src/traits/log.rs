//! Diagnostic log sink

use super::outbox::AppMessageResult;

/// Log severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    DebugVerbose,
}

impl LogLevel {
    /// True if a record at `self` passes a sink configured for `min`
    pub fn passes(self, min: LogLevel) -> bool {
        self <= min
    }
}

/// Everything the application reports to its log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// Start-up finished, label shown
    Initialized,
    /// Inbound tuple with a key this app does not handle
    UnknownKey(u32),
    /// Inbound message could not be delivered
    InboxDropped(AppMessageResult),
    /// Outbound message was not delivered
    OutboxFailed(AppMessageResult),
    /// Outbound message was delivered
    OutboxSent,
    /// The outbox refused a message before queuing it
    SendRejected(AppMessageResult),
}

impl Diagnostic {
    pub fn level(&self) -> LogLevel {
        match self {
            Diagnostic::Initialized => LogLevel::Debug,
            Diagnostic::UnknownKey(_) | Diagnostic::OutboxSent => LogLevel::Info,
            Diagnostic::InboxDropped(_)
            | Diagnostic::OutboxFailed(_)
            | Diagnostic::SendRejected(_) => LogLevel::Error,
        }
    }
}

/// Receives diagnostics from the application
pub trait AppLog {
    fn log(&mut self, diagnostic: Diagnostic);
}

impl<T: AppLog + ?Sized> AppLog for &mut T {
    fn log(&mut self, diagnostic: Diagnostic) {
        (**self).log(diagnostic)
    }
}
