//! Message channel adapter
//!
//! Turns single key/value pairs into outbound dictionaries and dispatches
//! inbound dictionaries on key. Every failure reported by the transport is
//! logged and otherwise dropped: nothing is retried or re-queued, and no
//! error reaches the caller.

use clicklink_protocol::{Dictionary, MessageKey};

use crate::traits::{AppLog, AppMessageResult, Diagnostic, Haptics, Outbox, TextDisplay};

/// Label shown when the phone asks the watch to vibrate
pub const VIBRATE_TEXT: &str = "Vibrate!";

/// Adapter between the application and its outbox
pub struct MessageChannel<O> {
    outbox: O,
}

impl<O: Outbox> MessageChannel<O> {
    pub fn new(outbox: O) -> Self {
        Self { outbox }
    }

    /// Queue a single `{key: value}` message
    ///
    /// The outcome arrives later as a sent or failed notification. If the
    /// outbox refuses the message outright it is logged and lost.
    pub fn send<L: AppLog>(&mut self, key: MessageKey, value: i32, log: &mut L) {
        let mut dictionary = Dictionary::new();
        let queued = dictionary
            .write_int(key.to_u32(), value)
            .map_err(AppMessageResult::from)
            .and_then(|()| self.outbox.send(&dictionary));

        if let Err(reason) = queued {
            log.log(Diagnostic::SendRejected(reason));
        }
    }

    /// Handle every tuple of an inbound dictionary
    ///
    /// The transport may coalesce several writes into one message, so each
    /// tuple is dispatched on its own.
    pub fn on_inbox_received<D, H, L>(
        &mut self,
        dictionary: &Dictionary,
        display: &mut D,
        haptics: &mut H,
        log: &mut L,
    ) where
        D: TextDisplay,
        H: Haptics,
        L: AppLog,
    {
        for tuple in dictionary.iter() {
            match MessageKey::from_u32(tuple.key) {
                // Value content is not inspected
                Some(MessageKey::Vibrate) => {
                    display.set_text(VIBRATE_TEXT);
                    haptics.short_pulse();
                }
                _ => log.log(Diagnostic::UnknownKey(tuple.key)),
            }
        }
    }

    pub fn on_inbox_dropped<L: AppLog>(&mut self, reason: AppMessageResult, log: &mut L) {
        log.log(Diagnostic::InboxDropped(reason));
    }

    pub fn on_outbox_failed<L: AppLog>(&mut self, reason: AppMessageResult, log: &mut L) {
        log.log(Diagnostic::OutboxFailed(reason));
    }

    pub fn on_outbox_sent<L: AppLog>(&mut self, log: &mut L) {
        log.log(Diagnostic::OutboxSent);
    }

    pub fn outbox(&self) -> &O {
        &self.outbox
    }
}
