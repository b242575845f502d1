//! Input dispatcher
//!
//! One idle state, no transitions: every click is handled on its own and
//! leads to exactly one label update and one outbound message. Debouncing
//! belongs to the click recognizer upstream; nothing here suppresses
//! repeats or queues presses.

use clicklink_protocol::{ButtonId, MessageKey};

use crate::channel::MessageChannel;
use crate::traits::{AppLog, Outbox, TextDisplay};

/// Handle a single click of `button`
pub fn on_click<D, O, L>(
    button: ButtonId,
    display: &mut D,
    channel: &mut MessageChannel<O>,
    log: &mut L,
) where
    D: TextDisplay,
    O: Outbox,
    L: AppLog,
{
    display.set_text(button.label());
    channel.send(MessageKey::Button, button.to_i32(), log);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDisplay, MockLog, MockOutbox};
    use clicklink_protocol::keys::KEY_BUTTON;

    #[test]
    fn test_each_button() {
        for button in ButtonId::ALL {
            let mut display = MockDisplay::default();
            let mut channel = MessageChannel::new(MockOutbox::default());
            let mut log = MockLog::default();

            on_click(button, &mut display, &mut channel, &mut log);

            assert_eq!(display.current(), Some(button.label()));
            let sent = &channel.outbox().sent;
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].len(), 1);
            assert_eq!(
                sent[0].find(KEY_BUTTON).and_then(|t| t.value.as_i32()),
                Some(button.to_i32())
            );
        }
    }

    #[test]
    fn test_label_updated_before_refused_send() {
        let mut display = MockDisplay::default();
        let mut channel = MessageChannel::new(MockOutbox {
            refuse_with: Some(crate::traits::AppMessageResult::Closed),
            ..Default::default()
        });
        let mut log = MockLog::default();

        on_click(ButtonId::Up, &mut display, &mut channel, &mut log);

        assert_eq!(display.current(), Some("Up"));
        assert_eq!(log.entries.len(), 1);
    }

    #[test]
    fn test_rapid_presses_each_send() {
        let mut display = MockDisplay::default();
        let mut channel = MessageChannel::new(MockOutbox::default());
        let mut log = MockLog::default();

        for _ in 0..5 {
            on_click(ButtonId::Down, &mut display, &mut channel, &mut log);
        }

        assert_eq!(channel.outbox().sent.len(), 5);
        assert_eq!(display.texts.len(), 5);
    }
}
