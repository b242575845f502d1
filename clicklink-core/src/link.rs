//! AppMessage link session
//!
//! Owns the transport side of the channel: transaction ids, the single
//! in-flight outbound push, inbox/outbox sizing, and the ACK/NACK replies to
//! inbound pushes. It turns link frames into [`AppEvent`]s for the run loop.
//!
//! At most one push is awaiting acknowledgement at a time. A second push
//! while one is pending is refused with `Busy`; a pending push that is not
//! acknowledged within the timeout is reported failed once and forgotten.

use core::cell::RefCell;

use clicklink_protocol::messages::PUSH_HEADER_SIZE;
use clicklink_protocol::{
    AppMessage, AppUuid, Dictionary, Frame, FrameError, APP_MESSAGE_SIZE_MAXIMUM,
};

use crate::app::AppEvent;
use crate::traits::{AppMessageResult, Outbox};

/// Where encoded frames go (the UART writer, in firmware)
pub trait FrameSink {
    /// Queue a frame for transmission without waiting
    fn submit(&mut self, frame: Frame) -> Result<(), AppMessageResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    transaction_id: u8,
    age_ms: u32,
}

/// Transport state for one watch application
pub struct LinkSession<S> {
    sink: S,
    uuid: AppUuid,
    ack_timeout_ms: u32,
    inbox_size: usize,
    outbox_size: usize,
    open: bool,
    next_transaction: u8,
    pending: Option<Pending>,
}

impl<S: FrameSink> LinkSession<S> {
    /// Create a closed session
    pub fn new(sink: S, uuid: AppUuid, ack_timeout_ms: u32) -> Self {
        Self {
            sink,
            uuid,
            ack_timeout_ms,
            inbox_size: 0,
            outbox_size: 0,
            open: false,
            next_transaction: 0,
            pending: None,
        }
    }

    /// Open the channel with the requested buffer sizes
    ///
    /// Sizes are clamped to what a single frame can carry.
    pub fn open(&mut self, inbox_size: usize, outbox_size: usize) {
        self.inbox_size = inbox_size.min(APP_MESSAGE_SIZE_MAXIMUM);
        self.outbox_size = outbox_size.min(APP_MESSAGE_SIZE_MAXIMUM);
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// (inbox, outbox) sizes in effect
    pub fn sizes(&self) -> (usize, usize) {
        (self.inbox_size, self.outbox_size)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Submit a dictionary as the next outbound push
    pub fn push(&mut self, dictionary: &Dictionary) -> Result<(), AppMessageResult> {
        if !self.open {
            return Err(AppMessageResult::Closed);
        }
        if self.pending.is_some() {
            return Err(AppMessageResult::Busy);
        }
        if dictionary.encoded_len() > self.outbox_size {
            return Err(AppMessageResult::BufferOverflow);
        }

        let transaction_id = self.next_transaction;
        let frame = AppMessage::Push {
            transaction_id,
            uuid: self.uuid,
            dictionary: dictionary.clone(),
        }
        .to_frame()?;
        self.sink.submit(frame)?;

        self.next_transaction = self.next_transaction.wrapping_add(1);
        self.pending = Some(Pending {
            transaction_id,
            age_ms: 0,
        });
        Ok(())
    }

    /// Handle a frame received from the phone
    pub fn on_frame(&mut self, frame: &Frame) -> Option<AppEvent> {
        match AppMessage::from_frame(frame) {
            Ok(AppMessage::Push {
                transaction_id,
                uuid,
                dictionary,
            }) => Some(self.on_push(transaction_id, uuid, dictionary, frame)),
            Ok(AppMessage::Ack { transaction_id }) => self
                .settle(transaction_id)
                .then_some(AppEvent::OutboxSent),
            Ok(AppMessage::Nack { transaction_id }) => self
                .settle(transaction_id)
                .then_some(AppEvent::OutboxFailed(AppMessageResult::SendRejected)),
            Err(e) => {
                // Only pushes are answered; a broken ACK/NACK is ignored and
                // the pending push will time out
                if frame.kind != clicklink_protocol::messages::MSG_PUSH {
                    return None;
                }
                if let Some(transaction_id) = AppMessage::transaction_id_of(frame) {
                    self.reply(AppMessage::Nack { transaction_id });
                }
                Some(AppEvent::InboxDropped(e.into()))
            }
        }
    }

    /// Handle a frame that failed envelope checks
    pub fn on_frame_error(&mut self, _error: FrameError) -> AppEvent {
        AppEvent::InboxDropped(AppMessageResult::Malformed)
    }

    /// Age the pending push by `elapsed_ms`
    ///
    /// Returns the failure notification once the ACK timeout passes.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<AppEvent> {
        let pending = self.pending.as_mut()?;
        pending.age_ms = pending.age_ms.saturating_add(elapsed_ms);
        if pending.age_ms < self.ack_timeout_ms {
            return None;
        }
        self.pending = None;
        Some(AppEvent::OutboxFailed(AppMessageResult::SendTimeout))
    }

    fn on_push(
        &mut self,
        transaction_id: u8,
        uuid: AppUuid,
        dictionary: Dictionary,
        frame: &Frame,
    ) -> AppEvent {
        let refused = if !self.open {
            Some(AppMessageResult::Closed)
        } else if uuid != self.uuid {
            Some(AppMessageResult::AppNotRunning)
        } else if frame.payload.len() - PUSH_HEADER_SIZE > self.inbox_size {
            Some(AppMessageResult::BufferOverflow)
        } else {
            None
        };

        match refused {
            Some(reason) => {
                self.reply(AppMessage::Nack { transaction_id });
                AppEvent::InboxDropped(reason)
            }
            None => {
                self.reply(AppMessage::Ack { transaction_id });
                AppEvent::InboxReceived(dictionary)
            }
        }
    }

    /// Clear the pending push if `transaction_id` answers it
    fn settle(&mut self, transaction_id: u8) -> bool {
        match self.pending {
            Some(p) if p.transaction_id == transaction_id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    fn reply(&mut self, message: AppMessage) {
        // A lost reply only costs the phone a timeout on its side
        if let Ok(frame) = message.to_frame() {
            let _ = self.sink.submit(frame);
        }
    }
}

/// The application task shares one session between its outbox and its
/// event source; they never run at the same time.
impl<S: FrameSink> Outbox for &RefCell<LinkSession<S>> {
    fn send(&mut self, dictionary: &Dictionary) -> Result<(), AppMessageResult> {
        self.try_borrow_mut()
            .map_err(|_| AppMessageResult::Busy)?
            .push(dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicklink_protocol::keys::{BUTTON_UP, KEY_BUTTON, KEY_VIBRATE};
    use clicklink_protocol::messages::{MSG_ACK, MSG_NACK, MSG_PUSH};
    use clicklink_protocol::{IntWidth, Tuple, TupleValue};
    use std::vec::Vec;

    const UUID: AppUuid = AppUuid([7; 16]);
    const OTHER: AppUuid = AppUuid([8; 16]);

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        full: bool,
    }

    impl FrameSink for Recorder {
        fn submit(&mut self, frame: Frame) -> Result<(), AppMessageResult> {
            if self.full {
                return Err(AppMessageResult::InternalError);
            }
            self.frames.push(frame);
            Ok(())
        }
    }

    fn open_session() -> LinkSession<Recorder> {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        session.open(64, 64);
        session
    }

    fn button_dict() -> Dictionary {
        let mut d = Dictionary::new();
        d.write_int(KEY_BUTTON, BUTTON_UP).unwrap();
        d
    }

    fn push_frame(transaction_id: u8, uuid: AppUuid, dictionary: Dictionary) -> Frame {
        AppMessage::Push {
            transaction_id,
            uuid,
            dictionary,
        }
        .to_frame()
        .unwrap()
    }

    #[test]
    fn test_push_then_ack() {
        let mut session = open_session();
        session.push(&button_dict()).unwrap();

        let sent = &session.sink().frames;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, MSG_PUSH);
        assert!(session.is_pending());

        let ack = Frame::new(MSG_ACK, &[0]).unwrap();
        assert_eq!(session.on_frame(&ack), Some(AppEvent::OutboxSent));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_nack_reports_rejected() {
        let mut session = open_session();
        session.push(&button_dict()).unwrap();

        let nack = Frame::new(MSG_NACK, &[0]).unwrap();
        assert_eq!(
            session.on_frame(&nack),
            Some(AppEvent::OutboxFailed(AppMessageResult::SendRejected))
        );
    }

    #[test]
    fn test_stale_ack_ignored() {
        let mut session = open_session();
        session.push(&button_dict()).unwrap();

        let ack = Frame::new(MSG_ACK, &[9]).unwrap();
        assert_eq!(session.on_frame(&ack), None);
        assert!(session.is_pending());
    }

    #[test]
    fn test_second_push_is_busy() {
        let mut session = open_session();
        session.push(&button_dict()).unwrap();
        assert_eq!(session.push(&button_dict()), Err(AppMessageResult::Busy));
        assert_eq!(session.sink().frames.len(), 1);
    }

    #[test]
    fn test_transaction_ids_advance() {
        let mut session = open_session();
        for expected in 0..3u8 {
            session.push(&button_dict()).unwrap();
            let ack = Frame::new(MSG_ACK, &[expected]).unwrap();
            assert_eq!(session.on_frame(&ack), Some(AppEvent::OutboxSent));
        }
        let ids: Vec<u8> = session.sink().frames.iter().map(|f| f.payload[0]).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut session = open_session();
        session.push(&button_dict()).unwrap();

        assert_eq!(session.tick(600), None);
        assert_eq!(
            session.tick(600),
            Some(AppEvent::OutboxFailed(AppMessageResult::SendTimeout))
        );
        assert_eq!(session.tick(600), None);
        assert!(!session.is_pending());

        // A late ACK after the timeout is ignored
        let ack = Frame::new(MSG_ACK, &[0]).unwrap();
        assert_eq!(session.on_frame(&ack), None);
    }

    #[test]
    fn test_closed_session_refuses() {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        assert_eq!(session.push(&button_dict()), Err(AppMessageResult::Closed));
        assert!(!session.is_open());
    }

    #[test]
    fn test_outbox_size_enforced() {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        session.open(64, 8);
        assert_eq!(
            session.push(&button_dict()),
            Err(AppMessageResult::BufferOverflow)
        );
    }

    #[test]
    fn test_open_clamps_sizes() {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        session.open(10_000, 10_000);
        assert_eq!(
            session.sizes(),
            (APP_MESSAGE_SIZE_MAXIMUM, APP_MESSAGE_SIZE_MAXIMUM)
        );
    }

    #[test]
    fn test_sink_failure_leaves_nothing_pending() {
        let mut session = open_session();
        session.sink.full = true;
        assert_eq!(
            session.push(&button_dict()),
            Err(AppMessageResult::InternalError)
        );
        assert!(!session.is_pending());
    }

    #[test]
    fn test_inbound_push_is_acked() {
        let mut session = open_session();
        let mut dict = Dictionary::new();
        dict.write_int(KEY_VIBRATE, 1).unwrap();

        let event = session.on_frame(&push_frame(5, UUID, dict.clone()));

        assert_eq!(event, Some(AppEvent::InboxReceived(dict)));
        let replies = &session.sink().frames;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind, MSG_ACK);
        assert_eq!(&replies[0].payload[..], &[5]);
    }

    #[test]
    fn test_vibrate_among_many_tuples_is_received() {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        session.open(APP_MESSAGE_SIZE_MAXIMUM, 64);

        let mut dict = Dictionary::new();
        for key in 100..119 {
            dict.push(Tuple {
                key,
                value: TupleValue::Uint(3, IntWidth::One),
            })
            .unwrap();
        }
        dict.write_int(KEY_VIBRATE, 1).unwrap();
        assert_eq!(dict.len(), 20);

        let event = session.on_frame(&push_frame(4, UUID, dict.clone()));

        assert_eq!(event, Some(AppEvent::InboxReceived(dict)));
        assert_eq!(session.sink().frames[0].kind, MSG_ACK);
    }

    #[test]
    fn test_vibrate_with_large_value_is_received() {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        session.open(APP_MESSAGE_SIZE_MAXIMUM, 64);

        let mut dict = Dictionary::new();
        dict.push(Tuple {
            key: KEY_VIBRATE,
            value: TupleValue::Bytes(heapless::Vec::from_slice(&[0xAB; 100]).unwrap()),
        })
        .unwrap();

        let event = session.on_frame(&push_frame(6, UUID, dict.clone()));

        assert_eq!(event, Some(AppEvent::InboxReceived(dict)));
        assert_eq!(session.sink().frames[0].kind, MSG_ACK);
    }

    #[test]
    fn test_inbound_for_other_app_is_nacked() {
        let mut session = open_session();
        let event = session.on_frame(&push_frame(2, OTHER, Dictionary::new()));

        assert_eq!(
            event,
            Some(AppEvent::InboxDropped(AppMessageResult::AppNotRunning))
        );
        assert_eq!(session.sink().frames[0].kind, MSG_NACK);
    }

    #[test]
    fn test_inbound_over_inbox_size_is_nacked() {
        let mut session = LinkSession::new(Recorder::default(), UUID, 1000);
        session.open(4, 64);
        let event = session.on_frame(&push_frame(1, UUID, button_dict()));

        assert_eq!(
            event,
            Some(AppEvent::InboxDropped(AppMessageResult::BufferOverflow))
        );
        assert_eq!(session.sink().frames[0].kind, MSG_NACK);
    }

    #[test]
    fn test_malformed_push_is_nacked_and_dropped() {
        let mut session = open_session();
        let mut payload = [0u8; PUSH_HEADER_SIZE + 1];
        payload[0] = 3;
        payload[PUSH_HEADER_SIZE] = 2; // two tuples declared, none present
        let frame = Frame::new(MSG_PUSH, &payload).unwrap();

        assert_eq!(
            session.on_frame(&frame),
            Some(AppEvent::InboxDropped(AppMessageResult::Malformed))
        );
        let replies = &session.sink().frames;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind, MSG_NACK);
        assert_eq!(&replies[0].payload[..], &[3]);
    }

    #[test]
    fn test_unknown_frame_kind_ignored() {
        let mut session = open_session();
        let frame = Frame::new(0x42, &[1]).unwrap();
        assert_eq!(session.on_frame(&frame), None);
        assert!(session.sink().frames.is_empty());
    }

    #[test]
    fn test_frame_error_drops_inbound() {
        let mut session = open_session();
        assert_eq!(
            session.on_frame_error(FrameError::InvalidChecksum),
            AppEvent::InboxDropped(AppMessageResult::Malformed)
        );
    }

    #[test]
    fn test_shared_session_as_outbox() {
        let session = RefCell::new(open_session());
        let mut outbox = &session;

        outbox.send(&button_dict()).unwrap();
        assert_eq!(outbox.send(&button_dict()), Err(AppMessageResult::Busy));
        assert_eq!(session.borrow().sink().frames.len(), 1);
    }
}
