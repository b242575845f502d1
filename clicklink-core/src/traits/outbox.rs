//! Outbound message transport

use clicklink_protocol::{Dictionary, DictionaryError, MessageError};

/// Reason codes reported with dropped and failed messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppMessageResult {
    /// The peer did not acknowledge in time
    SendTimeout,
    /// The peer rejected the message (NACK)
    SendRejected,
    /// Inbound message addressed to another app
    AppNotRunning,
    /// A message is already awaiting acknowledgement
    Busy,
    /// Message larger than the opened inbox/outbox size
    BufferOverflow,
    /// The channel has not been opened
    Closed,
    /// Inbound envelope or dictionary could not be decoded
    Malformed,
    /// The message could not be built from the given arguments
    InvalidArgs,
    /// The transport failed to queue an encoded message
    InternalError,
}

impl From<DictionaryError> for AppMessageResult {
    fn from(e: DictionaryError) -> Self {
        match e {
            DictionaryError::TooManyTuples
            | DictionaryError::ValueTooLarge
            | DictionaryError::BufferTooSmall => AppMessageResult::InvalidArgs,
            _ => AppMessageResult::Malformed,
        }
    }
}

impl From<MessageError> for AppMessageResult {
    fn from(e: MessageError) -> Self {
        match e {
            MessageError::Frame(_) => AppMessageResult::InternalError,
            MessageError::Dictionary(
                DictionaryError::TooManyTuples | DictionaryError::ValueTooLarge,
            ) => AppMessageResult::BufferOverflow,
            _ => AppMessageResult::Malformed,
        }
    }
}

/// Hands outbound dictionaries to the transport
///
/// Delivery is asynchronous: `Ok` only means the message was queued. The
/// outcome is reported later through the sent/failed notifications.
pub trait Outbox {
    fn send(&mut self, dictionary: &Dictionary) -> Result<(), AppMessageResult>;
}

impl<T: Outbox + ?Sized> Outbox for &mut T {
    fn send(&mut self, dictionary: &Dictionary) -> Result<(), AppMessageResult> {
        (**self).send(dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicklink_protocol::FrameError;

    #[test]
    fn test_inbound_capacity_is_overflow_not_malformed() {
        assert_eq!(
            AppMessageResult::from(MessageError::Dictionary(DictionaryError::TooManyTuples)),
            AppMessageResult::BufferOverflow
        );
        assert_eq!(
            AppMessageResult::from(MessageError::Dictionary(DictionaryError::ValueTooLarge)),
            AppMessageResult::BufferOverflow
        );
        assert_eq!(
            AppMessageResult::from(MessageError::Dictionary(DictionaryError::Truncated)),
            AppMessageResult::Malformed
        );
        assert_eq!(
            AppMessageResult::from(MessageError::Frame(FrameError::PayloadTooLarge)),
            AppMessageResult::InternalError
        );
    }

    #[test]
    fn test_outbound_build_errors_are_invalid_args() {
        assert_eq!(
            AppMessageResult::from(DictionaryError::TooManyTuples),
            AppMessageResult::InvalidArgs
        );
        assert_eq!(
            AppMessageResult::from(DictionaryError::InvalidType),
            AppMessageResult::Malformed
        );
    }
}
