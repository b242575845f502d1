//! AppMessage commands carried in link frames
//!
//! - PUSH: deliver a dictionary to the app identified by its UUID
//! - ACK: the push with this transaction id was accepted
//! - NACK: the push with this transaction id was rejected

use crate::dictionary::{Dictionary, DictionaryError};
use crate::frame::{Frame, FrameError, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Frame kinds
pub const MSG_PUSH: u8 = 0x01;
pub const MSG_NACK: u8 = 0x7F;
pub const MSG_ACK: u8 = 0xFF;

/// Length of an application UUID
pub const UUID_LEN: usize = 16;

/// PUSH header ahead of the dictionary (transaction id + UUID)
pub const PUSH_HEADER_SIZE: usize = 1 + UUID_LEN;

/// Largest dictionary a single PUSH can carry
pub const APP_MESSAGE_SIZE_MAXIMUM: usize = MAX_PAYLOAD_SIZE - PUSH_HEADER_SIZE;

/// Identifies the watch application a PUSH is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppUuid(pub [u8; UUID_LEN]);

/// Errors raised while decoding an AppMessage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Frame kind is not PUSH, ACK or NACK
    UnknownKind,
    /// Payload shorter than the command header
    Truncated,
    /// Dictionary inside a PUSH is malformed
    Dictionary(DictionaryError),
    /// Could not build the outgoing frame
    Frame(FrameError),
}

impl From<DictionaryError> for MessageError {
    fn from(e: DictionaryError) -> Self {
        MessageError::Dictionary(e)
    }
}

impl From<FrameError> for MessageError {
    fn from(e: FrameError) -> Self {
        MessageError::Frame(e)
    }
}

/// A decoded AppMessage command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    Push {
        transaction_id: u8,
        uuid: AppUuid,
        dictionary: Dictionary,
    },
    Ack {
        transaction_id: u8,
    },
    Nack {
        transaction_id: u8,
    },
}

impl AppMessage {
    /// Parse a command from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        let transaction_id = Self::transaction_id_of(frame).ok_or(MessageError::Truncated)?;
        match frame.kind {
            MSG_PUSH => {
                if frame.payload.len() < PUSH_HEADER_SIZE {
                    return Err(MessageError::Truncated);
                }
                let mut uuid = [0u8; UUID_LEN];
                uuid.copy_from_slice(&frame.payload[1..PUSH_HEADER_SIZE]);
                let dictionary = Dictionary::decode(&frame.payload[PUSH_HEADER_SIZE..])?;
                Ok(AppMessage::Push {
                    transaction_id,
                    uuid: AppUuid(uuid),
                    dictionary,
                })
            }
            MSG_ACK => Ok(AppMessage::Ack { transaction_id }),
            MSG_NACK => Ok(AppMessage::Nack { transaction_id }),
            _ => Err(MessageError::UnknownKind),
        }
    }

    /// Transaction id of a frame, readable even when the rest is malformed
    pub fn transaction_id_of(frame: &Frame) -> Option<u8> {
        frame.payload.first().copied()
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, MessageError> {
        match self {
            AppMessage::Push {
                transaction_id,
                uuid,
                dictionary,
            } => {
                let mut payload = [0u8; MAX_PAYLOAD_SIZE];
                payload[0] = *transaction_id;
                payload[1..PUSH_HEADER_SIZE].copy_from_slice(&uuid.0);
                let len = dictionary
                    .encode(&mut payload[PUSH_HEADER_SIZE..])
                    .map_err(|_| MessageError::Frame(FrameError::PayloadTooLarge))?;
                Ok(Frame::new(MSG_PUSH, &payload[..PUSH_HEADER_SIZE + len])?)
            }
            AppMessage::Ack { transaction_id } => Ok(Frame::new(MSG_ACK, &[*transaction_id])?),
            AppMessage::Nack { transaction_id } => Ok(Frame::new(MSG_NACK, &[*transaction_id])?),
        }
    }
}

/// Encode a frame into a bounded byte vector, ready for the UART
pub fn frame_bytes(frame: &Frame) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    let len = frame.encode(&mut buffer)?;
    let mut bytes = Vec::new();
    bytes
        .extend_from_slice(&buffer[..len])
        .map_err(|_| FrameError::BufferTooSmall)?;
    Ok(bytes)
}
