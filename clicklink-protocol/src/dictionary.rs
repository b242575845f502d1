//! AppMessage dictionary encoding and decoding.
//!
//! A dictionary is a counted list of typed tuples, all integers little-endian:
//! - COUNT (1 byte): number of tuples
//! - per tuple:
//!   - KEY (4 bytes)
//!   - TYPE (1 byte): 0 = byte array, 1 = C string, 2 = uint, 3 = int
//!   - LENGTH (2 bytes): value length in bytes
//!   - VALUE (LENGTH bytes)
//!
//! C strings carry their NUL terminator inside LENGTH. Integers are 1, 2 or
//! 4 bytes wide. Capacity is sized so that any dictionary that fits in one
//! push also fits in a `Dictionary`.

use heapless::{String, Vec};

use crate::messages::APP_MESSAGE_SIZE_MAXIMUM;

/// Bytes of per-tuple header (KEY + TYPE + LENGTH)
pub const TUPLE_HEADER_SIZE: usize = 4 + 1 + 2;

/// Bytes of dictionary header (COUNT)
pub const DICT_HEADER_SIZE: usize = 1;

/// Maximum number of tuples in one dictionary (all empty byte arrays)
pub const MAX_TUPLES: usize = (APP_MESSAGE_SIZE_MAXIMUM - DICT_HEADER_SIZE) / TUPLE_HEADER_SIZE;

/// Maximum length of a byte array or C string value (including the NUL)
pub const MAX_VALUE_LEN: usize = APP_MESSAGE_SIZE_MAXIMUM - DICT_HEADER_SIZE - TUPLE_HEADER_SIZE;

// Tuple type tags
const TYPE_BYTES: u8 = 0;
const TYPE_CSTRING: u8 = 1;
const TYPE_UINT: u8 = 2;
const TYPE_INT: u8 = 3;

/// Errors that can occur during dictionary parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictionaryError {
    /// Input ended before the declared tuples did
    Truncated,
    /// Unknown tuple type tag
    InvalidType,
    /// Integer width other than 1, 2 or 4 bytes
    InvalidWidth,
    /// Byte array or string longer than `MAX_VALUE_LEN`
    ValueTooLarge,
    /// More than `MAX_TUPLES` tuples
    TooManyTuples,
    /// C string without terminator or not valid UTF-8
    InvalidString,
    /// Bytes left over after the last declared tuple
    TrailingBytes,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Width of an integer tuple on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntWidth {
    One,
    Two,
    Four,
}

impl IntWidth {
    fn from_len(len: u16) -> Result<Self, DictionaryError> {
        match len {
            1 => Ok(IntWidth::One),
            2 => Ok(IntWidth::Two),
            4 => Ok(IntWidth::Four),
            _ => Err(DictionaryError::InvalidWidth),
        }
    }

    /// Width in bytes
    pub fn len(self) -> usize {
        match self {
            IntWidth::One => 1,
            IntWidth::Two => 2,
            IntWidth::Four => 4,
        }
    }
}

/// Value carried by a tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TupleValue {
    Bytes(Vec<u8, MAX_VALUE_LEN>),
    CString(String<MAX_VALUE_LEN>),
    Uint(u32, IntWidth),
    Int(i32, IntWidth),
}

impl TupleValue {
    /// Integer view of the value, if it is an integer that fits an `i32`
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TupleValue::Int(v, _) => Some(*v),
            TupleValue::Uint(v, _) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    fn type_tag(&self) -> u8 {
        match self {
            TupleValue::Bytes(_) => TYPE_BYTES,
            TupleValue::CString(_) => TYPE_CSTRING,
            TupleValue::Uint(..) => TYPE_UINT,
            TupleValue::Int(..) => TYPE_INT,
        }
    }

    fn wire_len(&self) -> usize {
        match self {
            TupleValue::Bytes(b) => b.len(),
            TupleValue::CString(s) => s.len() + 1,
            TupleValue::Uint(_, w) | TupleValue::Int(_, w) => w.len(),
        }
    }
}

/// A single key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub key: u32,
    pub value: TupleValue,
}

impl Tuple {
    /// A 4-byte signed integer tuple
    pub fn int(key: u32, value: i32) -> Self {
        Self {
            key,
            value: TupleValue::Int(value, IntWidth::Four),
        }
    }

    /// A C string tuple
    pub fn cstring(key: u32, text: &str) -> Result<Self, DictionaryError> {
        // Leave room for the terminator
        if text.len() >= MAX_VALUE_LEN || text.as_bytes().contains(&0) {
            return Err(DictionaryError::ValueTooLarge);
        }
        let mut s = String::new();
        s.push_str(text).map_err(|_| DictionaryError::ValueTooLarge)?;
        Ok(Self {
            key,
            value: TupleValue::CString(s),
        })
    }

    /// Encoded size of this tuple including its header
    pub fn encoded_len(&self) -> usize {
        TUPLE_HEADER_SIZE + self.value.wire_len()
    }
}

/// An ordered collection of tuples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    tuples: Vec<Tuple, MAX_TUPLES>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self { tuples: Vec::new() }
    }

    /// Append a tuple
    pub fn push(&mut self, tuple: Tuple) -> Result<(), DictionaryError> {
        self.tuples
            .push(tuple)
            .map_err(|_| DictionaryError::TooManyTuples)
    }

    /// Append a 4-byte signed integer
    pub fn write_int(&mut self, key: u32, value: i32) -> Result<(), DictionaryError> {
        self.push(Tuple::int(key, value))
    }

    /// Iterate the tuples in wire order
    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }

    /// First tuple with the given key
    pub fn find(&self, key: u32) -> Option<&Tuple> {
        self.tuples.iter().find(|t| t.key == key)
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        DICT_HEADER_SIZE + self.tuples.iter().map(Tuple::encoded_len).sum::<usize>()
    }

    /// Encode into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, DictionaryError> {
        let total = self.encoded_len();
        if buffer.len() < total {
            return Err(DictionaryError::BufferTooSmall);
        }

        buffer[0] = self.tuples.len() as u8;
        let mut pos = DICT_HEADER_SIZE;

        for tuple in &self.tuples {
            let len = tuple.value.wire_len();
            buffer[pos..pos + 4].copy_from_slice(&tuple.key.to_le_bytes());
            buffer[pos + 4] = tuple.value.type_tag();
            buffer[pos + 5..pos + 7].copy_from_slice(&(len as u16).to_le_bytes());
            pos += TUPLE_HEADER_SIZE;

            let value = &mut buffer[pos..pos + len];
            match &tuple.value {
                TupleValue::Bytes(b) => value.copy_from_slice(b),
                TupleValue::CString(s) => {
                    value[..s.len()].copy_from_slice(s.as_bytes());
                    value[s.len()] = 0;
                }
                TupleValue::Uint(v, w) => value.copy_from_slice(&v.to_le_bytes()[..w.len()]),
                TupleValue::Int(v, w) => value.copy_from_slice(&v.to_le_bytes()[..w.len()]),
            }
            pos += len;
        }

        Ok(pos)
    }

    /// Decode a dictionary occupying all of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let (&count, mut rest) = bytes.split_first().ok_or(DictionaryError::Truncated)?;
        if count as usize > MAX_TUPLES {
            return Err(DictionaryError::TooManyTuples);
        }

        let mut dict = Dictionary::new();
        for _ in 0..count {
            if rest.len() < TUPLE_HEADER_SIZE {
                return Err(DictionaryError::Truncated);
            }
            let key = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
            let tag = rest[4];
            let len = u16::from_le_bytes([rest[5], rest[6]]);
            rest = &rest[TUPLE_HEADER_SIZE..];

            if rest.len() < len as usize {
                return Err(DictionaryError::Truncated);
            }
            let (raw, tail) = rest.split_at(len as usize);
            rest = tail;

            let value = decode_value(tag, len, raw)?;
            dict.push(Tuple { key, value })?;
        }

        if !rest.is_empty() {
            return Err(DictionaryError::TrailingBytes);
        }
        Ok(dict)
    }
}

fn decode_value(tag: u8, len: u16, raw: &[u8]) -> Result<TupleValue, DictionaryError> {
    match tag {
        TYPE_BYTES => {
            let mut bytes = Vec::new();
            bytes
                .extend_from_slice(raw)
                .map_err(|_| DictionaryError::ValueTooLarge)?;
            Ok(TupleValue::Bytes(bytes))
        }
        TYPE_CSTRING => {
            if raw.len() > MAX_VALUE_LEN {
                return Err(DictionaryError::ValueTooLarge);
            }
            // Exactly one NUL, and it ends the value
            let end = raw
                .iter()
                .position(|&b| b == 0)
                .ok_or(DictionaryError::InvalidString)?;
            if end + 1 != raw.len() {
                return Err(DictionaryError::InvalidString);
            }
            let text =
                core::str::from_utf8(&raw[..end]).map_err(|_| DictionaryError::InvalidString)?;
            let mut s = String::new();
            s.push_str(text)
                .map_err(|_| DictionaryError::ValueTooLarge)?;
            Ok(TupleValue::CString(s))
        }
        TYPE_UINT => {
            let width = IntWidth::from_len(len)?;
            let v = match width {
                IntWidth::One => raw[0] as u32,
                IntWidth::Two => u16::from_le_bytes([raw[0], raw[1]]) as u32,
                IntWidth::Four => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            };
            Ok(TupleValue::Uint(v, width))
        }
        TYPE_INT => {
            let width = IntWidth::from_len(len)?;
            let v = match width {
                IntWidth::One => raw[0] as i8 as i32,
                IntWidth::Two => i16::from_le_bytes([raw[0], raw[1]]) as i32,
                IntWidth::Four => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            };
            Ok(TupleValue::Int(v, width))
        }
        _ => Err(DictionaryError::InvalidType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_single_int() {
        let mut dict = Dictionary::new();
        dict.write_int(0, 1).unwrap();

        let mut buffer = [0u8; 16];
        let len = dict.encode(&mut buffer).unwrap();

        assert_eq!(len, 12);
        assert_eq!(buffer[0], 1); // count
        assert_eq!(&buffer[1..5], &[0, 0, 0, 0]); // key
        assert_eq!(buffer[5], TYPE_INT);
        assert_eq!(&buffer[6..8], &[4, 0]); // length
        assert_eq!(&buffer[8..12], &[1, 0, 0, 0]); // value
    }

    #[test]
    fn test_decode_mixed_tuples() {
        let bytes = [
            3, // count
            1, 0, 0, 0, TYPE_UINT, 1, 0, 0xFF, // key 1: uint8 255
            7, 0, 0, 0, TYPE_INT, 2, 0, 0xFE, 0xFF, // key 7: int16 -2
            9, 0, 0, 0, TYPE_CSTRING, 3, 0, b'h', b'i', 0, // key 9: "hi"
        ];
        let dict = Dictionary::decode(&bytes).unwrap();

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.find(1).unwrap().value, TupleValue::Uint(255, IntWidth::One));
        assert_eq!(dict.find(7).unwrap().value.as_i32(), Some(-2));
        match &dict.find(9).unwrap().value {
            TupleValue::CString(s) => assert_eq!(s.as_str(), "hi"),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_dictionary() {
        let dict = Dictionary::decode(&[0]).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(Dictionary::decode(&[]), Err(DictionaryError::Truncated));
        assert_eq!(Dictionary::decode(&[1, 0, 0]), Err(DictionaryError::Truncated));
        // Declares 4 value bytes, carries 2
        let bytes = [1, 0, 0, 0, 0, TYPE_INT, 4, 0, 1, 2];
        assert_eq!(Dictionary::decode(&bytes), Err(DictionaryError::Truncated));
    }

    #[test]
    fn test_decode_invalid_width() {
        let bytes = [1, 0, 0, 0, 0, TYPE_INT, 3, 0, 1, 2, 3];
        assert_eq!(Dictionary::decode(&bytes), Err(DictionaryError::InvalidWidth));
    }

    #[test]
    fn test_decode_invalid_type() {
        let bytes = [1, 0, 0, 0, 0, 9, 0, 0];
        assert_eq!(Dictionary::decode(&bytes), Err(DictionaryError::InvalidType));
    }

    #[test]
    fn test_decode_unterminated_string() {
        let bytes = [1, 0, 0, 0, 0, TYPE_CSTRING, 2, 0, b'h', b'i'];
        assert_eq!(Dictionary::decode(&bytes), Err(DictionaryError::InvalidString));
    }

    #[test]
    fn test_decode_bytes_after_terminator() {
        let bytes = [1, 0, 0, 0, 0, TYPE_CSTRING, 4, 0, b'h', 0, b'i', 0];
        assert_eq!(Dictionary::decode(&bytes), Err(DictionaryError::InvalidString));
    }

    #[test]
    fn test_decode_many_small_tuples() {
        // 19 uint8 tuples plus a VIBRATE int, as large pushes from the phone can be
        let mut bytes = std::vec![20u8];
        for key in 100u32..119 {
            bytes.extend_from_slice(&key.to_le_bytes());
            bytes.extend_from_slice(&[TYPE_UINT, 1, 0, 7]);
        }
        bytes.extend_from_slice(&[1, 0, 0, 0, TYPE_INT, 4, 0, 1, 0, 0, 0]);
        assert!(bytes.len() <= APP_MESSAGE_SIZE_MAXIMUM);

        let dict = Dictionary::decode(&bytes).unwrap();
        assert_eq!(dict.len(), 20);
        assert_eq!(dict.find(1).unwrap().value.as_i32(), Some(1));
    }

    #[test]
    fn test_decode_large_byte_array() {
        let mut bytes = std::vec![1u8, 1, 0, 0, 0, TYPE_BYTES, 100, 0];
        bytes.extend_from_slice(&[0xAB; 100]);

        let dict = Dictionary::decode(&bytes).unwrap();
        match &dict.find(1).unwrap().value {
            TupleValue::Bytes(b) => assert_eq!(b.len(), 100),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_largest_value_fits_one_push() {
        let mut dict = Dictionary::new();
        let value = Vec::from_slice(&[0u8; MAX_VALUE_LEN]).unwrap();
        dict.push(Tuple {
            key: 1,
            value: TupleValue::Bytes(value),
        })
        .unwrap();
        assert_eq!(dict.encoded_len(), APP_MESSAGE_SIZE_MAXIMUM);
    }

    #[test]
    fn test_decode_trailing_bytes() {
        assert_eq!(Dictionary::decode(&[0, 0xAB]), Err(DictionaryError::TrailingBytes));
    }

    #[test]
    fn test_too_many_tuples() {
        let mut dict = Dictionary::new();
        for key in 0..MAX_TUPLES as u32 {
            dict.write_int(key, 0).unwrap();
        }
        assert_eq!(dict.write_int(99, 0), Err(DictionaryError::TooManyTuples));
        assert_eq!(
            Dictionary::decode(&[MAX_TUPLES as u8 + 1]),
            Err(DictionaryError::TooManyTuples)
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut dict = Dictionary::new();
        dict.write_int(0, 0).unwrap();
        let mut buffer = [0u8; 4];
        assert_eq!(dict.encode(&mut buffer), Err(DictionaryError::BufferTooSmall));
    }

    #[test]
    fn test_cstring_roundtrip() {
        let mut dict = Dictionary::new();
        dict.push(Tuple::cstring(3, "Vibrate!").unwrap()).unwrap();

        let mut buffer = [0u8; 32];
        let len = dict.encode(&mut buffer).unwrap();
        assert_eq!(len, dict.encoded_len());
        assert_eq!(Dictionary::decode(&buffer[..len]).unwrap(), dict);
    }

    proptest! {
        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..300)) {
            let _ = Dictionary::decode(&bytes);
        }

        #[test]
        fn int_tuples_survive_encoding(key in any::<u32>(), value in any::<i32>()) {
            let mut dict = Dictionary::new();
            dict.write_int(key, value).unwrap();
            let mut buffer = [0u8; 16];
            let len = dict.encode(&mut buffer).unwrap();
            let decoded = Dictionary::decode(&buffer[..len]).unwrap();
            prop_assert_eq!(decoded.find(key).and_then(|t| t.value.as_i32()), Some(value));
        }
    }
}
