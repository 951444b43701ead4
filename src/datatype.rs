//! Data type, word order and raw buffer definitions.
//!
//! [`DataTypeSpec`] is the closed set of value types the decoder understands.
//! Each variant knows how much data a read must fetch for it, so the session
//! layer can size its requests before calling [`decode`](crate::decode).
//!
//! # Types Overview
//!
//! | Tag | Variant | Bytes | Registers |
//! |-----|---------|:-----:|:---------:|
//! | `bool` | [`DataTypeSpec::Bool`] | `byte_index + 1` | `ceil(bytes / 2)` |
//! | `bool_array` | [`DataTypeSpec::BoolArray`] | `ceil(count / 8)` | `ceil(bytes / 2)` |
//! | `int16` / `int` | [`DataTypeSpec::Int16`] | 2 | 1 |
//! | `uint16` | [`DataTypeSpec::UInt16`] | 2 | 1 |
//! | `int32` / `dint` | [`DataTypeSpec::Int32`] | 4 | 2 |
//! | `uint32` / `udint` | [`DataTypeSpec::UInt32`] | 4 | 2 |
//! | `float32` / `real` | [`DataTypeSpec::Float32`] | 4 | 2 |
//! | `string` | [`DataTypeSpec::FixedString`] | `byte_length` | `ceil(bytes / 2)` |
//!
//! # Example
//!
//! ```
//! use plc_reader::DataTypeSpec;
//!
//! let spec = DataTypeSpec::from_tag("string", 11).unwrap();
//! assert_eq!(spec, DataTypeSpec::FixedString { byte_length: 11 });
//! assert_eq!(spec.byte_len(), 11);
//! assert_eq!(spec.word_count(), 6);
//!
//! assert_eq!(DataTypeSpec::Float32.word_count(), 2);
//! assert_eq!(DataTypeSpec::Float32.to_string(), "float32");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;
use crate::utils::words_to_bytes;

/// The value type requested from a decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataTypeSpec {
    /// A single bit of one byte.
    Bool {
        /// Byte holding the bit.
        byte_index: usize,
        /// Bit position inside the byte (0-7, 0 is LSB).
        bit_index: u8,
    },
    /// `count` bit-packed booleans, low bit first.
    BoolArray {
        /// Number of booleans to produce.
        count: usize,
    },
    /// Signed 16-bit integer (INT).
    Int16,
    /// Unsigned 16-bit integer (WORD/UINT).
    UInt16,
    /// Signed 32-bit integer (DINT).
    Int32,
    /// Unsigned 32-bit integer (UDINT).
    UInt32,
    /// IEEE-754 single precision float (REAL).
    Float32,
    /// UTF-8 text of a fixed number of bytes, trailing NULs removed.
    FixedString {
        /// Number of raw bytes the string occupies.
        byte_length: usize,
    },
}

impl DataTypeSpec {
    /// Maps a type tag to a spec.
    ///
    /// `size` parameterizes the variable types: it is the bit index for
    /// `bool` (in byte 0), the element count for `bool_array` and the byte
    /// length for `string`. Fixed-size types ignore it. Tags are matched
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedType`] for unknown tags.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::DataTypeSpec;
    ///
    /// assert_eq!(DataTypeSpec::from_tag("REAL", 0).unwrap(), DataTypeSpec::Float32);
    /// assert_eq!(
    ///     DataTypeSpec::from_tag("bool", 5).unwrap(),
    ///     DataTypeSpec::Bool { byte_index: 0, bit_index: 5 }
    /// );
    /// assert!(DataTypeSpec::from_tag("lreal", 0).is_err());
    /// ```
    pub fn from_tag(tag: &str, size: usize) -> Result<Self, DecodeError> {
        let spec = match tag.trim().to_ascii_lowercase().as_str() {
            "bool" => DataTypeSpec::Bool {
                byte_index: 0,
                bit_index: u8::try_from(size).map_err(|_| {
                    DecodeError::unsupported_type(format!("bool bit index {}", size))
                })?,
            },
            "bool_array" => DataTypeSpec::BoolArray { count: size },
            "int" | "int16" => DataTypeSpec::Int16,
            "uint16" | "word" => DataTypeSpec::UInt16,
            "dint" | "int32" => DataTypeSpec::Int32,
            "udint" | "uint32" | "dword" => DataTypeSpec::UInt32,
            "real" | "float32" => DataTypeSpec::Float32,
            "string" => DataTypeSpec::FixedString { byte_length: size },
            other => return Err(DecodeError::unsupported_type(other)),
        };
        Ok(spec)
    }

    /// Returns the number of bytes a byte-oriented read must fetch.
    pub fn byte_len(&self) -> usize {
        match *self {
            DataTypeSpec::Bool { byte_index, .. } => byte_index.saturating_add(1),
            DataTypeSpec::BoolArray { count } => count.div_ceil(8),
            DataTypeSpec::Int16 | DataTypeSpec::UInt16 => 2,
            DataTypeSpec::Int32 | DataTypeSpec::UInt32 | DataTypeSpec::Float32 => 4,
            DataTypeSpec::FixedString { byte_length } => byte_length,
        }
    }

    /// Returns the number of 16-bit registers a word-oriented read must fetch.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::DataTypeSpec;
    ///
    /// assert_eq!(DataTypeSpec::Int16.word_count(), 1);
    /// assert_eq!(DataTypeSpec::UInt32.word_count(), 2);
    /// assert_eq!(DataTypeSpec::BoolArray { count: 17 }.word_count(), 2);
    /// ```
    pub fn word_count(&self) -> usize {
        self.byte_len().div_ceil(2)
    }

    /// Returns whether the value spans two registers and depends on [`WordOrder`].
    pub fn is_multi_word(&self) -> bool {
        matches!(
            self,
            DataTypeSpec::Int32 | DataTypeSpec::UInt32 | DataTypeSpec::Float32
        )
    }
}

impl fmt::Display for DataTypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTypeSpec::Bool {
                byte_index,
                bit_index,
            } => write!(f, "bool[{}.{}]", byte_index, bit_index),
            DataTypeSpec::BoolArray { count } => write!(f, "bool_array[{}]", count),
            DataTypeSpec::Int16 => write!(f, "int16"),
            DataTypeSpec::UInt16 => write!(f, "uint16"),
            DataTypeSpec::Int32 => write!(f, "int32"),
            DataTypeSpec::UInt32 => write!(f, "uint32"),
            DataTypeSpec::Float32 => write!(f, "float32"),
            DataTypeSpec::FixedString { byte_length } => write!(f, "string[{}]", byte_length),
        }
    }
}

/// Which of two registers holds the most significant half of a 32-bit value.
///
/// Byte-oriented sources ignore it: their 4-byte runs are always big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WordOrder {
    /// The first register is the high word.
    BigEndianWords,
    /// The second register is the high word.
    LittleEndianWords,
}

impl WordOrder {
    /// Orders a register pair as `(high, low)`.
    #[inline]
    pub(crate) fn split(self, first: u16, second: u16) -> (u16, u16) {
        match self {
            WordOrder::BigEndianWords => (first, second),
            WordOrder::LittleEndianWords => (second, first),
        }
    }
}

impl FromStr for WordOrder {
    type Err = DecodeError;

    /// Parses `big`/`be` or `little`/`le`, case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::WordOrder;
    ///
    /// assert_eq!("big".parse::<WordOrder>().unwrap(), WordOrder::BigEndianWords);
    /// assert_eq!("LE".parse::<WordOrder>().unwrap(), WordOrder::LittleEndianWords);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(WordOrder::BigEndianWords),
            "little" | "le" => Ok(WordOrder::LittleEndianWords),
            other => Err(DecodeError::unsupported_type(format!("word order {}", other))),
        }
    }
}

impl fmt::Display for WordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordOrder::BigEndianWords => write!(f, "big"),
            WordOrder::LittleEndianWords => write!(f, "little"),
        }
    }
}

/// A raw payload as delivered by the session layer.
///
/// The buffer is only borrowed for the duration of one decode call and is
/// never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBuffer<'a> {
    /// 16-bit registers from a word-oriented source.
    Words(&'a [u16]),
    /// Bytes from a byte-oriented source.
    Bytes(&'a [u8]),
}

impl<'a> RawBuffer<'a> {
    /// Number of units (words or bytes) in the buffer.
    pub fn len(&self) -> usize {
        match self {
            RawBuffer::Words(words) => words.len(),
            RawBuffer::Bytes(bytes) => bytes.len(),
        }
    }

    /// Returns `true` if the buffer holds no units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the buffer's unit, used in error messages.
    pub fn unit(&self) -> &'static str {
        match self {
            RawBuffer::Words(_) => "words",
            RawBuffer::Bytes(_) => "bytes",
        }
    }

    /// The buffer as bytes; registers expand high byte first.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::RawBuffer;
    ///
    /// let words = [0x4142u16];
    /// assert_eq!(&*RawBuffer::Words(&words).to_bytes(), b"AB");
    /// assert_eq!(&*RawBuffer::Bytes(b"AB").to_bytes(), b"AB");
    /// ```
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        match *self {
            RawBuffer::Words(words) => Cow::Owned(words_to_bytes(words)),
            RawBuffer::Bytes(bytes) => Cow::Borrowed(bytes),
        }
    }
}

impl<'a> From<&'a [u16]> for RawBuffer<'a> {
    fn from(words: &'a [u16]) -> Self {
        RawBuffer::Words(words)
    }
}

impl<'a> From<&'a [u8]> for RawBuffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RawBuffer::Bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_aliases() {
        assert_eq!(DataTypeSpec::from_tag("int", 0).unwrap(), DataTypeSpec::Int16);
        assert_eq!(DataTypeSpec::from_tag("int16", 0).unwrap(), DataTypeSpec::Int16);
        assert_eq!(DataTypeSpec::from_tag("udint", 0).unwrap(), DataTypeSpec::UInt32);
        assert_eq!(DataTypeSpec::from_tag("dint", 0).unwrap(), DataTypeSpec::Int32);
        assert_eq!(DataTypeSpec::from_tag(" Float32 ", 0).unwrap(), DataTypeSpec::Float32);
        assert_eq!(
            DataTypeSpec::from_tag("bool_array", 12).unwrap(),
            DataTypeSpec::BoolArray { count: 12 }
        );
    }

    #[test]
    fn test_from_tag_unknown() {
        let err = DataTypeSpec::from_tag("lreal", 0).unwrap_err();
        assert_eq!(err, DecodeError::unsupported_type("lreal"));
    }

    #[test]
    fn test_from_tag_bool_index_overflow() {
        assert!(matches!(
            DataTypeSpec::from_tag("bool", 300),
            Err(DecodeError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_byte_len() {
        assert_eq!(
            DataTypeSpec::Bool {
                byte_index: 3,
                bit_index: 0
            }
            .byte_len(),
            4
        );
        assert_eq!(DataTypeSpec::BoolArray { count: 0 }.byte_len(), 0);
        assert_eq!(DataTypeSpec::BoolArray { count: 8 }.byte_len(), 1);
        assert_eq!(DataTypeSpec::BoolArray { count: 9 }.byte_len(), 2);
        assert_eq!(DataTypeSpec::UInt16.byte_len(), 2);
        assert_eq!(DataTypeSpec::Int32.byte_len(), 4);
    }

    #[test]
    fn test_word_count_for_strings() {
        // odd character counts round up to a whole register
        assert_eq!(DataTypeSpec::FixedString { byte_length: 5 }.word_count(), 3);
        assert_eq!(DataTypeSpec::FixedString { byte_length: 4 }.word_count(), 2);
    }

    #[test]
    fn test_is_multi_word() {
        assert!(DataTypeSpec::Float32.is_multi_word());
        assert!(!DataTypeSpec::UInt16.is_multi_word());
        assert!(!DataTypeSpec::FixedString { byte_length: 4 }.is_multi_word());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DataTypeSpec::Bool {
                byte_index: 1,
                bit_index: 5
            }
            .to_string(),
            "bool[1.5]"
        );
        assert_eq!(DataTypeSpec::BoolArray { count: 3 }.to_string(), "bool_array[3]");
        assert_eq!(DataTypeSpec::UInt32.to_string(), "uint32");
        assert_eq!(
            DataTypeSpec::FixedString { byte_length: 8 }.to_string(),
            "string[8]"
        );
    }

    #[test]
    fn test_word_order_parse_and_display() {
        assert_eq!(
            "little".parse::<WordOrder>().unwrap(),
            WordOrder::LittleEndianWords
        );
        assert!("middle".parse::<WordOrder>().is_err());
        assert_eq!(WordOrder::BigEndianWords.to_string(), "big");
    }

    #[test]
    fn test_word_order_split() {
        assert_eq!(WordOrder::BigEndianWords.split(1, 2), (1, 2));
        assert_eq!(WordOrder::LittleEndianWords.split(1, 2), (2, 1));
    }

    #[test]
    fn test_raw_buffer_units() {
        let words = [1u16, 2, 3];
        let buffer = RawBuffer::from(&words[..]);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.unit(), "words");
        assert_eq!(buffer.to_bytes().len(), 6);

        let bytes: &[u8] = &[];
        let buffer = RawBuffer::from(bytes);
        assert!(buffer.is_empty());
        assert_eq!(buffer.unit(), "bytes");
    }
}
