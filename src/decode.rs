//! Typed value decoding of raw register and byte payloads.
//!
//! [`decode`] turns a [`RawBuffer`] into a [`DecodeResult`] according to a
//! [`DataTypeSpec`]. Decoding is pure and all-or-nothing: either the whole
//! value is produced or a [`DecodeError`] is returned.
//!
//! Multi-word values are bit-pattern reinterpretations, not numeric
//! conversions: the registers `[0x4120, 0x0000]` are the REAL `10.0`.
//!
//! # Example
//!
//! ```
//! use plc_reader::{decode, DataTypeSpec, DecodeResult, RawBuffer, WordOrder};
//!
//! // Modbus holding registers
//! let registers = [0x4120, 0x0000];
//! let value = decode(
//!     RawBuffer::Words(&registers),
//!     DataTypeSpec::Float32,
//!     WordOrder::BigEndianWords,
//! )?;
//! assert_eq!(value, DecodeResult::Float(10.0));
//!
//! // S7 data block bytes
//! let data = [0x00, 0x00, 0x01, 0x00];
//! let value = decode(
//!     RawBuffer::Bytes(&data),
//!     DataTypeSpec::UInt32,
//!     WordOrder::LittleEndianWords, // ignored for byte sources
//! )?;
//! assert_eq!(value, DecodeResult::Integer(256));
//! # Ok::<(), plc_reader::DecodeError>(())
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::datatype::{DataTypeSpec, RawBuffer, WordOrder};
use crate::error::DecodeError;
use crate::utils::{combine_words, get_bit, unpack_bits, words_to_bytes};

/// A decoded application value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeResult {
    /// A single bit.
    Bool(bool),
    /// Any integer type, widened to `i64` without loss.
    Integer(i64),
    /// A REAL, widened to `f64` without loss.
    Float(f64),
    /// A string with trailing NULs removed.
    Text(String),
    /// Unpacked bits, in address order.
    BoolArray(Vec<bool>),
}

impl DecodeResult {
    /// Returns the value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodeResult::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value if this is an `Integer`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodeResult::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as `f64` if this is a `Float` or an `Integer`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DecodeResult::Float(value) => Some(*value),
            DecodeResult::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the text if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodeResult::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Renders the value with its kind, the way operator consoles show it.
    ///
    /// Floats use six decimals; arrays show their length first.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::DecodeResult;
    ///
    /// assert_eq!(DecodeResult::Bool(true).describe(), "Boolean: true");
    /// assert_eq!(DecodeResult::Float(10.0).describe(), "Float: 10.000000");
    /// assert_eq!(DecodeResult::Text("AB".into()).describe(), "String: 'AB'");
    /// assert_eq!(
    ///     DecodeResult::BoolArray(vec![true, false]).describe(),
    ///     "Array [2 elements]: [true, false]"
    /// );
    /// ```
    pub fn describe(&self) -> String {
        match self {
            DecodeResult::Bool(value) => format!("Boolean: {}", value),
            DecodeResult::Integer(value) => format!("Integer: {}", value),
            DecodeResult::Float(value) => format!("Float: {:.6}", value),
            DecodeResult::Text(value) => format!("String: '{}'", value),
            DecodeResult::BoolArray(values) => {
                format!("Array [{} elements]: {:?}", values.len(), values)
            }
        }
    }
}

impl fmt::Display for DecodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeResult::Bool(value) => write!(f, "{}", value),
            DecodeResult::Integer(value) => write!(f, "{}", value),
            DecodeResult::Float(value) => write!(f, "{}", value),
            DecodeResult::Text(value) => write!(f, "{}", value),
            DecodeResult::BoolArray(values) => write!(f, "{:?}", values),
        }
    }
}

/// Decodes a raw buffer into a typed value.
///
/// `order` only matters for `Int32`, `UInt32` and `Float32` read from a
/// word-oriented buffer. Longer buffers are accepted; only the leading units
/// the type needs are consumed.
///
/// # Errors
///
/// - [`DecodeError::InsufficientData`] if the buffer is too short
/// - [`DecodeError::InvalidEncoding`] if string bytes are not UTF-8
/// - [`DecodeError::UnsupportedType`] if a bool bit index is above 7
///
/// # Example
///
/// ```
/// use plc_reader::{decode, DataTypeSpec, DecodeError, DecodeResult, RawBuffer, WordOrder};
///
/// let value = decode(RawBuffer::Words(&[0xFFFF]), DataTypeSpec::Int16, WordOrder::BigEndianWords);
/// assert_eq!(value, Ok(DecodeResult::Integer(-1)));
///
/// let empty: &[u16] = &[];
/// let err = decode(RawBuffer::Words(empty), DataTypeSpec::UInt16, WordOrder::BigEndianWords);
/// assert!(matches!(err, Err(DecodeError::InsufficientData { .. })));
/// ```
pub fn decode(
    buffer: RawBuffer<'_>,
    spec: DataTypeSpec,
    order: WordOrder,
) -> Result<DecodeResult, DecodeError> {
    match spec {
        DataTypeSpec::Bool {
            byte_index,
            bit_index,
        } => {
            if bit_index > 7 {
                return Err(DecodeError::unsupported_type(format!(
                    "bool bit index {} (must be 0-7)",
                    bit_index
                )));
            }
            let bytes = require_bytes(buffer, spec.byte_len())?;
            Ok(DecodeResult::Bool(get_bit(bytes[byte_index], bit_index)))
        }
        DataTypeSpec::BoolArray { count } => {
            let bytes = require_bytes(buffer, spec.byte_len())?;
            Ok(DecodeResult::BoolArray(unpack_bits(&bytes, count)))
        }
        DataTypeSpec::Int16 => {
            let raw = read_u16(buffer)?;
            Ok(DecodeResult::Integer(i64::from(raw as i16)))
        }
        DataTypeSpec::UInt16 => {
            let raw = read_u16(buffer)?;
            Ok(DecodeResult::Integer(i64::from(raw)))
        }
        DataTypeSpec::Int32 => {
            let raw = read_u32(buffer, order)?;
            Ok(DecodeResult::Integer(i64::from(raw as i32)))
        }
        DataTypeSpec::UInt32 => {
            let raw = read_u32(buffer, order)?;
            Ok(DecodeResult::Integer(i64::from(raw)))
        }
        DataTypeSpec::Float32 => {
            let raw = read_u32(buffer, order)?;
            Ok(DecodeResult::Float(f64::from(f32::from_bits(raw))))
        }
        DataTypeSpec::FixedString { byte_length } => {
            let bytes = require_bytes(buffer, byte_length)?;
            decode_text(&bytes)
        }
    }
}

/// Returns exactly `len` leading bytes of the buffer.
fn require_bytes(buffer: RawBuffer<'_>, len: usize) -> Result<Cow<'_, [u8]>, DecodeError> {
    match buffer {
        RawBuffer::Bytes(bytes) => {
            if bytes.len() < len {
                return Err(DecodeError::insufficient_data(len, bytes.len(), buffer.unit()));
            }
            Ok(Cow::Borrowed(&bytes[..len]))
        }
        RawBuffer::Words(words) => {
            let needed = len.div_ceil(2);
            if words.len() < needed {
                return Err(DecodeError::insufficient_data(
                    needed,
                    words.len(),
                    buffer.unit(),
                ));
            }
            let mut bytes = words_to_bytes(&words[..needed]);
            bytes.truncate(len);
            Ok(Cow::Owned(bytes))
        }
    }
}

fn read_u16(buffer: RawBuffer<'_>) -> Result<u16, DecodeError> {
    match buffer {
        RawBuffer::Words(words) => words
            .first()
            .copied()
            .ok_or_else(|| DecodeError::insufficient_data(1, 0, buffer.unit())),
        RawBuffer::Bytes(bytes) => match bytes {
            [b0, b1, ..] => Ok(u16::from_be_bytes([*b0, *b1])),
            _ => Err(DecodeError::insufficient_data(2, bytes.len(), buffer.unit())),
        },
    }
}

fn read_u32(buffer: RawBuffer<'_>, order: WordOrder) -> Result<u32, DecodeError> {
    match buffer {
        RawBuffer::Words(words) => match words {
            [first, second, ..] => {
                let (high, low) = order.split(*first, *second);
                Ok(combine_words(high, low))
            }
            _ => Err(DecodeError::insufficient_data(2, words.len(), buffer.unit())),
        },
        // Byte sources are always one big-endian run
        RawBuffer::Bytes(bytes) => match bytes {
            [b0, b1, b2, b3, ..] => Ok(u32::from_be_bytes([*b0, *b1, *b2, *b3])),
            _ => Err(DecodeError::insufficient_data(4, bytes.len(), buffer.unit())),
        },
    }
}

fn decode_text(bytes: &[u8]) -> Result<DecodeResult, DecodeError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| DecodeError::invalid_encoding(e.to_string()))?;
    Ok(DecodeResult::Text(text.trim_end_matches('\0').to_string()))
}

/// Configuration for a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Word order applied to 32-bit values from word-oriented sources.
    pub word_order: WordOrder,
}

impl DecoderConfig {
    /// Creates a configuration with big-endian word order.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::{DecoderConfig, WordOrder};
    ///
    /// let config = DecoderConfig::new();
    /// assert_eq!(config.word_order, WordOrder::BigEndianWords);
    /// ```
    pub fn new() -> Self {
        Self {
            word_order: WordOrder::BigEndianWords,
        }
    }

    /// Sets the word order (default is big-endian words).
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::{DecoderConfig, WordOrder};
    ///
    /// let config = DecoderConfig::new().with_word_order(WordOrder::LittleEndianWords);
    /// ```
    pub fn with_word_order(mut self, word_order: WordOrder) -> Self {
        self.word_order = word_order;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`decode`] front end bound to one deployment's configuration.
///
/// # Example
///
/// ```
/// use plc_reader::{DataTypeSpec, DecodeResult, Decoder, DecoderConfig, RawBuffer, WordOrder};
///
/// let decoder = Decoder::new(DecoderConfig::new().with_word_order(WordOrder::LittleEndianWords));
/// let value = decoder.decode(RawBuffer::Words(&[0x0000, 0x4120]), DataTypeSpec::Float32)?;
/// assert_eq!(value, DecodeResult::Float(10.0));
/// # Ok::<(), plc_reader::DecodeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a decoder with the given configuration.
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decodes with the configured word order.
    ///
    /// # Errors
    ///
    /// Same as [`decode`].
    pub fn decode(
        &self,
        buffer: RawBuffer<'_>,
        spec: DataTypeSpec,
    ) -> Result<DecodeResult, DecodeError> {
        decode(buffer, spec, self.config.word_order)
    }

    /// Returns the decoder's configuration.
    pub fn config(&self) -> DecoderConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BE: WordOrder = WordOrder::BigEndianWords;
    const LE: WordOrder = WordOrder::LittleEndianWords;

    fn words(buffer: &[u16], spec: DataTypeSpec, order: WordOrder) -> Result<DecodeResult, DecodeError> {
        decode(RawBuffer::Words(buffer), spec, order)
    }

    fn bytes(buffer: &[u8], spec: DataTypeSpec) -> Result<DecodeResult, DecodeError> {
        decode(RawBuffer::Bytes(buffer), spec, BE)
    }

    #[test]
    fn test_uint16_full_range() {
        for n in 0..=u16::MAX {
            assert_eq!(
                words(&[n], DataTypeSpec::UInt16, BE),
                Ok(DecodeResult::Integer(i64::from(n)))
            );
        }
    }

    #[test]
    fn test_int16_reinterprets_sign() {
        for n in 0..=u16::MAX {
            let expected = i64::from(n as i16);
            assert_eq!(
                words(&[n], DataTypeSpec::Int16, LE),
                Ok(DecodeResult::Integer(expected))
            );
        }
        assert_eq!(
            words(&[65535], DataTypeSpec::Int16, BE),
            Ok(DecodeResult::Integer(-1))
        );
        assert_eq!(
            words(&[0x8000], DataTypeSpec::Int16, BE),
            Ok(DecodeResult::Integer(-32768))
        );
    }

    #[test]
    fn test_float32_word_order_sensitivity() {
        let regs = [0x4120, 0x0000];
        assert_eq!(
            words(&regs, DataTypeSpec::Float32, BE),
            Ok(DecodeResult::Float(10.0))
        );

        let swapped = words(&regs, DataTypeSpec::Float32, LE).unwrap();
        assert_ne!(swapped, DecodeResult::Float(10.0));
        assert_eq!(
            swapped,
            DecodeResult::Float(f64::from(f32::from_bits(0x0000_4120)))
        );
    }

    #[test]
    fn test_float32_is_bit_reinterpretation() {
        let value = words(&[0x4120, 0x0000], DataTypeSpec::Float32, BE).unwrap();
        assert_ne!(value, DecodeResult::Float(1_093_664_768.0));
        assert_eq!(
            words(&[0x4120, 0x0000], DataTypeSpec::UInt32, BE),
            Ok(DecodeResult::Integer(1_093_664_768))
        );
    }

    #[test]
    fn test_int32_and_uint32_word_orders() {
        let regs = [0xFFFF, 0xFFFE];
        assert_eq!(words(&regs, DataTypeSpec::Int32, BE), Ok(DecodeResult::Integer(-2)));
        assert_eq!(
            words(&regs, DataTypeSpec::UInt32, BE),
            Ok(DecodeResult::Integer(0xFFFF_FFFE))
        );
        assert_eq!(
            words(&regs, DataTypeSpec::UInt32, LE),
            Ok(DecodeResult::Integer(0xFFFE_FFFF))
        );
        assert_eq!(
            words(&[0x0001, 0x0000], DataTypeSpec::Int32, LE),
            Ok(DecodeResult::Integer(1))
        );
    }

    #[test]
    fn test_byte_source_ignores_word_order() {
        let data = hex::decode("41200000").unwrap();
        for order in [BE, LE] {
            assert_eq!(
                decode(RawBuffer::Bytes(&data), DataTypeSpec::Float32, order),
                Ok(DecodeResult::Float(10.0))
            );
        }
    }

    #[test]
    fn test_byte_source_integers() {
        assert_eq!(bytes(&[0xFF, 0xFE], DataTypeSpec::Int16), Ok(DecodeResult::Integer(-2)));
        assert_eq!(
            bytes(&[0xFF, 0xFE], DataTypeSpec::UInt16),
            Ok(DecodeResult::Integer(65534))
        );
        assert_eq!(
            bytes(&[0x80, 0x00, 0x00, 0x00], DataTypeSpec::Int32),
            Ok(DecodeResult::Integer(i64::from(i32::MIN)))
        );
        assert_eq!(
            bytes(&[0x80, 0x00, 0x00, 0x00], DataTypeSpec::UInt32),
            Ok(DecodeResult::Integer(0x8000_0000))
        );
    }

    #[test]
    fn test_fixed_string_trims_trailing_nul() {
        assert_eq!(
            bytes(b"AB\0\0", DataTypeSpec::FixedString { byte_length: 4 }),
            Ok(DecodeResult::Text("AB".to_string()))
        );
    }

    #[test]
    fn test_fixed_string_keeps_leading_nul() {
        assert_eq!(
            bytes(b"\0AB\0", DataTypeSpec::FixedString { byte_length: 4 }),
            Ok(DecodeResult::Text("\0AB".to_string()))
        );
    }

    #[test]
    fn test_fixed_string_from_registers() {
        // "PRODUCT" in 4 registers, last byte NUL padding
        let regs = [0x5052, 0x4F44, 0x5543, 0x5400];
        assert_eq!(
            words(&regs, DataTypeSpec::FixedString { byte_length: 8 }, BE),
            Ok(DecodeResult::Text("PRODUCT".to_string()))
        );
        // odd length takes the high byte of the last register only
        assert_eq!(
            words(&regs, DataTypeSpec::FixedString { byte_length: 3 }, BE),
            Ok(DecodeResult::Text("PRO".to_string()))
        );
    }

    #[test]
    fn test_fixed_string_invalid_utf8() {
        let err = bytes(&[0x41, 0xFF], DataTypeSpec::FixedString { byte_length: 2 }).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_fixed_string_utf8_multibyte() {
        let data = "Pé\0".as_bytes();
        assert_eq!(
            bytes(data, DataTypeSpec::FixedString { byte_length: 4 }),
            Ok(DecodeResult::Text("Pé".to_string()))
        );
    }

    #[test]
    fn test_empty_buffer_insufficient() {
        assert_eq!(
            words(&[], DataTypeSpec::UInt16, BE),
            Err(DecodeError::insufficient_data(1, 0, "words"))
        );
        assert_eq!(
            bytes(&[], DataTypeSpec::UInt16),
            Err(DecodeError::insufficient_data(2, 0, "bytes"))
        );
    }

    #[test]
    fn test_short_buffers_insufficient() {
        assert_eq!(
            words(&[0x4120], DataTypeSpec::Float32, BE),
            Err(DecodeError::insufficient_data(2, 1, "words"))
        );
        assert_eq!(
            bytes(&[0, 0, 0], DataTypeSpec::UInt32),
            Err(DecodeError::insufficient_data(4, 3, "bytes"))
        );
        assert_eq!(
            bytes(b"AB", DataTypeSpec::FixedString { byte_length: 4 }),
            Err(DecodeError::insufficient_data(4, 2, "bytes"))
        );
        assert_eq!(
            words(&[0x4142], DataTypeSpec::FixedString { byte_length: 3 }, BE),
            Err(DecodeError::insufficient_data(2, 1, "words"))
        );
    }

    #[test]
    fn test_bool_extracts_bit() {
        let data = [0x00, 0b0010_0000];
        assert_eq!(
            bytes(
                &data,
                DataTypeSpec::Bool {
                    byte_index: 1,
                    bit_index: 5
                }
            ),
            Ok(DecodeResult::Bool(true))
        );
        assert_eq!(
            bytes(
                &data,
                DataTypeSpec::Bool {
                    byte_index: 1,
                    bit_index: 4
                }
            ),
            Ok(DecodeResult::Bool(false))
        );
    }

    #[test]
    fn test_bool_needs_byte_index_plus_one() {
        let err = bytes(
            &[0xFF],
            DataTypeSpec::Bool {
                byte_index: 1,
                bit_index: 0,
            },
        )
        .unwrap_err();
        assert_eq!(err, DecodeError::insufficient_data(2, 1, "bytes"));
    }

    #[test]
    fn test_bool_bit_index_out_of_range() {
        let err = bytes(
            &[0xFF],
            DataTypeSpec::Bool {
                byte_index: 0,
                bit_index: 8,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedType { .. }));
    }

    #[test]
    fn test_bool_from_register_uses_high_byte_first() {
        let spec = DataTypeSpec::Bool {
            byte_index: 0,
            bit_index: 0,
        };
        assert_eq!(words(&[0x0100], spec, BE), Ok(DecodeResult::Bool(true)));
        assert_eq!(words(&[0x0001], spec, BE), Ok(DecodeResult::Bool(false)));
    }

    #[test]
    fn test_bool_array_low_bit_first() {
        let data = [0b1000_0001, 0b0000_0010];
        let value = bytes(&data, DataTypeSpec::BoolArray { count: 10 }).unwrap();
        let expected = vec![
            true, false, false, false, false, false, false, true, // byte 0
            false, true, // byte 1
        ];
        assert_eq!(value, DecodeResult::BoolArray(expected));
    }

    #[test]
    fn test_bool_array_insufficient() {
        assert_eq!(
            bytes(&[0xFF], DataTypeSpec::BoolArray { count: 9 }),
            Err(DecodeError::insufficient_data(2, 1, "bytes"))
        );
    }

    #[test]
    fn test_bool_array_empty() {
        assert_eq!(
            bytes(&[], DataTypeSpec::BoolArray { count: 0 }),
            Ok(DecodeResult::BoolArray(Vec::new()))
        );
    }

    #[test]
    fn test_longer_buffer_uses_leading_units() {
        assert_eq!(
            words(&[7, 8, 9], DataTypeSpec::UInt16, BE),
            Ok(DecodeResult::Integer(7))
        );
    }

    #[test]
    fn test_decode_is_referentially_transparent() {
        let regs = [0x4120, 0x0000];
        let first = words(&regs, DataTypeSpec::Float32, LE);
        for _ in 0..10 {
            assert_eq!(words(&regs, DataTypeSpec::Float32, LE), first);
        }
        assert_eq!(regs, [0x4120, 0x0000]);
    }

    #[test]
    fn test_decoder_uses_configured_order() {
        let decoder = Decoder::new(DecoderConfig::new().with_word_order(LE));
        assert_eq!(decoder.config().word_order, LE);
        assert_eq!(
            decoder.decode(RawBuffer::Words(&[0x0000, 0x4120]), DataTypeSpec::Float32),
            Ok(DecodeResult::Float(10.0))
        );

        let default = Decoder::default();
        assert_eq!(default.config().word_order, BE);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(DecodeResult::Bool(true).as_bool(), Some(true));
        assert_eq!(DecodeResult::Integer(3).as_i64(), Some(3));
        assert_eq!(DecodeResult::Integer(3).as_f64(), Some(3.0));
        assert_eq!(DecodeResult::Text("x".into()).as_str(), Some("x"));
        assert_eq!(DecodeResult::Float(1.5).as_i64(), None);
    }

    #[test]
    fn test_display_and_describe() {
        assert_eq!(DecodeResult::Integer(-5).to_string(), "-5");
        assert_eq!(DecodeResult::Integer(42).describe(), "Integer: 42");
        assert_eq!(DecodeResult::Float(2.5).describe(), "Float: 2.500000");
        assert_eq!(DecodeResult::BoolArray(vec![false]).to_string(), "[false]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_result() {
        let json = serde_json::to_string(&DecodeResult::Integer(7)).unwrap();
        assert_eq!(json, r#"{"Integer":7}"#);
        let back: DecodeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DecodeResult::Integer(7));
    }
}
