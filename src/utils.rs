//! Byte, word and bit helpers used by the decoder.
//!
//! Word-oriented sources deliver 16-bit registers; byte-oriented sources
//! deliver bytes with bit-level sub-addressing. These helpers bridge the two.
//!
//! # Example
//!
//! ```
//! use plc_reader::utils::{get_bit, unpack_bits, words_to_bytes};
//!
//! let bytes = words_to_bytes(&[0x4142, 0x0005]);
//! assert_eq!(bytes, vec![0x41, 0x42, 0x00, 0x05]);
//!
//! assert!(get_bit(bytes[3], 0));
//! assert!(!get_bit(bytes[3], 1));
//!
//! let bits = unpack_bits(&bytes[2..], 4);
//! assert_eq!(bits, vec![false; 4]);
//! ```

/// Gets a single bit from a byte.
///
/// # Arguments
///
/// * `value` - The byte to extract from
/// * `bit` - Bit position (0-7, where 0 is LSB)
///
/// # Example
///
/// ```
/// use plc_reader::utils::get_bit;
///
/// let value: u8 = 0b0000_0101; // bits 0 and 2 are set
/// assert!(get_bit(value, 0));
/// assert!(!get_bit(value, 1));
/// assert!(get_bit(value, 2));
/// ```
#[inline]
pub fn get_bit(value: u8, bit: u8) -> bool {
    (value >> bit) & 1 != 0
}

/// Expands 16-bit registers into bytes, high byte first.
///
/// # Example
///
/// ```
/// use plc_reader::utils::words_to_bytes;
///
/// assert_eq!(words_to_bytes(&[0x1234]), vec![0x12, 0x34]);
/// assert!(words_to_bytes(&[]).is_empty());
/// ```
pub fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// Combines two registers into a 32-bit pattern, `high` supplying bits 16-31.
///
/// # Example
///
/// ```
/// use plc_reader::utils::combine_words;
///
/// assert_eq!(combine_words(0x4120, 0x0000), 0x4120_0000);
/// ```
#[inline]
pub fn combine_words(high: u16, low: u16) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

/// Unpacks `count` bits from a bit-packed buffer, low bit first in each byte.
///
/// Byte 0 covers bits 0-7, byte 1 covers bits 8-15 and so on. The caller
/// guarantees `bytes` holds at least `count.div_ceil(8)` bytes; missing bytes
/// yield no further bits.
///
/// # Example
///
/// ```
/// use plc_reader::utils::unpack_bits;
///
/// let bits = unpack_bits(&[0b0000_0011, 0b0000_0001], 9);
/// assert_eq!(
///     bits,
///     vec![true, true, false, false, false, false, false, false, true]
/// );
/// ```
pub fn unpack_bits(bytes: &[u8], count: usize) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |bit| get_bit(byte, bit)))
        .take(count)
        .collect()
}

/// Formats bytes as spaced upper-case hex pairs, for diagnostics.
///
/// # Example
///
/// ```
/// use plc_reader::utils::format_hex_bytes;
///
/// assert_eq!(format_hex_bytes(&[0x41, 0x00, 0xFF]), "41 00 FF");
/// assert_eq!(format_hex_bytes(&[]), "");
/// ```
pub fn format_hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
