//! Error types for decoding, node resolution and probing.
//!
//! The three families are independent: a decode failure never turns into a
//! resolve failure and vice versa, so each operation returns its own type.

use std::io;
use thiserror::Error;

/// Errors returned by [`decode`](crate::decode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer is shorter than the requested type needs.
    #[error("Insufficient data: expected {expected} {unit}, got {actual}")]
    InsufficientData {
        /// Units the type requires.
        expected: usize,
        /// Units present in the buffer.
        actual: usize,
        /// `"bytes"` or `"words"`, depending on the buffer.
        unit: &'static str,
    },

    /// The bytes of a string value are not valid UTF-8.
    #[error("Invalid encoding: {reason}")]
    InvalidEncoding {
        /// Description of the decoding failure.
        reason: String,
    },

    /// The requested type is unknown or its parameters are out of range.
    #[error("Unsupported type '{tag}'")]
    UnsupportedType {
        /// The offending tag or parameter description.
        tag: String,
    },
}

impl DecodeError {
    /// Creates a new `InsufficientData` error.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::DecodeError;
    ///
    /// let err = DecodeError::insufficient_data(2, 1, "words");
    /// assert_eq!(err.to_string(), "Insufficient data: expected 2 words, got 1");
    /// ```
    pub fn insufficient_data(expected: usize, actual: usize, unit: &'static str) -> Self {
        Self::InsufficientData {
            expected,
            actual,
            unit,
        }
    }

    /// Creates a new `InvalidEncoding` error.
    pub fn invalid_encoding(reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            reason: reason.into(),
        }
    }

    /// Creates a new `UnsupportedType` error.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::DecodeError;
    ///
    /// let err = DecodeError::unsupported_type("lreal");
    /// assert_eq!(err.to_string(), "Unsupported type 'lreal'");
    /// ```
    pub fn unsupported_type(tag: impl Into<String>) -> Self {
        Self::UnsupportedType { tag: tag.into() }
    }
}

/// Errors returned by [`resolve`](crate::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The alias is not one of the well-known roots.
    #[error("Unknown alias '{alias}'")]
    UnknownAlias {
        /// The alias as given by the caller.
        alias: String,
    },

    /// No shortcut, extraction pattern or direct parse matched.
    #[error("Malformed node reference: {text}")]
    MalformedReference {
        /// The original text, kept for diagnostics.
        text: String,
    },
}

impl ResolveError {
    /// Creates a new `UnknownAlias` error.
    pub fn unknown_alias(alias: impl Into<String>) -> Self {
        Self::UnknownAlias {
            alias: alias.into(),
        }
    }

    /// Creates a new `MalformedReference` error.
    pub fn malformed(text: impl Into<String>) -> Self {
        Self::MalformedReference { text: text.into() }
    }
}

/// Errors reported by a [`Probe`](crate::Probe) when a session cannot be established.
///
/// The scanner only inspects [`ConnectError::is_timeout`]; everything else is
/// passed through to the diagnostics of the [`ScanReport`](crate::ScanReport).
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The device did not answer in time.
    #[error("Connection timeout")]
    Timeout,

    /// I/O error while connecting.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The device or the session layer rejected the connection.
    #[error("Connection refused: {reason}")]
    Refused {
        /// Description supplied by the session layer.
        reason: String,
    },
}

impl ConnectError {
    /// Creates a new `Refused` error.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::ConnectError;
    ///
    /// let err = ConnectError::refused("ISO-on-TCP: invalid PDU");
    /// assert!(!err.is_timeout());
    /// ```
    pub fn refused(reason: impl Into<String>) -> Self {
        Self::Refused {
            reason: reason.into(),
        }
    }

    /// Returns whether this failure is an expected timeout.
    ///
    /// Session layers often report timeouts only as text, so a `Refused`
    /// reason or an I/O error message mentioning "timeout" in any case
    /// counts too.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::ConnectError;
    ///
    /// assert!(ConnectError::Timeout.is_timeout());
    /// assert!(ConnectError::refused("TCP : Connection Timeout").is_timeout());
    /// assert!(!ConnectError::refused("Connection reset by peer").is_timeout());
    /// ```
    pub fn is_timeout(&self) -> bool {
        match self {
            ConnectError::Timeout => true,
            ConnectError::Io(err) => {
                matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
                    || mentions_timeout(&err.to_string())
            }
            ConnectError::Refused { reason } => mentions_timeout(reason),
        }
    }
}

fn mentions_timeout(text: &str) -> bool {
    text.to_ascii_lowercase().contains("timeout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = DecodeError::insufficient_data(4, 0, "bytes");
        assert_eq!(err.to_string(), "Insufficient data: expected 4 bytes, got 0");
    }

    #[test]
    fn test_invalid_encoding_display() {
        let err = DecodeError::invalid_encoding("invalid utf-8 sequence of 1 bytes from index 0");
        assert_eq!(
            err.to_string(),
            "Invalid encoding: invalid utf-8 sequence of 1 bytes from index 0"
        );
    }

    #[test]
    fn test_unknown_alias_display() {
        let err = ResolveError::unknown_alias("home");
        assert_eq!(err.to_string(), "Unknown alias 'home'");
    }

    #[test]
    fn test_malformed_keeps_original_text() {
        let err = ResolveError::malformed("NodeId(garbage)");
        assert_eq!(
            err,
            ResolveError::MalformedReference {
                text: "NodeId(garbage)".to_string()
            }
        );
        assert_eq!(err.to_string(), "Malformed node reference: NodeId(garbage)");
    }

    #[test]
    fn test_io_timeout_classification() {
        let timed_out = ConnectError::from(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(timed_out.is_timeout());

        let would_block = ConnectError::from(io::Error::new(io::ErrorKind::WouldBlock, "again"));
        assert!(would_block.is_timeout());

        let wrapped = ConnectError::from(io::Error::new(
            io::ErrorKind::Other,
            "TCP : Connection timeout",
        ));
        assert!(wrapped.is_timeout());

        let refused = ConnectError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "no"));
        assert!(!refused.is_timeout());

        let reset = ConnectError::from(io::Error::new(io::ErrorKind::Other, "connection reset"));
        assert!(!reset.is_timeout());
    }

    #[test]
    fn test_refused_timeout_text_is_case_insensitive() {
        assert!(ConnectError::refused(" TCP : Connection TIMEOUT").is_timeout());
        assert!(ConnectError::refused("recv timeout").is_timeout());
        assert!(!ConnectError::refused("CPU : Function not available").is_timeout());
    }
}
