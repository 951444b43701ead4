//! # PLC Reader Core
//!
//! Decoding and addressing logic shared by PLC reader tools for Modbus, S7
//! and OPC UA devices.
//!
//! This is a **core-only** library: no sockets, sessions, menus or file
//! export. The session layer hands raw payloads and address tokens in and
//! gets typed values and canonical addresses back.
//!
//! ## Features
//!
//! - **Typed decoding** — registers or bytes to bool, integers, REAL and strings
//! - **Explicit word order** — 32-bit values never guess which register is high
//! - **Node resolution** — aliases, canonical text and opaque address dumps
//! - **Rack/slot discovery** — exhaustive scan with readable/unreadable ranking
//! - **No panics** — every failure is a typed error
//!
//! ## Quick Start
//!
//! ```
//! use plc_reader::{decode, resolve, DataTypeSpec, DecodeResult, NodeReference, RawBuffer, WordOrder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Two holding registers read from a Modbus device
//!     let registers = [0x4120, 0x0000];
//!     let value = decode(RawBuffer::Words(&registers), DataTypeSpec::Float32, WordOrder::BigEndianWords)?;
//!     assert_eq!(value, DecodeResult::Float(10.0));
//!
//!     // Four bytes of an S7 data block holding a string
//!     let value = decode(RawBuffer::Bytes(b"AB\0\0"), DataTypeSpec::FixedString { byte_length: 4 }, WordOrder::BigEndianWords)?;
//!     assert_eq!(value.as_str(), Some("AB"));
//!
//!     // An OPC UA node typed by an operator
//!     let node = resolve(&"ns=2;s=Temperature".parse::<NodeReference>()?)?;
//!     assert_eq!(node.namespace, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Data Types
//!
//! | Type | Word source | Byte source |
//! |------|:-----------:|:-----------:|
//! | [`DataTypeSpec::Bool`] | expanded bytes | 1 bit |
//! | [`DataTypeSpec::BoolArray`] | expanded bytes | `ceil(n / 8)` bytes |
//! | [`DataTypeSpec::Int16`] / [`DataTypeSpec::UInt16`] | 1 register | 2 bytes |
//! | [`DataTypeSpec::Int32`] / [`DataTypeSpec::UInt32`] / [`DataTypeSpec::Float32`] | 2 registers, [`WordOrder`] | 4 bytes, big-endian |
//! | [`DataTypeSpec::FixedString`] | expanded bytes | `byte_length` bytes |
//!
//! ## Discovery
//!
//! ```
//! use plc_reader::{ConnectError, ProbeOutcome, ScanConfig, Scanner};
//!
//! let mut probe = |rack: u8, slot: u8| -> Result<ProbeOutcome, ConnectError> {
//!     match (rack, slot) {
//!         (0, 1) => Ok(ProbeOutcome::unreadable("DB1 not present")),
//!         (0, 2) => Ok(ProbeOutcome::Readable),
//!         _ => Err(ConnectError::Timeout),
//!     }
//! };
//!
//! let report = Scanner::new(ScanConfig::new()).run(&mut probe);
//! assert_eq!(report.found().len(), 2);
//!
//! let candidates = report.into_candidates();
//! assert_eq!((candidates[0].rack, candidates[0].slot), (0, 2));
//! ```
//!
//! ## Error Handling
//!
//! Each operation has its own error type: [`DecodeError`], [`ResolveError`]
//! and, from the probe side, [`ConnectError`]. Decode and resolve errors are
//! returned to the caller and never logged here.
//!
//! ```
//! use plc_reader::{decode, DataTypeSpec, DecodeError, RawBuffer, WordOrder};
//!
//! match decode(RawBuffer::Words(&[0x4120]), DataTypeSpec::Float32, WordOrder::BigEndianWords) {
//!     Ok(value) => println!("Value: {}", value),
//!     Err(DecodeError::InsufficientData { expected, actual, unit }) => {
//!         println!("Need {} {}, got {}", expected, unit, actual);
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! ## Configuration
//!
//! ```
//! use plc_reader::{DecoderConfig, ScanConfig, WordOrder};
//!
//! let decoder = DecoderConfig::new()
//!     .with_word_order(WordOrder::LittleEndianWords); // default: big-endian words
//! let scan = ScanConfig::new()
//!     .with_racks(0..=0)                              // default: 0..=7
//!     .with_slots(1..=3);                             // default: 0..=10
//! ```
//!
//! ## Logging
//!
//! The scanner emits [`tracing`] events: found devices at `info`, other
//! connection failures at `warn`, timeouts at `debug` and each attempt at
//! `trace`. Install any subscriber to see them.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod datatype;
mod decode;
mod error;
mod node;
mod opaque;
mod scan;
pub mod utils;

// Public re-exports
pub use datatype::{DataTypeSpec, RawBuffer, WordOrder};
pub use decode::{decode, DecodeResult, Decoder, DecoderConfig};
pub use error::{ConnectError, DecodeError, ResolveError};
pub use node::{resolve, well_known, CanonicalNodeId, Identifier, NodeReference};
pub use scan::{
    scan, Classification, Probe, ProbeFailure, ProbeOutcome, ScanCandidate, ScanConfig,
    ScanReport, Scanner, MAX_RACK, MAX_SLOT,
};
