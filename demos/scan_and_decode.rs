//! Example: Discovering a CPU and decoding what it returns
//!
//! Run with: cargo run --example scan_and_decode
//!
//! This example demonstrates:
//! - Scanning rack/slot coordinates with a simulated probe
//! - Decoding registers and bytes with an explicit word order
//! - Resolving node references from operator input and address dumps
//!
//! The probe here is a stand-in for a real S7 session layer.

use plc_reader::utils::format_hex_bytes;
use plc_reader::{
    resolve, ConnectError, DataTypeSpec, Decoder, DecoderConfig, NodeReference, ProbeOutcome,
    RawBuffer, ScanConfig, Scanner, WordOrder,
};
use std::error::Error;
use tracing::level_filters::LevelFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .init();

    // =========================================================================
    // Rack/slot discovery
    // =========================================================================

    println!("=== Scanning ===\n");

    let mut probe = |rack: u8, slot: u8| -> Result<ProbeOutcome, ConnectError> {
        match (rack, slot) {
            (0, 1) => Ok(ProbeOutcome::unreadable("CPU : Address out of range")),
            (0, 2) => Ok(ProbeOutcome::Readable),
            (3, 0) => Err(ConnectError::refused("ISO : An error occurred during recv TCP")),
            _ => Err(ConnectError::refused("TCP : Connection timed out (Timeout)")),
        }
    };

    let report = Scanner::new(ScanConfig::new()).run(&mut probe);
    println!("Probed {} coordinates", report.attempts());
    for (i, candidate) in report.found().iter().enumerate() {
        println!("{}. {}", i + 1, candidate);
    }
    for failure in report.failures() {
        println!("Connection error Rack:{} Slot:{} - {}", failure.rack, failure.slot, failure.error);
    }

    let candidates = report.into_candidates();
    match candidates.first() {
        Some(best) => println!("Connecting to Rack:{} Slot:{}\n", best.rack, best.slot),
        None => println!("No device found\n"),
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    println!("=== Decoding ===\n");

    let decoder = Decoder::new(DecoderConfig::new().with_word_order(WordOrder::BigEndianWords));

    let registers = [0x4120, 0x0000];
    let value = decoder.decode(RawBuffer::Words(&registers), DataTypeSpec::Float32)?;
    println!("HR0-1 as float32: {}", value.describe());

    let db_bytes = [0x50, 0x55, 0x4D, 0x50, 0x00, 0x00, 0b0000_0101, 0x00, 0x2A];
    println!("DB200 bytes: {}", format_hex_bytes(&db_bytes));

    let name = decoder.decode(
        RawBuffer::Bytes(&db_bytes[..6]),
        DataTypeSpec::from_tag("string", 6)?,
    )?;
    println!("DB200.DBB0 as string[6]: {}", name.describe());

    let flags = decoder.decode(
        RawBuffer::Bytes(&db_bytes[6..7]),
        DataTypeSpec::BoolArray { count: 4 },
    )?;
    println!("DB200.DBX6.0-3: {}", flags.describe());

    let count = decoder.decode(RawBuffer::Bytes(&db_bytes[7..]), DataTypeSpec::Int16)?;
    println!("DB200.DBW7 as int16: {}\n", count.describe());

    // =========================================================================
    // Node references
    // =========================================================================

    println!("=== Resolving ===\n");

    let inputs = [
        "objects",
        "ns=1;s=Temperature",
        "NodeId(Identifier=1, NamespaceIndex=4, NodeIdType=<NodeIdType.Numeric: 2>) GESTIONALE",
        "NodeId(Identifier='Tank.Level', NamespaceIndex=2, NodeIdType=<NodeIdType.String: 3>)",
        "Temperature",
    ];
    for input in inputs {
        let token: NodeReference = input.parse()?;
        match resolve(&token) {
            Ok(node) => println!("{} -> {}", input, node),
            Err(e) => println!("{} -> error: {}", input, e),
        }
    }

    Ok(())
}
