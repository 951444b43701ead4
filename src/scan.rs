//! Rack/slot discovery over an injected probe.
//!
//! The scanner walks every rack × slot coordinate in increasing order (rack
//! outer, slot inner), calls the [`Probe`] once per coordinate and classifies
//! the outcome. Probes run strictly one after another and block; the scanner
//! adds no timeouts, retries or cancellation of its own.
//!
//! # Classification
//!
//! | Probe result | Classification | Reported |
//! |--------------|----------------|:--------:|
//! | `Ok(Readable)` | [`Classification::ReachableReadable`] | found |
//! | `Ok(Unreadable)` | [`Classification::ReachableUnreadable`] | found |
//! | `Err(e)`, `e.is_timeout()` | [`Classification::Unreachable`] | counted only |
//! | `Err(e)`, other | [`Classification::Unreachable`] | as a [`ProbeFailure`] |
//!
//! # Example
//!
//! ```
//! use plc_reader::{scan, Classification, ConnectError, ProbeOutcome};
//!
//! let mut probe = |rack: u8, slot: u8| {
//!     if (rack, slot) == (0, 2) {
//!         Ok(ProbeOutcome::Readable)
//!     } else {
//!         Err(ConnectError::Timeout)
//!     }
//! };
//!
//! let candidates = scan(&mut probe, 0..=7, 0..=10);
//! assert_eq!(candidates.len(), 1);
//! assert_eq!((candidates[0].rack, candidates[0].slot), (0, 2));
//! assert_eq!(candidates[0].classification, Classification::ReachableReadable);
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use tracing::{debug, info, trace, warn};

use crate::error::ConnectError;

/// Highest rack number probed.
pub const MAX_RACK: u8 = 7;

/// Highest slot number probed.
pub const MAX_SLOT: u8 = 10;

/// What a probe observed after the session was established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The minimal read succeeded.
    Readable,
    /// The session was established but the minimal read failed.
    Unreadable {
        /// Why the read failed, as reported by the session layer.
        reason: String,
    },
}

impl ProbeOutcome {
    /// Creates an `Unreadable` outcome.
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::Unreadable {
            reason: reason.into(),
        }
    }
}

/// One connect + minimal read + disconnect attempt at a coordinate.
///
/// Implemented by the session layer. Closures of the matching shape
/// implement it too, which keeps fakes in tests short.
pub trait Probe {
    /// Attempts a session at `rack`/`slot` and a minimal read.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectError`] when no session could be established.
    fn attempt(&mut self, rack: u8, slot: u8) -> Result<ProbeOutcome, ConnectError>;
}

impl<F> Probe for F
where
    F: FnMut(u8, u8) -> Result<ProbeOutcome, ConnectError>,
{
    fn attempt(&mut self, rack: u8, slot: u8) -> Result<ProbeOutcome, ConnectError> {
        self(rack, slot)
    }
}

/// How a coordinate answered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    /// Session established and the minimal read succeeded.
    ReachableReadable,
    /// Session established but the minimal read failed.
    ReachableUnreadable {
        /// Read failure reported by the probe.
        reason: String,
    },
    /// No session could be established.
    Unreachable,
}

impl Classification {
    /// Returns whether a session could be established.
    pub fn is_reachable(&self) -> bool {
        !matches!(self, Classification::Unreachable)
    }

    /// Returns whether the minimal read succeeded.
    pub fn is_readable(&self) -> bool {
        matches!(self, Classification::ReachableReadable)
    }
}

/// A reachable coordinate found by the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanCandidate {
    /// Rack number (0-7).
    pub rack: u8,
    /// Slot number (0-10).
    pub slot: u8,
    /// How the coordinate answered.
    pub classification: Classification,
}

impl fmt::Display for ScanCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rack:{} Slot:{} - ", self.rack, self.slot)?;
        match &self.classification {
            Classification::ReachableReadable => write!(f, "readable"),
            Classification::ReachableUnreadable { reason } => write!(f, "unreadable ({})", reason),
            Classification::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// A connection failure that was not a timeout.
#[derive(Debug)]
pub struct ProbeFailure {
    /// Rack number of the failed attempt.
    pub rack: u8,
    /// Slot number of the failed attempt.
    pub slot: u8,
    /// The error returned by the probe.
    pub error: ConnectError,
}

/// Everything a scan observed.
#[derive(Debug, Default)]
pub struct ScanReport {
    found: Vec<ScanCandidate>,
    failures: Vec<ProbeFailure>,
    timeouts: usize,
    attempts: usize,
}

impl ScanReport {
    /// All reachable coordinates, readable or not, in scan order.
    pub fn found(&self) -> &[ScanCandidate] {
        &self.found
    }

    /// Connection failures other than timeouts, in scan order.
    pub fn failures(&self) -> &[ProbeFailure] {
        &self.failures
    }

    /// Number of attempts that ended in a timeout.
    pub fn timeouts(&self) -> usize {
        self.timeouts
    }

    /// Number of coordinates probed.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Returns whether any coordinate passed the minimal read.
    pub fn has_readable(&self) -> bool {
        self.found.iter().any(|c| c.classification.is_readable())
    }

    /// The ranked candidate list, borrowed.
    ///
    /// Readable candidates in scan order; when there are none, the
    /// unreadable ones in scan order. Unreachable coordinates never appear.
    pub fn candidates(&self) -> Vec<&ScanCandidate> {
        let readable = self.has_readable();
        self.found
            .iter()
            .filter(|c| c.classification.is_readable() == readable)
            .collect()
    }

    /// The ranked candidate list, consuming the report.
    pub fn into_candidates(self) -> Vec<ScanCandidate> {
        let readable = self.has_readable();
        self.found
            .into_iter()
            .filter(|c| c.classification.is_readable() == readable)
            .collect()
    }

    fn record(&mut self, rack: u8, slot: u8, result: Result<ProbeOutcome, ConnectError>) {
        self.attempts += 1;
        let classification = match result {
            Ok(ProbeOutcome::Readable) => {
                info!(rack, slot, "device online, read succeeded");
                Classification::ReachableReadable
            }
            Ok(ProbeOutcome::Unreadable { reason }) => {
                info!(rack, slot, reason = %reason, "device connected, read failed");
                Classification::ReachableUnreadable { reason }
            }
            Err(error) if error.is_timeout() => {
                debug!(rack, slot, "probe timed out");
                self.timeouts += 1;
                Classification::Unreachable
            }
            Err(error) => {
                warn!(rack, slot, error = %error, "connection failed");
                self.failures.push(ProbeFailure { rack, slot, error });
                Classification::Unreachable
            }
        };

        if classification.is_reachable() {
            self.found.push(ScanCandidate {
                rack,
                slot,
                classification,
            });
        }
    }
}

/// Coordinate bounds for a [`Scanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    racks: RangeInclusive<u8>,
    slots: RangeInclusive<u8>,
}

impl ScanConfig {
    /// Creates a configuration covering every rack and slot (88 coordinates).
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::ScanConfig;
    ///
    /// assert_eq!(ScanConfig::new().coordinate_count(), 88);
    /// ```
    pub fn new() -> Self {
        Self {
            racks: 0..=MAX_RACK,
            slots: 0..=MAX_SLOT,
        }
    }

    /// Restricts the racks probed; values above [`MAX_RACK`] are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::ScanConfig;
    ///
    /// let config = ScanConfig::new().with_racks(0..=20).with_slots(1..=2);
    /// assert_eq!(config.racks(), &(0..=7));
    /// assert_eq!(config.coordinate_count(), 16);
    /// ```
    pub fn with_racks(mut self, racks: RangeInclusive<u8>) -> Self {
        self.racks = clamp(racks, MAX_RACK);
        self
    }

    /// Restricts the slots probed; values above [`MAX_SLOT`] are dropped.
    pub fn with_slots(mut self, slots: RangeInclusive<u8>) -> Self {
        self.slots = clamp(slots, MAX_SLOT);
        self
    }

    /// Racks to probe, within `0..=MAX_RACK`.
    pub fn racks(&self) -> &RangeInclusive<u8> {
        &self.racks
    }

    /// Slots to probe, within `0..=MAX_SLOT`.
    pub fn slots(&self) -> &RangeInclusive<u8> {
        &self.slots
    }

    fn clamped(self) -> Self {
        Self {
            racks: clamp(self.racks, MAX_RACK),
            slots: clamp(self.slots, MAX_SLOT),
        }
    }

    /// Number of coordinates a scan with this configuration will probe.
    pub fn coordinate_count(&self) -> usize {
        self.racks.clone().count() * self.slots.clone().count()
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp(range: RangeInclusive<u8>, max: u8) -> RangeInclusive<u8> {
    let (start, end) = range.into_inner();
    start..=end.min(max)
}

/// Runs discovery scans with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Creates a scanner. Bounds are clamped to `0..=MAX_RACK` and `0..=MAX_SLOT`.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    /// Returns the scanner's configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Probes every configured coordinate once, in order, and reports.
    ///
    /// # Example
    ///
    /// ```
    /// use plc_reader::{ConnectError, ProbeOutcome, ScanConfig, Scanner};
    ///
    /// let scanner = Scanner::new(ScanConfig::new().with_racks(0..=0));
    /// let mut probe = |_rack: u8, slot: u8| match slot {
    ///     1 => Ok(ProbeOutcome::unreadable("DB1 not found")),
    ///     3 => Err(ConnectError::refused("CPU busy")),
    ///     _ => Err(ConnectError::Timeout),
    /// };
    ///
    /// let report = scanner.run(&mut probe);
    /// assert_eq!(report.attempts(), 11);
    /// assert_eq!(report.found().len(), 1);
    /// assert_eq!(report.failures().len(), 1);
    /// assert_eq!(report.timeouts(), 9);
    /// ```
    pub fn run<P>(&self, probe: &mut P) -> ScanReport
    where
        P: Probe + ?Sized,
    {
        let total = self.config.coordinate_count();
        info!(coordinates = total, "starting rack/slot scan");

        let mut report = ScanReport::default();
        for rack in self.config.racks.clone() {
            for slot in self.config.slots.clone() {
                trace!(rack, slot, progress = report.attempts + 1, total, "probing");
                let result = probe.attempt(rack, slot);
                report.record(rack, slot, result);
            }
        }

        info!(
            attempts = report.attempts,
            found = report.found.len(),
            failures = report.failures.len(),
            timeouts = report.timeouts,
            "scan complete"
        );
        if !report.found.is_empty() && !report.has_readable() {
            info!("no readable device found, falling back to connected ones");
        }
        report
    }
}

/// Scans `racks` × `slots` and returns the ranked candidates.
///
/// Ranges are clamped to `0..=MAX_RACK` and `0..=MAX_SLOT`. See
/// [`Scanner::run`] for the full report including diagnostics.
pub fn scan<P>(probe: &mut P, racks: RangeInclusive<u8>, slots: RangeInclusive<u8>) -> Vec<ScanCandidate>
where
    P: Probe + ?Sized,
{
    let config = ScanConfig::new().with_racks(racks).with_slots(slots);
    Scanner::new(config).run(probe).into_candidates()
}
