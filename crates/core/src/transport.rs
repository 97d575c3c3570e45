//! Control-channel transport abstraction.
//!
//! Provides a trait-based transport layer so that real USB devices and
//! mock devices share the same interface. The concrete implementation
//! (hidapi feature reports in the CLI) performs one blocking control
//! transfer per call.

use crate::error::Result;
use std::time::{Duration, Instant};

/// Class request code for the write path (HID SET_REPORT).
pub const WRITE_REQUEST: u8 = 0x09;
/// Class request code for the read path (HID GET_REPORT).
pub const READ_REQUEST: u8 = 0x01;
/// wValue for both paths: feature report, report id 0.
pub const COMMAND_VALUE: u16 = 0x0300;
/// Timeout for a single control transfer.
pub const USB_TIMEOUT_MS: u64 = 3000;
/// Minimum gap between any two control transfers.
///
/// The firmware of some devices desynchronizes when control transfers
/// arrive back-to-back.
pub const PACKET_SPACING_MS: u64 = 25;

/// Abstraction over the raw control-transfer pair.
///
/// Both operations are synchronous and blocking. Implementations must
/// enforce [`PACKET_SPACING_MS`] around every transfer (see
/// [`EventSpacing`]) and must fail unless the exact byte count was
/// transferred.
pub trait ControlTransport {
    /// Issue one OUT control transfer carrying `data`.
    ///
    /// Fails with `Error::Transport` unless exactly `data.len()` bytes
    /// were accepted.
    fn write(&mut self, request: u8, value: u16, data: &[u8]) -> Result<()>;

    /// Issue one IN control transfer expecting `len` bytes.
    ///
    /// Fails with `Error::Transport` unless exactly `len` bytes were
    /// returned.
    fn read(&mut self, request: u8, value: u16, len: usize) -> Result<Vec<u8>>;
}

/// Minimum-gap pacing between transfers.
///
/// Owned by the concrete transport object; call [`enter`](Self::enter)
/// before and [`leave`](Self::leave) after every transfer.
#[derive(Debug)]
pub struct EventSpacing {
    min_gap: Duration,
    last_event: Option<Instant>,
}

impl EventSpacing {
    pub fn new(min_gap_ms: u64) -> Self {
        Self {
            min_gap: Duration::from_millis(min_gap_ms),
            last_event: None,
        }
    }

    /// Block until the minimum gap since the last transfer has elapsed.
    pub fn enter(&mut self) {
        if let Some(last) = self.last_event {
            let elapsed = last.elapsed();
            if elapsed < self.min_gap {
                std::thread::sleep(self.min_gap - elapsed);
            }
        }
        self.last_event = Some(Instant::now());
    }

    /// Record the end of a transfer.
    pub fn leave(&mut self) {
        self.last_event = Some(Instant::now());
    }
}
