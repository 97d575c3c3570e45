//! Command exchange and the ordered commit sequence.
//!
//! Every configuration change reaches the device as one or more command
//! frames, each sent as a write followed by a read of the echoed frame.
//! A commit pushes the whole pending configuration in a fixed order:
//! resolution, then LEDs, then scan frequency. The order is what the
//! firmware expects; do not reorder.

use crate::device::ScanFrequency;
use crate::error::{Error, Result};
use crate::frame::{checksum_matches, opcodes, CommandFrame, FRAME_LEN};
use crate::led::LedState;
use crate::retry::{self, with_retries};
use crate::session::DeviceConfig;
use crate::transport::{ControlTransport, COMMAND_VALUE, READ_REQUEST, WRITE_REQUEST};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Extract the major number from a packed firmware version word.
pub fn fw_major(version: u16) -> u8 {
    (version >> 8) as u8
}

/// Extract the minor number from a packed firmware version word.
pub fn fw_minor(version: u16) -> u8 {
    (version & 0xFF) as u8
}

/// Send one command frame and receive the device's echo.
///
/// The checksum is recomputed on encode, immediately before the write.
/// The read is retried up to three times on short transfers. A response
/// status outside {0, 1, 2} means the device balked at the command; it
/// is logged and otherwise ignored, as is a bad response checksum.
pub fn send_command(
    transport: &mut dyn ControlTransport,
    cmd: CommandFrame,
) -> Result<CommandFrame> {
    let buf = cmd.encode();
    trace!(
        command = format_args!("0x{:04X}", cmd.command),
        request = format_args!("0x{:04X}", cmd.request),
        values = format_args!("{:02X?}", cmd.values),
        "command TX"
    );
    transport.write(WRITE_REQUEST, COMMAND_VALUE, &buf)?;

    let raw = with_retries(retry::READ_ATTEMPTS, Duration::ZERO, || {
        transport.read(READ_REQUEST, COMMAND_VALUE, FRAME_LEN)
    })?;
    let bytes: [u8; FRAME_LEN] = raw.as_slice().try_into().map_err(|_| {
        Error::Transport(format!("response length {} != {FRAME_LEN}", raw.len()))
    })?;

    if !checksum_matches(&bytes) {
        warn!(
            command = format_args!("0x{:04X}", cmd.command),
            request = format_args!("0x{:04X}", cmd.request),
            "response checksum mismatch"
        );
    }

    let resp = CommandFrame::decode(&bytes);
    if !matches!(resp.status, 0 | 1 | 2) {
        warn!(
            command = format_args!("0x{:04X}", cmd.command),
            request = format_args!("0x{:04X}", cmd.request),
            status = format_args!("0x{:02X}", resp.status),
            "command failed with anomalous status"
        );
    }
    trace!(
        status = resp.status,
        values = format_args!("{:02X?}", resp.values),
        "command RX"
    );
    Ok(resp)
}

/// Poke the device for its firmware version.
///
/// Some devices need several pokes before they answer with a valid
/// version number, so the query is retried up to five times with 250 ms
/// pauses; an answer whose major byte is zero does not count. A device
/// that never produces one is not brought up.
pub fn probe_firmware_version(transport: &mut dyn ControlTransport) -> Result<u16> {
    let result = with_retries(retry::PROBE_ATTEMPTS, retry::PROBE_DELAY, || {
        let resp = send_command(&mut *transport, opcodes::GET_FIRMWARE.frame())?;
        let version = u16::from_be_bytes([resp.values[0], resp.values[1]]);
        if version & 0xFF00 == 0 {
            return Err(Error::DeviceNotResponding);
        }
        Ok(version)
    });
    match result {
        Ok(version) => {
            debug!(
                major = fw_major(version),
                minor = fw_minor(version),
                "firmware version"
            );
            Ok(version)
        }
        Err(e) => {
            warn!(error = %e, "failed to read firmware version");
            Err(Error::DeviceNotResponding)
        }
    }
}

/// Map a scan frequency to its wire byte.
pub fn frequency_wire_byte(freq: ScanFrequency) -> Result<u8> {
    match freq {
        ScanFrequency::Hz125 => Ok(8),
        ScanFrequency::Hz500 => Ok(2),
        ScanFrequency::Hz1000 | ScanFrequency::Unknown => Ok(1),
        other => Err(Error::InvalidArgument {
            field: "frequency",
            value: other.as_hz().map(u32::from).unwrap_or(0),
        }),
    }
}

/// Push the full configuration to the device.
///
/// Strictly ordered; aborts at the first failure without touching the
/// later steps. Dirtiness bookkeeping is the caller's concern.
pub fn apply_config(transport: &mut dyn ControlTransport, config: &DeviceConfig) -> Result<()> {
    let resolution = config
        .encoder()
        .resolution_frame(config.resolution_x(), config.resolution_y());
    send_command(transport, resolution)?;

    for led in config.leds() {
        let sel = led.kind.selector();
        let on = (led.state == LedState::On) as u8;
        send_command(transport, opcodes::SET_LED.frame_with([sel[0], sel[1], on, 0, 0]))?;
    }

    let freq = frequency_wire_byte(config.frequency())?;
    send_command(
        transport,
        opcodes::SET_FREQUENCY.frame_with([freq, 0, 0, 0, 0]),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use std::time::Instant;

    #[test]
    fn send_command_recomputes_checksum_before_write() {
        let mut mock = MockTransport::new();
        send_command(&mut mock, opcodes::SET_FREQUENCY.frame_with([1, 0, 0, 0, 0])).unwrap();
        let sent = &mock.frames[0];
        assert_eq!(sent.len(), FRAME_LEN);
        let expected: u8 = sent[2..88].iter().fold(0, |acc, b| acc ^ b);
        assert_eq!(sent[88], expected);
    }

    #[test]
    fn send_command_retries_short_reads() {
        let mut mock = MockTransport::new().failing_reads(2);
        send_command(&mut mock, opcodes::GET_FIRMWARE.frame()).unwrap();
        assert_eq!(mock.read_attempts, 3);
    }

    #[test]
    fn send_command_fails_after_read_retries_exhausted() {
        let mut mock = MockTransport::new().failing_reads(3);
        let result = send_command(&mut mock, opcodes::GET_FIRMWARE.frame());
        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(mock.read_attempts, 3);
    }

    #[test]
    fn anomalous_status_is_not_fatal() {
        let mut mock = MockTransport::new().with_response_status(0x05);
        let resp = send_command(&mut mock, opcodes::GET_FIRMWARE.frame()).unwrap();
        assert_eq!(resp.status, 0x05);
    }

    #[test]
    fn corrupt_response_checksum_is_not_fatal() {
        let mut mock = MockTransport::new().with_corrupt_checksum();
        assert!(send_command(&mut mock, opcodes::GET_FIRMWARE.frame()).is_ok());
    }

    #[test]
    fn probe_returns_version_on_first_answer() {
        let mut mock = MockTransport::new().with_firmware(0x0104);
        let version = probe_firmware_version(&mut mock).unwrap();
        assert_eq!(version, 0x0104);
        assert_eq!(mock.frames.len(), 1);
        assert_eq!(fw_major(version), 1);
        assert_eq!(fw_minor(version), 4);
    }

    #[test]
    fn probe_exhausts_five_attempts_with_inter_attempt_delay() {
        // A zero major byte never satisfies the probe.
        let mut mock = MockTransport::new().with_firmware(0x0012);
        let start = Instant::now();
        let result = probe_firmware_version(&mut mock);
        assert!(matches!(result, Err(Error::DeviceNotResponding)));
        assert_eq!(mock.frames.len(), 5);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[test]
    fn frequency_wire_mapping() {
        assert_eq!(frequency_wire_byte(ScanFrequency::Hz125).unwrap(), 8);
        assert_eq!(frequency_wire_byte(ScanFrequency::Hz500).unwrap(), 2);
        assert_eq!(frequency_wire_byte(ScanFrequency::Hz1000).unwrap(), 1);
        assert_eq!(frequency_wire_byte(ScanFrequency::Unknown).unwrap(), 1);
    }

    #[test]
    fn frequency_wire_mapping_rejects_unsupported() {
        let result = frequency_wire_byte(ScanFrequency::Hz250);
        match result {
            Err(Error::InvalidArgument { field, value }) => {
                assert_eq!(field, "frequency");
                assert_eq!(value, 250);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
