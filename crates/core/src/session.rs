//! Device configuration state and the claim/commit state machine.
//!
//! All configuration lives in memory for the lifetime of the device
//! session and is pushed to the device as one ordered frame sequence on
//! commit. Mutation and commit both require the session to be claimed;
//! the claim serializes all control-channel access, so the session does
//! no locking of its own.

use crate::commands;
use crate::device::{Axis, NagaModel, ScanFrequency};
use crate::dpi::{DpiEncoder, DpiMapping};
use crate::error::{Error, Result};
use crate::led::{Led, LedKind, LedState};
use crate::transport::ControlTransport;
use tracing::{info, warn};

/// Resolution both cursors start at.
const DEFAULT_RESOLUTION: u16 = 1000;

/// Oldest Epic firmware without known bugs.
const EPIC_MIN_FW: u16 = 0x0104;

/// The pending device configuration.
///
/// Holds everything a commit pushes: scan frequency, LED states, and
/// the per-axis resolution cursors into the generation's mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    model: NagaModel,
    encoder: DpiEncoder,
    frequency: ScanFrequency,
    led_states: [LedState; 3],
    mappings: Vec<DpiMapping>,
    cursor_x: usize,
    cursor_y: usize,
    dirty: bool,
}

impl DeviceConfig {
    /// Default configuration for a model: 1000 Hz, LEDs on where the
    /// model has them, both axes at 1000 dpi. Starts dirty so that the
    /// first commit pushes it out.
    pub fn new(model: NagaModel) -> Self {
        let encoder = DpiEncoder::for_model(model);
        let mappings = encoder.mappings();
        let default_nr = mappings
            .iter()
            .position(|m| m.resolution == DEFAULT_RESOLUTION)
            .unwrap_or(0);

        let thumb = if model.has_thumb_grid_led() {
            LedState::On
        } else {
            LedState::Unsupported
        };

        Self {
            model,
            encoder,
            frequency: ScanFrequency::Hz1000,
            led_states: [LedState::On, LedState::On, thumb],
            mappings,
            cursor_x: default_nr,
            cursor_y: default_nr,
            dirty: true,
        }
    }

    pub fn model(&self) -> NagaModel {
        self.model
    }

    pub fn encoder(&self) -> DpiEncoder {
        self.encoder
    }

    pub fn frequency(&self) -> ScanFrequency {
        self.frequency
    }

    /// Current X-axis resolution in dpi.
    pub fn resolution_x(&self) -> u16 {
        self.mappings[self.cursor_x].resolution
    }

    /// Current Y-axis resolution in dpi.
    pub fn resolution_y(&self) -> u16 {
        self.mappings[self.cursor_y].resolution
    }

    /// The generation's full resolution table.
    pub fn supported_dpi_mappings(&self) -> &[DpiMapping] {
        &self.mappings
    }

    /// Mapping currently selected for an axis; `None` for Scroll.
    pub fn dpi_mapping(&self, axis: Axis) -> Option<DpiMapping> {
        match axis {
            Axis::X => Some(self.mappings[self.cursor_x]),
            Axis::Y => Some(self.mappings[self.cursor_y]),
            Axis::Scroll => None,
        }
    }

    /// State of one LED, including `Unsupported`.
    pub fn led_state(&self, kind: LedKind) -> LedState {
        self.led_states[kind.id() as usize]
    }

    /// Snapshot of the model's supported LEDs, ascending id order.
    pub fn leds(&self) -> Vec<Led> {
        LedKind::ALL
            .iter()
            .filter(|kind| self.led_state(**kind) != LedState::Unsupported)
            .map(|kind| Led {
                kind: *kind,
                state: self.led_state(*kind),
            })
            .collect()
    }

    /// Whether any mutation is pending since the last successful commit.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// One exclusive configuration session with a device.
///
/// Owns the transport and the pending configuration. Every mutation and
/// every commit requires an active claim; acquire one with
/// [`claim`](Self::claim) and drop it with [`release`](Self::release)
/// when done.
pub struct NagaSession<T> {
    transport: T,
    config: DeviceConfig,
    claim_count: u32,
    firmware_version: u16,
}

impl<T: ControlTransport> NagaSession<T> {
    /// Bring up a device: probe its firmware and push the default
    /// configuration.
    ///
    /// The claim taken for initialization is released before returning,
    /// also on failure. A device that never answers the firmware probe
    /// is not brought up.
    pub fn initialize(transport: T, model: NagaModel) -> Result<Self> {
        let mut session = Self {
            transport,
            config: DeviceConfig::new(model),
            claim_count: 0,
            firmware_version: 0,
        };
        session.claim();
        let result = session.bring_up();
        session.release();
        match result {
            Ok(()) => Ok(session),
            Err(e) => Err(e),
        }
    }

    fn bring_up(&mut self) -> Result<()> {
        let version = commands::probe_firmware_version(&mut self.transport)?;
        self.firmware_version = version;

        if self.config.model() == NagaModel::Epic && version < EPIC_MIN_FW {
            warn!(
                major = commands::fw_major(version),
                minor = commands::fw_minor(version),
                "this firmware has known bugs; upgrade to 1.04 or later"
            );
        }

        self.commit(true)?;
        info!(
            model = self.config.model().name(),
            firmware = format_args!(
                "{}.{:02}",
                commands::fw_major(version),
                commands::fw_minor(version)
            ),
            "device initialized"
        );
        Ok(())
    }

    /// Acquire the exclusive claim. May be nested.
    pub fn claim(&mut self) {
        self.claim_count += 1;
    }

    /// Drop one level of the claim.
    pub fn release(&mut self) {
        self.claim_count = self.claim_count.saturating_sub(1);
    }

    pub fn is_claimed(&self) -> bool {
        self.claim_count > 0
    }

    /// Firmware version word probed at initialization.
    pub fn firmware_version(&self) -> u16 {
        self.firmware_version
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Set one LED's pending state.
    ///
    /// Only On and Off may be requested, and only for an LED the model
    /// actually has.
    pub fn set_led(&mut self, kind: LedKind, state: LedState) -> Result<()> {
        if !state.is_settable() {
            return Err(Error::InvalidArgument {
                field: "led_state",
                value: state as u32,
            });
        }
        if self.config.led_state(kind) == LedState::Unsupported {
            return Err(Error::InvalidArgument {
                field: "led",
                value: kind.id().into(),
            });
        }
        if !self.is_claimed() {
            return Err(Error::Busy);
        }

        self.config.led_states[kind.id() as usize] = state;
        self.config.dirty = true;
        Ok(())
    }

    /// Set the pending scan frequency.
    ///
    /// Accepts any enumerated frequency; an unsupported one is rejected
    /// by the commit before its frame is built.
    pub fn set_frequency(&mut self, freq: ScanFrequency) -> Result<()> {
        if !self.is_claimed() {
            return Err(Error::Busy);
        }

        self.config.frequency = freq;
        self.config.dirty = true;
        Ok(())
    }

    /// Point an axis (or both, with `None`) at a resolution mapping.
    pub fn set_dpi_mapping(&mut self, axis: Option<Axis>, nr: usize) -> Result<()> {
        if !self.is_claimed() {
            return Err(Error::Busy);
        }
        if axis == Some(Axis::Scroll) {
            return Err(Error::InvalidArgument {
                field: "axis",
                value: Axis::Scroll.id().into(),
            });
        }
        if nr >= self.config.mappings.len() {
            return Err(Error::InvalidArgument {
                field: "dpi_mapping",
                value: nr as u32,
            });
        }

        match axis {
            Some(Axis::X) => self.config.cursor_x = nr,
            Some(Axis::Y) => self.config.cursor_y = nr,
            _ => {
                self.config.cursor_x = nr;
                self.config.cursor_y = nr;
            }
        }
        self.config.dirty = true;
        Ok(())
    }

    /// Push pending changes to the device.
    ///
    /// A clean session is a successful no-op unless `force` is set. On
    /// failure the dirty flag is left untouched, so a later commit
    /// retries the whole sequence from the start.
    pub fn commit(&mut self, force: bool) -> Result<()> {
        if !self.is_claimed() {
            return Err(Error::Busy);
        }
        if self.config.dirty || force {
            commands::apply_config(&mut self.transport, &self.config)?;
            self.config.dirty = false;
        }
        Ok(())
    }
}
