//! Sensor resolution mappings and the per-generation encoding variants.
//!
//! Both sensor generations take their resolution in fixed 100 dpi steps
//! starting at 100, but encode the resolution-set command differently:
//! the 5600 dpi generation packs a scaled single byte per axis, the
//! 8200 dpi generation sends the raw value as a big-endian word.

use crate::device::NagaModel;
use crate::frame::{opcodes, CommandFrame};

/// Resolution granularity.
pub const DPI_STEP: u16 = 100;

/// Mapping count for the 5600 dpi generation (Classic/Epic/2012/Hex).
pub const LEGACY_MAPPING_COUNT: usize = 56;
/// Mapping count for the 8200 dpi generation (2014).
pub const EXTENDED_MAPPING_COUNT: usize = 82;

/// One entry of the per-axis resolution lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiMapping {
    /// Table index.
    pub nr: usize,
    /// Resolution in dpi.
    pub resolution: u16,
}

/// Resolution-set command encoding, selected once per device generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpiEncoder {
    /// 5600 dpi generation: command 0x0003/0x0401, scaled byte per axis.
    Legacy,
    /// 8200 dpi generation: command 0x0007/0x0405, raw big-endian words.
    Extended,
}

impl DpiEncoder {
    /// Select the encoder for a model.
    pub fn for_model(model: NagaModel) -> Self {
        if model.has_extended_sensor() {
            Self::Extended
        } else {
            Self::Legacy
        }
    }

    /// Number of entries in this generation's resolution table.
    pub fn mapping_count(&self) -> usize {
        match self {
            Self::Legacy => LEGACY_MAPPING_COUNT,
            Self::Extended => EXTENDED_MAPPING_COUNT,
        }
    }

    /// Build the full resolution table, ascending, 100 dpi per step.
    pub fn mappings(&self) -> Vec<DpiMapping> {
        (0..self.mapping_count())
            .map(|nr| DpiMapping {
                nr,
                resolution: (nr as u16 + 1) * DPI_STEP,
            })
            .collect()
    }

    /// Encode the resolution-set frame for the current per-axis values.
    pub fn resolution_frame(&self, x_res: u16, y_res: u16) -> CommandFrame {
        match self {
            Self::Legacy => {
                let x = ((u32::from(x_res) / 100 - 1) * 4) as u8;
                let y = ((u32::from(y_res) / 100 - 1) * 4) as u8;
                opcodes::SET_RESOLUTION_LEGACY.frame_with([x, y, 0, 0, 0])
            }
            Self::Extended => {
                let x = x_res.to_be_bytes();
                let y = y_res.to_be_bytes();
                opcodes::SET_RESOLUTION_EXTENDED.frame_with([0, x[0], x[1], y[0], y[1]])
            }
        }
    }
}
