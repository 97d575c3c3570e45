//! Device model table and shared configuration value types.

use crate::pids;

/// Supported Razer Naga models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NagaModel {
    Classic,
    Epic,
    Naga2012,
    Hex,
    Naga2014,
    HexV2,
}

impl NagaModel {
    /// Look up model from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::NAGA_CLASSIC => Some(Self::Classic),
            pids::NAGA_EPIC => Some(Self::Epic),
            pids::NAGA_2012 => Some(Self::Naga2012),
            pids::NAGA_HEX => Some(Self::Hex),
            pids::NAGA_2014 => Some(Self::Naga2014),
            pids::NAGA_HEX_V2 => Some(Self::HexV2),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classic => "Naga",
            Self::Epic => "Naga Epic",
            Self::Naga2012 => "Naga 2012",
            Self::Hex => "Naga Hex",
            Self::Naga2014 => "Naga 2014",
            Self::HexV2 => "Naga Hex v2",
        }
    }

    /// USB Product ID.
    pub fn pid(&self) -> u16 {
        match self {
            Self::Classic => pids::NAGA_CLASSIC,
            Self::Epic => pids::NAGA_EPIC,
            Self::Naga2012 => pids::NAGA_2012,
            Self::Hex => pids::NAGA_HEX,
            Self::Naga2014 => pids::NAGA_2014,
            Self::HexV2 => pids::NAGA_HEX_V2,
        }
    }

    /// Whether this model carries the 8200 dpi sensor generation.
    ///
    /// The sensor generation decides the resolution command encoding and
    /// the size of the resolution table.
    pub fn has_extended_sensor(&self) -> bool {
        matches!(self, Self::Naga2014)
    }

    /// Whether this model has a thumb-grid LED.
    pub fn has_thumb_grid_led(&self) -> bool {
        matches!(self, Self::Naga2014)
    }
}

/// Scan (polling) frequency options at the configuration layer.
///
/// `Unknown` is the state before anything was set; the device treats it
/// as 1000 Hz. `Hz250` exists for other mice and is rejected by the
/// Naga's wire mapping at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanFrequency {
    Hz125,
    Hz250,
    Hz500,
    Hz1000,
    Unknown,
}

impl ScanFrequency {
    /// Convert from raw Hz value.
    pub fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            125 => Some(Self::Hz125),
            250 => Some(Self::Hz250),
            500 => Some(Self::Hz500),
            1000 => Some(Self::Hz1000),
            _ => None,
        }
    }

    /// Get the Hz value; `None` for `Unknown`.
    pub fn as_hz(&self) -> Option<u16> {
        match self {
            Self::Hz125 => Some(125),
            Self::Hz250 => Some(250),
            Self::Hz500 => Some(500),
            Self::Hz1000 => Some(1000),
            Self::Unknown => None,
        }
    }

    /// Frequencies the Naga accepts.
    pub const SUPPORTED: &'static [ScanFrequency] =
        &[ScanFrequency::Hz125, ScanFrequency::Hz500, ScanFrequency::Hz1000];
}

impl std::fmt::Display for ScanFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_hz() {
            Some(hz) => write!(f, "{hz} Hz"),
            None => write!(f, "unknown"),
        }
    }
}

/// Sensor axes exposed by the Naga.
///
/// X and Y carry independently settable resolution; Scroll does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Scroll,
}

impl Axis {
    /// All axes, in id order.
    pub const ALL: &'static [Axis] = &[Axis::X, Axis::Y, Axis::Scroll];

    /// Numeric axis id.
    pub fn id(&self) -> u8 {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Scroll => 2,
        }
    }

    /// Look up an axis by numeric id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Scroll),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Scroll => "Scroll",
        }
    }

    /// Whether this axis has its own resolution mapping.
    pub fn has_independent_resolution(&self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_from_known_pid() {
        assert_eq!(NagaModel::from_pid(0x0015), Some(NagaModel::Classic));
        assert_eq!(NagaModel::from_pid(0x0040), Some(NagaModel::Naga2014));
        assert_eq!(NagaModel::from_pid(0x0050), Some(NagaModel::HexV2));
    }

    #[test]
    fn model_from_unknown_pid() {
        assert_eq!(NagaModel::from_pid(0x1234), None);
    }

    #[test]
    fn model_pid_roundtrip() {
        for pid in [0x0015, 0x001F, 0x002E, 0x0036, 0x0040, 0x0050] {
            let model = NagaModel::from_pid(pid).unwrap();
            assert_eq!(model.pid(), pid);
        }
    }

    #[test]
    fn only_2014_has_extended_sensor_and_thumb_grid() {
        for pid in [0x0015, 0x001F, 0x002E, 0x0036, 0x0050] {
            let model = NagaModel::from_pid(pid).unwrap();
            assert!(!model.has_extended_sensor());
            assert!(!model.has_thumb_grid_led());
        }
        assert!(NagaModel::Naga2014.has_extended_sensor());
        assert!(NagaModel::Naga2014.has_thumb_grid_led());
    }

    #[test]
    fn frequency_from_hz_roundtrip() {
        for freq in ScanFrequency::SUPPORTED {
            assert_eq!(ScanFrequency::from_hz(freq.as_hz().unwrap()), Some(*freq));
        }
    }

    #[test]
    fn frequency_rejects_invalid_hz() {
        assert_eq!(ScanFrequency::from_hz(0), None);
        assert_eq!(ScanFrequency::from_hz(200), None);
        assert_eq!(ScanFrequency::from_hz(2000), None);
    }

    #[test]
    fn frequency_display() {
        assert_eq!(ScanFrequency::Hz500.to_string(), "500 Hz");
        assert_eq!(ScanFrequency::Unknown.to_string(), "unknown");
    }

    #[test]
    fn axis_id_roundtrip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_id(axis.id()), Some(*axis));
        }
        assert_eq!(Axis::from_id(3), None);
    }

    #[test]
    fn scroll_axis_has_no_independent_resolution() {
        assert!(Axis::X.has_independent_resolution());
        assert!(Axis::Y.has_independent_resolution());
        assert!(!Axis::Scroll.has_independent_resolution());
    }
}
