//! LED descriptors and states.

/// The LEDs a Naga can carry, in id order.
///
/// Not every model has every LED; a model's missing LEDs are tracked as
/// [`LedState::Unsupported`] and never reach the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedKind {
    Scroll,
    Logo,
    ThumbGrid,
}

impl LedKind {
    /// All LED kinds, in id order.
    pub const ALL: &'static [LedKind] = &[LedKind::Scroll, LedKind::Logo, LedKind::ThumbGrid];

    /// Numeric LED id.
    pub fn id(&self) -> u8 {
        match self {
            Self::Scroll => 0,
            Self::Logo => 1,
            Self::ThumbGrid => 2,
        }
    }

    /// Look up an LED by numeric id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Scroll),
            1 => Some(Self::Logo),
            2 => Some(Self::ThumbGrid),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scroll => "Scrollwheel",
            Self::Logo => "GlowingLogo",
            Self::ThumbGrid => "ThumbGrid",
        }
    }

    /// Device-side selector bytes used in the LED-set command.
    pub fn selector(&self) -> [u8; 2] {
        match self {
            Self::Scroll => [0x01, 0x01],
            Self::Logo => [0x01, 0x04],
            Self::ThumbGrid => [0x01, 0x05],
        }
    }

    /// Parse an LED kind from a CLI-friendly string (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "scroll" | "scrollwheel" | "wheel" => Some(Self::Scroll),
            "logo" | "glowinglogo" => Some(Self::Logo),
            "thumb" | "thumbgrid" | "thumb-grid" => Some(Self::ThumbGrid),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State of one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    /// This physical variant has no such LED; can never be toggled.
    Unsupported,
    Off,
    On,
}

impl LedState {
    /// Whether a caller may request this state.
    pub fn is_settable(&self) -> bool {
        matches!(self, Self::Off | Self::On)
    }

    /// Parse a requested state from a CLI-friendly string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "on" | "1" => Some(Self::On),
            "off" | "0" => Some(Self::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unsupported => "unsupported",
            Self::Off => "off",
            Self::On => "on",
        };
        write!(f, "{s}")
    }
}

/// Caller-facing snapshot of one LED.
///
/// Built fresh on every query; mutating a `Led` value has no effect on
/// the device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Led {
    pub kind: LedKind,
    pub state: LedState,
}

impl Led {
    /// Display name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
