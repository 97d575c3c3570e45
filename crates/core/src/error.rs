//! Error types for open-naga-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Control transfer failure (short transfer or timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// Firmware version probe exhausted all attempts.
    #[error("device did not respond to firmware version probe")]
    DeviceNotResponding,

    /// Mutation or commit attempted without an active claim.
    #[error("device is not claimed")]
    Busy,

    /// Out-of-domain argument (frequency, axis, LED id or state).
    #[error("invalid argument: {field} = {value}")]
    InvalidArgument { field: &'static str, value: u32 },

    /// No usable device found when opening.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
