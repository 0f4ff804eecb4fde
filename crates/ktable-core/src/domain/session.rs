//! Session parameters handed to every connection attempt.
//!
//! The connection factory treats [`SessionParameters`] as an opaque value: it
//! is copied into the client at construction time and forwarded to whichever
//! capture backend or remote session sits underneath, but the factory itself
//! never branches on its contents.
//!
//! The struct is `#[repr(C)]` so that C and C# callers can fill a block of the
//! same layout and hand the export boundary a pointer to it.

use serde::{Deserialize, Serialize};

/// Bitmask of the data streams a session asks the table to produce.
///
/// Bits are combined with `|`:
///
/// ```
/// use ktable_core::DataTypes;
///
/// let wanted = DataTypes(DataTypes::DEPTH | DataTypes::HANDS);
/// assert!(wanted.contains(DataTypes::HANDS));
/// assert!(!wanted.contains(DataTypes::COLOR));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DataTypes(pub u32);

impl DataTypes {
    /// Raw 16-bit depth frames.
    pub const DEPTH: u32 = 1 << 0;
    /// RGB colour frames.
    pub const COLOR: u32 = 1 << 1;
    /// Hand positions derived from the arm blobs.
    pub const HANDS: u32 = 1 << 2;
    /// Arm blobs as detected above the table surface.
    pub const BLOBS: u32 = 1 << 3;

    /// Every stream the table can produce.
    pub const ALL: u32 = Self::DEPTH | Self::COLOR | Self::HANDS | Self::BLOBS;

    /// Returns `true` if every bit in `flags` is set.
    pub fn contains(&self, flags: u32) -> bool {
        self.0 & flags == flags
    }

    /// Returns `true` if no stream is requested.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Configuration block passed uniformly to local and remote connections.
///
/// The caller owns the value.  Factory functions take it by reference and copy
/// it, so the caller may drop or reuse its block as soon as the call returns.
///
/// `SessionParameters::default()` (all zero) is a valid value; a zero
/// `max_fps` means "whatever rate the device delivers".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct SessionParameters {
    /// Streams requested from the table.
    #[serde(default)]
    pub data_types: DataTypes,
    /// Upper bound on delivered frames per second (0 = unlimited).
    #[serde(default)]
    pub max_fps: u32,
}

impl SessionParameters {
    /// Creates parameters requesting `data_types` at the device's native rate.
    pub fn new(data_types: u32) -> Self {
        Self {
            data_types: DataTypes(data_types),
            max_fps: 0,
        }
    }

    /// Returns a copy with the frame-rate cap replaced.
    pub fn with_max_fps(self, max_fps: u32) -> Self {
        Self { max_fps, ..self }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
