//! Domain layer: pure values with no I/O.
//!
//! Everything here is safe to use from tests, benches, and the FFI crate
//! without a device or network present.

pub mod buffer;
pub mod calibration;
pub mod endpoint;
pub mod session;

/// Width in pixels of a depth frame produced by the table camera.
pub const DEPTH_WIDTH: usize = 640;

/// Height in pixels of a depth frame produced by the table camera.
pub const DEPTH_HEIGHT: usize = 480;

/// Number of pixels in one depth frame.
pub const DEPTH_PIXELS: usize = DEPTH_WIDTH * DEPTH_HEIGHT;

/// Upper bound on simultaneously tracked arm blobs in one frame.
pub const MAX_BLOBS: usize = 32;
