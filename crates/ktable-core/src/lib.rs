//! # ktable-core
//!
//! Shared domain library for KinectTable containing the session parameter
//! block, the process-wide calibration state, and the fixed-capacity buffer
//! used to carry frame and blob data.
//!
//! This crate has zero dependencies on device drivers, sockets, or FFI.
//! The connection lifecycle lives in `ktable-client`; the flat C surface in
//! `ktable-ffi`.
//!
//! # Architecture overview (for beginners)
//!
//! KinectTable turns an ordinary table into an interactive surface: a depth
//! camera mounted above the table watches the arms and hands of the people
//! sitting around it.  Applications obtain a *client* either from a camera
//! plugged into this machine (a local client) or from another machine that
//! owns the camera (a remote client).
//!
//! This crate is the shared foundation.  It defines:
//!
//! - **`domain::session`** – The [`SessionParameters`] block every connection
//!   attempt is given.  The connection layer forwards it without looking
//!   inside.
//!
//! - **`domain::calibration`** – The table depth tweak, a single integer the
//!   arm detector reads to decide how close to the table surface an arm may
//!   be before it is mistaken for the table itself.
//!
//! - **`domain::buffer`** – [`FixedCapacityBuffer`], an owned heap block of
//!   exactly `S` elements with a separate count of meaningful entries.
//!
//! - **`domain::endpoint`** – Parsing of local endpoint names and remote
//!   `host:port` addresses.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `ktable_core::SessionParameters` instead of the full module path.
pub use domain::buffer::{BlobIdBuffer, CapacityError, DepthBuffer, FixedCapacityBuffer};
pub use domain::calibration::{depth_tweak, set_depth_tweak, DEFAULT_DEPTH_TWEAK};
pub use domain::endpoint::{AddressError, LocalEndpoint, RemoteAddress};
pub use domain::session::{DataTypes, SessionParameters};
