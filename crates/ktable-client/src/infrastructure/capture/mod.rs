//! Capture backend implementations.
//!
//! A driver-backed backend for a specific camera SDK implements
//! [`CaptureBackend`](crate::application::transport::CaptureBackend) and is
//! added here behind a `#[cfg]` for the platforms it supports.  The
//! simulated backend is always compiled so tests on any platform can use it
//! without a camera.

pub mod simulated;
