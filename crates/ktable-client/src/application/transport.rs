//! Collaborator seams for the two connection strategies.
//!
//! The client core never talks to a camera driver or a socket directly.  It
//! asks a [`CaptureBackend`] to open a local device, or a [`RemoteConnector`]
//! to open a session to another machine, and keeps the returned resource
//! until the client is disconnected.
//!
//! Both seams receive the caller's [`SessionParameters`] unchanged; only the
//! collaborator interprets them.

use std::time::Duration;

use ktable_core::{LocalEndpoint, RemoteAddress, SessionParameters};
use thiserror::Error;

// ── Local capture ─────────────────────────────────────────────────────────────

/// Error type for local capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No device answers at the requested endpoint.
    #[error("no capture device at {0}")]
    DeviceNotFound(String),
    /// The device exists but another process holds it.
    #[error("capture device {0} is busy")]
    DeviceBusy(String),
    /// The device refused the requested streams or rate.
    #[error("session parameters rejected: {0}")]
    ParametersRejected(String),
    /// Any other driver-level failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// An open capture device owned by a `LocalClient`.
pub trait CaptureDevice: Send {
    /// The endpoint this device was opened on.
    fn endpoint(&self) -> &str;

    /// Stops capture and releases the device.
    ///
    /// Called exactly once, when the owning client is disconnected or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] if the driver reports a failure while
    /// releasing; the device is considered released regardless.
    fn close(&mut self) -> Result<(), CaptureError>;
}

/// Opens capture devices attached to this machine.
///
/// Production builds plug a driver-backed implementation in here; the
/// infrastructure layer ships a simulated one.
#[cfg_attr(test, mockall::automock)]
pub trait CaptureBackend: Send + Sync {
    /// Opens the device at `endpoint`, or the backend's default device when
    /// `endpoint` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] if the device is absent, busy, or rejects
    /// `params`.
    fn open(
        &self,
        params: SessionParameters,
        endpoint: Option<LocalEndpoint>,
    ) -> Result<Box<dyn CaptureDevice>, CaptureError>;
}

// ── Remote session ────────────────────────────────────────────────────────────

/// Error type for remote session operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP connect failed (refused, unreachable, DNS failure).
    #[error("could not reach {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The connect did not complete within the configured timeout.
    #[error("connect to {addr} timed out after {timeout:?}")]
    TimedOut { addr: String, timeout: Duration },
    /// The I/O runtime backing the session could not be created.
    #[error("failed to start I/O runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// An I/O error on an established session.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An established session to a remote table host.
pub trait RemoteLink: Send {
    /// The peer address as connected.
    fn peer(&self) -> &str;

    /// Closes the session and releases the socket.
    ///
    /// Called exactly once, when the owning client is disconnected or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the orderly shutdown fails; the socket is
    /// released regardless.
    fn shutdown(&mut self) -> Result<(), TransportError>;
}

/// Opens sessions to remote table hosts.
pub trait RemoteConnector: Send + Sync {
    /// Connects to `address` and returns the established session.
    ///
    /// Blocks the calling thread until the session is up or has failed.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the host cannot be reached in time.
    fn connect(
        &self,
        params: SessionParameters,
        address: &RemoteAddress,
    ) -> Result<Box<dyn RemoteLink>, TransportError>;
}
