//! Simulated capture backend.
//!
//! # Why a simulated backend?
//!
//! Real capture backends talk to a camera SDK that:
//!
//! - Requires the camera to be physically plugged in.
//! - Holds the device exclusively while a session is open.
//! - Cannot be observed directly from Rust test code.
//!
//! `SimulatedCaptureBackend` replaces all of that with in-memory bookkeeping.
//!
//! # Counting vs. recording
//!
//! | Constructor                             | Keeps                                  |
//! |-----------------------------------------|----------------------------------------|
//! | [`SimulatedCaptureBackend::new`]        | open/close counters only               |
//! | [`SimulatedCaptureBackend::recording`]  | counters plus every open and close     |
//!
//! `new` is what `build_factory` wires in, so a long-running host that
//! connects and disconnects repeatedly holds a fixed amount of state.  Tests
//! that need to assert exactly which devices were opened, with which
//! parameters, use `recording`.
//!
//! # Usage in tests
//!
//! ```
//! use ktable_client::infrastructure::capture::simulated::SimulatedCaptureBackend;
//! use ktable_client::application::transport::{CaptureBackend, CaptureDevice};
//! use ktable_core::SessionParameters;
//!
//! let backend = SimulatedCaptureBackend::recording("kinect:0");
//! let mut device = backend.open(SessionParameters::default(), None).unwrap();
//! assert_eq!(backend.live_devices(), 1);
//!
//! device.close().unwrap();
//! assert_eq!(backend.live_devices(), 0);
//! assert_eq!(backend.closed(), vec!["kinect:0".to_string()]);
//! ```
//!
//! # Unplugging
//!
//! [`SimulatedCaptureBackend::unplug`] marks an endpoint as absent; opening it
//! then fails with `CaptureError::DeviceNotFound`.  This lets callers test
//! the connection-failure path without a broken camera.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ktable_core::{LocalEndpoint, SessionParameters};
use tracing::debug;

use crate::application::transport::{CaptureBackend, CaptureDevice, CaptureError};

/// One successful `open` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRecord {
    pub endpoint: String,
    pub params: SessionParameters,
}

/// Full open/close history, kept only by recording backends.
#[derive(Debug, Default)]
struct History {
    opened: Vec<OpenRecord>,
    closed: Vec<String>,
}

#[derive(Debug, Default)]
struct Ledger {
    open_count: u64,
    close_count: u64,
    history: Option<History>,
    absent: HashSet<String>,
}

fn lock(ledger: &Mutex<Ledger>) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory capture backend that counts the devices it hands out.
#[derive(Debug, Clone)]
pub struct SimulatedCaptureBackend {
    default_endpoint: String,
    ledger: Arc<Mutex<Ledger>>,
}

impl SimulatedCaptureBackend {
    /// Creates a counting backend whose default device is `default_endpoint`.
    pub fn new(default_endpoint: impl Into<String>) -> Self {
        Self {
            default_endpoint: default_endpoint.into(),
            ledger: Arc::default(),
        }
    }

    /// Like [`new`](Self::new), but also keeps every open and close for
    /// inspection through [`opened`](Self::opened) and [`closed`](Self::closed).
    pub fn recording(default_endpoint: impl Into<String>) -> Self {
        let backend = Self::new(default_endpoint);
        lock(&backend.ledger).history = Some(History::default());
        backend
    }

    pub fn is_recording(&self) -> bool {
        lock(&self.ledger).history.is_some()
    }

    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    /// Makes subsequent opens of `endpoint` fail with `DeviceNotFound`.
    pub fn unplug(&self, endpoint: &str) {
        lock(&self.ledger).absent.insert(endpoint.to_string());
    }

    /// Reverses [`unplug`](Self::unplug).
    pub fn plug_in(&self, endpoint: &str) {
        lock(&self.ledger).absent.remove(endpoint);
    }

    /// Every successful open, oldest first.  Empty unless recording.
    pub fn opened(&self) -> Vec<OpenRecord> {
        lock(&self.ledger)
            .history
            .as_ref()
            .map(|h| h.opened.clone())
            .unwrap_or_default()
    }

    /// Endpoint of every close, oldest first.  Empty unless recording.
    pub fn closed(&self) -> Vec<String> {
        lock(&self.ledger)
            .history
            .as_ref()
            .map(|h| h.closed.clone())
            .unwrap_or_default()
    }

    /// Number of successful opens so far.
    pub fn open_count(&self) -> u64 {
        lock(&self.ledger).open_count
    }

    /// Number of closes so far.
    pub fn close_count(&self) -> u64 {
        lock(&self.ledger).close_count
    }

    /// Devices opened and not yet closed.
    pub fn live_devices(&self) -> usize {
        let ledger = lock(&self.ledger);
        usize::try_from(ledger.open_count.saturating_sub(ledger.close_count)).unwrap_or(usize::MAX)
    }
}

impl CaptureBackend for SimulatedCaptureBackend {
    fn open(
        &self,
        params: SessionParameters,
        endpoint: Option<LocalEndpoint>,
    ) -> Result<Box<dyn CaptureDevice>, CaptureError> {
        let endpoint = endpoint
            .map(|e| e.to_string())
            .unwrap_or_else(|| self.default_endpoint.clone());

        let mut ledger = lock(&self.ledger);
        if ledger.absent.contains(&endpoint) {
            return Err(CaptureError::DeviceNotFound(endpoint));
        }
        ledger.open_count += 1;
        if let Some(history) = ledger.history.as_mut() {
            history.opened.push(OpenRecord {
                endpoint: endpoint.clone(),
                params,
            });
        }
        debug!(%endpoint, "simulated capture device opened");

        Ok(Box::new(SimulatedDevice {
            endpoint,
            ledger: Arc::clone(&self.ledger),
            closed: false,
        }))
    }
}

/// Device handed out by [`SimulatedCaptureBackend`].
struct SimulatedDevice {
    endpoint: String,
    ledger: Arc<Mutex<Ledger>>,
    closed: bool,
}

impl CaptureDevice for SimulatedDevice {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn close(&mut self) -> Result<(), CaptureError> {
        if self.closed {
            return Err(CaptureError::Platform(format!(
                "device {} already closed",
                self.endpoint
            )));
        }
        self.closed = true;
        let mut ledger = lock(&self.ledger);
        ledger.close_count += 1;
        if let Some(history) = ledger.history.as_mut() {
            history.closed.push(self.endpoint.clone());
        }
        drop(ledger);
        debug!(endpoint = %self.endpoint, "simulated capture device closed");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ktable_core::DataTypes;

    #[test]
    fn test_open_without_endpoint_uses_default() {
        // Arrange
        let backend = SimulatedCaptureBackend::recording("kinect:0");

        // Act
        let device = backend.open(SessionParameters::default(), None).unwrap();

        // Assert
        assert_eq!(device.endpoint(), "kinect:0");
        assert_eq!(backend.opened()[0].endpoint, "kinect:0");
    }

    #[test]
    fn test_open_records_forwarded_params() {
        let backend = SimulatedCaptureBackend::recording("kinect:0");
        let params = SessionParameters::new(DataTypes::HANDS).with_max_fps(10);

        let _device = backend
            .open(params, Some(LocalEndpoint::parse("kinect:2").unwrap()))
            .unwrap();

        assert_eq!(
            backend.opened(),
            vec![OpenRecord {
                endpoint: "kinect:2".into(),
                params
            }]
        );
    }

    #[test]
    fn test_unplugged_endpoint_fails_with_device_not_found() {
        // Arrange
        let backend = SimulatedCaptureBackend::recording("kinect:0");
        backend.unplug("kinect:0");

        // Act
        let result = backend.open(SessionParameters::default(), None);

        // Assert
        assert!(matches!(result, Err(CaptureError::DeviceNotFound(ref e)) if e == "kinect:0"));
        assert!(backend.opened().is_empty());
        assert_eq!(backend.open_count(), 0);
    }

    #[test]
    fn test_plug_in_restores_endpoint() {
        let backend = SimulatedCaptureBackend::new("kinect:0");
        backend.unplug("kinect:0");
        backend.plug_in("kinect:0");

        assert!(backend.open(SessionParameters::default(), None).is_ok());
    }

    #[test]
    fn test_close_twice_is_reported() {
        let backend = SimulatedCaptureBackend::recording("kinect:0");
        let mut device = backend.open(SessionParameters::default(), None).unwrap();

        device.close().unwrap();
        let second = device.close();

        assert!(matches!(second, Err(CaptureError::Platform(_))));
        assert_eq!(backend.closed(), vec!["kinect:0".to_string()]);
    }

    #[test]
    fn test_live_devices_tracks_open_minus_closed() {
        let backend = SimulatedCaptureBackend::new("kinect:0");
        let mut a = backend.open(SessionParameters::default(), None).unwrap();
        let _b = backend.open(SessionParameters::default(), None).unwrap();
        assert_eq!(backend.live_devices(), 2);

        a.close().unwrap();

        assert_eq!(backend.live_devices(), 1);
    }

    #[test]
    fn test_counting_backend_keeps_no_history_across_many_cycles() {
        // Arrange
        let backend = SimulatedCaptureBackend::new("kinect:0");
        assert!(!backend.is_recording());

        // Act
        for _ in 0..10_000 {
            let mut device = backend.open(SessionParameters::default(), None).unwrap();
            device.close().unwrap();
        }

        // Assert
        assert_eq!(backend.live_devices(), 0);
        assert_eq!(backend.open_count(), 10_000);
        assert_eq!(backend.close_count(), 10_000);
        assert!(backend.opened().is_empty());
        assert!(backend.closed().is_empty());
    }

    #[test]
    fn test_recording_backend_keeps_history_in_order() {
        let backend = SimulatedCaptureBackend::recording("kinect:0");
        let mut a = backend.open(SessionParameters::default(), None).unwrap();
        let mut b = backend
            .open(
                SessionParameters::default(),
                Some(LocalEndpoint::parse("kinect:1").unwrap()),
            )
            .unwrap();

        b.close().unwrap();
        a.close().unwrap();

        assert_eq!(backend.closed(), vec!["kinect:1".to_string(), "kinect:0".to_string()]);
        assert_eq!(backend.opened().len(), 2);
    }
}
