//! C ABI export boundary for the KinectTable client.
//!
//! Builds as a `cdylib` for C, C++, and managed hosts, and as an `rlib` so the
//! same functions can be exercised from Rust tests.
//!
//! # Exported symbols
//!
//! | Symbol                      | Returns                                      |
//! |-----------------------------|----------------------------------------------|
//! | `ktable_get_depth_tweak`    | current calibration integer                  |
//! | `ktable_set_depth_tweak`    | nothing                                      |
//! | `ktable_connect_local`      | client handle, or 0 on failure               |
//! | `ktable_connect_local_at`   | client handle, or 0 on failure               |
//! | `ktable_connect_remote`     | client handle, or 0 on failure               |
//! | `ktable_disconnect`         | `KTABLE_OK` or a failure status              |
//! | `ktable_last_error_length`  | bytes needed for the last error, incl. NUL   |
//! | `ktable_last_error_message` | bytes copied, or -1                          |
//! | `ktable_init_logging`       | `KTABLE_OK`, or 1 if a logger already exists |
//!
//! # How a C caller uses this (for beginners)
//!
//! ```text
//! KTableSessionParameters p = { KTABLE_DATA_ALL, 0 };
//! uint64_t h = ktable_connect_local(&p);
//! if (h == 0) {
//!     char msg[256];
//!     ktable_last_error_message(msg, sizeof msg);
//!     /* report msg */
//! }
//! ...
//! ktable_disconnect(h);   /* exactly once */
//! ```
//!
//! Handles are plain integers, never pointers.  See [`handles`] for how stale
//! and repeated handles are detected.
//!
//! # Factory
//!
//! The first connect call builds the process-wide `ConnectionFactory` from the
//! user's config file (`KTABLE_CONFIG` or the platform default).  A config
//! that cannot be read logs a warning and the built-in defaults are used; see
//! [`settings`].

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use ktable_client::infrastructure::build_factory;
use ktable_client::{Client, ClientConfig, ConnectError, ConnectionFactory};
use ktable_core::{depth_tweak, set_depth_tweak, SessionParameters};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

pub mod handles;
pub mod last_error;
pub mod settings;

pub use handles::{KTableHandle, NULL_HANDLE};

// ── Status codes ──────────────────────────────────────────────────────────────

/// The call succeeded.
pub const KTABLE_OK: i32 = 0;
/// `ktable_disconnect` was given the null handle; nothing happened.
pub const KTABLE_NULL_HANDLE: i32 = -1;
/// The handle is not live: already disconnected, or never issued.
pub const KTABLE_UNKNOWN_HANDLE: i32 = -2;
/// The handle was released, but tearing the client down panicked.
pub const KTABLE_TEARDOWN_FAILED: i32 = -3;

static FACTORY: OnceLock<ConnectionFactory> = OnceLock::new();

/// Configuration in effect for this process (Rust callers only).
pub fn client_config() -> &'static ClientConfig {
    settings::settings().config()
}

fn factory() -> &'static ConnectionFactory {
    FACTORY.get_or_init(|| build_factory(client_config()))
}

/// Runs one connect attempt and converts the outcome to a handle.
fn connect_with(
    attempt: impl FnOnce(&ConnectionFactory) -> Result<Client, ConnectError>,
) -> KTableHandle {
    match panic::catch_unwind(AssertUnwindSafe(|| attempt(factory()))) {
        Ok(Ok(client)) => {
            last_error::clear();
            handles::insert(client)
        }
        Ok(Err(e)) => {
            last_error::set(&e);
            NULL_HANDLE
        }
        Err(_) => {
            error!("connect panicked; returning the null handle");
            last_error::set_message("internal error: connect panicked");
            NULL_HANDLE
        }
    }
}

/// Reads the caller's parameters, recording a last error when the pointer is null.
///
/// # Safety
///
/// `params` must be null or point to a valid `SessionParameters`.
unsafe fn read_params(params: *const SessionParameters) -> Option<SessionParameters> {
    if params.is_null() {
        last_error::set_message("session parameters pointer is null");
        return None;
    }
    // SAFETY: non-null and valid per the caller's contract; the type is Copy.
    Some(unsafe { *params })
}

/// Reads a NUL-terminated UTF-8 string, recording a last error on failure.
///
/// # Safety
///
/// `s` must be null or point to a NUL-terminated string.
unsafe fn read_str<'a>(s: *const c_char, what: &str) -> Option<&'a str> {
    if s.is_null() {
        last_error::set_message(format!("{what} pointer is null"));
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    match unsafe { CStr::from_ptr(s) }.to_str() {
        Ok(text) => Some(text),
        Err(e) => {
            last_error::set_message(format!("{what} is not valid UTF-8: {e}"));
            None
        }
    }
}

// ── Calibration ───────────────────────────────────────────────────────────────

/// Returns the process-wide table depth tweak (25 until first set).
#[no_mangle]
pub extern "C" fn ktable_get_depth_tweak() -> i32 {
    depth_tweak()
}

/// Replaces the process-wide table depth tweak.  Any value is accepted.
#[no_mangle]
pub extern "C" fn ktable_set_depth_tweak(value: i32) {
    set_depth_tweak(value);
}

// ── Connect / disconnect ──────────────────────────────────────────────────────

/// Connects to the default local camera.  Returns 0 on failure.
///
/// # Safety
///
/// `params` must be null or point to a valid `SessionParameters`.
#[no_mangle]
pub unsafe extern "C" fn ktable_connect_local(params: *const SessionParameters) -> KTableHandle {
    // SAFETY: forwarded caller contract.
    let Some(params) = (unsafe { read_params(params) }) else {
        return NULL_HANDLE;
    };
    connect_with(|f| f.connect_local(&params))
}

/// Connects to the local camera named by `endpoint`.  Returns 0 on failure.
///
/// # Safety
///
/// `params` must be null or point to a valid `SessionParameters`; `endpoint`
/// must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ktable_connect_local_at(
    params: *const SessionParameters,
    endpoint: *const c_char,
) -> KTableHandle {
    // SAFETY: forwarded caller contract.
    let Some(params) = (unsafe { read_params(params) }) else {
        return NULL_HANDLE;
    };
    let Some(endpoint) = (unsafe { read_str(endpoint, "endpoint") }) else {
        return NULL_HANDLE;
    };
    connect_with(|f| f.connect_local_at(&params, endpoint))
}

/// Connects to the remote table host at `address`.  Returns 0 on failure.
///
/// Blocks for at most the configured connect timeout.
///
/// # Safety
///
/// `params` must be null or point to a valid `SessionParameters`; `address`
/// must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ktable_connect_remote(
    params: *const SessionParameters,
    address: *const c_char,
) -> KTableHandle {
    // SAFETY: forwarded caller contract.
    let Some(params) = (unsafe { read_params(params) }) else {
        return NULL_HANDLE;
    };
    let Some(address) = (unsafe { read_str(address, "address") }) else {
        return NULL_HANDLE;
    };
    connect_with(|f| f.connect_remote(&params, address))
}

/// Tears down the client behind `handle`.
///
/// | Status                   | Meaning                                          |
/// |--------------------------|--------------------------------------------------|
/// | `KTABLE_OK`              | client torn down                                 |
/// | `KTABLE_NULL_HANDLE`     | handle was 0; nothing happened                   |
/// | `KTABLE_UNKNOWN_HANDLE`  | handle not live; nothing freed                   |
/// | `KTABLE_TEARDOWN_FAILED` | handle released, but teardown panicked           |
///
/// A repeated disconnect is harmless but never reported as success.  Every
/// status other than `KTABLE_OK` sets the last error, except the null handle.
#[no_mangle]
pub extern "C" fn ktable_disconnect(handle: KTableHandle) -> i32 {
    if handle == NULL_HANDLE {
        return KTABLE_NULL_HANDLE;
    }
    // The table lock is released before teardown, which may block on I/O.
    let Some(client) = handles::remove(handle) else {
        error!(handle, "disconnect of a handle that is not live");
        last_error::set_message(format!("handle {handle} is not a live client"));
        return KTABLE_UNKNOWN_HANDLE;
    };
    match panic::catch_unwind(AssertUnwindSafe(|| client.disconnect())) {
        Ok(()) => KTABLE_OK,
        Err(_) => {
            error!(handle, "teardown panicked");
            last_error::set_message(format!("teardown of handle {handle} panicked"));
            KTABLE_TEARDOWN_FAILED
        }
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Bytes needed to hold this thread's last error including its NUL, or 0.
#[no_mangle]
pub extern "C" fn ktable_last_error_length() -> usize {
    last_error::required_len()
}

/// Copies this thread's last error into `buf` (truncating to `len - 1`
/// bytes, always NUL-terminated).  Returns the bytes written excluding the
/// NUL, or -1 when there is no error or `buf` is unusable.
///
/// # Safety
///
/// `buf` must be null or valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn ktable_last_error_message(buf: *mut c_char, len: usize) -> isize {
    // SAFETY: forwarded caller contract.
    unsafe { last_error::copy_into(buf, len) }
}

/// Installs a `tracing` subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG`, else the config's `[logging] level`.
/// Returns `KTABLE_OK` on install, or 1 when a global subscriber already
/// exists (the call is then a no-op).
///
/// Reading the level loads the config, which may happen before any
/// subscriber exists; a config load failure is therefore logged again once
/// this subscriber is installed.
#[no_mangle]
pub extern "C" fn ktable_init_logging() -> i32 {
    let settings = settings::settings();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.config().logging.level));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => {
            if let Some(e) = settings.load_error() {
                warn!("using default client config: {e}");
            }
            KTABLE_OK
        }
        Err(_) => 1,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ktable_client::infrastructure::network::TcpConnector;
    use ktable_client::{CaptureBackend, CaptureDevice, CaptureError};
    use ktable_core::LocalEndpoint;

    /// Device whose close panics, standing in for a misbehaving driver.
    struct PanickingDevice;

    impl CaptureDevice for PanickingDevice {
        fn endpoint(&self) -> &str {
            "kinect:broken"
        }

        fn close(&mut self) -> Result<(), CaptureError> {
            panic!("driver crashed during close");
        }
    }

    struct PanickingBackend;

    impl CaptureBackend for PanickingBackend {
        fn open(
            &self,
            _params: SessionParameters,
            _endpoint: Option<LocalEndpoint>,
        ) -> Result<Box<dyn CaptureDevice>, CaptureError> {
            Ok(Box::new(PanickingDevice))
        }
    }

    #[test]
    fn test_disconnect_reports_panicking_teardown() {
        // Arrange
        let factory = ConnectionFactory::new(
            Arc::new(PanickingBackend),
            Arc::new(TcpConnector::default()),
        );
        let client = factory
            .connect_local(&SessionParameters::default())
            .expect("connect");
        let handle = handles::insert(client);

        // Act
        let status = ktable_disconnect(handle);

        // Assert
        assert_eq!(status, KTABLE_TEARDOWN_FAILED);
        assert!(last_error::get().is_some_and(|e| e.contains("panicked")));
        assert!(handles::remove(handle).is_none());
        assert_eq!(ktable_disconnect(handle), KTABLE_UNKNOWN_HANDLE);
    }
}
