//! ConnectionFactory: the three connect entry points and `disconnect`.
//!
//! The factory hides the local-vs-remote distinction behind one return type,
//! so callers treat a table connection the same way regardless of transport.
//!
//! | Entry point                        | Produces                             |
//! |------------------------------------|--------------------------------------|
//! | [`ConnectionFactory::connect_local`]    | `LocalClient` on the default device |
//! | [`ConnectionFactory::connect_local_at`] | `LocalClient` on a named device     |
//! | [`ConnectionFactory::connect_remote`]   | `RemoteClient` to `host:port`       |
//!
//! The explicit-endpoint local variant exists for machines with more than one
//! camera attached.
//!
//! # Failure contract
//!
//! Every failure of the underlying collaborator surfaces as a
//! [`ConnectError`]; the factory never hands back a client that is not fully
//! connected.  There is no retry here: a caller that wants to retry calls the
//! factory again.
//!
//! # Blocking
//!
//! All entry points are synchronous and run on the calling thread.  The remote
//! connect drives its own I/O runtime internally, so it must not be called
//! from inside an async task.

use std::num::NonZeroU16;
use std::sync::Arc;

use ktable_core::{AddressError, LocalEndpoint, RemoteAddress, SessionParameters};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::client::{Client, LocalClient, RemoteClient};
use super::transport::{CaptureBackend, CaptureError, RemoteConnector, TransportError};

/// Port assumed when a remote address does not name one.
pub const DEFAULT_REMOTE_PORT: NonZeroU16 = match NonZeroU16::new(9000) {
    Some(port) => port,
    None => unreachable!(),
};

/// A connection attempt failed; no client was created.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The local endpoint string can never name a device.
    #[error("invalid local endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: AddressError,
    },
    /// The remote address string is malformed.
    #[error("invalid remote address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },
    /// The capture backend could not open the device.
    #[error("local capture failed: {0}")]
    Capture(#[from] CaptureError),
    /// The remote host could not be reached.
    #[error("remote connection failed: {0}")]
    Transport(#[from] TransportError),
}

/// Builds clients from an injected capture backend and remote connector.
#[derive(Clone)]
pub struct ConnectionFactory {
    capture: Arc<dyn CaptureBackend>,
    remote: Arc<dyn RemoteConnector>,
    default_port: NonZeroU16,
}

impl ConnectionFactory {
    /// Creates a factory using [`DEFAULT_REMOTE_PORT`] for port-less addresses.
    pub fn new(capture: Arc<dyn CaptureBackend>, remote: Arc<dyn RemoteConnector>) -> Self {
        Self {
            capture,
            remote,
            default_port: DEFAULT_REMOTE_PORT,
        }
    }

    /// Returns a factory that applies `port` to remote addresses without one.
    ///
    /// Port 0 is unrepresentable here, matching the rejection of an explicit
    /// `host:0` by the address parser.
    pub fn with_default_port(self, port: NonZeroU16) -> Self {
        Self {
            default_port: port,
            ..self
        }
    }

    pub fn default_port(&self) -> NonZeroU16 {
        self.default_port
    }

    /// Attaches to the capture backend's default local device.
    ///
    /// # Errors
    ///
    /// [`ConnectError::Capture`] if the backend cannot open its default device.
    pub fn connect_local(&self, params: &SessionParameters) -> Result<Client, ConnectError> {
        self.open_local(*params, None)
    }

    /// Attaches to the local device named `local_address`.
    ///
    /// # Errors
    ///
    /// [`ConnectError::InvalidEndpoint`] if the name is empty or contains
    /// whitespace; [`ConnectError::Capture`] if the device cannot be opened.
    pub fn connect_local_at(
        &self,
        params: &SessionParameters,
        local_address: &str,
    ) -> Result<Client, ConnectError> {
        let endpoint =
            LocalEndpoint::parse(local_address).map_err(|source| ConnectError::InvalidEndpoint {
                endpoint: local_address.to_string(),
                source,
            })?;
        self.open_local(*params, Some(endpoint))
    }

    /// Opens a session to the table host at `remote_address`.
    ///
    /// # Errors
    ///
    /// [`ConnectError::InvalidAddress`] for a malformed address;
    /// [`ConnectError::Transport`] if the host is unreachable or times out.
    pub fn connect_remote(
        &self,
        params: &SessionParameters,
        remote_address: &str,
    ) -> Result<Client, ConnectError> {
        let address = RemoteAddress::parse(remote_address, self.default_port.get()).map_err(|source| {
            ConnectError::InvalidAddress {
                address: remote_address.to_string(),
                source,
            }
        })?;

        debug!(%address, ?params, "connecting to remote table host");
        let link = self.remote.connect(*params, &address).map_err(|e| {
            warn!(%address, "remote connect failed: {e}");
            ConnectError::from(e)
        })?;

        let client = RemoteClient::new(*params, address, link);
        info!(client_id = %client.id(), address = %client.address(), "remote client connected");
        Ok(Client::Remote(client))
    }

    fn open_local(
        &self,
        params: SessionParameters,
        endpoint: Option<LocalEndpoint>,
    ) -> Result<Client, ConnectError> {
        debug!(endpoint = ?endpoint, ?params, "opening local capture device");
        let device = self.capture.open(params, endpoint.clone()).map_err(|e| {
            warn!(endpoint = ?endpoint, "local capture open failed: {e}");
            ConnectError::from(e)
        })?;

        let client = LocalClient::new(params, endpoint, device);
        info!(client_id = %client.id(), endpoint = client.endpoint(), "local client connected");
        Ok(Client::Local(client))
    }
}

impl std::fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("default_port", &self.default_port)
            .finish_non_exhaustive()
    }
}

/// Releases `client` and everything it holds.
///
/// Takes the client by value: after this call the handle no longer exists,
/// so it cannot be disconnected twice or used afterwards.
pub fn disconnect(client: Client) {
    client.disconnect();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
