//! The client handle and its two variants.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//!   ConnectionFactory::connect_*  ──►  Connected  ──►  Disconnected
//!            │                                          (terminal)
//!            └──► Err(ConnectError)   (no client exists)
//! ```
//!
//! There is no "connecting" state visible to the caller: the factory either
//! returns a fully connected [`Client`] or an error.  A [`Client`] is an owned
//! value, so the compiler enforces single ownership.  Passing it to
//! [`disconnect`](super::connect::disconnect) consumes it, which makes a second
//! disconnect or any use after disconnect a compile error.
//!
//! Each variant holds its collaborator resource in an `Option` and takes it
//! out on teardown.  Teardown runs from `disconnect` and again from `Drop`;
//! the second run finds `None` and does nothing, so every successfully
//! constructed client releases its resource exactly once, even if the caller
//! simply lets it go out of scope.

use ktable_core::{LocalEndpoint, RemoteAddress, SessionParameters};
use tracing::{info, warn};
use uuid::Uuid;

use super::transport::{CaptureDevice, RemoteLink};

/// Unique identifier assigned to every client at construction.
pub type ClientId = Uuid;

/// Which connection strategy produced a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    Local,
    Remote,
}

/// A connected table client.
///
/// Closed set of variants: a camera on this machine, or a session to a
/// machine that owns one.
#[derive(Debug)]
pub enum Client {
    Local(LocalClient),
    Remote(RemoteClient),
}

impl Client {
    pub fn id(&self) -> ClientId {
        match self {
            Client::Local(c) => c.id,
            Client::Remote(c) => c.id,
        }
    }

    pub fn kind(&self) -> ClientKind {
        match self {
            Client::Local(_) => ClientKind::Local,
            Client::Remote(_) => ClientKind::Remote,
        }
    }

    /// The parameters this client was connected with.
    pub fn session(&self) -> &SessionParameters {
        match self {
            Client::Local(c) => &c.session,
            Client::Remote(c) => &c.session,
        }
    }

    /// Human-readable address: the device endpoint or the remote `host:port`.
    pub fn address(&self) -> String {
        match self {
            Client::Local(c) => c.endpoint.clone(),
            Client::Remote(c) => c.address.to_string(),
        }
    }

    /// Releases every resource held by the client.
    pub fn disconnect(self) {
        let id = self.id();
        let kind = self.kind();
        match self {
            Client::Local(mut c) => c.teardown(),
            Client::Remote(mut c) => c.teardown(),
        }
        info!(client_id = %id, ?kind, "client disconnected");
    }
}

// ── LocalClient ───────────────────────────────────────────────────────────────

/// A client attached to a capture device on this machine.
pub struct LocalClient {
    id: ClientId,
    session: SessionParameters,
    /// Endpoint the caller asked for; `None` means "backend default".
    requested: Option<LocalEndpoint>,
    /// Endpoint the device actually opened on.
    endpoint: String,
    device: Option<Box<dyn CaptureDevice>>,
}

impl LocalClient {
    pub(crate) fn new(
        session: SessionParameters,
        requested: Option<LocalEndpoint>,
        device: Box<dyn CaptureDevice>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session,
            requested,
            endpoint: device.endpoint().to_string(),
            device: Some(device),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn requested_endpoint(&self) -> Option<&LocalEndpoint> {
        self.requested.as_ref()
    }

    pub fn session(&self) -> &SessionParameters {
        &self.session
    }

    fn teardown(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.close() {
                warn!(client_id = %self.id, endpoint = %self.endpoint, "capture device close failed: {e}");
            }
        }
    }
}

impl Drop for LocalClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for LocalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalClient")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("requested", &self.requested)
            .field("open", &self.device.is_some())
            .finish()
    }
}

// ── RemoteClient ──────────────────────────────────────────────────────────────

/// A client holding a session to a remote table host.
pub struct RemoteClient {
    id: ClientId,
    session: SessionParameters,
    address: RemoteAddress,
    link: Option<Box<dyn RemoteLink>>,
}

impl RemoteClient {
    pub(crate) fn new(
        session: SessionParameters,
        address: RemoteAddress,
        link: Box<dyn RemoteLink>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session,
            address,
            link: Some(link),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn address(&self) -> &RemoteAddress {
        &self.address
    }

    pub fn session(&self) -> &SessionParameters {
        &self.session
    }

    fn teardown(&mut self) {
        if let Some(mut link) = self.link.take() {
            if let Err(e) = link.shutdown() {
                warn!(client_id = %self.id, peer = link.peer(), "remote session shutdown failed: {e}");
            }
        }
    }
}

impl Drop for RemoteClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("open", &self.link.is_some())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
