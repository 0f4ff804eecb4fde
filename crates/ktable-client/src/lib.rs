//! ktable-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`,
//! the `ktable` diagnostic binary, and the `ktable-ffi` export crate share the
//! same module tree.
//!
//! # What does ktable-client do? (for beginners)
//!
//! An application that wants to react to arms and hands over the table needs
//! a *client*: a live connection to a table camera.  There are two ways to
//! get one:
//!
//! 1. **Local** – the camera is plugged into this machine.  The client opens
//!    the capture device through a [`CaptureBackend`].
//! 2. **Remote** – another machine owns the camera.  The client opens a TCP
//!    session to that machine through a [`RemoteConnector`].
//!
//! Either way the caller receives the same [`Client`] type and gives it back
//! to [`disconnect`] exactly once when done.  The [`ConnectionFactory`] hides
//! which of the two strategies produced the client.
//!
//! ```no_run
//! use ktable_client::{disconnect, infrastructure, ClientConfig};
//! use ktable_core::SessionParameters;
//!
//! let factory = infrastructure::build_factory(&ClientConfig::default());
//! let client = factory.connect_local(&SessionParameters::default())?;
//! println!("attached to {}", client.address());
//! disconnect(client);
//! # Ok::<(), ktable_client::ConnectError>(())
//! ```

/// Application layer: client lifecycle, factory, and collaborator traits.
pub mod application;

/// Infrastructure layer: capture backends, TCP sessions, and config storage.
pub mod infrastructure;

pub use application::client::{Client, ClientId, ClientKind, LocalClient, RemoteClient};
pub use application::connect::{disconnect, ConnectError, ConnectionFactory, DEFAULT_REMOTE_PORT};
pub use application::transport::{
    CaptureBackend, CaptureDevice, CaptureError, RemoteConnector, RemoteLink, TransportError,
};
pub use infrastructure::storage::config::{ClientConfig, ConfigError};
