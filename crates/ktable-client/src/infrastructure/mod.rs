//! Infrastructure layer for the table client.
//!
//! Contains the adapters behind the application-layer seams: capture
//! backends, the TCP session used by remote clients, and config storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `ktable_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`capture`** – Implementations of `CaptureBackend`.  The
//!   `SimulatedCaptureBackend` is always compiled; it stands in for a driver
//!   and records every open and close so tests can inspect them.
//!
//! - **`network`** – `TcpConnector`, which opens a TCP session to a remote
//!   table host with a bounded connect timeout.
//!
//! - **`storage`** – TOML configuration (`ClientConfig`) load and save.

use std::sync::Arc;

use crate::application::connect::ConnectionFactory;

pub mod capture;
pub mod network;
pub mod storage;

use capture::simulated::SimulatedCaptureBackend;
use network::TcpConnector;
use storage::config::ClientConfig;

/// Wires the default adapters into a [`ConnectionFactory`] according to
/// `config`.
pub fn build_factory(config: &ClientConfig) -> ConnectionFactory {
    let capture = Arc::new(SimulatedCaptureBackend::new(
        config.local.default_endpoint.clone(),
    ));
    let remote = Arc::new(TcpConnector::new(config.remote.connect_timeout()));
    ConnectionFactory::new(capture, remote).with_default_port(config.remote.default_port)
}
