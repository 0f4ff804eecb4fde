//! Application layer for the table client.
//!
//! # What lives here?
//!
//! - **`transport`** – The two collaborator seams: [`CaptureBackend`] for a
//!   locally attached camera and [`RemoteConnector`] for a camera owned by
//!   another machine.  Implementations live in the infrastructure layer and
//!   are injected at construction time.
//!
//! - **`client`** – The [`Client`] handle and its two variants.  Each variant
//!   owns its collaborator resource and releases it exactly once.
//!
//! - **`connect`** – The [`ConnectionFactory`] with the three connect entry
//!   points, and [`disconnect`].
//!
//! [`CaptureBackend`]: transport::CaptureBackend
//! [`RemoteConnector`]: transport::RemoteConnector
//! [`Client`]: client::Client
//! [`ConnectionFactory`]: connect::ConnectionFactory
//! [`disconnect`]: connect::disconnect

pub mod client;
pub mod connect;
pub mod transport;
