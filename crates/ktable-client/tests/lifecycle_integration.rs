//! Integration tests for the client connection lifecycle.
//!
//! # Purpose
//!
//! These tests drive the `ConnectionFactory` through its public API the same
//! way an application or the FFI layer does.  They verify:
//!
//! - The happy path for all three connect entry points, each followed by a
//!   single disconnect that releases the underlying resource.
//! - Failure paths: an unplugged device, a refused remote host, and a remote
//!   connect that times out all surface as `ConnectError` instead of a
//!   half-working client.  Remote failures use a connector double or a closed
//!   loopback port, never a routable address.
//! - The end-to-end scenario of connecting, adjusting the depth tweak, and
//!   disconnecting.
//!
//! ```text
//! caller                     ConnectionFactory            collaborator
//! ──────                     ─────────────────            ────────────
//! connect_local(params) ──►  open_local ───────────────►  CaptureBackend::open
//!                       ◄──  Client::Local  ◄──────────   CaptureDevice
//! disconnect(client)    ──►  teardown  ────────────────►  CaptureDevice::close
//! ```

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ktable_client::infrastructure::{
    build_factory, capture::simulated::SimulatedCaptureBackend, network::TcpConnector,
};
use ktable_client::{
    disconnect, ClientConfig, ClientKind, ConnectError, ConnectionFactory, RemoteConnector,
    RemoteLink, TransportError,
};
use ktable_core::{depth_tweak, set_depth_tweak, DataTypes, RemoteAddress, SessionParameters};

/// How a [`FailingConnector`] fails.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Refused,
    TimedOut,
}

/// Remote connector that never reaches the network and always fails.
struct FailingConnector {
    failure: Failure,
    attempts: Mutex<Vec<String>>,
}

impl FailingConnector {
    fn new(failure: Failure) -> Self {
        Self {
            failure,
            attempts: Mutex::new(Vec::new()),
        }
    }
}

impl RemoteConnector for FailingConnector {
    fn connect(
        &self,
        _params: SessionParameters,
        address: &RemoteAddress,
    ) -> Result<Box<dyn RemoteLink>, TransportError> {
        let addr = address.to_string();
        self.attempts.lock().unwrap().push(addr.clone());
        Err(match self.failure {
            Failure::Refused => TransportError::Unreachable {
                addr,
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            },
            Failure::TimedOut => TransportError::TimedOut {
                addr,
                timeout: Duration::from_millis(300),
            },
        })
    }
}

/// Factory whose remote connector always fails with `failure`.
fn failing_factory(failure: Failure) -> (ConnectionFactory, Arc<FailingConnector>) {
    let connector = Arc::new(FailingConnector::new(failure));
    let factory = ConnectionFactory::new(
        Arc::new(SimulatedCaptureBackend::new("kinect:0")),
        Arc::clone(&connector) as Arc<dyn RemoteConnector>,
    );
    (factory, connector)
}

/// Builds a factory around `backend` with a short remote connect timeout.
fn factory_with(backend: &SimulatedCaptureBackend) -> ConnectionFactory {
    ConnectionFactory::new(
        Arc::new(backend.clone()),
        Arc::new(TcpConnector::new(Duration::from_millis(300))),
    )
}

#[test]
fn test_connect_local_default_then_disconnect_releases_device() {
    // Arrange
    let backend = SimulatedCaptureBackend::recording("kinect:0");
    let factory = factory_with(&backend);

    // Act
    let client = factory
        .connect_local(&SessionParameters::default())
        .expect("local connect");
    assert_eq!(backend.live_devices(), 1);
    disconnect(client);

    // Assert
    assert_eq!(backend.live_devices(), 0);
    assert_eq!(backend.closed(), vec!["kinect:0".to_string()]);
}

#[test]
fn test_connect_local_for_various_params_always_disconnects_cleanly() {
    let backend = SimulatedCaptureBackend::recording("kinect:0");
    let factory = factory_with(&backend);
    let param_sets = [
        SessionParameters::default(),
        SessionParameters::new(DataTypes::DEPTH),
        SessionParameters::new(DataTypes::ALL).with_max_fps(30),
        SessionParameters::new(u32::MAX).with_max_fps(u32::MAX),
    ];

    for params in param_sets {
        let default_client = factory.connect_local(&params).expect("default endpoint");
        let explicit_client = factory
            .connect_local_at(&params, "kinect:1")
            .expect("explicit endpoint");

        assert_eq!(*default_client.session(), params);
        assert_eq!(explicit_client.address(), "kinect:1");

        disconnect(default_client);
        disconnect(explicit_client);
    }

    assert_eq!(backend.live_devices(), 0);
    assert_eq!(backend.opened().len(), 8);
}

#[test]
fn test_two_local_devices_can_be_open_at_once() {
    let backend = SimulatedCaptureBackend::new("kinect:0");
    let factory = factory_with(&backend);

    let a = factory
        .connect_local_at(&SessionParameters::default(), "kinect:0")
        .unwrap();
    let b = factory
        .connect_local_at(&SessionParameters::default(), "kinect:1")
        .unwrap();

    assert_ne!(a.id(), b.id());
    assert_eq!(backend.live_devices(), 2);
}

#[test]
fn test_unplugged_device_surfaces_capture_error() {
    // Arrange
    let backend = SimulatedCaptureBackend::new("kinect:0");
    backend.unplug("kinect:0");
    let factory = factory_with(&backend);

    // Act
    let result = factory.connect_local(&SessionParameters::default());

    // Assert
    assert!(matches!(result, Err(ConnectError::Capture(_))));
    assert_eq!(backend.live_devices(), 0);
}

#[test]
fn test_connect_remote_to_listening_host_then_disconnect() {
    // Arrange
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let factory = factory_with(&SimulatedCaptureBackend::new("kinect:0"));

    // Act
    let client = factory
        .connect_remote(&SessionParameters::default(), &format!("127.0.0.1:{port}"))
        .expect("remote connect");

    // Assert
    assert_eq!(client.kind(), ClientKind::Remote);
    assert_eq!(client.address(), format!("127.0.0.1:{port}"));
    disconnect(client);
}

#[test]
fn test_connect_remote_refused_surfaces_unreachable() {
    // Arrange
    let (factory, connector) = failing_factory(Failure::Refused);

    // Act
    let result = factory.connect_remote(&SessionParameters::default(), "10.0.0.5:9000");

    // Assert
    assert!(matches!(
        result,
        Err(ConnectError::Transport(TransportError::Unreachable { ref addr, .. })) if addr == "10.0.0.5:9000"
    ));
    assert_eq!(*connector.attempts.lock().unwrap(), vec!["10.0.0.5:9000".to_string()]);
}

#[test]
fn test_connect_remote_timeout_surfaces_timed_out() {
    let (factory, _connector) = failing_factory(Failure::TimedOut);

    let result = factory.connect_remote(&SessionParameters::default(), "10.0.0.5:9000");

    assert!(matches!(
        result,
        Err(ConnectError::Transport(TransportError::TimedOut { .. }))
    ));
}

#[test]
fn test_connect_remote_to_closed_loopback_port_is_unreachable() {
    // Arrange – bind then drop so the port is known to be closed.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().unwrap().port()
    };
    let factory = factory_with(&SimulatedCaptureBackend::new("kinect:0"));

    // Act
    let result = factory.connect_remote(&SessionParameters::default(), &format!("127.0.0.1:{port}"));

    // Assert
    assert!(matches!(
        result,
        Err(ConnectError::Transport(TransportError::Unreachable { .. }))
    ));
}

#[test]
fn test_scenario_connect_tweak_disconnect() {
    // Arrange
    let factory = build_factory(&ClientConfig::default());

    // Act / Assert – step by step.
    let h1 = factory
        .connect_local(&SessionParameters::default())
        .expect("connect");
    assert_eq!(depth_tweak(), 25);
    set_depth_tweak(40);
    assert_eq!(depth_tweak(), 40);
    disconnect(h1);
}
