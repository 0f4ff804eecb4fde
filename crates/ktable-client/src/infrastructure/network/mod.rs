//! Network infrastructure for remote clients.
//!
//! Opens the TCP session a `RemoteClient` holds to a remote table host.
//!
//! Architecture:
//! - `TcpConnector` implements `RemoteConnector`.  Each `connect` builds a
//!   current-thread Tokio runtime, resolves and connects under a timeout, and
//!   returns a `TcpSession` that owns both the runtime and the stream.
//! - `TcpSession` implements `RemoteLink`.  Shutdown performs an orderly
//!   write-side close, then drops the stream and the runtime.
//!
//! Frame streaming on top of the session belongs to the remote protocol layer
//! and is not done here.
//!
//! # Blocking
//!
//! `connect` and `shutdown` call `Runtime::block_on`, which panics when
//! invoked from inside another Tokio runtime.  They are meant for the
//! synchronous client API only.

use std::time::Duration;

use ktable_core::{RemoteAddress, SessionParameters};
use tokio::{io::AsyncWriteExt, net::TcpStream, runtime::Runtime, time};
use tracing::{debug, info};

use crate::application::transport::{RemoteConnector, RemoteLink, TransportError};

/// Default bound on how long a remote connect may take.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens TCP sessions to remote table hosts.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Duration,
}

impl TcpConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl RemoteConnector for TcpConnector {
    fn connect(
        &self,
        params: SessionParameters,
        address: &RemoteAddress,
    ) -> Result<Box<dyn RemoteLink>, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;

        let peer = address.to_string();
        let timeout = self.connect_timeout;
        debug!(%peer, ?timeout, ?params, "opening TCP session");

        let stream = runtime.block_on(async {
            match time::timeout(timeout, TcpStream::connect((address.host(), address.port())))
                .await
            {
                Ok(Ok(stream)) => Ok(stream),
                Ok(Err(source)) => Err(TransportError::Unreachable {
                    addr: peer.clone(),
                    source,
                }),
                Err(_) => Err(TransportError::TimedOut {
                    addr: peer.clone(),
                    timeout,
                }),
            }
        })?;

        // Frame traffic is latency sensitive; Nagle only adds delay.
        if let Err(e) = stream.set_nodelay(true) {
            debug!(%peer, "could not disable Nagle: {e}");
        }
        info!(%peer, "TCP session established");

        Ok(Box::new(TcpSession {
            peer,
            stream: Some(stream),
            runtime,
        }))
    }
}

/// An established TCP session to a remote table host.
///
/// Field order matters: the stream must drop before the runtime that owns its
/// I/O driver.
pub struct TcpSession {
    peer: String,
    stream: Option<TcpStream>,
    runtime: Runtime,
}

impl RemoteLink for TcpSession {
    fn peer(&self) -> &str {
        &self.peer
    }

    fn shutdown(&mut self) -> Result<(), TransportError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        let result = self.runtime.block_on(async move { stream.shutdown().await });
        debug!(peer = %self.peer, "TCP session closed");
        match result {
            Ok(()) => Ok(()),
            // The peer already went away; the socket is released either way.
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn test_default_connect_timeout_is_five_seconds() {
        assert_eq!(TcpConnector::default().connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_connect_to_listening_host_then_shutdown_sends_eof() {
        // Arrange – a plain blocking listener on an ephemeral port.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let address = RemoteAddress::parse(&format!("127.0.0.1:{port}"), 9000).unwrap();
        let connector = TcpConnector::new(Duration::from_secs(2));

        // Act
        let mut link = connector
            .connect(SessionParameters::default(), &address)
            .expect("connect");
        let (mut accepted, _) = listener.accept().expect("accept");
        link.shutdown().expect("shutdown");

        // Assert – the server side observes end-of-stream.
        let mut buf = [0u8; 8];
        let n = accepted.read(&mut buf).expect("read");
        assert_eq!(n, 0);
        assert_eq!(link.peer(), format!("127.0.0.1:{port}"));
    }

    #[test]
    fn test_connect_to_closed_port_is_unreachable() {
        // Arrange – bind then drop so the port is known to be closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().unwrap().port()
        };
        let address = RemoteAddress::parse(&format!("127.0.0.1:{port}"), 9000).unwrap();

        // Act
        let result = TcpConnector::new(Duration::from_secs(2))
            .connect(SessionParameters::default(), &address);

        // Assert
        assert!(matches!(result, Err(TransportError::Unreachable { .. })));
    }

    #[test]
    fn test_second_shutdown_is_a_no_op() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let address = RemoteAddress::parse(&format!("127.0.0.1:{port}"), 9000).unwrap();
        let mut link = TcpConnector::default()
            .connect(SessionParameters::default(), &address)
            .expect("connect");

        link.shutdown().expect("first shutdown");

        assert!(link.shutdown().is_ok());
    }
}
