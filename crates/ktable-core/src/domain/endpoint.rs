//! Local endpoint names and remote addresses.
//!
//! A *local endpoint* names one capture device attached to this machine
//! (for example `kinect:0`, `kinect:1`).  Which names exist is up to the
//! capture backend; this module only rejects strings that can never be valid.
//!
//! A *remote address* is a `host:port` pair identifying another machine that
//! owns a table camera.  The accepted forms are:
//!
//! | Input                 | Host          | Port          |
//! |-----------------------|---------------|---------------|
//! | `10.0.0.5:9000`       | `10.0.0.5`    | `9000`        |
//! | `table-pc`            | `table-pc`    | default port  |
//! | `[fe80::1]:9000`      | `fe80::1`     | `9000`        |
//! | `::1`                 | `::1`         | default port  |
//!
//! Parsing never performs DNS or any other I/O.

use std::fmt;
use std::net::Ipv6Addr;

use thiserror::Error;

/// Reasons an endpoint or address string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address {0:?} contains whitespace")]
    Whitespace(String),
    #[error("invalid port in {0:?}")]
    InvalidPort(String),
    #[error("unterminated '[' in {0:?}")]
    UnterminatedBracket(String),
}

// ── LocalEndpoint ─────────────────────────────────────────────────────────────

/// Name of a locally attached capture device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalEndpoint(String);

impl LocalEndpoint {
    /// Validates `name` as an endpoint.
    ///
    /// # Errors
    ///
    /// [`AddressError::Empty`] for an empty string, [`AddressError::Whitespace`]
    /// if the name contains any whitespace.
    pub fn parse(name: &str) -> Result<Self, AddressError> {
        if name.is_empty() {
            return Err(AddressError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(AddressError::Whitespace(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── RemoteAddress ─────────────────────────────────────────────────────────────

/// A parsed `host:port` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteAddress {
    host: String,
    port: u16,
}

impl RemoteAddress {
    /// Parses `input`, using `default_port` when no port is given.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] for empty input, embedded whitespace, an
    /// unterminated IPv6 bracket, or a port that is not a number in
    /// `1..=65535`.
    pub fn parse(input: &str, default_port: u16) -> Result<Self, AddressError> {
        if input.is_empty() {
            return Err(AddressError::Empty);
        }
        if input.chars().any(char::is_whitespace) {
            return Err(AddressError::Whitespace(input.to_string()));
        }

        // Bracketed IPv6, with or without a port.
        if let Some(rest) = input.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| AddressError::UnterminatedBracket(input.to_string()))?;
            if host.is_empty() {
                return Err(AddressError::Empty);
            }
            let port = match tail {
                "" => default_port,
                _ => match tail.strip_prefix(':') {
                    Some(p) => parse_port(p, input)?,
                    None => return Err(AddressError::InvalidPort(input.to_string())),
                },
            };
            return Ok(Self {
                host: host.to_string(),
                port,
            });
        }

        // A bare IPv6 literal has several colons and no port.
        if input.parse::<Ipv6Addr>().is_ok() {
            return Ok(Self {
                host: input.to_string(),
                port: default_port,
            });
        }

        match input.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(AddressError::Empty);
                }
                Ok(Self {
                    host: host.to_string(),
                    port: parse_port(port, input)?,
                })
            }
            None => Ok(Self {
                host: input.to_string(),
                port: default_port,
            }),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(text: &str, input: &str) -> Result<u16, AddressError> {
    match text.parse::<u16>() {
        Ok(0) | Err(_) => Err(AddressError::InvalidPort(input.to_string())),
        Ok(port) => Ok(port),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_PORT: u16 = 9000;

    #[test]
    fn test_parse_host_and_port() {
        // Arrange / Act
        let addr = RemoteAddress::parse("10.0.0.5:9100", DEFAULT_PORT).unwrap();

        // Assert
        assert_eq!(addr.host(), "10.0.0.5");
        assert_eq!(addr.port(), 9100);
        assert_eq!(addr.to_string(), "10.0.0.5:9100");
    }

    #[test]
    fn test_parse_bare_host_uses_default_port() {
        let addr = RemoteAddress::parse("table-pc", DEFAULT_PORT).unwrap();

        assert_eq!(addr.host(), "table-pc");
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_bracketed_ipv6_with_port() {
        let addr = RemoteAddress::parse("[fe80::1]:7000", DEFAULT_PORT).unwrap();

        assert_eq!(addr.host(), "fe80::1");
        assert_eq!(addr.port(), 7000);
        assert_eq!(addr.to_string(), "[fe80::1]:7000");
    }

    #[test]
    fn test_parse_bare_ipv6_uses_default_port() {
        let addr = RemoteAddress::parse("::1", DEFAULT_PORT).unwrap();

        assert_eq!(addr.host(), "::1");
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_rejects_empty_and_whitespace() {
        assert_eq!(RemoteAddress::parse("", DEFAULT_PORT), Err(AddressError::Empty));
        assert!(matches!(
            RemoteAddress::parse("10.0.0.5 :9000", DEFAULT_PORT),
            Err(AddressError::Whitespace(_))
        ));
        assert_eq!(RemoteAddress::parse(":9000", DEFAULT_PORT), Err(AddressError::Empty));
    }

    #[test]
    fn test_parse_rejects_bad_ports() {
        for bad in ["host:", "host:0", "host:65536", "host:abc", "[::1]x"] {
            assert!(
                matches!(RemoteAddress::parse(bad, DEFAULT_PORT), Err(AddressError::InvalidPort(_))),
                "{bad} must be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_unterminated_bracket() {
        assert!(matches!(
            RemoteAddress::parse("[::1:9000", DEFAULT_PORT),
            Err(AddressError::UnterminatedBracket(_))
        ));
    }

    #[test]
    fn test_local_endpoint_validation() {
        assert_eq!(LocalEndpoint::parse("kinect:1").unwrap().as_str(), "kinect:1");
        assert_eq!(LocalEndpoint::parse(""), Err(AddressError::Empty));
        assert!(matches!(
            LocalEndpoint::parse("kinect 1"),
            Err(AddressError::Whitespace(_))
        ));
    }
}
