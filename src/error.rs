//! Unified error type.

use std::fmt;
use std::io;

/// The error type returned by shoal's fallible operations.
///
/// Route-level outcomes (404, 405, a failed file read) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// failures that happen before a request exists or outside any connection:
/// binding, reading the request, and startup configuration.
#[derive(Debug)]
pub enum Error {
    /// Binding or other listener-level I/O failed.
    Io(io::Error),
    /// The single read of a request off the socket failed.
    Read(io::Error),
    /// The peer closed the connection before sending any bytes.
    ConnectionClosed,
    /// The request line did not split into method, path and version.
    MalformedRequestLine(String),
    /// Startup configuration was rejected.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Read(e) => write!(f, "reading request: {e}"),
            Self::ConnectionClosed => f.write_str("connection closed before request"),
            Self::MalformedRequestLine(line) => write!(f, "malformed request line: {line:?}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::Read(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
