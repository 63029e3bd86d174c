//! Incoming HTTP request type and the request decoder.
//!
//! A request is decoded from exactly one read of at most [`MAX_REQUEST_SIZE`]
//! bytes. Nothing loops to accumulate a larger message: bytes beyond the
//! buffer are never seen, so an oversized request is truncated.

use std::collections::HashMap;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::error::Error;

/// Upper bound on the bytes read for a single request, head and body included.
pub const MAX_REQUEST_SIZE: usize = 1024;

const CRLF: &str = "\r\n";
const HEAD_END: &[u8] = b"\r\n\r\n";

/// An incoming HTTP request, parsed from the raw TCP stream.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) version: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Performs a single read from `reader` and decodes what it returned.
    ///
    /// A read that fills the whole buffer is logged as possibly truncated and
    /// decoded anyway.
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, Error> {
        let mut buf = [0u8; MAX_REQUEST_SIZE];
        let n = reader.read(&mut buf).await.map_err(Error::Read)?;
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }
        if n == MAX_REQUEST_SIZE {
            warn!(limit = MAX_REQUEST_SIZE, "request filled the read buffer and may be truncated");
        }
        Self::parse(&buf[..n])
    }

    /// Decodes a request from raw bytes.
    ///
    /// The request line must split on single spaces into exactly three
    /// non-empty tokens. Header lines without `": "` are skipped; on duplicate
    /// names the last one wins. Everything after the first blank line is the
    /// body, verbatim.
    pub fn parse(raw: &[u8]) -> Result<Self, Error> {
        let (head, body) = match raw.windows(HEAD_END.len()).position(|w| w == HEAD_END) {
            Some(pos) => (&raw[..pos], &raw[pos + HEAD_END.len()..]),
            None => (raw, &[][..]),
        };

        let head = String::from_utf8_lossy(head);
        let mut lines = head.split(CRLF);
        let request_line = lines.next().unwrap_or_default();

        let (method, path, version) = match request_line.split(' ').collect::<Vec<_>>()[..] {
            [m, p, v] if !m.is_empty() && !p.is_empty() && !v.is_empty() => (m, p, v),
            _ => return Err(Error::MalformedRequestLine(request_line.to_owned())),
        };

        let mut headers = HashMap::new();
        for line in lines {
            match line.split_once(": ") {
                Some((name, value)) => {
                    headers.insert(name.to_owned(), value.to_owned());
                }
                None => debug!(line, "skipping malformed header line"),
            }
        }

        Ok(Self {
            method: method.to_owned(),
            path: path.to_owned(),
            version: version.to_owned(),
            headers,
            body: body.to_vec(),
            params: HashMap::new(),
        })
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn version(&self) -> &str { &self.version }
    pub fn headers(&self) -> &HashMap<String, String> { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup. Names are matched exactly, including case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns a named path parameter captured by the router.
    ///
    /// For a route `/echo/{*suffix}`, `req.param("suffix")` on `/echo/abc`
    /// returns `Some("abc")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
