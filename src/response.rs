//! Outgoing HTTP response type and the response encoder.
//!
//! Build a [`Response`] in a handler and return it. `Content-Length` is never
//! set by hand: it is computed from the body when the response is encoded.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::status::Status;

/// The only protocol version this server speaks.
pub const HTTP_VERSION: &str = "HTTP/1.1";

const CONTENT_LENGTH: &str = "Content-Length";
const CONTENT_TYPE: &str = "Content-Type";

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values used with [`ResponseBuilder::bytes`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    OctetStream, // application/octet-stream
    Text,        // text/plain
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use shoal::{ContentType, Response, Status};
///
/// Response::text("hello");
/// Response::status(Status::NotFound);
///
/// Response::builder()
///     .status(Status::Created)
///     .bytes(ContentType::OctetStream, Vec::new());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK` with a `text/plain` body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().bytes(ContentType::Text, body.into().into_bytes())
    }

    /// Response with no body and no extra headers.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn code(&self) -> u16 { self.status.code() }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Looks up a header set on this response. `Content-Length` is not stored;
    /// it only exists in the encoded form.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Encodes the response: status line, `Content-Length`, the remaining
    /// headers in insertion order, a blank line, then the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("{HTTP_VERSION} {}\r\n", self.status);
        head.push_str(&format!("{CONTENT_LENGTH}: {}\r\n", self.body.len()));
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");

        let mut out = Vec::with_capacity(head.len() + self.body.len());
        out.extend_from_slice(head.as_bytes());
        out.extend_from_slice(&self.body);
        out
    }

    pub(crate) async fn write_to<W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    /// Adds a header. A `Content-Length` passed here is ignored.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if !name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            self.headers.push((name.to_owned(), value.to_owned()));
        }
        self
    }

    /// Terminate with a typed body.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = vec![(CONTENT_TYPE.to_owned(), content_type.as_str().to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { body: Vec::new(), headers: self.headers, status: self.status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_framing_is_exact() {
        let bytes = Response::status(Status::Ok).to_bytes();
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn text_response_encodes_headers_and_body() {
        let bytes = Response::text("abc").to_bytes();
        assert_eq!(
            bytes,
            b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nContent-Type: text/plain\r\n\r\nabc"
        );
    }

    #[test]
    fn content_length_matches_binary_body() {
        let body = vec![0u8, 159, 146, 150, b'\r', b'\n'];
        let res = Response::builder()
            .status(Status::Ok)
            .bytes(ContentType::OctetStream, body.clone());
        let bytes = res.to_bytes();

        let head = b"HTTP/1.1 200 OK\r\nContent-Length: 6\r\nContent-Type: application/octet-stream\r\n\r\n";
        assert_eq!(bytes.len(), head.len() + body.len());
        assert_eq!(&bytes[..head.len()], head);
        assert_eq!(&bytes[head.len()..], &body[..]);
    }

    #[test]
    fn caller_cannot_override_content_length() {
        let res = Response::builder()
            .status(Status::Created)
            .header("content-length", "99")
            .header("X-Extra", "1")
            .no_body();

        assert_eq!(res.header("content-length"), None);
        assert_eq!(res.header("X-Extra"), Some("1"));
        assert_eq!(
            res.to_bytes(),
            b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\nX-Extra: 1\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn write_to_emits_encoded_bytes() {
        let res = Response::status(Status::MethodNotAllowed);
        let mut out = Vec::new();
        res.write_to(&mut out).await.unwrap();
        assert_eq!(out, res.to_bytes());
    }
}
