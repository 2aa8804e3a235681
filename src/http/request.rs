//! Request parsing.
//!
//! # Responsibilities
//! - Read the request line and split it into method, path and protocol
//! - Read header lines into a case-folded, single-value map
//! - Read a `Content-Length` framed body
//!
//! # Design Decisions
//! - One request per connection; the parser never looks past the body
//! - Header lines without a colon are skipped, not rejected
//! - A missing or malformed `Content-Length` means "no body", not an error
//! - Path and protocol are kept exactly as received

use std::collections::HashMap;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::method::{InvalidMethod, Method};

pub const CONTENT_LENGTH: &str = "content-length";
pub const ACCEPT_ENCODING: &str = "accept-encoding";
pub const USER_AGENT: &str = "user-agent";

/// Errors that abandon the connection before any response is written.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Request line missing, truncated, or not `METHOD PATH PROTOCOL`.
    #[error("malformed request line: {0}")]
    RequestLine(String),

    /// Method token is not one of the supported methods.
    #[error(transparent)]
    Method(#[from] InvalidMethod),

    /// A header line could not be read.
    #[error("failed to read header line: {0}")]
    Header(#[source] io::Error),

    /// The declared body could not be read in full.
    #[error("failed to read request body: {0}")]
    Body(#[source] io::Error),
}

/// A parsed request. Immutable once produced by [`parse_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    protocol: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            protocol: "HTTP/1.1".to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header, folding the name the same way the parser does.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Look up a header by name, ignoring letter case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Body bytes, present only when a valid `Content-Length` was sent.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::Get
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::Post
    }

    /// True when the path starts with `prefix`.
    pub fn routes_to(&self, prefix: &str) -> bool {
        self.path.starts_with(prefix)
    }

    /// Declared body length, 0 when the header is missing or malformed.
    pub fn content_length(&self) -> usize {
        self.header(CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// True when `Accept-Encoding` lists `encoding` as one of its
    /// comma-separated tokens.
    pub fn accepts_encoding(&self, encoding: &str) -> bool {
        self.header(ACCEPT_ENCODING)
            .map(|value| {
                value
                    .split(',')
                    .any(|token| token.trim().eq_ignore_ascii_case(encoding))
            })
            .unwrap_or(false)
    }
}

/// Parse a single request from `reader`.
///
/// The reader is left positioned right after the body (or after the blank
/// line when there is no body).
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader)
        .await
        .map_err(|e| ParseError::RequestLine(e.to_string()))?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [method, path, protocol] = tokens.as_slice() else {
        return Err(ParseError::RequestLine(format!(
            "expected 3 tokens, got {}: {:?}",
            tokens.len(),
            line
        )));
    };
    let method: Method = method.parse()?;
    let path = path.to_string();
    let protocol = protocol.to_string();

    let mut headers = HashMap::new();
    loop {
        let line = read_line(reader).await.map_err(ParseError::Header)?;
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            tracing::debug!(line = %line, "Skipping header line without colon");
            continue;
        };
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    let body = match headers.get(CONTENT_LENGTH).map(|v| v.parse::<usize>()) {
        Some(Ok(len)) => {
            // Grow with the bytes that actually arrive; the declared length
            // only caps the read.
            let mut body = Vec::new();
            (&mut *reader)
                .take(len as u64)
                .read_to_end(&mut body)
                .await
                .map_err(ParseError::Body)?;
            if body.len() < len {
                return Err(ParseError::Body(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("expected {len} body bytes, got {}", body.len()),
                )));
            }
            Some(body)
        }
        Some(Err(e)) => {
            tracing::debug!(error = %e, "Ignoring malformed content-length, body not read");
            None
        }
        None => None,
    };

    Ok(Request {
        method,
        path,
        protocol,
        headers,
        body,
    })
}

/// Read one line and strip its terminator. A bare `\n` is accepted as well
/// as `\r\n`; end of stream before any terminator is an error.
async fn read_line<R>(reader: &mut R) -> io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf).await?;
    if buf.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before end of line",
        ));
    }
    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(raw: &[u8]) -> Result<Request, ParseError> {
        let mut reader = raw;
        parse_request(&mut reader).await
    }

    #[tokio::test]
    async fn parses_request_line_and_headers() {
        let req = parse(b"GET /echo/abc HTTP/1.1\r\nHost: localhost:4221\r\nUser-Agent: curl/8.4.0\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.path(), "/echo/abc");
        assert_eq!(req.protocol(), "HTTP/1.1");
        assert_eq!(req.header("host"), Some("localhost:4221"));
        assert_eq!(req.header("User-Agent"), Some("curl/8.4.0"));
        assert!(req.body().is_none());
    }

    #[tokio::test]
    async fn method_token_is_case_insensitive() {
        let req = parse(b"post /files/a HTTP/1.1\r\n\r\n").await.unwrap();
        assert!(req.is_post());
    }

    #[tokio::test]
    async fn path_and_protocol_are_kept_verbatim() {
        let req = parse(b"GET /a%20b/../c?x=1 HTTP/9.9\r\n\r\n").await.unwrap();
        assert_eq!(req.path(), "/a%20b/../c?x=1");
        assert_eq!(req.protocol(), "HTTP/9.9");
    }

    #[tokio::test]
    async fn header_names_are_folded_and_values_trimmed() {
        let req = parse(b"GET / HTTP/1.1\r\n  X-Custom-Thing :   some value  \r\n\r\n")
            .await
            .unwrap();
        assert_eq!(req.headers().get("x-custom-thing").map(String::as_str), Some("some value"));
    }

    #[tokio::test]
    async fn header_value_keeps_everything_after_first_colon() {
        let req = parse(b"GET / HTTP/1.1\r\nHost: example.com:8080\r\n\r\n").await.unwrap();
        assert_eq!(req.header("host"), Some("example.com:8080"));
    }

    #[tokio::test]
    async fn later_duplicate_header_wins() {
        let req = parse(b"GET / HTTP/1.1\r\nAccept: a\r\nACCEPT: b\r\n\r\n").await.unwrap();
        assert_eq!(req.header("accept"), Some("b"));
        assert_eq!(req.headers().len(), 1);
    }

    #[tokio::test]
    async fn header_line_without_colon_is_skipped() {
        let req = parse(b"GET / HTTP/1.1\r\nnot a header\r\nHost: h\r\n\r\n").await.unwrap();
        assert_eq!(req.headers().len(), 1);
        assert_eq!(req.header("host"), Some("h"));
    }

    #[tokio::test]
    async fn reads_body_framed_by_content_length() {
        let mut reader: &[u8] = b"POST /files/x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
        let req = parse_request(&mut reader).await.unwrap();
        assert_eq!(req.body(), Some(&b"hello"[..]));
        assert_eq!(req.content_length(), 5);
        assert_eq!(reader, b"EXTRA");
    }

    #[tokio::test]
    async fn zero_content_length_gives_empty_body() {
        let req = parse(b"POST /files/x HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await.unwrap();
        assert_eq!(req.body(), Some(&b""[..]));
    }

    #[tokio::test]
    async fn malformed_content_length_skips_body() {
        for value in ["abc", "-5", "5x", ""] {
            let raw = format!("POST /files/x HTTP/1.1\r\nContent-Length: {value}\r\n\r\nhello");
            let req = parse(raw.as_bytes()).await.unwrap();
            assert!(req.body().is_none(), "content-length {value:?}");
            assert_eq!(req.content_length(), 0);
        }
    }

    #[tokio::test]
    async fn missing_content_length_skips_body() {
        let req = parse(b"POST /files/x HTTP/1.1\r\n\r\nhello").await.unwrap();
        assert!(req.body().is_none());
    }

    #[tokio::test]
    async fn truncated_body_is_fatal() {
        let err = parse(b"POST /files/x HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello")
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Body(_)));
    }

    #[tokio::test]
    async fn huge_content_length_with_short_body_is_fatal() {
        for declared in [usize::MAX, 1usize << 42] {
            let raw = format!("POST /files/x HTTP/1.1\r\nContent-Length: {declared}\r\n\r\nhello");
            let err = parse(raw.as_bytes()).await.unwrap_err();
            match err {
                ParseError::Body(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn wrong_token_count_is_fatal() {
        for raw in [
            &b"GET\r\n\r\n"[..],
            b"GET /\r\n\r\n",
            b"GET / HTTP/1.1 extra\r\n\r\n",
            b"\r\n\r\n",
        ] {
            let err = parse(raw).await.unwrap_err();
            assert!(matches!(err, ParseError::RequestLine(_)), "{raw:?}");
        }
    }

    #[tokio::test]
    async fn empty_stream_is_fatal() {
        let err = parse(b"").await.unwrap_err();
        assert!(matches!(err, ParseError::RequestLine(_)));
    }

    #[tokio::test]
    async fn unknown_method_is_fatal() {
        let err = parse(b"PATCH / HTTP/1.1\r\n\r\n").await.unwrap_err();
        assert!(matches!(err, ParseError::Method(InvalidMethod(ref m)) if m == "PATCH"));
    }

    #[tokio::test]
    async fn stream_ending_inside_headers_is_fatal() {
        let err = parse(b"GET / HTTP/1.1\r\nHost: h\r\n").await.unwrap_err();
        assert!(matches!(err, ParseError::Header(_)));

        let err = parse(b"GET / HTTP/1.1\r\nHost: h").await.unwrap_err();
        assert!(matches!(err, ParseError::Header(_)));
    }

    #[test]
    fn accept_encoding_token_matching() {
        let req = Request::new(Method::Get, "/").with_header("Accept-Encoding", "deflate, GZip ,br");
        assert!(req.accepts_encoding("gzip"));
        assert!(req.accepts_encoding("br"));
        assert!(!req.accepts_encoding("identity"));

        let req = Request::new(Method::Get, "/").with_header("Accept-Encoding", "gzipx, x-gzip");
        assert!(!req.accepts_encoding("gzip"));

        assert!(!Request::new(Method::Get, "/").accepts_encoding("gzip"));
    }

    #[test]
    fn routes_to_is_a_prefix_check() {
        let req = Request::new(Method::Get, "/files/a.txt");
        assert!(req.routes_to("/files/"));
        assert!(req.routes_to("/"));
        assert!(!req.routes_to("/echo/"));
    }
}
