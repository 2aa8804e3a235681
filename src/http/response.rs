//! Response construction and serialization.
//!
//! # Responsibilities
//! - Accumulate status, headers and body through a builder
//! - Snapshot the builder into an immutable `Response`
//! - Serialize the status line, headers and body to the wire
//! - Apply gzip when the response declares `Content-Encoding: gzip`
//!
//! # Design Decisions
//! - `build()` clones, so two responses never share header state
//! - The writer owns `Content-Length`: it is recomputed from the bytes
//!   actually sent, after any content encoding
//! - A response is consumed by serialization and cannot be sent twice

use std::collections::HashMap;
use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::status::{self, reason_phrase};

pub const CRLF: &str = "\r\n";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const GZIP: &str = "gzip";

/// Incrementally assembles a [`Response`].
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    protocol: String,
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl ResponseBuilder {
    /// Start a `HTTP/1.1 200` response with no headers and no body.
    pub fn new() -> Self {
        Self {
            protocol: "HTTP/1.1".to_string(),
            status: status::OK,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn protocol(&mut self, protocol: impl Into<String>) -> &mut Self {
        self.protocol = protocol.into();
        self
    }

    pub fn status(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any earlier value under the same key.
    pub fn header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Snapshot the current state. The builder stays usable afterwards.
    pub fn build(&self) -> Response {
        Response {
            protocol: self.protocol.clone(),
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    protocol: String,
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl Response {
    /// Shorthand for a bodiless response with the given status.
    pub fn with_status(status: u16) -> Self {
        ResponseBuilder::new().status(status).build()
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header lookup ignoring the letter case of `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as set by the handler, before any content encoding.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn is_gzip(&self) -> bool {
        self.header(CONTENT_ENCODING) == Some(GZIP)
    }

    /// Serialize to wire bytes.
    pub fn encode(mut self) -> io::Result<Vec<u8>> {
        let mut out = format!(
            "{} {} {}{CRLF}",
            self.protocol,
            self.status,
            reason_phrase(self.status)
        )
        .into_bytes();

        let payload = match self.body.take() {
            Some(body) => {
                let payload = if self.is_gzip() { gzip(&body)? } else { body };
                self.headers
                    .retain(|key, _| !key.eq_ignore_ascii_case(CONTENT_LENGTH));
                self.headers
                    .insert(CONTENT_LENGTH.to_string(), payload.len().to_string());
                Some(payload)
            }
            None => None,
        };

        for (key, value) in &self.headers {
            out.extend_from_slice(format!("{key}: {value}{CRLF}").as_bytes());
        }
        out.extend_from_slice(CRLF.as_bytes());
        if let Some(payload) = payload {
            out.extend_from_slice(&payload);
        }
        Ok(out)
    }

    /// Serialize and write to `writer`, returning the number of bytes sent.
    pub async fn write_to<W>(self, writer: &mut W) -> io::Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.encode()?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(bytes.len())
    }
}

fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}
