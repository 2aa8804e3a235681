//! Route handlers.
//!
//! Each handler turns a request into a complete response. Failures are
//! expressed as status codes; nothing here returns an error.

use crate::http::request::USER_AGENT;
use crate::http::response::{CONTENT_ENCODING, CONTENT_TYPE, GZIP};
use crate::http::{status, Request, Response, ResponseBuilder};
use crate::storage::{FileStore, StorageError};

pub const ECHO_PREFIX: &str = "/echo/";
pub const FILES_PREFIX: &str = "/files/";

const TEXT_PLAIN: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";

/// `GET /`: empty 200.
pub fn root() -> Response {
    Response::with_status(status::OK)
}

/// `/echo/{text}`: reflect the first whitespace-delimited token after the
/// prefix, gzip-encoded when the client accepts it.
pub fn echo(req: &Request) -> Response {
    let text = req
        .path()
        .strip_prefix(ECHO_PREFIX)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("");

    let mut builder = ResponseBuilder::new();
    builder.header(CONTENT_TYPE, TEXT_PLAIN).body(text);
    if req.accepts_encoding(GZIP) {
        builder.header(CONTENT_ENCODING, GZIP);
    }
    builder.build()
}

/// `/user-agent`: reflect the `User-Agent` header.
pub fn user_agent(req: &Request) -> Response {
    let agent = req.header(USER_AGENT).unwrap_or("");
    ResponseBuilder::new()
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .body(agent)
        .build()
}

/// `/files/{name}`: GET serves, POST stores, anything else is 405.
pub async fn files(req: &Request, store: &FileStore) -> Response {
    let name = req.path().strip_prefix(FILES_PREFIX).unwrap_or("");
    if req.is_get() {
        get_file(name, store).await
    } else if req.is_post() {
        post_file(name, req.body().unwrap_or_default(), store).await
    } else {
        tracing::debug!(method = %req.method(), file = %name, "Method not allowed on files route");
        Response::with_status(status::METHOD_NOT_ALLOWED)
    }
}

/// Fallback for unmatched paths.
pub fn not_found() -> Response {
    Response::with_status(status::NOT_FOUND)
}

async fn get_file(name: &str, store: &FileStore) -> Response {
    match store.read_lines(name).await {
        Ok(content) => ResponseBuilder::new()
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(content)
            .build(),
        Err(StorageError::NotFound(path)) => {
            tracing::debug!(path = %path.display(), "Requested file does not exist");
            Response::with_status(status::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serve file");
            Response::with_status(status::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn post_file(name: &str, data: &[u8], store: &FileStore) -> Response {
    match store.write(name, data).await {
        Ok(()) => {
            tracing::debug!(file = %name, bytes = data.len(), "File stored");
            Response::with_status(status::CREATED)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store file");
            Response::with_status(status::INTERNAL_SERVER_ERROR)
        }
    }
}
