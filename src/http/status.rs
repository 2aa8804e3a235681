//! Status codes and their reason phrases.

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const NO_CONTENT: u16 = 204;
pub const BAD_REQUEST: u16 = 400;
pub const NOT_FOUND: u16 = 404;
pub const METHOD_NOT_ALLOWED: u16 = 405;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Reason phrase for a status code, `"Unknown"` for codes outside the table.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        OK => "OK",
        CREATED => "Created",
        NO_CONTENT => "No Content",
        BAD_REQUEST => "Bad Request",
        NOT_FOUND => "Not Found",
        METHOD_NOT_ALLOWED => "Method Not Allowed",
        INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "Unknown",
    }
}
