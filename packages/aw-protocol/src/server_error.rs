use std::sync::LazyLock;

use aw_error::{
    AsStructured, Detail, Error, ErrorKind, ErrorResponseDetails, IncompleteMessageDetails,
};
use regex::Regex;
use tracing::debug;

/// Matches every "device not found" message returned by the adb server
static DEVICE_NOT_FOUND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"device( '.*')? not found").expect("invalid device pattern"));

/// Turns a raw `FAIL` message from the adb server into an [`Error`].
///
/// The kind is [`ErrorKind::DeviceNotFound`] when the message says so, and
/// [`ErrorKind::ServerError`] otherwise. Both carry the original request and
/// message as [`ErrorResponseDetails`].
pub fn adb_server_error(request: &str, server_msg: &str) -> Error {
    let msg = if request.is_empty() {
        format!("server error: {server_msg}")
    } else {
        format!("server error for {request} request: {server_msg}")
    };

    let kind = if DEVICE_NOT_FOUND_PATTERN.is_match(server_msg) {
        debug!("server reported device not found: {server_msg}");
        ErrorKind::DeviceNotFound
    } else {
        ErrorKind::ServerError
    };

    Error::new(kind, msg).with_detail(Detail::ErrorResponse(ErrorResponseDetails {
        request: request.to_string(),
        server_msg: server_msg.to_string(),
    }))
}

/// Returns true if `err` is a [`ErrorKind::ServerError`] whose server message
/// satisfies `predicate`.
///
/// `DeviceNotFound` errors never match, check them with
/// [`aw_error::has_kind`] instead.
pub fn is_adb_server_error_matching<E, P>(err: Option<&E>, predicate: P) -> bool
where
    E: AsStructured + ?Sized,
    P: FnOnce(&str) -> bool,
{
    let Some(err) = err.and_then(AsStructured::as_structured) else {
        return false;
    };
    if err.kind() != ErrorKind::ServerError {
        return false;
    }
    match err.detail() {
        Some(Detail::ErrorResponse(details)) => predicate(&details.server_msg),
        _ => false,
    }
}

/// A message ended before `expected` bytes could be read.
pub fn incomplete_message(desc: &str, actual: usize, expected: usize) -> Error {
    Error::new(
        ErrorKind::ConnectionReset,
        format!("incomplete {desc}: read {actual} bytes, expecting {expected}"),
    )
    .with_detail(Detail::IncompleteMessage(IncompleteMessageDetails {
        actual_read_bytes: actual,
        expected_bytes: expected,
    }))
}
