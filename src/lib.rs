//! Error classification and byte transfer reliability for an adb wire client
//!
//! - [`error`]: structured, causally chained errors
//! - [`protocol`]: server error classification, full writes and reads,
//!   idempotent close
pub use aw_error as error;
pub use aw_protocol as protocol;

// Re-export the types callers reach for first
pub use error::{AdbResult, Context, Error, ErrorKind, Failure, WrapErr, combine_errors, render_chain};
pub use protocol::{IoConfig, MultiCloseable, multi_closeable, write_all};

use tracing::debug;

/// Releases `stream` after a request, folding the request's own failure and
/// the close failure into one error.
///
/// The stream is closed even when the request failed.
pub fn finish_request<S: protocol::Close>(
    stream: &MultiCloseable<S>,
    request: &str,
    outcome: AdbResult<()>,
) -> Result<(), Failure> {
    let close_err = stream.close().err().map(|err| {
        debug!("closing after {request} failed: {err}");
        let kind = err.kind();
        Error::wrap(err, kind, format!("error closing {request} connection"))
    });
    match combine_errors(
        format!("{request} request failed"),
        ErrorKind::NetworkError,
        [outcome.err(), close_err],
    ) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
