//! Reliability layer of the adb wire client
//!
//! Sits between a connected stream and the code speaking the protocol:
//! - [`server_error`] classifies the raw `FAIL` messages sent by the adb server
//! - [`io`] moves whole messages over sinks and sources that only do partial transfers
//! - [`close`] makes closing a connection idempotent, even across threads
//!
//! All failures are [`aw_error::Error`]s.
pub mod close;
pub mod config;
pub mod io;
pub mod server_error;
pub mod utils;

pub use close::{Close, CloseResult, MultiCloseable, multi_closeable};
pub use config::IoConfig;
pub use io::{read_exact, read_full, write_all, write_all_with};
pub use server_error::{adb_server_error, incomplete_message, is_adb_server_error_matching};

// Detail payloads produced by this crate
pub use aw_error::{ErrorResponseDetails, IncompleteMessageDetails};
