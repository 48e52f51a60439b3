use std::fmt;

/// An error message returned by the adb server, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponseDetails {
    /// Name of the request that triggered the failure, may be empty
    pub request: String,
    pub server_msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteMessageDetails {
    pub actual_read_bytes: usize,
    pub expected_bytes: usize,
}

/// Typed payload attached to an [`Error`](crate::Error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Carried by `ServerError` and `DeviceNotFound` errors
    ErrorResponse(ErrorResponseDetails),
    /// Carried by `ConnectionReset` errors raised on short reads
    IncompleteMessage(IncompleteMessageDetails),
}

// Structural rendering of the payload, without the variant wrapper.
impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::ErrorResponse(details) => write!(f, "{details:?}"),
            Detail::IncompleteMessage(details) => write!(f, "{details:?}"),
        }
    }
}
