use std::fmt;

/// Category of an [`Error`](crate::Error).
///
/// Callers branch on the kind, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A programming-logic fault
    Assertion,
    Parse,
    /// The server was not available on the requested port
    ServerUnavailable,
    /// General network error communicating with the server
    NetworkError,
    /// The connection to the server was reset in the middle of an operation
    ConnectionReset,
    /// The server returned an error message, but we couldn't parse it
    ServerError,
    /// The server returned a "device not found" error
    DeviceNotFound,
    /// Tried to perform an operation on a path that doesn't exist on the device
    FileNotExist,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Assertion => "Assertion",
            ErrorKind::Parse => "Parse",
            ErrorKind::ServerUnavailable => "ServerUnavailable",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::ConnectionReset => "ConnectionReset",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::DeviceNotFound => "DeviceNotFound",
            ErrorKind::FileNotExist => "FileNotExist",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
