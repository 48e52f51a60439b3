use aw_error::{AdbResult, ErrorKind, Failure, WrapErr};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STALLED_WRITES: usize = 16;

/// Tuning for the byte transfer helpers in [`crate::io`].
///
/// ```toml
/// max_stalled_writes = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Consecutive zero-byte writes tolerated before the sink is considered stalled
    pub max_stalled_writes: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_stalled_writes: DEFAULT_MAX_STALLED_WRITES,
        }
    }
}

impl IoConfig {
    pub fn from_toml_str(s: &str) -> AdbResult<Self> {
        toml::from_str(s)
            .map_err(Failure::foreign)
            .wrap_err_with(ErrorKind::Parse, || "failed to parse io config")
    }

    pub fn with_max_stalled_writes(mut self, max_stalled_writes: usize) -> Self {
        self.max_stalled_writes = max_stalled_writes;
        self
    }
}
