use std::{
    io::{self, Read, Write},
    net::{Shutdown, TcpStream},
    sync::{Arc, OnceLock},
};

use aw_error::{Error, ErrorKind};
use tracing::debug;

/// A stream that can be closed through a shared reference.
pub trait Close {
    fn close(&self) -> io::Result<()>;
}

impl Close for TcpStream {
    fn close(&self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Outcome of the one real close, shared by every caller.
pub type CloseResult = Result<(), Arc<Error>>;

/// Wraps `stream` so it can safely be closed multiple times.
pub fn multi_closeable<S: Close>(stream: S) -> MultiCloseable<S> {
    MultiCloseable::new(stream)
}

/// A stream whose [`close`](MultiCloseable::close) runs at most once.
///
/// Reads and writes go straight to the wrapped stream whether or not it has
/// been closed.
#[derive(Debug)]
pub struct MultiCloseable<S> {
    inner: S,
    closed: OnceLock<CloseResult>,
}

impl<S> MultiCloseable<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            closed: OnceLock::new(),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get().is_some()
    }
}

impl<S: Close> MultiCloseable<S> {
    /// Closes the wrapped stream on the first call and returns that outcome to
    /// this and every later call.
    ///
    /// Concurrent callers block until the first close has finished.
    pub fn close(&self) -> CloseResult {
        self.closed
            .get_or_init(|| {
                debug!("closing stream");
                self.inner.close().map_err(|err| {
                    Arc::new(Error::wrap(
                        err,
                        ErrorKind::NetworkError,
                        "error closing connection",
                    ))
                })
            })
            .clone()
    }
}

impl<S: Read> Read for MultiCloseable<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<S: Write> Write for MultiCloseable<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
