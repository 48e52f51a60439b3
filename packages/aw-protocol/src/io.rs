use std::io::{self, Read, Write};

use aw_error::{AdbResult, Error, ErrorKind};
use tracing::{trace, warn};

use crate::{config::IoConfig, server_error::incomplete_message};

/// Writes all of `data` to `sink`, with the default [`IoConfig`].
pub fn write_all<W: Write + ?Sized>(sink: &mut W, data: &[u8]) -> AdbResult<()> {
    write_all_with(sink, data, &IoConfig::default())
}

/// Writes all of `data` to `sink`, calling [`Write::write`] until every byte is
/// accepted.
///
/// A failed write is returned right away as a [`ErrorKind::NetworkError`]
/// reporting the total length and the offset reached, not the remaining
/// length. More than `config.max_stalled_writes` consecutive writes accepting
/// zero bytes fail the same way with an [`io::ErrorKind::WriteZero`] cause.
pub fn write_all_with<W: Write + ?Sized>(
    sink: &mut W,
    data: &[u8],
    config: &IoConfig,
) -> AdbResult<()> {
    let mut offset = 0;
    let mut stalled = 0;

    while offset < data.len() {
        match sink.write(&data[offset..]) {
            Ok(0) => {
                stalled += 1;
                if stalled > config.max_stalled_writes {
                    warn!("sink accepted no bytes {stalled} times in a row at offset {offset}");
                    return Err(Error::wrap(
                        io::Error::from(io::ErrorKind::WriteZero),
                        ErrorKind::NetworkError,
                        format!(
                            "error writing {} bytes at offset {}: sink stalled",
                            data.len(),
                            offset
                        ),
                    ));
                }
            }
            Ok(n) => {
                stalled = 0;
                offset += n;
                trace!("wrote {n} bytes, {offset}/{}", data.len());
            }
            Err(err) => {
                return Err(Error::wrap(
                    err,
                    ErrorKind::NetworkError,
                    format!("error writing {} bytes at offset {}", data.len(), offset),
                ));
            }
        }
    }

    Ok(())
}

/// Fills `buf` from `source`, across as many partial reads as needed.
///
/// End of stream before `buf` is full gives an
/// [`incomplete_message`] error for `desc`.
pub fn read_full<R: Read + ?Sized>(source: &mut R, buf: &mut [u8], desc: &str) -> AdbResult<()> {
    let mut offset = 0;

    while offset < buf.len() {
        match source.read(&mut buf[offset..]) {
            Ok(0) => return Err(incomplete_message(desc, offset, buf.len())),
            Ok(n) => {
                offset += n;
                trace!("read {n} bytes of {desc}, {offset}/{}", buf.len());
            }
            Err(err) => {
                return Err(Error::wrap(
                    err,
                    ErrorKind::NetworkError,
                    format!("error reading {desc}"),
                ));
            }
        }
    }

    Ok(())
}

/// Reads exactly `len` bytes, see [`read_full`].
pub fn read_exact<R: Read + ?Sized>(source: &mut R, len: usize, desc: &str) -> AdbResult<Vec<u8>> {
    let mut buf = vec![0; len];
    read_full(source, &mut buf, desc)?;
    Ok(buf)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use aw_error::{Detail, Failure, IncompleteMessageDetails, render_chain};

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Accepts at most `max_per_call` bytes per write, optionally failing on
    /// the `fail_on`-th call (1-based).
    struct ChunkedSink {
        max_per_call: usize,
        fail_on: Option<usize>,
        calls: Vec<usize>,
        written: Vec<u8>,
    }

    impl ChunkedSink {
        fn new(max_per_call: usize) -> Self {
            Self {
                max_per_call,
                fail_on: None,
                calls: vec![],
                written: vec![],
            }
        }

        fn failing_on(mut self, call: usize) -> Self {
            self.fail_on = Some(call);
            self
        }
    }

    impl Write for ChunkedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_on == Some(self.calls.len() + 1) {
                self.calls.push(0);
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"));
            }
            let n = buf.len().min(self.max_per_call);
            self.calls.push(n);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts nothing for the first `zero_writes` calls, then everything.
    struct StallingSink {
        zero_writes: usize,
        calls: usize,
    }

    impl Write for StallingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls <= self.zero_writes {
                Ok(0)
            } else {
                Ok(buf.len())
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Hands out at most `max_per_call` bytes per read.
    struct ChunkedSource {
        data: Cursor<Vec<u8>>,
        max_per_call: usize,
    }

    impl Read for ChunkedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.max_per_call);
            self.data.read(&mut buf[..n])
        }
    }

    struct BrokenSource;

    impl Read for BrokenSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"))
        }
    }

    #[test]
    fn test_write_all_partial_writes() {
        init_tracing();
        let mut sink = ChunkedSink::new(3);
        write_all(&mut sink, b"0123456789").unwrap();
        assert_eq!(sink.calls, [3, 3, 3, 1]);
        assert_eq!(sink.written, b"0123456789");
    }

    #[test]
    fn test_write_all_reports_offset() {
        init_tracing();
        let mut sink = ChunkedSink::new(3).failing_on(3);
        let err = write_all(&mut sink, b"0123456789").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.message(), "error writing 10 bytes at offset 6");
        assert_eq!(err.cause().unwrap().to_string(), "peer reset");
        assert_eq!(sink.written, b"012345");
    }

    #[test]
    fn test_write_all_fails_on_first_call() {
        let mut sink = ChunkedSink::new(3).failing_on(1);
        let err = write_all(&mut sink, b"0123").unwrap_err();
        assert_eq!(
            render_chain(Some(&Failure::from(err))),
            "NetworkError: error writing 4 bytes at offset 0\ncaused by\npeer reset"
        );
    }

    #[test]
    fn test_write_all_empty() {
        let mut sink = ChunkedSink::new(3).failing_on(1);
        write_all(&mut sink, b"").unwrap();
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_write_all_tolerates_short_stall() {
        let mut sink = StallingSink {
            zero_writes: 2,
            calls: 0,
        };
        let config = IoConfig::default().with_max_stalled_writes(2);
        write_all_with(&mut sink, b"abc", &config).unwrap();
        assert_eq!(sink.calls, 3);
    }

    #[test]
    fn test_write_all_detects_stall() {
        init_tracing();
        let mut sink = StallingSink {
            zero_writes: usize::MAX,
            calls: 0,
        };
        let config = IoConfig::default().with_max_stalled_writes(2);
        let err = write_all_with(&mut sink, b"abc", &config).unwrap_err();
        assert_eq!(sink.calls, 3);
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.message(), "error writing 3 bytes at offset 0: sink stalled");
        match err.cause() {
            Some(Failure::Foreign(cause)) => {
                let cause = cause.downcast_ref::<io::Error>().unwrap();
                assert_eq!(cause.kind(), io::ErrorKind::WriteZero);
            }
            other => panic!("unexpected cause: {other:?}"),
        }
    }

    #[test]
    fn test_read_exact_partial_reads() {
        let mut source = ChunkedSource {
            data: Cursor::new(b"000cshell:ls -l".to_vec()),
            max_per_call: 2,
        };
        assert_eq!(read_exact(&mut source, 4, "length").unwrap(), b"000c");
        assert_eq!(read_exact(&mut source, 11, "payload").unwrap(), b"shell:ls -l");
    }

    #[test]
    fn test_read_exact_incomplete() {
        let mut source = ChunkedSource {
            data: Cursor::new(b"OK".to_vec()),
            max_per_call: 1,
        };
        let err = read_exact(&mut source, 4, "status").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionReset);
        assert_eq!(err.message(), "incomplete status: read 2 bytes, expecting 4");
        assert_eq!(
            err.detail(),
            Some(&Detail::IncompleteMessage(IncompleteMessageDetails {
                actual_read_bytes: 2,
                expected_bytes: 4,
            }))
        );
    }

    #[test]
    fn test_read_exact_failure() {
        let err = read_exact(&mut BrokenSource, 4, "status").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.message(), "error reading status");
        assert_eq!(err.cause().unwrap().to_string(), "read timed out");
    }
}
