//! Terminal output for streamed tokens

use crate::logging::Logger;
use std::io::Write;
use tokio_util::sync::CancellationToken;

/// Write one streamed token and flush it
///
/// A failed write or flush (closed pipe, full disk) is logged and cancels
/// `stop`, which ends the stream at the next read. Returns whether the
/// token reached the writer.
pub fn write_token<W: Write>(
    out: &mut W,
    text: &str,
    logger: &Logger,
    stop: &CancellationToken,
) -> bool {
    if stop.is_cancelled() {
        return false;
    }

    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            logger.warn(format!("Stopping stream, output unavailable: {}", e));
            stop.cancel();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_token_written_and_flushed() {
        let mut out = Vec::new();
        let stop = CancellationToken::new();

        assert!(write_token(&mut out, "Hel", &Logger::noop(), &stop));
        assert!(write_token(&mut out, "lo", &Logger::noop(), &stop));
        assert_eq!(out, b"Hello");
        assert!(!stop.is_cancelled());
    }

    #[test]
    fn test_broken_pipe_cancels_stream() {
        let stop = CancellationToken::new();

        assert!(!write_token(&mut ClosedPipe, "token", &Logger::noop(), &stop));
        assert!(stop.is_cancelled());
    }

    #[test]
    fn test_nothing_written_after_cancel() {
        let mut out = Vec::new();
        let stop = CancellationToken::new();
        stop.cancel();

        assert!(!write_token(&mut out, "late", &Logger::noop(), &stop));
        assert!(out.is_empty());
    }
}
