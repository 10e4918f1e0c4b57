//! Non-blocking character reader over a blocking byte source.
//!
//! A background pump thread drains the source (normally the TTY) into a
//! bounded byte channel; the reader assembles characters on the consumer
//! side with an incremental UTF-8 decoder. Malformed input decodes to
//! U+FFFD and the stream keeps going; partially delivered multi-byte
//! characters are buffered rather than stalling the caller.
//!
//! Channel policy: single producer (pump) and single consumer (the prompt
//! loop). The pump uses blocking sends, so a full channel parks the pump
//! instead of dropping bytes.
//!
//! Invariants:
//! - The pump owns no engine state and never closes the underlying source;
//!   the output side of the TTY stays usable until teardown.
//! - `shutdown` releases the consumer immediately. The pump exits at its
//!   next read return or failed send; it is detached, never joined, because
//!   a read against a quiet TTY can stay parked indefinitely.
//! - Decoding is a pure function of the byte stream: the same bytes always
//!   yield the same characters, regardless of how reads were timed.

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use tracing::{debug, trace};

/// Capacity of the pump-to-reader byte channel.
pub const PUMP_CHANNEL_CAP: usize = 4096;

const REPLACEMENT: char = '\u{FFFD}';

/// Outcome of a timed read or peek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A decoded character.
    Char(char),
    /// The source is exhausted (or the reader was shut down).
    Eof,
    /// No character became available within the timeout.
    TimedOut,
}

impl ReadOutcome {
    pub fn is_char(&self) -> bool {
        matches!(self, ReadOutcome::Char(_))
    }
}

/// Character stream with timed `read`/`peek` over a pumped byte source.
pub struct NonBlockingReader {
    rx: Option<Receiver<u8>>,
    shutdown: Arc<AtomicBool>,
    pending: Vec<u8>,
    peeked: Option<char>,
}

impl NonBlockingReader {
    /// Spawn the pump thread over `source` and return the reader.
    pub fn spawn<R: Read + Send + 'static>(source: R) -> Self {
        let (tx, rx) = bounded(PUMP_CHANNEL_CAP);
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        std::thread::Builder::new()
            .name("prompt-input-pump".into())
            .spawn(move || pump(source, tx, flag))
            .ok();
        Self {
            rx: Some(rx),
            shutdown,
            pending: Vec::new(),
            peeked: None,
        }
    }

    /// Read one character. `None` blocks until a character or EOF;
    /// `Some(t)` waits at most `t`.
    pub fn read(&mut self, timeout: Option<Duration>) -> ReadOutcome {
        if let Some(c) = self.peeked.take() {
            return ReadOutcome::Char(c);
        }
        let deadline = timeout.map(|t| Instant::now() + t);
        self.decode_next(deadline)
    }

    /// Like `read`, but the character stays available for the next call.
    pub fn peek(&mut self, timeout: Option<Duration>) -> ReadOutcome {
        if let Some(c) = self.peeked {
            return ReadOutcome::Char(c);
        }
        match self.read(timeout) {
            ReadOutcome::Char(c) => {
                self.peeked = Some(c);
                ReadOutcome::Char(c)
            }
            other => other,
        }
    }

    /// Whether a `read` would return promptly without waiting.
    pub fn available(&self) -> bool {
        self.peeked.is_some()
            || !self.pending.is_empty()
            || self.rx.as_ref().is_some_and(|rx| !rx.is_empty())
    }

    /// Release the pump and make all further reads return `Eof`.
    /// The underlying source is left open.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        self.rx = None;
        self.peeked = None;
        self.pending.clear();
        trace!(target: "input.pump", "reader_shutdown");
    }

    fn decode_next(&mut self, deadline: Option<Instant>) -> ReadOutcome {
        loop {
            if let Some(out) = self.take_decoded() {
                return out;
            }
            let Some(rx) = self.rx.as_ref() else {
                return ReadOutcome::Eof;
            };
            let received = match deadline {
                Some(d) => rx.recv_deadline(d),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(b) => self.pending.push(b),
                Err(RecvTimeoutError::Timeout) => return ReadOutcome::TimedOut,
                Err(RecvTimeoutError::Disconnected) => {
                    self.rx = None;
                    if !self.pending.is_empty() {
                        // Truncated trailing sequence: substitute and finish.
                        self.pending.clear();
                        return ReadOutcome::Char(REPLACEMENT);
                    }
                    return ReadOutcome::Eof;
                }
            }
        }
    }

    /// Pop one character off the pending byte buffer, if it holds one.
    fn take_decoded(&mut self) -> Option<ReadOutcome> {
        if self.pending.is_empty() {
            return None;
        }
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let c = s.chars().next()?;
                self.pending.drain(..c.len_utf8());
                Some(ReadOutcome::Char(c))
            }
            Err(e) => {
                if e.valid_up_to() > 0 {
                    let valid = &self.pending[..e.valid_up_to()];
                    let c = std::str::from_utf8(valid).ok()?.chars().next()?;
                    self.pending.drain(..c.len_utf8());
                    return Some(ReadOutcome::Char(c));
                }
                match e.error_len() {
                    Some(bad) => {
                        self.pending.drain(..bad);
                        Some(ReadOutcome::Char(REPLACEMENT))
                    }
                    // Incomplete prefix of a multi-byte character.
                    None => None,
                }
            }
        }
    }
}

impl Drop for NonBlockingReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump<R: Read>(mut source: R, tx: Sender<u8>, shutdown: Arc<AtomicBool>) {
    let mut buf = [0u8; 64];
    loop {
        if shutdown.load(Ordering::Acquire) {
            break;
        }
        match source.read(&mut buf) {
            Ok(0) => {
                trace!(target: "input.pump", "source_eof");
                break;
            }
            Ok(n) => {
                for &b in &buf[..n] {
                    if tx.send(b).is_err() {
                        trace!(target: "input.pump", "consumer_gone");
                        return;
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(target: "input.pump", error = %e, "source_read_error");
                break;
            }
        }
    }
    trace!(target: "input.pump", "pump_exit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Read source that yields one byte per syscall, to exercise the
    /// incremental decoder on split multi-byte sequences.
    struct ByteAtATime(Cursor<Vec<u8>>);

    impl Read for ByteAtATime {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let len = 1.min(buf.len());
            self.0.read(&mut buf[..len])
        }
    }

    fn reader_over(bytes: &[u8]) -> NonBlockingReader {
        NonBlockingReader::spawn(ByteAtATime(Cursor::new(bytes.to_vec())))
    }

    fn drain(r: &mut NonBlockingReader) -> String {
        let mut out = String::new();
        loop {
            match r.read(None) {
                ReadOutcome::Char(c) => out.push(c),
                ReadOutcome::Eof => return out,
                ReadOutcome::TimedOut => unreachable!("blocking read timed out"),
            }
        }
    }

    #[test]
    fn decodes_ascii_and_multibyte() {
        let mut r = reader_over("a界😀b".as_bytes());
        assert_eq!(drain(&mut r), "a界😀b");
    }

    #[test]
    fn malformed_bytes_become_replacement() {
        // 0xFF can never start a UTF-8 sequence.
        let mut r = reader_over(&[b'a', 0xFF, b'b']);
        assert_eq!(drain(&mut r), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_tail_becomes_replacement() {
        // First two bytes of a three-byte sequence, then EOF.
        let mut r = reader_over(&[0xE7, 0x95]);
        assert_eq!(drain(&mut r), "\u{FFFD}");
    }

    #[test]
    fn eof_after_script() {
        let mut r = reader_over(b"x");
        assert_eq!(r.read(None), ReadOutcome::Char('x'));
        assert_eq!(r.read(None), ReadOutcome::Eof);
        assert_eq!(r.read(None), ReadOutcome::Eof);
    }

    #[test]
    fn peek_is_stable_until_read() {
        let mut r = reader_over(b"xy");
        assert_eq!(r.peek(None), ReadOutcome::Char('x'));
        assert_eq!(r.peek(None), ReadOutcome::Char('x'));
        assert_eq!(r.read(None), ReadOutcome::Char('x'));
        assert_eq!(r.read(None), ReadOutcome::Char('y'));
    }

    #[test]
    fn timed_read_times_out_on_quiet_source() {
        struct Quiet;
        impl Read for Quiet {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                std::thread::sleep(Duration::from_secs(60));
                Ok(0)
            }
        }
        let mut r = NonBlockingReader::spawn(Quiet);
        let out = r.read(Some(Duration::from_millis(20)));
        assert_eq!(out, ReadOutcome::TimedOut);
    }

    #[test]
    fn shutdown_makes_reads_eof() {
        let mut r = reader_over(b"abc");
        assert_eq!(r.read(None), ReadOutcome::Char('a'));
        r.shutdown();
        assert_eq!(r.read(None), ReadOutcome::Eof);
        assert!(!r.available());
    }

    #[test]
    fn available_reflects_buffered_input() {
        let mut r = reader_over(b"a");
        // Wait for the pump to deliver.
        assert_eq!(r.peek(None), ReadOutcome::Char('a'));
        assert!(r.available());
        let _ = r.read(None);
    }
}
