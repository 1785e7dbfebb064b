//! Byte sources feeding the frame scanner.
//!
//! A [`ByteSource`] exposes an incoming stream one byte at a time, together
//! with a count of how many bytes can be pulled right now without blocking.
//! Keeping the scanner behind this trait means new transports (a ring buffer,
//! a socket, a mock in a test) plug in without touching the parsing logic.

use std::collections::VecDeque;
use std::io::{self, Read};

use log::warn;
use thiserror::Error;

/// Error pulling a byte from a [`ByteSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source has no more bytes to give.
    #[error("byte source exhausted")]
    Exhausted,

    /// The underlying transport failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A byte-granular, non-blocking view of an incoming stream.
pub trait ByteSource {
    /// Number of bytes that can be pulled immediately.
    ///
    /// Implementations may use this call to opportunistically refill an
    /// internal buffer, but must not block indefinitely.
    fn available(&mut self) -> usize;

    /// Pulls the next byte.
    fn pull_byte(&mut self) -> Result<u8, SourceError>;
}

/// A byte source over a fixed in-memory buffer.
///
/// Unread bytes are retained across calls; once the buffer is exhausted only
/// an empty slice is kept, so no stale data can ever be re-read.
#[derive(Debug)]
pub struct SliceSource<'a> {
    buf: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }
}

impl ByteSource for SliceSource<'_> {
    fn available(&mut self) -> usize {
        self.buf.len()
    }

    fn pull_byte(&mut self) -> Result<u8, SourceError> {
        let (&byte, rest) = self.buf.split_first().ok_or(SourceError::Exhausted)?;
        self.buf = rest;
        Ok(byte)
    }
}

/// Bytes requested from the underlying reader per read-ahead pass.
const READ_CHUNK: usize = 64;

/// Default cap on read-ahead passes per [`ByteSource::available`] call.
const DEFAULT_READ_AHEAD: usize = 6;

/// A byte source over a blocking reader, with bounded read-ahead.
///
/// Bridges chunk-oriented blocking reads into the byte-granular, non-blocking
/// pulls the scanner expects. Each [`available`](ByteSource::available) call
/// drains whatever the reader will give immediately, a chunk at a time, into
/// an internal FIFO; bytes the scanner does not consume stay buffered for the
/// next call.
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    buffered: VecDeque<u8>,
    read_ahead: usize,
    fault: Option<io::Error>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_read_ahead(reader, DEFAULT_READ_AHEAD)
    }

    /// Creates a source capped at `read_ahead` chunked reads per
    /// [`available`](ByteSource::available) call.
    ///
    /// Each pass reads at most [`READ_CHUNK`] bytes, so this cap bounds how
    /// long a single poll may spend draining a chatty transport.
    pub fn with_read_ahead(reader: R, read_ahead: usize) -> Self {
        Self {
            reader,
            buffered: VecDeque::new(),
            read_ahead,
            fault: None,
        }
    }

    /// Returns the wrapped reader, dropping any buffered bytes.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn available(&mut self) -> usize {
        let mut chunk = [0u8; READ_CHUNK];
        for _ in 0..self.read_ahead {
            if self.fault.is_some() {
                break;
            }
            match self.reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(count) => self.buffered.extend(&chunk[..count]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == io::ErrorKind::WouldBlock
                        || err.kind() == io::ErrorKind::TimedOut =>
                {
                    // Nothing more right now; scan what we have.
                    break;
                }
                Err(err) => {
                    // Surfaced from pull_byte once the buffer drains.
                    warn!("read-ahead failed: {err}");
                    self.fault = Some(err);
                    break;
                }
            }
        }
        self.buffered.len()
    }

    fn pull_byte(&mut self) -> Result<u8, SourceError> {
        if let Some(byte) = self.buffered.pop_front() {
            return Ok(byte);
        }
        match self.fault.take() {
            Some(err) => Err(SourceError::Io(err)),
            None => Err(SourceError::Exhausted),
        }
    }
}

/// Adapts a [`ByteSource`] back into a [`Read`] over its buffered bytes.
///
/// Reads never block: at most [`available`](ByteSource::available) bytes are
/// returned, and an empty source reads as `Ok(0)`. A debugging aid for
/// plumbing a source into code that expects a reader; prefer driving
/// [`scan`](crate::scan::scan) directly.
#[derive(Debug)]
pub struct SourceReader<S> {
    source: S,
}

impl<S: ByteSource> SourceReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> Read for SourceReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = self.source.available().min(buf.len());
        for (filled, slot) in buf[..want].iter_mut().enumerate() {
            *slot = match self.source.pull_byte() {
                Ok(byte) => byte,
                Err(SourceError::Exhausted) => return Ok(filled),
                Err(SourceError::Io(err)) => return Err(err),
            };
        }
        Ok(want)
    }
}
