//! The resynchronizing frame scanner.
//!
//! [`scan`] hunts byte by byte for a delimiter, then collects the six frame
//! bytes that follow it and validates their checksum. Because every frame
//! starts with a delimiter, a stream corrupted by noise or a truncated write
//! costs at most one frame before the next delimiter realigns parsing. The
//! price of that self-healing is the occasional rescan of discarded bytes
//! across calls, which is fine for low-rate telemetry and wrong for
//! high-throughput links.

use log::trace;

use crate::frame::Frame;
use crate::source::{ByteSource, SourceError};
use crate::DELIMITER;

/// The result of a single [`scan`] pass over a byte source.
///
/// All four outcomes are ordinary results of parsing an unreliable stream;
/// none of them indicate a fault in the caller or the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A complete frame passed validation and now fills the scratch frame.
    Success,

    /// The source had no bytes at all. Wait for data and poll again.
    SourceEmpty,

    /// The available bytes did not contain a complete valid frame. Bytes
    /// pulled while searching have been consumed and will not be seen again.
    FrameNotFound,

    /// A complete candidate frame failed validation and was discarded.
    BadChecksum,
}

impl ScanOutcome {
    /// Whether the scratch frame holds a newly received valid frame.
    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Success)
    }
}

/// Scanner state while walking the window of available bytes.
enum ScanState {
    /// Hunting for the delimiter; everything else is discarded.
    Searching,
    /// A delimiter was seen and this many frame bytes have been captured.
    Capturing(usize),
}

/// Attempts to extract one frame from `source`, filling `frame` on success.
///
/// The number of available bytes is observed once at entry and at most that
/// many bytes are pulled; data arriving later is invisible until the next
/// call. The call never blocks and never retries, so polling `scan` again on
/// a later tick is the whole retry story.
///
/// On anything other than [`ScanOutcome::Success`], the contents of `frame`
/// are unspecified and must not be used.
///
/// # Errors
///
/// A transport fault from the source is propagated unchanged. Running out of
/// data on the very last byte of the window is expected (the source may have
/// overestimated) and reports [`ScanOutcome::FrameNotFound`] instead.
pub fn scan<S: ByteSource>(source: &mut S, frame: &mut Frame) -> Result<ScanOutcome, SourceError> {
    let window = source.available();
    if window == 0 {
        return Ok(ScanOutcome::SourceEmpty);
    }

    let mut state = ScanState::Searching;
    for pulled in 0..window {
        if matches!(state, ScanState::Searching) && window - pulled < Frame::LEN {
            // Too few bytes left to complete a frame. Leave them unpulled so
            // the next call sees them again, with more data behind them.
            return Ok(ScanOutcome::FrameNotFound);
        }

        let byte = match source.pull_byte() {
            Ok(byte) => byte,
            Err(SourceError::Exhausted) if pulled == window - 1 => break,
            Err(fault) => return Err(fault),
        };

        state = match state {
            ScanState::Searching if byte == DELIMITER => ScanState::Capturing(0),
            ScanState::Searching => ScanState::Searching,
            ScanState::Capturing(have) => {
                frame.0[have] = byte;
                if have + 1 < Frame::LEN {
                    ScanState::Capturing(have + 1)
                } else if frame.is_valid() {
                    return Ok(ScanOutcome::Success);
                } else {
                    trace!(
                        "discarded frame candidate: stored checksum {:04x}, computed {:04x}",
                        frame.stored_checksum(),
                        frame.computed_checksum()
                    );
                    return Ok(ScanOutcome::BadChecksum);
                }
            }
        };
    }
    Ok(ScanOutcome::FrameNotFound)
}
