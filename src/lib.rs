//! Crate for exchanging short framed commands with a microcontroller over an
//! unreliable byte stream, such as a USB virtual serial link.
//!
//! A command is a [`Frame`]: a verb and a noun (two little-endian `u16`s)
//! protected by a CRC-16 checksum. On the wire, every frame is preceded by a
//! [`DELIMITER`] byte so that a receiver can realign itself after noise or a
//! partial read.
//!
//! Incoming data is consumed through the [`ByteSource`](source::ByteSource)
//! trait, which decouples the parser from any particular transport. The
//! [`scan`](scan::scan) function drives a byte source and recovers at most one
//! valid frame per call, returning a [`ScanOutcome`](scan::ScanOutcome) that
//! tells the caller whether the frame can be trusted or why nothing usable
//! arrived yet.

pub mod crc;
pub mod frame;
pub mod scan;
pub mod source;

pub use crc::Crc16;
pub use frame::Frame;
pub use scan::{scan, ScanOutcome};
pub use source::{ByteSource, ReadSource, SliceSource, SourceError, SourceReader};

/// Byte marking the start of a frame on the wire.
///
/// The delimiter is not part of the [`Frame`] value and is not covered by its
/// checksum.
pub const DELIMITER: u8 = b'{';
