use std::fmt;
use std::io::{self, Write};

use crate::crc::Crc16;
use crate::DELIMITER;

/// A fixed-size command frame: a verb, a noun, and a checksum over both.
///
/// All three fields are little-endian `u16`s packed into 6 raw bytes. The
/// checksum covers the 4 payload bytes only; the wire delimiter is written by
/// [`write_to`](Self::write_to) and never stored in the frame itself.
///
/// A frame is designed to be reused as scratch storage across repeated
/// [`scan`](crate::scan::scan) calls. After any call that does not report
/// success its contents are unspecified and must not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame(pub(crate) [u8; 6]);

impl Frame {
    /// Size of a frame in memory, excluding the wire delimiter.
    pub const LEN: usize = 6;

    /// Size of a frame on the wire, including the leading delimiter.
    pub const WIRE_LEN: usize = Self::LEN + 1;

    /// Builds a frame from a verb and noun, computing its checksum.
    pub fn new(verb: u16, noun: u16) -> Self {
        let mut frame = Self([0; 6]);
        frame.0[0..2].copy_from_slice(&verb.to_le_bytes());
        frame.0[2..4].copy_from_slice(&noun.to_le_bytes());
        let crc = frame.computed_checksum();
        frame.0[4..6].copy_from_slice(&crc.to_le_bytes());
        debug_assert_eq!(
            frame.stored_checksum(),
            crc,
            "checksum was not stored correctly"
        );
        frame
    }

    /// Reinterprets 6 raw bytes as a frame without validating them.
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the frame.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// The frame's command opcode.
    pub fn verb(&self) -> u16 {
        u16::from_le_bytes([self.0[0], self.0[1]])
    }

    /// The frame's command operand.
    pub fn noun(&self) -> u16 {
        u16::from_le_bytes([self.0[2], self.0[3]])
    }

    /// The verb and noun fields, in that order.
    pub fn fields(&self) -> (u16, u16) {
        (self.verb(), self.noun())
    }

    /// The checksum carried in the frame's last two bytes.
    pub fn stored_checksum(&self) -> u16 {
        u16::from_le_bytes([self.0[4], self.0[5]])
    }

    /// The checksum of the frame's payload as it currently stands.
    pub fn computed_checksum(&self) -> u16 {
        Crc16::new().add(&self.0[..4]).value()
    }

    /// Whether the stored checksum matches the payload.
    pub fn is_valid(&self) -> bool {
        self.stored_checksum() == self.computed_checksum()
    }

    /// Writes the delimiter followed by the frame's bytes to `writer`.
    ///
    /// Returns the number of bytes written ([`Frame::WIRE_LEN`]) on success.
    /// A write fault is propagated unchanged and leaves the number of bytes
    /// actually written unknown, so callers should treat any error as "frame
    /// not sent" and encode it again.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_all(&[DELIMITER])?;
        writer.write_all(&self.0)?;
        Ok(Self::WIRE_LEN)
    }
}

impl fmt::Display for Frame {
    /// Formats the frame as `verb noun checksum` in hex, for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("invalid checksum");
        }
        let (verb, noun) = self.fields();
        write!(f, "{:x} {:x} {:x}", verb, noun, self.stored_checksum())
    }
}
