//! In-band block header codec.
//!
//! Every block in the arena starts with a 4-byte header made of two
//! big-endian 16-bit fields:
//!
//! ```text
//! byte  0      1      2      3
//!     ┌─────────────┬─────────────┐
//!     │ length_words│    flag     │
//!     └─────────────┴─────────────┘
//! ```
//!
//! `length_words` counts payload words (2 bytes each). The flag is `0` for a
//! free block and `1` for an occupied one; any other value is corruption.
//! The sentinel that terminates the arena is a zero-length occupied header.

use std::error::Error;
use std::fmt;

/// Size of a block header in bytes.
pub const HEADER_BYTES: usize = 4;

/// Size of one allocation unit in bytes.
pub const WORD_BYTES: usize = 2;

/// Header words reclaimed when one block absorbs its neighbour.
pub const HEADER_WORDS: u16 = (HEADER_BYTES / WORD_BYTES) as u16;

const FLAG_FREE: u16 = 0;
const FLAG_OCCUPIED: u16 = 1;

/// Number of words needed to hold `bytes` bytes (rounded up).
///
/// Byte-oriented callers use this to translate their lengths into the
/// allocator's word unit.
pub const fn words_for_bytes(bytes: usize) -> usize {
    bytes.div_ceil(WORD_BYTES)
}

/// Decoded block header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Payload length in words.
    pub length_words: u16,
    /// Whether the block is currently handed out to a caller.
    pub occupied: bool,
}

impl Header {
    /// The header written at the arena's logical end.
    pub const SENTINEL: Header = Header {
        length_words: 0,
        occupied: true,
    };

    /// A free block header with the given payload length.
    pub const fn free(length_words: u16) -> Self {
        Self {
            length_words,
            occupied: false,
        }
    }

    /// An occupied block header with the given payload length.
    pub const fn occupied(length_words: u16) -> Self {
        Self {
            length_words,
            occupied: true,
        }
    }

    /// Payload size in bytes.
    pub const fn payload_bytes(&self) -> usize {
        self.length_words as usize * WORD_BYTES
    }

    /// Header plus payload, in bytes.
    pub const fn block_bytes(&self) -> usize {
        HEADER_BYTES + self.payload_bytes()
    }

    /// Encode into the 4-byte on-arena form.
    pub fn encode(&self) -> [u8; HEADER_BYTES] {
        let flag = if self.occupied {
            FLAG_OCCUPIED
        } else {
            FLAG_FREE
        };
        let [l0, l1] = self.length_words.to_be_bytes();
        let [f0, f1] = flag.to_be_bytes();
        [l0, l1, f0, f1]
    }

    /// Decode from the 4-byte on-arena form.
    pub fn decode(bytes: [u8; HEADER_BYTES]) -> Result<Self, HeaderError> {
        let length_words = u16::from_be_bytes([bytes[0], bytes[1]]);
        let occupied = match u16::from_be_bytes([bytes[2], bytes[3]]) {
            FLAG_FREE => false,
            FLAG_OCCUPIED => true,
            value => return Err(HeaderError::BadFlag { value }),
        };
        Ok(Self {
            length_words,
            occupied,
        })
    }
}

/// A header whose bytes do not form a valid encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderError {
    /// The occupied-flag field holds something other than 0 or 1.
    BadFlag {
        /// The raw flag value found.
        value: u16,
    },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFlag { value } => write!(f, "bad occupied flag {value:#06x}"),
        }
    }
}

impl Error for HeaderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_big_endian_length_then_flag() {
        assert_eq!(Header::occupied(0x0102).encode(), [0x01, 0x02, 0x00, 0x01]);
        assert_eq!(Header::free(7).encode(), [0x00, 0x07, 0x00, 0x00]);
    }

    #[test]
    fn decode_inverts_encode_at_the_extremes() {
        for header in [Header::free(0), Header::occupied(u16::MAX), Header::SENTINEL] {
            assert_eq!(Header::decode(header.encode()), Ok(header));
        }
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Header::decode([0, 4, 0, 2]).unwrap_err();
        assert_eq!(err, HeaderError::BadFlag { value: 2 });
        assert!(Header::decode([0, 4, 0x80, 0x01]).is_err());
    }

    #[test]
    fn sizes_count_the_header() {
        let h = Header::free(5);
        assert_eq!(h.payload_bytes(), 10);
        assert_eq!(h.block_bytes(), 14);
        assert_eq!(Header::SENTINEL.block_bytes(), HEADER_BYTES);
    }

    #[test]
    fn byte_lengths_round_up_to_words() {
        assert_eq!(words_for_bytes(0), 0);
        assert_eq!(words_for_bytes(1), 1);
        assert_eq!(words_for_bytes(2), 1);
        assert_eq!(words_for_bytes(3), 2);
        assert_eq!(words_for_bytes(131_070), 65_535);
    }
}
