use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong between a raw NMEA line and a typed message.
///
/// Every failure is surfaced as one of these variants; the library never
/// signals errors through sentinel return values.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// NMEA checksum missing, malformed, or mismatched.
    #[error("bad checksum: {0}")]
    BadChecksum(String),

    /// Sentence structure does not match `!AIVDM,...*HH`.
    #[error("malformed sentence: {0}")]
    BadFormat(String),

    /// Fragment index, count, channel, group id, or fill bits out of range.
    #[error("bad fragment: {0}")]
    BadFragment(String),

    /// No decoder registered for this 6-bit message type.
    #[error("unsupported message type {0}")]
    UnsupportedType(u8),

    /// Character outside the two legal armor ranges.
    #[error("illegal payload character {0:?}")]
    BadArmor(char),

    /// Bit access past the end of a `BitString`.
    #[error("bit range {start}+{count} out of bounds for length {len}")]
    OutOfRange {
        start: usize,
        count: usize,
        len: usize,
    },

    /// Integer access wider than 64 bits.
    #[error("cannot access {0} bits as one integer")]
    BadWidth(usize),

    /// String access whose bit count is not a multiple of 6, or a string
    /// that does not fit the field.
    #[error("bad string field width of {0} bits")]
    BadAlignment(usize),

    /// A typed decoder ran out of bits mid-field.
    #[error("message truncated: needed {needed} bits, have {have}")]
    Truncated { needed: usize, have: usize },
}
