//! Error types for the binary codec.

/// Errors raised by [`super::BinaryReader`] and [`super::BinaryWriter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Unexpected end of data at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Buffer overflow at offset {offset}: needed {needed} bytes, capacity {capacity}")]
    BufferOverflow {
        offset: usize,
        needed: usize,
        capacity: usize,
    },
    #[error("Invalid UTF-8 string at offset {offset}")]
    InvalidString { offset: usize },
    #[error("String of {0} bytes does not fit a one-byte length prefix")]
    StringTooLong(usize),
    #[error("Buffer length mismatch: expected {expected} bytes, wrote {written}")]
    LengthMismatch { expected: usize, written: usize },
}
