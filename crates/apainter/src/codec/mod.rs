//! Cursor-based little-endian binary codec
//!
//! [`BinaryWriter`] and [`BinaryReader`] expose paired primitives with exact
//! byte widths. Every `write_*` has a `read_*` that consumes the same number
//! of bytes:
//!
//! | primitive  | width                         |
//! |------------|-------------------------------|
//! | u8         | 1                             |
//! | u16        | 2                             |
//! | u32 / f32  | 4                             |
//! | string     | 1 (length) + UTF-8 bytes      |
//! | color      | 3 x f32                       |
//! | vector3    | 3 x f32                       |
//! | quaternion | 4 x f32 (x, y, z, w)          |

mod error;
mod reader;
mod writer;

pub use error::CodecError;
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

use crate::constants::STRING_LENGTH_PREFIX;

/// Longest string the one-byte length prefix can describe
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

/// Encoded width of a length-prefixed string
pub fn encoded_string_len(value: &str) -> usize {
    STRING_LENGTH_PREFIX + value.len()
}
