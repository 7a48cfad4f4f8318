/// Magic tag at the start of every binary painting.
pub const MAGIC: &str = "apainter";

/// The only format version written and fully understood.
pub const FORMAT_VERSION: u16 = 1;

/// Decimal places kept by the structured format.
pub const STRUCTURED_PRECISION: i32 = 6;

/// position (12) + orientation (16) + pressure (4) + timestamp (4).
pub const POINT_BYTE_WIDTH: usize = 36;

/// brush index (1) + color (12) + size (4) + point count (4).
pub const STROKE_HEADER_BYTE_WIDTH: usize = 21;

/// Width of the length prefix in front of every string.
pub const STRING_LENGTH_PREFIX: usize = 1;

/// File extension of binary paintings.
pub const BINARY_EXTENSION: &str = "apa";

/// File extension of structured paintings.
pub const STRUCTURED_EXTENSION: &str = "json";
