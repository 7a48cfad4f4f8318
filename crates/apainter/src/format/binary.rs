//! Binary `.apa` layout. All values little-endian.
//!
//! ```text
//! magic          string "apainter"
//! version        u16
//! brush count    u8
//! brush names    brush count x string
//! stroke count   u32
//! strokes        stroke count x {
//!     brush index  u8
//!     color        3 x f32
//!     size         f32
//!     point count  u32
//!     points       point count x {
//!         position     3 x f32
//!         orientation  4 x f32
//!         pressure     f32
//!         timestamp    u32
//!     }
//! }
//! ```

use tracing::debug;

use super::{Document, FormatError, LoadError, StrokeRecord};
use crate::codec::{BinaryReader, BinaryWriter, CodecError, encoded_string_len};
use crate::constants::{MAGIC, POINT_BYTE_WIDTH, STROKE_HEADER_BYTE_WIDTH};
use crate::types::Point;

/// Magic, version, brush count and stroke count, excluding brush names.
fn fixed_header_len() -> usize {
    encoded_string_len(MAGIC) + 2 + 1 + 4
}

/// Exact encoded size of a document, computed before any byte is written.
pub fn encoded_len(document: &Document) -> usize {
    let names: usize = document
        .brushes
        .iter()
        .map(|name| encoded_string_len(name))
        .sum();
    let strokes: usize = document
        .strokes
        .iter()
        .map(|stroke| STROKE_HEADER_BYTE_WIDTH + POINT_BYTE_WIDTH * stroke.points.len())
        .sum();
    fixed_header_len() + names + strokes
}

/// Encode a document into a buffer sized by [`encoded_len`].
pub fn encode(document: &Document) -> Result<Vec<u8>, FormatError> {
    let brush_count = u8::try_from(document.brushes.len())
        .map_err(|_| FormatError::TooManyBrushes(document.brushes.len()))?;
    let stroke_count = u32::try_from(document.strokes.len())
        .map_err(|_| FormatError::TooManyStrokes(document.strokes.len()))?;

    let mut writer = BinaryWriter::with_len(encoded_len(document));
    writer.write_string(MAGIC)?;
    writer.write_u16(document.version)?;
    writer.write_u8(brush_count)?;
    for name in &document.brushes {
        writer.write_string(name)?;
    }

    writer.write_u32(stroke_count)?;
    for stroke in &document.strokes {
        encode_stroke(&mut writer, stroke, document.brushes.len())?;
    }

    let bytes = writer.finish()?;
    debug!(
        "binary::encode: {} brushes, {} strokes, {} bytes",
        brush_count,
        stroke_count,
        bytes.len()
    );
    Ok(bytes)
}

fn encode_stroke(
    writer: &mut BinaryWriter,
    stroke: &StrokeRecord,
    brush_count: usize,
) -> Result<(), FormatError> {
    // The brush table is capped at 255 entries, so a valid index fits a u8
    let brush_index = u8::try_from(stroke.brush_index)
        .ok()
        .filter(|&index| (index as usize) < brush_count)
        .ok_or(FormatError::InvalidBrushIndex {
            index: stroke.brush_index,
            brushes: brush_count,
        })?;
    let point_count = u32::try_from(stroke.points.len())
        .map_err(|_| FormatError::TooManyPoints(stroke.points.len()))?;

    writer.write_u8(brush_index)?;
    writer.write_color(stroke.color)?;
    writer.write_f32(stroke.size)?;
    writer.write_u32(point_count)?;

    for point in &stroke.points {
        writer.write_vec3(point.position)?;
        writer.write_quat(point.orientation)?;
        writer.write_f32(point.pressure)?;
        writer.write_u32(point.timestamp)?;
    }
    Ok(())
}

/// Decode a whole document.
///
/// Fails with [`LoadError::InvalidFormat`] unless the buffer starts with the
/// `apainter` tag. Version checks are left to the caller. Returns the number
/// of unread trailing bytes alongside the document.
pub fn decode(bytes: &[u8]) -> Result<(Document, usize), LoadError> {
    let mut reader = BinaryReader::new(bytes);

    match reader.read_string() {
        Ok(magic) if magic == MAGIC => {}
        Ok(magic) => return Err(LoadError::InvalidFormat { found: Some(magic) }),
        Err(_) => return Err(LoadError::InvalidFormat { found: None }),
    }

    let version = reader.read_u16()?;

    let brush_count = reader.read_u8()?;
    let brushes = (0..brush_count)
        .map(|_| reader.read_string())
        .collect::<Result<Vec<_>, CodecError>>()?;

    let stroke_count = reader.read_u32()?;
    // Capacity is bounded by what the remaining bytes could hold
    let max_strokes = reader.remaining() / STROKE_HEADER_BYTE_WIDTH;
    let mut strokes = Vec::with_capacity((stroke_count as usize).min(max_strokes));
    for _ in 0..stroke_count {
        strokes.push(decode_stroke(&mut reader)?);
    }

    let document = Document {
        version,
        brushes,
        strokes,
    };
    Ok((document, reader.remaining()))
}

fn decode_stroke(reader: &mut BinaryReader<'_>) -> Result<StrokeRecord, CodecError> {
    let brush_index = reader.read_u8()? as usize;
    let color = reader.read_color()?;
    let size = reader.read_f32()?;
    let point_count = reader.read_u32()? as usize;

    let mut points = Vec::with_capacity(point_count.min(reader.remaining() / POINT_BYTE_WIDTH));
    for _ in 0..point_count {
        points.push(Point {
            position: reader.read_vec3()?,
            orientation: reader.read_quat()?,
            pressure: reader.read_f32()?,
            timestamp: reader.read_u32()?,
        });
    }

    Ok(StrokeRecord {
        brush_index,
        color,
        size,
        points,
    })
}
