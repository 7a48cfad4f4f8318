//! Fixed-size cursor writer.

use glam::{Quat, Vec3};

use super::MAX_STRING_LEN;
use super::error::CodecError;
use crate::types::Color;

/// Writes primitives into a buffer whose size is known up front.
///
/// The buffer never grows; writing past its end is an error, and
/// [`BinaryWriter::finish`] fails unless every byte was written.
#[derive(Debug)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
    cursor: usize,
}

impl BinaryWriter {
    /// Create a writer over a zeroed buffer of exactly `len` bytes.
    pub fn with_len(len: usize) -> Self {
        Self {
            buffer: vec![0; len],
            cursor: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Claim the next `width` bytes and advance the cursor.
    fn advance(&mut self, width: usize) -> Result<&mut [u8], CodecError> {
        if width > self.remaining() {
            return Err(CodecError::BufferOverflow {
                offset: self.cursor,
                needed: width,
                capacity: self.buffer.len(),
            });
        }
        let start = self.cursor;
        self.cursor += width;
        Ok(&mut self.buffer[start..self.cursor])
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.advance(1)?[0] = value;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.advance(2)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), CodecError> {
        self.advance(4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), CodecError> {
        self.advance(4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Batched f32 write; identical bytes to one `write_f32` per element.
    pub fn write_f32_slice(&mut self, values: &[f32]) -> Result<(), CodecError> {
        let out = self.advance(values.len() * 4)?;
        for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    /// One-byte length prefix followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) -> Result<(), CodecError> {
        let bytes = value.as_bytes();
        if bytes.len() > MAX_STRING_LEN {
            return Err(CodecError::StringTooLong(bytes.len()));
        }
        self.write_u8(bytes.len() as u8)?;
        self.advance(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_color(&mut self, color: Color) -> Result<(), CodecError> {
        self.write_f32_slice(&color.to_array())
    }

    pub fn write_vec3(&mut self, value: Vec3) -> Result<(), CodecError> {
        self.write_f32_slice(&value.to_array())
    }

    pub fn write_quat(&mut self, value: Quat) -> Result<(), CodecError> {
        self.write_f32_slice(&value.to_array())
    }

    /// Hand back the buffer, checking that it was filled exactly.
    pub fn finish(self) -> Result<Vec<u8>, CodecError> {
        if self.cursor != self.buffer.len() {
            return Err(CodecError::LengthMismatch {
                expected: self.buffer.len(),
                written: self.cursor,
            });
        }
        Ok(self.buffer)
    }
}
