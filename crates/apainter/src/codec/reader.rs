//! Borrowing cursor reader.

use glam::{Quat, Vec3};

use super::error::CodecError;
use crate::types::Color;

/// Reads primitives from a byte slice, mirroring [`super::BinaryWriter`].
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.data.len()
    }

    /// Consume the next `width` bytes.
    fn take(&mut self, width: usize) -> Result<&'a [u8], CodecError> {
        if width > self.remaining() {
            return Err(CodecError::UnexpectedEnd {
                offset: self.cursor,
                needed: width,
                available: self.remaining(),
            });
        }
        let data = self.data;
        let start = self.cursor;
        self.cursor += width;
        Ok(&data[start..self.cursor])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    /// Read `N` consecutive f32 values.
    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N], CodecError> {
        let mut values = [0.0f32; N];
        for value in &mut values {
            *value = self.read_f32()?;
        }
        Ok(values)
    }

    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_u8()? as usize;
        let offset = self.cursor;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidString { offset })
    }

    pub fn read_color(&mut self) -> Result<Color, CodecError> {
        Ok(Color::from_array(self.read_f32_array()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3, CodecError> {
        Ok(Vec3::from_array(self.read_f32_array()?))
    }

    pub fn read_quat(&mut self) -> Result<Quat, CodecError> {
        Ok(Quat::from_array(self.read_f32_array()?))
    }
}
