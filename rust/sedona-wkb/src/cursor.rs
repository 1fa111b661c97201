// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! Endianness-aware byte cursors
//!
//! [ByteReader] and [ByteWriter] carry a mutable [ByteOrder] that governs
//! every subsequent fixed-width read or write until it is changed again. The
//! order is consulted on each call rather than captured when it is set.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::byte_order::ByteOrder;
use crate::error::SedonaWkbError;

/// Maximum number of bytes in a variable length u32
const MAX_VAR_INT_BYTES: usize = 5;

macro_rules! read_ordered {
    ($self:ident, $size:expr, $method:ident) => {{
        let order = $self.byte_order;
        let bytes = $self.take($size)?;
        Ok(match order {
            ByteOrder::BigEndian => BigEndian::$method(bytes),
            ByteOrder::LittleEndian => LittleEndian::$method(bytes),
        })
    }};
}

macro_rules! write_ordered {
    ($self:ident, $size:expr, $method:ident, $value:expr) => {{
        let order = $self.byte_order;
        let bytes = $self.reserve($size)?;
        match order {
            ByteOrder::BigEndian => BigEndian::$method(bytes, $value),
            ByteOrder::LittleEndian => LittleEndian::$method(bytes, $value),
        }
        Ok(())
    }};
}

/// Reads primitives from a borrowed buffer
///
/// The position only ever moves forward and never exceeds the buffer length:
/// a read that would overrun fails with [SedonaWkbError::BufferBounds] and
/// leaves the position untouched.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    position: usize,
    byte_order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    /// Create a big endian reader positioned at the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_byte_order(buf, ByteOrder::BigEndian)
    }

    pub fn with_byte_order(buf: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            buf,
            position: 0,
            byte_order,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Offset of the next byte to be read
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    /// The full underlying buffer, including bytes already consumed
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn read_u8(&mut self) -> Result<u8, SedonaWkbError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, SedonaWkbError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, SedonaWkbError> {
        read_ordered!(self, 2, read_u16)
    }

    pub fn read_i16(&mut self) -> Result<i16, SedonaWkbError> {
        read_ordered!(self, 2, read_i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, SedonaWkbError> {
        read_ordered!(self, 4, read_u32)
    }

    pub fn read_i32(&mut self) -> Result<i32, SedonaWkbError> {
        read_ordered!(self, 4, read_i32)
    }

    pub fn read_f32(&mut self) -> Result<f32, SedonaWkbError> {
        read_ordered!(self, 4, read_f32)
    }

    pub fn read_f64(&mut self) -> Result<f64, SedonaWkbError> {
        read_ordered!(self, 8, read_f64)
    }

    /// Alias for [Self::read_u8], used for byte order indicators
    pub fn read_byte(&mut self) -> Result<u8, SedonaWkbError> {
        self.read_u8()
    }

    /// Alias for [Self::read_u32], used for element counts and type codes
    pub fn read_int(&mut self) -> Result<u32, SedonaWkbError> {
        self.read_u32()
    }

    /// Read an unsigned LEB128 integer (7 data bits per byte, high bit set
    /// on every byte except the last)
    pub fn read_var_int(&mut self) -> Result<u32, SedonaWkbError> {
        let start = self.position;
        let mut result: u64 = 0;
        for i in 0..MAX_VAR_INT_BYTES {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.position = start;
                    return Err(e);
                }
            };
            result |= ((byte & 0x7F) as u64) << (7 * i);
            if byte < 0x80 {
                return match u32::try_from(result) {
                    Ok(value) => Ok(value),
                    Err(e) => {
                        self.position = start;
                        Err(e.into())
                    }
                };
            }
        }

        self.position = start;
        Err(SedonaWkbError::External(
            format!("Variable length integer at offset {start} exceeds {MAX_VAR_INT_BYTES} bytes")
                .into(),
        ))
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8], SedonaWkbError> {
        if self.remaining() < size {
            return Err(SedonaWkbError::BufferBounds {
                offset: self.position,
                needed: size,
                available: self.remaining(),
            });
        }

        let bytes = &self.buf[self.position..self.position + size];
        self.position += size;
        Ok(bytes)
    }
}

/// Writes primitives into an owned buffer
///
/// The buffer is allocated up front. When `allow_resize` is false, a write
/// that does not fit fails with [SedonaWkbError::BufferBounds]; otherwise the
/// buffer is grown to fit and previously written bytes are kept.
#[derive(Debug, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
    position: usize,
    allow_resize: bool,
    byte_order: ByteOrder,
}

impl ByteWriter {
    /// Initial capacity of a [ByteWriter::growable] writer
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize, byte_order: ByteOrder, allow_resize: bool) -> Self {
        Self {
            buf: vec![0; capacity],
            position: 0,
            allow_resize,
            byte_order,
        }
    }

    /// Create a writer that grows as needed
    pub fn growable(byte_order: ByteOrder) -> Self {
        Self::new(Self::DEFAULT_CAPACITY, byte_order, true)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Offset of the next byte to be written
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current size of the underlying buffer
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn allow_resize(&self) -> bool {
        self.allow_resize
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.position]
    }

    /// Consume the writer, returning the bytes written so far
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.truncate(self.position);
        self.buf
    }

    /// Make sure `size` more bytes fit after the current position
    pub fn ensure_size(&mut self, size: usize) -> Result<(), SedonaWkbError> {
        let required = self.position + size;
        if required <= self.buf.len() {
            return Ok(());
        }

        if !self.allow_resize {
            return Err(SedonaWkbError::BufferBounds {
                offset: self.position,
                needed: size,
                available: self.buf.len() - self.position,
            });
        }

        self.buf.resize(required, 0);
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), SedonaWkbError> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<(), SedonaWkbError> {
        self.reserve(1)?[0] = value as u8;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), SedonaWkbError> {
        write_ordered!(self, 2, write_u16, value)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), SedonaWkbError> {
        write_ordered!(self, 2, write_i16, value)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), SedonaWkbError> {
        write_ordered!(self, 4, write_u32, value)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), SedonaWkbError> {
        write_ordered!(self, 4, write_i32, value)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), SedonaWkbError> {
        write_ordered!(self, 4, write_f32, value)
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), SedonaWkbError> {
        write_ordered!(self, 8, write_f64, value)
    }

    /// Alias for [Self::write_u32], used for element counts and type codes
    pub fn write_int(&mut self, value: u32) -> Result<(), SedonaWkbError> {
        self.write_u32(value)
    }

    /// Copy raw bytes into the buffer
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SedonaWkbError> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Write an unsigned LEB128 integer, returning the number of bytes written
    pub fn write_var_int(&mut self, value: u32) -> Result<usize, SedonaWkbError> {
        let mut value = value;
        let mut length = 1;
        while value & 0xFFFF_FF80 != 0 {
            self.write_u8(((value & 0x7F) | 0x80) as u8)?;
            value >>= 7;
            length += 1;
        }

        self.write_u8((value & 0x7F) as u8)?;
        Ok(length)
    }

    fn reserve(&mut self, size: usize) -> Result<&mut [u8], SedonaWkbError> {
        self.ensure_size(size)?;
        let start = self.position;
        self.position += size;
        Ok(&mut self.buf[start..start + size])
    }
}
