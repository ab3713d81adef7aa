//! Big-endian primitive reader/writer and modified UTF-8 strings.
//!
//! The layout matches the classic `DataOutputStream` framing: multi-byte
//! numbers are big-endian, floats travel as their IEEE-754 bit patterns,
//! chars as one UTF-16 code unit and strings as a `u16` byte length followed
//! by modified UTF-8 (NUL is `C0 80`, supplementary characters are written
//! as two three-byte surrogates).

use bytes::{Buf, BufMut, BytesMut};

use crate::utils::error::{JmsError, Result};

/// Longest encoded string a `u16` length prefix can describe.
pub const MAX_UTF_LENGTH: usize = u16::MAX as usize;

/// Append-only byte sink.
#[derive(Debug, Default, Clone)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    /// Writes a char as a single UTF-16 code unit.
    ///
    /// # Errors
    ///
    /// Returns `Format` for characters outside the Basic Multilingual Plane.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        let code = u32::from(value);
        let unit = u16::try_from(code).map_err(|_| {
            JmsError::format(format!(
                "char U+{code:04X} does not fit in a single UTF-16 code unit"
            ))
        })?;
        self.buf.put_u16(unit);
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Writes `value` as a length-prefixed modified UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `Format` when the encoding exceeds [`MAX_UTF_LENGTH`] bytes;
    /// nothing is written in that case.
    pub fn write_utf(&mut self, value: &str) -> Result<()> {
        let encoded = encode_modified_utf8(value);
        let len = u16::try_from(encoded.len()).map_err(|_| {
            JmsError::format(format!(
                "encoded string is {} bytes, limit is {MAX_UTF_LENGTH}",
                encoded.len()
            ))
        })?;
        self.buf.reserve(2 + encoded.len());
        self.buf.put_u16(len);
        self.buf.put_slice(&encoded);
        Ok(())
    }
}

/// Cursor over a borrowed byte slice.
///
/// A read that runs out of data fails with `Eof` and does not move the
/// cursor.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    // unread tail of `data`
    cursor: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: data }
    }

    pub fn position(&self) -> usize {
        self.data.len() - self.cursor.remaining()
    }

    /// Moves the cursor back to a previously observed position.
    pub fn seek(&mut self, pos: usize) {
        self.cursor = &self.data[pos.min(self.data.len())..];
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn is_exhausted(&self) -> bool {
        !self.cursor.has_remaining()
    }

    /// Checked before every `Buf::get_*`, which would panic on short input.
    fn need(&self, n: usize, what: &str) -> Result<()> {
        if self.cursor.remaining() < n {
            return Err(JmsError::eof(format!(
                "need {n} bytes to read {what}, have {}",
                self.cursor.remaining()
            )));
        }
        Ok(())
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        self.need(n, what)?;
        let (head, tail) = self.cursor.split_at(n);
        self.cursor = tail;
        Ok(head)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.need(1, "byte")?;
        Ok(self.cursor.get_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.need(1, "byte")?;
        Ok(self.cursor.get_i8())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.need(1, "boolean")?;
        Ok(self.cursor.get_u8() != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.need(2, "short")?;
        Ok(self.cursor.get_i16())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.need(2, "unsigned short")?;
        Ok(self.cursor.get_u16())
    }

    /// Reads one UTF-16 code unit as a char.
    ///
    /// # Errors
    ///
    /// `Eof` on short input, `Format` for a lone surrogate (the cursor still
    /// advances past it).
    pub fn read_char(&mut self) -> Result<char> {
        self.need(2, "char")?;
        let unit = self.cursor.get_u16();
        char::from_u32(u32::from(unit)).ok_or_else(|| {
            JmsError::format(format!("code unit {unit:#06x} is a lone surrogate"))
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.need(4, "int")?;
        Ok(self.cursor.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.need(8, "long")?;
        Ok(self.cursor.get_i64())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.need(4, "float")?;
        Ok(self.cursor.get_f32())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.need(8, "double")?;
        Ok(self.cursor.get_f64())
    }

    /// Borrows exactly `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n, "byte array")
    }

    /// Copies as many bytes as fit into `buf`.
    ///
    /// Returns `None` once no data is left (and `buf` is non-empty).
    pub fn read_into(&mut self, buf: &mut [u8]) -> Option<usize> {
        if buf.is_empty() {
            return Some(0);
        }
        if self.is_exhausted() {
            return None;
        }
        let n = buf.len().min(self.cursor.remaining());
        self.cursor.copy_to_slice(&mut buf[..n]);
        Some(n)
    }

    /// Reads a length-prefixed modified UTF-8 string.
    pub fn read_utf(&mut self) -> Result<String> {
        let start = self.cursor;
        let len = usize::from(self.read_u16()?);
        let bytes = match self.take(len, "string") {
            Ok(bytes) => bytes,
            Err(err) => {
                self.cursor = start;
                return Err(err);
            }
        };
        decode_modified_utf8(bytes)
    }
}

/// Encodes a string as modified UTF-8, without the length prefix.
pub fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) as u8 & 0x1F));
                out.push(0x80 | (unit as u8 & 0x3F));
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) as u8 & 0x0F));
                out.push(0x80 | ((unit >> 6) as u8 & 0x3F));
                out.push(0x80 | (unit as u8 & 0x3F));
            }
        }
    }
    out
}

/// Decodes modified UTF-8 bytes (no length prefix).
///
/// # Errors
///
/// `Format` for truncated or malformed sequences and for surrogates that do
/// not pair up.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(u16::from(b));
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            let b2 = continuation(bytes, i + 1)?;
            units.push((u16::from(b & 0x1F) << 6) | u16::from(b2 & 0x3F));
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            let b2 = continuation(bytes, i + 1)?;
            let b3 = continuation(bytes, i + 2)?;
            units.push(
                (u16::from(b & 0x0F) << 12) | (u16::from(b2 & 0x3F) << 6) | u16::from(b3 & 0x3F),
            );
            i += 3;
        } else {
            return Err(JmsError::format(format!(
                "malformed modified UTF-8 at byte {i}"
            )));
        }
    }
    String::from_utf16(&units)
        .map_err(|_| JmsError::format("modified UTF-8 contains an unpaired surrogate"))
}

fn continuation(bytes: &[u8], at: usize) -> Result<u8> {
    match bytes.get(at) {
        Some(b) if b & 0xC0 == 0x80 => Ok(*b),
        Some(_) => Err(JmsError::format(format!(
            "malformed modified UTF-8 continuation at byte {at}"
        ))),
        None => Err(JmsError::format("truncated modified UTF-8 sequence")),
    }
}
