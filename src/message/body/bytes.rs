use super::{read_only_error, sub_slice, write_only_error};
use crate::utils::error::{JmsError, Result};
use crate::wire::{Value, WireReader, WireWriter};

#[derive(Debug, Clone)]
enum State {
    Writing(WireWriter),
    Reading { data: Vec<u8>, pos: usize },
}

impl Default for State {
    fn default() -> Self {
        State::Writing(WireWriter::new())
    }
}

/// Untagged stream of big-endian primitives.
///
/// A new body is write-only. `reset` switches it to read mode (and rewinds
/// it when already reading); from then on writes fail with `NotWritable`
/// until the body is cleared. A read that runs past the end fails with
/// `Eof` and leaves the position where it was.
#[derive(Debug, Clone, Default)]
pub struct BytesBody {
    state: State,
}

impl BytesBody {
    pub fn is_read_only(&self) -> bool {
        matches!(self.state, State::Reading { .. })
    }

    /// Freezes the body and positions it at the start of the data.
    pub fn reset(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            State::Writing(w) => State::Reading {
                data: w.into_inner(),
                pos: 0,
            },
            State::Reading { data, .. } => State::Reading { data, pos: 0 },
        };
    }

    /// Number of bytes in the body; only available in read mode.
    pub fn body_length(&self) -> Result<usize> {
        match &self.state {
            State::Reading { data, .. } => Ok(data.len()),
            State::Writing(_) => Err(write_only_error()),
        }
    }

    fn writer(&mut self) -> Result<&mut WireWriter> {
        match &mut self.state {
            State::Writing(w) => Ok(w),
            State::Reading { .. } => Err(read_only_error()),
        }
    }

    fn read<T>(&mut self, f: impl FnOnce(&mut WireReader<'_>) -> Result<T>) -> Result<T> {
        let State::Reading { data, pos } = &mut self.state else {
            return Err(write_only_error());
        };
        let mut r = WireReader::new(data);
        r.seek(*pos);
        let value = f(&mut r)?;
        *pos = r.position();
        Ok(value)
    }

    pub fn read_boolean(&mut self) -> Result<bool> {
        self.read(|r| r.read_bool())
    }

    pub fn read_byte(&mut self) -> Result<i8> {
        self.read(|r| r.read_i8())
    }

    pub fn read_unsigned_byte(&mut self) -> Result<u8> {
        self.read(|r| r.read_u8())
    }

    pub fn read_short(&mut self) -> Result<i16> {
        self.read(|r| r.read_i16())
    }

    pub fn read_unsigned_short(&mut self) -> Result<u16> {
        self.read(|r| r.read_u16())
    }

    pub fn read_char(&mut self) -> Result<char> {
        self.read(|r| r.read_char())
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.read(|r| r.read_i32())
    }

    pub fn read_long(&mut self) -> Result<i64> {
        self.read(|r| r.read_i64())
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.read(|r| r.read_f32())
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.read(|r| r.read_f64())
    }

    pub fn read_utf(&mut self) -> Result<String> {
        self.read(|r| r.read_utf())
    }

    /// Fills as much of `buf` as the remaining data allows.
    ///
    /// Returns the number of bytes copied, or `None` once the body is
    /// exhausted.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        self.read(|r| Ok(r.read_into(buf)))
    }

    /// Like [`read_bytes`](Self::read_bytes) but copies at most `len` bytes.
    pub fn read_bytes_len(&mut self, buf: &mut [u8], len: usize) -> Result<Option<usize>> {
        if len > buf.len() {
            return Err(JmsError::invalid_argument(format!(
                "length {len} exceeds a buffer of {} bytes",
                buf.len()
            )));
        }
        self.read(|r| Ok(r.read_into(&mut buf[..len])))
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.writer()?.write_bool(value);
        Ok(())
    }

    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.writer()?.write_i8(value);
        Ok(())
    }

    pub fn write_short(&mut self, value: i16) -> Result<()> {
        self.writer()?.write_i16(value);
        Ok(())
    }

    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.writer()?.write_char(value)
    }

    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.writer()?.write_i32(value);
        Ok(())
    }

    pub fn write_long(&mut self, value: i64) -> Result<()> {
        self.writer()?.write_i64(value);
        Ok(())
    }

    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.writer()?.write_f32(value);
        Ok(())
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.writer()?.write_f64(value);
        Ok(())
    }

    pub fn write_utf(&mut self, value: &str) -> Result<()> {
        self.writer()?.write_utf(value)
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.writer()?.write_raw(value);
        Ok(())
    }

    pub fn write_bytes_range(&mut self, value: &[u8], offset: usize, len: usize) -> Result<()> {
        let slice = sub_slice(value, offset, len)?;
        self.write_bytes(slice)
    }

    /// Writes a scalar with the matching primitive writer. Strings go out
    /// as UTF, byte arrays raw; null is rejected.
    pub fn write_object(&mut self, value: impl Into<Value>) -> Result<()> {
        match value.into() {
            Value::Null => Err(JmsError::format("cannot write null to a bytes body")),
            Value::Boolean(v) => self.write_boolean(v),
            Value::Byte(v) => self.write_byte(v),
            Value::Char(v) => self.write_char(v),
            Value::Short(v) => self.write_short(v),
            Value::Int(v) => self.write_int(v),
            Value::Long(v) => self.write_long(v),
            Value::Float(v) => self.write_float(v),
            Value::Double(v) => self.write_double(v),
            Value::String(v) => self.write_utf(&v),
            Value::Bytes(v) => self.write_bytes(&v),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.state = State::default();
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        match &self.state {
            State::Writing(w) => w.as_slice().to_vec(),
            State::Reading { data, .. } => data.clone(),
        }
    }

    pub(crate) fn decode(data: Option<&[u8]>) -> Self {
        Self {
            state: State::Reading {
                data: data.map(<[u8]>::to_vec).unwrap_or_default(),
                pos: 0,
            },
        }
    }
}
