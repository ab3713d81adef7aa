use super::{read_only_error, sub_slice, write_only_error};
use crate::message::convert;
use crate::utils::error::{JmsError, Result};
use crate::wire::{self, Value, WireReader, WireWriter};

/// Byte-array entry being handed out in slices by `read_bytes`.
#[derive(Debug, Clone)]
struct Chunked {
    bytes: Vec<u8>,
    pos: usize,
    started: bool,
}

#[derive(Debug, Clone)]
enum State {
    Writing(WireWriter),
    Reading {
        data: Vec<u8>,
        pos: usize,
        chunked: Option<Chunked>,
    },
}

impl Default for State {
    fn default() -> Self {
        State::Writing(WireWriter::new())
    }
}

/// Ordered sequence of tagged values.
///
/// Typed reads convert the next entry through the conversion table; when
/// the entry cannot be converted the read fails and the position stays on
/// that entry.
#[derive(Debug, Clone, Default)]
pub struct StreamBody {
    state: State,
}

impl StreamBody {
    pub fn is_read_only(&self) -> bool {
        matches!(self.state, State::Reading { .. })
    }

    /// Freezes the body and rewinds to the first entry.
    pub fn reset(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            State::Writing(w) => State::Reading {
                data: w.into_inner(),
                pos: 0,
                chunked: None,
            },
            State::Reading { data, .. } => State::Reading {
                data,
                pos: 0,
                chunked: None,
            },
        };
    }

    fn writer(&mut self) -> Result<&mut WireWriter> {
        match &mut self.state {
            State::Writing(w) => Ok(w),
            State::Reading { .. } => Err(read_only_error()),
        }
    }

    pub fn write_object(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        wire::write_value(self.writer()?, &value)
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_short(&mut self, value: i16) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_long(&mut self, value: i64) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        self.write_object(value)
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        wire::write_byte_array(self.writer()?, value)
    }

    pub fn write_bytes_range(&mut self, value: &[u8], offset: usize, len: usize) -> Result<()> {
        let slice = sub_slice(value, offset, len)?;
        self.write_bytes(slice)
    }

    /// Reads the next entry and converts it, committing the new position
    /// only when both steps succeed.
    fn read_with<T>(&mut self, convert: impl FnOnce(Value) -> Result<T>) -> Result<T> {
        let State::Reading { data, pos, chunked } = &mut self.state else {
            return Err(write_only_error());
        };
        if chunked.is_some() {
            return Err(JmsError::format(
                "a byte array read is in progress, finish it with read_bytes first",
            ));
        }
        let mut r = WireReader::new(data);
        r.seek(*pos);
        let value = wire::read_value(&mut r)?;
        let next = r.position();
        let out = convert(value)?;
        *pos = next;
        Ok(out)
    }

    pub fn read_object(&mut self) -> Result<Value> {
        self.read_with(Ok)
    }

    pub fn read_boolean(&mut self) -> Result<bool> {
        self.read_with(|v| convert::to_boolean(&v))
    }

    pub fn read_byte(&mut self) -> Result<i8> {
        self.read_with(|v| convert::to_byte(&v))
    }

    pub fn read_short(&mut self) -> Result<i16> {
        self.read_with(|v| convert::to_short(&v))
    }

    pub fn read_char(&mut self) -> Result<char> {
        self.read_with(|v| convert::to_char(&v))
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.read_with(|v| convert::to_int(&v))
    }

    pub fn read_long(&mut self) -> Result<i64> {
        self.read_with(|v| convert::to_long(&v))
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.read_with(|v| convert::to_float(&v))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.read_with(|v| convert::to_double(&v))
    }

    pub fn read_string(&mut self) -> Result<Option<String>> {
        self.read_with(|v| convert::to_string(&v))
    }

    /// Reads a byte-array entry in slices.
    ///
    /// Successive calls fill `buf` from the same entry and return the
    /// number of bytes copied; once the entry is used up the next call
    /// returns `None` and the following read moves on to the next entry.
    /// An empty array yields `Some(0)` once, then `None`. A null entry
    /// returns `None` straight away.
    ///
    /// # Errors
    ///
    /// `Format` when the next entry is neither a byte array nor null; the
    /// position is left on that entry.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        let State::Reading { data, pos, chunked } = &mut self.state else {
            return Err(write_only_error());
        };
        if chunked.is_none() {
            let mut r = WireReader::new(data);
            r.seek(*pos);
            match wire::read_value(&mut r)? {
                Value::Null => {
                    *pos = r.position();
                    return Ok(None);
                }
                Value::Bytes(bytes) => {
                    *pos = r.position();
                    *chunked = Some(Chunked {
                        bytes,
                        pos: 0,
                        started: false,
                    });
                }
                other => {
                    return Err(JmsError::format(format!(
                        "next stream entry is a {}, not a byte array",
                        other.type_name()
                    )));
                }
            }
        }
        let Some(field) = chunked.as_mut() else {
            return Ok(None);
        };
        let remaining = field.bytes.len() - field.pos;
        if remaining == 0 && field.started {
            *chunked = None;
            return Ok(None);
        }
        let n = remaining.min(buf.len());
        buf[..n].copy_from_slice(&field.bytes[field.pos..field.pos + n]);
        field.pos += n;
        field.started = true;
        Ok(Some(n))
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
                chunked: None,
            },
        }
    }
}
