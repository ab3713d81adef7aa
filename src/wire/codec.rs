//! Tagged value and map framing.
//!
//! Value: `[tag:1][payload]`, byte array: `[tag:1][length:4][bytes]`,
//! map: `[count:4]` then `count` times `[key:utf][value]`.

use std::collections::HashMap;

use super::io::{WireReader, WireWriter};
use super::value::{ObjectType, Value};
use crate::utils::error::{JmsError, Result};

/// Writes one tagged value.
///
/// # Errors
///
/// `Format` for a char outside the BMP, a string whose encoding is too long,
/// or a byte array longer than `i32::MAX`. The writer is left unchanged on
/// error.
pub fn write_value(w: &mut WireWriter, value: &Value) -> Result<()> {
    let mut scratch = WireWriter::new();
    scratch.write_u8(value.object_type().tag());
    match value {
        Value::Null => {}
        Value::Boolean(v) => scratch.write_bool(*v),
        Value::Byte(v) => scratch.write_i8(*v),
        Value::Char(v) => scratch.write_char(*v)?,
        Value::Short(v) => scratch.write_i16(*v),
        Value::Int(v) => scratch.write_i32(*v),
        Value::Long(v) => scratch.write_i64(*v),
        Value::Float(v) => scratch.write_f32(*v),
        Value::Double(v) => scratch.write_f64(*v),
        Value::String(v) => scratch.write_utf(v)?,
        Value::Bytes(v) => {
            let len = i32::try_from(v.len())
                .map_err(|_| JmsError::format(format!("byte array of {} bytes is too long", v.len())))?;
            scratch.write_i32(len);
            scratch.write_raw(v);
        }
    }
    w.write_raw(scratch.as_slice());
    Ok(())
}

/// Writes a byte-array field from a slice of a caller buffer.
pub fn write_byte_array(w: &mut WireWriter, bytes: &[u8]) -> Result<()> {
    let len = i32::try_from(bytes.len())
        .map_err(|_| JmsError::format(format!("byte array of {} bytes is too long", bytes.len())))?;
    w.write_u8(ObjectType::ByteArray.tag());
    w.write_i32(len);
    w.write_raw(bytes);
    Ok(())
}

/// Reads one tagged value.
///
/// # Errors
///
/// `Format` for an unknown tag, a negative byte-array length or malformed
/// string data; `Eof` when the input ends inside the value.
pub fn read_value(r: &mut WireReader<'_>) -> Result<Value> {
    let tag = r.read_u8()?;
    let kind = ObjectType::from_tag(tag)
        .ok_or_else(|| JmsError::format(format!("invalid type read: {tag}")))?;
    Ok(match kind {
        ObjectType::Null => Value::Null,
        ObjectType::Boolean => Value::Boolean(r.read_bool()?),
        ObjectType::Byte => Value::Byte(r.read_i8()?),
        ObjectType::Char => Value::Char(r.read_char()?),
        ObjectType::Short => Value::Short(r.read_i16()?),
        ObjectType::Int => Value::Int(r.read_i32()?),
        ObjectType::Long => Value::Long(r.read_i64()?),
        ObjectType::Float => Value::Float(r.read_f32()?),
        ObjectType::Double => Value::Double(r.read_f64()?),
        ObjectType::String => Value::String(r.read_utf()?),
        ObjectType::ByteArray => {
            let len = r.read_i32()?;
            let len = usize::try_from(len)
                .map_err(|_| JmsError::format(format!("invalid byte array length: {len}")))?;
            Value::Bytes(r.read_exact(len)?.to_vec())
        }
    })
}

/// Writes a map as count-prefixed `(key, value)` pairs.
pub fn write_map(w: &mut WireWriter, map: &HashMap<String, Value>) -> Result<()> {
    let count = i32::try_from(map.len())
        .map_err(|_| JmsError::format(format!("map of {} entries is too large", map.len())))?;
    w.write_i32(count);
    for (key, value) in map {
        w.write_utf(key)?;
        write_value(w, value)?;
    }
    Ok(())
}

/// Reads a count-prefixed map. Later duplicates of a key win.
///
/// # Errors
///
/// `Format` for a negative count or a corrupt entry, `Eof` when the input
/// ends before `count` entries were read.
pub fn read_map(r: &mut WireReader<'_>) -> Result<HashMap<String, Value>> {
    let count = r.read_i32()?;
    if count < 0 {
        return Err(JmsError::format(format!("invalid map size: {count}")));
    }
    let mut map = HashMap::new();
    for _ in 0..count {
        let key = r.read_utf()?;
        let value = read_value(r)?;
        map.insert(key, value);
    }
    Ok(map)
}

pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut w = WireWriter::new();
    write_value(&mut w, value)?;
    Ok(w.into_inner())
}

pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    read_value(&mut WireReader::new(bytes))
}

pub fn encode_map(map: &HashMap<String, Value>) -> Result<Vec<u8>> {
    let mut w = WireWriter::new();
    write_map(&mut w, map)?;
    Ok(w.into_inner())
}

pub fn decode_map(bytes: &[u8]) -> Result<HashMap<String, Value>> {
    read_map(&mut WireReader::new(bytes))
}
