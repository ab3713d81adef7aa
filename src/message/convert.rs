//! Read-side conversions shared by properties, map entries and stream
//! entries.
//!
//! Narrower integers widen (`byte → short → int → long`, `float → double`),
//! strings are parsed, a missing or null value goes through the string path
//! as if it were the text `null` (so numbers fail and booleans read
//! `false`). Anything else is a `Format` error naming the stored type.
//! Nothing ever narrows.

use std::str::FromStr;

use crate::utils::error::{JmsError, Result};
use crate::wire::Value;

fn unsupported(value: &Value, target: &str) -> JmsError {
    JmsError::format(format!(
        "unsupported conversion to {target} from type: {}",
        value.type_name()
    ))
}

fn parse<T: FromStr>(text: Option<&str>, target: &str) -> Result<T> {
    let text = text.unwrap_or("null");
    text.parse::<T>()
        .map_err(|_| JmsError::format(format!("cannot parse {text:?} as {target}")))
}

pub fn to_boolean(value: &Value) -> Result<bool> {
    match value {
        Value::Boolean(v) => Ok(*v),
        Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        Value::Null => Ok(false),
        other => Err(unsupported(other, "boolean")),
    }
}

pub fn to_byte(value: &Value) -> Result<i8> {
    match value {
        Value::Byte(v) => Ok(*v),
        Value::String(s) => parse(Some(s), "byte"),
        Value::Null => parse(None, "byte"),
        other => Err(unsupported(other, "byte")),
    }
}

pub fn to_short(value: &Value) -> Result<i16> {
    match value {
        Value::Short(v) => Ok(*v),
        Value::Byte(v) => Ok(i16::from(*v)),
        Value::String(s) => parse(Some(s), "short"),
        Value::Null => parse(None, "short"),
        other => Err(unsupported(other, "short")),
    }
}

pub fn to_int(value: &Value) -> Result<i32> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Short(v) => Ok(i32::from(*v)),
        Value::Byte(v) => Ok(i32::from(*v)),
        Value::String(s) => parse(Some(s), "int"),
        Value::Null => parse(None, "int"),
        other => Err(unsupported(other, "int")),
    }
}

pub fn to_long(value: &Value) -> Result<i64> {
    match value {
        Value::Long(v) => Ok(*v),
        Value::Int(v) => Ok(i64::from(*v)),
        Value::Short(v) => Ok(i64::from(*v)),
        Value::Byte(v) => Ok(i64::from(*v)),
        Value::String(s) => parse(Some(s), "long"),
        Value::Null => parse(None, "long"),
        other => Err(unsupported(other, "long")),
    }
}

pub fn to_float(value: &Value) -> Result<f32> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::String(s) => parse(Some(s), "float"),
        Value::Null => parse(None, "float"),
        other => Err(unsupported(other, "float")),
    }
}

pub fn to_double(value: &Value) -> Result<f64> {
    match value {
        Value::Double(v) => Ok(*v),
        Value::Float(v) => Ok(f64::from(*v)),
        Value::String(s) => parse(Some(s), "double"),
        Value::Null => parse(None, "double"),
        other => Err(unsupported(other, "double")),
    }
}

/// Chars only convert from chars; null has no char reading.
pub fn to_char(value: &Value) -> Result<char> {
    match value {
        Value::Char(v) => Ok(*v),
        Value::Null => Err(JmsError::format("null value cannot be converted to char")),
        other => Err(unsupported(other, "char")),
    }
}

/// Renders any non-bytes value as text.
///
/// Floats and doubles use Rust's shortest round-trip form: `1.0`, `0.5`, and
/// scientific notation only for very large or very small magnitudes (`1e20`,
/// `1e-7`). Infinities render as `inf`/`-inf` and NaN as `NaN`. This differs
/// from Java's `Double.toString` (`1.0E10`, `Infinity`), so text produced here
/// is not byte-identical to a Java client's; parsing it back with [`to_double`]
/// yields the same value.
pub fn to_string(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Bytes(_) => Err(unsupported(value, "string")),
        other => Ok(Some(other.to_string())),
    }
}

/// Byte arrays come back as a fresh copy.
pub fn to_bytes(value: &Value) -> Result<Option<Vec<u8>>> {
    match value {
        Value::Null => Ok(None),
        Value::Bytes(v) => Ok(Some(v.clone())),
        other => Err(unsupported(other, "byte[]")),
    }
}
