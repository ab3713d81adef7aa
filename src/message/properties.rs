use std::collections::HashMap;

use super::convert;
use crate::utils::error::{JmsError, Result};
use crate::wire::Value;

/// Application properties of a message.
///
/// Holds booleans, integers, floats, strings and nulls under non-empty
/// names. Reads go through the shared conversion table. The store turns
/// read-only on the copy a consumer receives; `clear` makes it writable
/// again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, Value>,
    read_only: bool,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.read_only = false;
    }

    pub fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of all set properties, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stores a property value.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name (checked first), `NotWritable`
    /// on a read-only store, `Format` for chars and byte arrays.
    pub fn set_object(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if name.is_empty() {
            return Err(JmsError::invalid_argument("property name must not be empty"));
        }
        if self.read_only {
            return Err(JmsError::not_writable(format!(
                "properties are read-only, cannot set {name:?}"
            )));
        }
        let value = value.into();
        if matches!(value, Value::Char(_) | Value::Bytes(_)) {
            return Err(JmsError::format(format!(
                "{} is not a valid property type",
                value.type_name()
            )));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_byte(&mut self, name: &str, value: i8) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_short(&mut self, name: &str, value: i16) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_long(&mut self, name: &str, value: i64) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_double(&mut self, name: &str, value: f64) -> Result<()> {
        self.set_object(name, value)
    }

    pub fn set_string(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.set_object(name, value)
    }

    fn lookup(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&Value::Null)
    }

    /// The stored value as-is, `None` when unset.
    pub fn get_object(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn get_boolean(&self, name: &str) -> Result<bool> {
        convert::to_boolean(self.lookup(name))
    }

    pub fn get_byte(&self, name: &str) -> Result<i8> {
        convert::to_byte(self.lookup(name))
    }

    pub fn get_short(&self, name: &str) -> Result<i16> {
        convert::to_short(self.lookup(name))
    }

    pub fn get_int(&self, name: &str) -> Result<i32> {
        convert::to_int(self.lookup(name))
    }

    pub fn get_long(&self, name: &str) -> Result<i64> {
        convert::to_long(self.lookup(name))
    }

    pub fn get_float(&self, name: &str) -> Result<f32> {
        convert::to_float(self.lookup(name))
    }

    pub fn get_double(&self, name: &str) -> Result<f64> {
        convert::to_double(self.lookup(name))
    }

    pub fn get_string(&self, name: &str) -> Result<Option<String>> {
        convert::to_string(self.lookup(name))
    }
}
