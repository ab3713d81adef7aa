use std::collections::HashMap;

use super::{check_name, read_only_error, sub_slice};
use crate::message::convert;
use crate::utils::error::Result;
use crate::wire::{self, Value};

/// Named entries of any wire type, read back through the conversion table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapBody {
    entries: HashMap<String, Value>,
    read_only: bool,
}

impl MapBody {
    /// Stores an entry. Names are checked before the read-only flag.
    pub fn set_object(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        check_name(name)?;
        if self.read_only {
            return Err(read_only_error());
        }
        self.entries.insert(name.to_string(), value.into());
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

    pub fn set_char(&mut self, name: &str, value: char) -> Result<()> {
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

    /// Stores a copy of `value`.
    pub fn set_bytes(&mut self, name: &str, value: &[u8]) -> Result<()> {
        self.set_object(name, value)
    }

    /// Stores a copy of `len` bytes of `value` starting at `offset`.
    pub fn set_bytes_range(
        &mut self,
        name: &str,
        value: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<()> {
        check_name(name)?;
        let slice = sub_slice(value, offset, len)?;
        self.set_object(name, slice)
    }

    fn lookup(&self, name: &str) -> &Value {
        self.entries.get(name).unwrap_or(&Value::Null)
    }

    pub fn get_object(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
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

    pub fn get_char(&self, name: &str) -> Result<char> {
        convert::to_char(self.lookup(name))
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

    pub fn get_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        convert::to_bytes(self.lookup(name))
    }

    pub fn item_exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn map_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.read_only = false;
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        wire::encode_map(&self.entries)
    }

    pub(crate) fn decode(data: Option<&[u8]>) -> Result<Self> {
        let entries = match data {
            Some(bytes) => wire::decode_map(bytes)?,
            None => HashMap::new(),
        };
        Ok(Self {
            entries,
            read_only: true,
        })
    }
}
