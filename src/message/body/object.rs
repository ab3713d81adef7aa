use serde::Serialize;
use serde::de::DeserializeOwned;

use super::read_only_error;
use crate::utils::error::Result;

/// Holds one serde value in its serialized JSON form.
///
/// The value is serialized on `set_object` and deserialized on every
/// `object` call, so each reader gets its own copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectBody {
    data: Option<Vec<u8>>,
    read_only: bool,
}

impl ObjectBody {
    pub fn set_object<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        if self.read_only {
            return Err(read_only_error());
        }
        self.data = Some(serde_json::to_vec(value)?);
        Ok(())
    }

    /// Removes the stored value.
    pub fn clear_object(&mut self) -> Result<()> {
        if self.read_only {
            return Err(read_only_error());
        }
        self.data = None;
        Ok(())
    }

    /// Deserializes the stored value, `None` when nothing is set.
    pub fn object<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.data
            .as_deref()
            .map(serde_json::from_slice::<T>)
            .transpose()
            .map_err(Into::into)
    }

    pub fn serialized(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn clear(&mut self) {
        self.data = None;
        self.read_only = false;
    }

    pub(crate) fn encode(&self) -> Option<Vec<u8>> {
        self.data.clone()
    }

    pub(crate) fn decode(data: Option<&[u8]>) -> Self {
        Self {
            data: data.map(<[u8]>::to_vec),
            read_only: true,
        }
    }
}
