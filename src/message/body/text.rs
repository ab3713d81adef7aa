use super::read_only_error;
use crate::utils::error::{JmsError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBody {
    text: Option<String>,
    read_only: bool,
}

impl TextBody {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: Option<&str>) -> Result<()> {
        if self.read_only {
            return Err(read_only_error());
        }
        self.text = text.map(str::to_string);
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn clear(&mut self) {
        self.text = None;
        self.read_only = false;
    }

    pub(crate) fn encode(&self) -> Option<Vec<u8>> {
        self.text.as_ref().map(|t| t.as_bytes().to_vec())
    }

    pub(crate) fn decode(data: Option<&[u8]>) -> Result<Self> {
        let text = data
            .map(|bytes| {
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| JmsError::format(format!("text body is not UTF-8: {e}")))
            })
            .transpose()?;
        Ok(Self {
            text,
            read_only: true,
        })
    }
}
