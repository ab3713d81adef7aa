//! Message bodies.
//!
//! A [`Body`] is one of six shapes. Each shape knows how to encode itself
//! to bytes and how to come back from them; the decoded form is always
//! frozen, which is what a consumer receives.

mod bytes;
mod map;
mod object;
mod stream;
mod text;

pub use bytes::BytesBody;
pub use map::MapBody;
pub use object::ObjectBody;
pub use stream::StreamBody;
pub use text::TextBody;

use std::fmt;

use crate::utils::error::{JmsError, Result};

/// Which body shape a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Headers and properties only.
    Plain,
    Text,
    Bytes,
    Stream,
    Map,
    Object,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Plain => "message",
            MessageKind::Text => "text message",
            MessageKind::Bytes => "bytes message",
            MessageKind::Stream => "stream message",
            MessageKind::Map => "map message",
            MessageKind::Object => "object message",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Text(TextBody),
    Bytes(BytesBody),
    Stream(StreamBody),
    Map(MapBody),
    Object(ObjectBody),
}

impl Body {
    /// A fresh, writable body of the given shape.
    pub fn new(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Plain => Body::Empty,
            MessageKind::Text => Body::Text(TextBody::default()),
            MessageKind::Bytes => Body::Bytes(BytesBody::default()),
            MessageKind::Stream => Body::Stream(StreamBody::default()),
            MessageKind::Map => Body::Map(MapBody::default()),
            MessageKind::Object => Body::Object(ObjectBody::default()),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Body::Empty => MessageKind::Plain,
            Body::Text(_) => MessageKind::Text,
            Body::Bytes(_) => MessageKind::Bytes,
            Body::Stream(_) => MessageKind::Stream,
            Body::Map(_) => MessageKind::Map,
            Body::Object(_) => MessageKind::Object,
        }
    }

    pub fn is_read_only(&self) -> bool {
        match self {
            Body::Empty => false,
            Body::Text(b) => b.is_read_only(),
            Body::Bytes(b) => b.is_read_only(),
            Body::Stream(b) => b.is_read_only(),
            Body::Map(b) => b.is_read_only(),
            Body::Object(b) => b.is_read_only(),
        }
    }

    /// Drops the content and makes the body writable again.
    pub fn clear(&mut self) {
        match self {
            Body::Empty => {}
            Body::Text(b) => b.clear(),
            Body::Bytes(b) => b.clear(),
            Body::Stream(b) => b.clear(),
            Body::Map(b) => b.clear(),
            Body::Object(b) => b.clear(),
        }
    }

    /// Serialized content; `None` for an empty body or an unset text/object.
    pub fn encode(&self) -> Result<Option<Vec<u8>>> {
        match self {
            Body::Empty => Ok(None),
            Body::Text(b) => Ok(b.encode()),
            Body::Bytes(b) => Ok(Some(b.encode())),
            Body::Stream(b) => Ok(Some(b.encode())),
            Body::Map(b) => b.encode().map(Some),
            Body::Object(b) => Ok(b.encode()),
        }
    }

    /// Rebuilds a body of `kind` from its encoded form. The result is frozen.
    pub fn decode(kind: MessageKind, data: Option<&[u8]>) -> Result<Self> {
        Ok(match kind {
            MessageKind::Plain => Body::Empty,
            MessageKind::Text => Body::Text(TextBody::decode(data)?),
            MessageKind::Bytes => Body::Bytes(BytesBody::decode(data)),
            MessageKind::Stream => Body::Stream(StreamBody::decode(data)),
            MessageKind::Map => Body::Map(MapBody::decode(data)?),
            MessageKind::Object => Body::Object(ObjectBody::decode(data)),
        })
    }
}

/// Borrows `len` bytes of `bytes` starting at `offset`.
pub(crate) fn sub_slice(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or_else(|| {
            JmsError::invalid_argument(format!(
                "range {offset}+{len} is outside a buffer of {} bytes",
                bytes.len()
            ))
        })
}

pub(crate) fn read_only_error() -> JmsError {
    JmsError::not_writable("message body is read-only")
}

pub(crate) fn write_only_error() -> JmsError {
    JmsError::not_readable("message body is write-only")
}

pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(JmsError::invalid_argument("map entry name must not be empty"));
    }
    Ok(())
}
