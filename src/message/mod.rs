//! The message envelope: header block, application properties and a body
//! of one of six shapes.
//!
//! Shape-specific operations are reached through the `as_*` accessors,
//! which fail with `UnsupportedOperation` when the message has another
//! shape.

pub mod body;
pub mod convert;
pub mod header;
pub mod properties;

pub use body::{Body, BytesBody, MapBody, MessageKind, ObjectBody, StreamBody, TextBody};
pub use header::{DeliveryMode, Header};
pub use properties::Properties;

use serde::Serialize;

use crate::utils::error::{JmsError, Result};


#[derive(Debug, Clone)]
pub struct Message {
    header: Header,
    properties: Properties,
    body: Body,
}

impl Default for Message {
    fn default() -> Self {
        Self::new(MessageKind::Plain)
    }
}

macro_rules! body_accessors {
    ($($kind:ident => $as_ref:ident, $as_mut:ident, $ty:ty;)*) => {
        $(
            pub fn $as_ref(&self) -> Result<&$ty> {
                match &self.body {
                    Body::$kind(b) => Ok(b),
                    other => Err(wrong_shape(MessageKind::$kind, other.kind())),
                }
            }

            pub fn $as_mut(&mut self) -> Result<&mut $ty> {
                match &mut self.body {
                    Body::$kind(b) => Ok(b),
                    other => Err(wrong_shape(MessageKind::$kind, other.kind())),
                }
            }
        )*
    };
}

fn wrong_shape(wanted: MessageKind, actual: MessageKind) -> JmsError {
    JmsError::unsupported(format!("{wanted} operation called on a {actual}"))
}

impl Message {
    /// An empty, writable message of the given shape.
    pub fn new(kind: MessageKind) -> Self {
        Self {
            header: Header::default(),
            properties: Properties::default(),
            body: Body::new(kind),
        }
    }

    pub fn text(text: Option<&str>) -> Result<Self> {
        let mut message = Self::new(MessageKind::Text);
        message.as_text_mut()?.set_text(text)?;
        Ok(message)
    }

    pub fn object<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let mut message = Self::new(MessageKind::Object);
        message.as_object_mut()?.set_object(value)?;
        Ok(message)
    }

    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Removes all properties and makes the store writable again.
    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    /// Removes the body content and makes the body writable again.
    pub fn clear_body(&mut self) {
        self.body.clear();
    }

    body_accessors! {
        Text => as_text, as_text_mut, TextBody;
        Bytes => as_bytes, as_bytes_mut, BytesBody;
        Stream => as_stream, as_stream_mut, StreamBody;
        Map => as_map, as_map_mut, MapBody;
        Object => as_object, as_object_mut, ObjectBody;
    }

    /// Builds the copy a consumer receives: the body is rebuilt from its
    /// encoded form and frozen, and the properties are read-only.
    ///
    /// # Errors
    ///
    /// `Format` when the body cannot be encoded.
    pub(crate) fn delivery_copy(&self) -> Result<Message> {
        let encoded = self.body.encode()?;
        let body = Body::decode(self.body.kind(), encoded.as_deref())?;
        let mut properties = self.properties.clone();
        properties.set_read_only(true);
        Ok(Message {
            header: self.header.clone(),
            properties,
            body,
        })
    }
}
