use std::fmt;
use std::str::FromStr;

use crate::destination::Destination;
use crate::utils::error::{JmsError, Result};

pub const DEFAULT_PRIORITY: u8 = 4;
pub const MAX_PRIORITY: u8 = 9;
pub const DEFAULT_TIME_TO_LIVE: i64 = 0;

/// Prefix every provider-assigned message id carries.
pub const MESSAGE_ID_PREFIX: &str = "ID:";

/// Delivery mode header. The numeric codes are the classic `1`/`2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeliveryMode {
    NonPersistent,
    #[default]
    Persistent,
}

impl DeliveryMode {
    pub fn code(self) -> i32 {
        match self {
            DeliveryMode::NonPersistent => 1,
            DeliveryMode::Persistent => 2,
        }
    }
}

impl TryFrom<i32> for DeliveryMode {
    type Error = JmsError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            1 => Ok(DeliveryMode::NonPersistent),
            2 => Ok(DeliveryMode::Persistent),
            other => Err(JmsError::invalid_argument(format!(
                "illegal delivery mode: {other}"
            ))),
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = JmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "persistent" => Ok(DeliveryMode::Persistent),
            "non_persistent" => Ok(DeliveryMode::NonPersistent),
            other => Err(JmsError::invalid_argument(format!(
                "unknown delivery mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::NonPersistent => f.write_str("non_persistent"),
            DeliveryMode::Persistent => f.write_str("persistent"),
        }
    }
}

/// Checks a priority and narrows it to the header's representation.
pub fn validate_priority(priority: i32) -> Result<u8> {
    u8::try_from(priority)
        .ok()
        .filter(|p| *p <= MAX_PRIORITY)
        .ok_or_else(|| {
            JmsError::invalid_argument(format!(
                "priority must be between 0 and {MAX_PRIORITY}, got {priority}"
            ))
        })
}

/// Header block of a message.
///
/// Timestamps and expirations are epoch milliseconds; an expiration of `0`
/// means the message never expires.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    message_id: Option<String>,
    correlation_id: Option<String>,
    delivery_mode: DeliveryMode,
    priority: u8,
    expiration: i64,
    timestamp: i64,
    redelivered: bool,
    jms_type: Option<String>,
    destination: Option<Destination>,
    reply_to: Option<Destination>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            message_id: None,
            correlation_id: None,
            delivery_mode: DeliveryMode::default(),
            priority: DEFAULT_PRIORITY,
            expiration: 0,
            timestamp: 0,
            redelivered: false,
            jms_type: None,
            destination: None,
            reply_to: None,
        }
    }
}

impl Header {
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Sets the message id; it must be absent or start with `ID:`.
    pub fn set_message_id(&mut self, id: Option<&str>) -> Result<()> {
        if let Some(id) = id {
            if !id.starts_with(MESSAGE_ID_PREFIX) {
                return Err(JmsError::invalid_argument(format!(
                    "message id {id:?} must start with {MESSAGE_ID_PREFIX:?}"
                )));
            }
        }
        self.message_id = id.map(str::to_string);
        Ok(())
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn set_correlation_id(&mut self, id: Option<&str>) {
        self.correlation_id = id.map(str::to_string);
    }

    pub fn correlation_id_as_bytes(&self) -> Option<Vec<u8>> {
        self.correlation_id.as_ref().map(|id| id.as_bytes().to_vec())
    }

    /// Stores a byte correlation id as text; the bytes must be UTF-8.
    pub fn set_correlation_id_as_bytes(&mut self, id: Option<&[u8]>) -> Result<()> {
        let id = id
            .map(|bytes| {
                std::str::from_utf8(bytes)
                    .map(str::to_string)
                    .map_err(|e| JmsError::format(format!("correlation id is not UTF-8: {e}")))
            })
            .transpose()?;
        self.correlation_id = id;
        Ok(())
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.delivery_mode
    }

    pub fn set_delivery_mode(&mut self, mode: DeliveryMode) {
        self.delivery_mode = mode;
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) -> Result<()> {
        self.priority = validate_priority(priority)?;
        Ok(())
    }

    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    pub fn set_expiration(&mut self, expiration: i64) {
        self.expiration = expiration;
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    pub fn redelivered(&self) -> bool {
        self.redelivered
    }

    pub fn set_redelivered(&mut self, redelivered: bool) {
        self.redelivered = redelivered;
    }

    pub fn jms_type(&self) -> Option<&str> {
        self.jms_type.as_deref()
    }

    pub fn set_jms_type(&mut self, jms_type: Option<&str>) {
        self.jms_type = jms_type.map(str::to_string);
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn set_destination(&mut self, destination: Option<Destination>) {
        self.destination = destination;
    }

    pub fn reply_to(&self) -> Option<&Destination> {
        self.reply_to.as_ref()
    }

    pub fn set_reply_to(&mut self, reply_to: Option<Destination>) {
        self.reply_to = reply_to;
    }
}
