use std::fmt;
use std::str::FromStr;

use crate::utils::error::{JmsError, Result};

/// How a session acknowledges delivered messages.
///
/// Acknowledgement itself is not implemented; the mode is recorded and
/// checked against the session's transacted flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AcknowledgeMode {
    SessionTransacted,
    #[default]
    AutoAcknowledge,
    ClientAcknowledge,
    DupsOkAcknowledge,
}

impl AcknowledgeMode {
    pub fn code(self) -> i32 {
        match self {
            AcknowledgeMode::SessionTransacted => 0,
            AcknowledgeMode::AutoAcknowledge => 1,
            AcknowledgeMode::ClientAcknowledge => 2,
            AcknowledgeMode::DupsOkAcknowledge => 3,
        }
    }
}

impl TryFrom<i32> for AcknowledgeMode {
    type Error = JmsError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(AcknowledgeMode::SessionTransacted),
            1 => Ok(AcknowledgeMode::AutoAcknowledge),
            2 => Ok(AcknowledgeMode::ClientAcknowledge),
            3 => Ok(AcknowledgeMode::DupsOkAcknowledge),
            other => Err(JmsError::invalid_argument(format!(
                "illegal acknowledge mode: {other}"
            ))),
        }
    }
}

impl FromStr for AcknowledgeMode {
    type Err = JmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "session_transacted" | "transacted" => Ok(AcknowledgeMode::SessionTransacted),
            "auto_acknowledge" | "auto" => Ok(AcknowledgeMode::AutoAcknowledge),
            "client_acknowledge" | "client" => Ok(AcknowledgeMode::ClientAcknowledge),
            "dups_ok_acknowledge" | "dups_ok" => Ok(AcknowledgeMode::DupsOkAcknowledge),
            other => Err(JmsError::invalid_argument(format!(
                "unknown acknowledge mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for AcknowledgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcknowledgeMode::SessionTransacted => "session_transacted",
            AcknowledgeMode::AutoAcknowledge => "auto_acknowledge",
            AcknowledgeMode::ClientAcknowledge => "client_acknowledge",
            AcknowledgeMode::DupsOkAcknowledge => "dups_ok_acknowledge",
        };
        f.write_str(name)
    }
}
