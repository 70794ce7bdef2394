//! Gateway operation codes
//!
//! Every frame carries an `op`. Clients send Heartbeat, Identify, Subscribe and
//! Unsubscribe; everything else flows from server to client.

use serde::{Deserialize, Serialize};

/// Which side of the socket may send an op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Client,
    Server,
}

/// Gateway operation code, carried as a bare integer on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OpCode {
    /// Event delivery; `t` names the event
    Dispatch,
    Heartbeat,
    Identify,
    /// Start live delivery for a channel
    Subscribe,
    /// Stop live delivery for a channel
    Unsubscribe,
    /// First frame on every socket
    Hello,
    HeartbeatAck,
}

impl OpCode {
    #[must_use]
    pub const fn sent_by(self) -> Sender {
        match self {
            Self::Heartbeat | Self::Identify | Self::Subscribe | Self::Unsubscribe => {
                Sender::Client
            }
            Self::Dispatch | Self::Hello | Self::HeartbeatAck => Sender::Server,
        }
    }

    /// Ops a client may only send after a successful Identify
    #[must_use]
    pub const fn requires_identify(self) -> bool {
        matches!(self, Self::Subscribe | Self::Unsubscribe)
    }
}

impl TryFrom<u8> for OpCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            3 => Self::Subscribe,
            4 => Self::Unsubscribe,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(format!("unknown op code {other}")),
        })
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Identify => 2,
            OpCode::Subscribe => 3,
            OpCode::Unsubscribe => 4,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}/{}", u8::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(OpCode::try_from(3), Ok(OpCode::Subscribe));
        assert_eq!(u8::from(OpCode::HeartbeatAck), 11);
        assert!(OpCode::try_from(5).is_err());
        assert!(OpCode::try_from(9).is_err());
    }

    #[test]
    fn test_direction() {
        assert_eq!(OpCode::Identify.sent_by(), Sender::Client);
        assert_eq!(OpCode::Unsubscribe.sent_by(), Sender::Client);
        assert_eq!(OpCode::Hello.sent_by(), Sender::Server);
        assert_eq!(OpCode::Dispatch.sent_by(), Sender::Server);
    }

    #[test]
    fn test_identify_gate() {
        assert!(OpCode::Subscribe.requires_identify());
        assert!(!OpCode::Heartbeat.requires_identify());
        assert!(!OpCode::Identify.requires_identify());
    }

    #[test]
    fn test_serde_uses_integer() {
        assert_eq!(serde_json::to_string(&OpCode::Hello).unwrap(), "10");
        assert_eq!(serde_json::from_str::<OpCode>("4").unwrap(), OpCode::Unsubscribe);
        assert!(serde_json::from_str::<OpCode>("7").is_err());
        assert!(serde_json::from_str::<OpCode>("\"Hello\"").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(OpCode::Subscribe.to_string(), "Subscribe/3");
    }
}
