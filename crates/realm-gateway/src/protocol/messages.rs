//! Gateway frame envelope
//!
//! `{op, t?, s?, d?}` in both directions. Only dispatches carry `t` and `s`.

use super::{HelloPayload, OpCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event name, dispatch only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence, dispatch only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    fn bare(op: OpCode, d: Option<Value>) -> Self {
        Self { op, t: None, s: None, d }
    }

    /// Unsequenced dispatch; the writer stamps `s` when the frame leaves
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            t: Some(event_type.into()),
            ..Self::bare(OpCode::Dispatch, Some(data))
        }
    }

    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self::bare(OpCode::Hello, serde_json::to_value(payload).ok())
    }

    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck, None)
    }

    #[must_use]
    pub fn with_sequence(self, sequence: u64) -> Self {
        match self.op {
            OpCode::Dispatch => Self {
                s: Some(sequence),
                ..self
            },
            _ => self,
        }
    }

    /// Decode `d` into a typed payload. `None` when `d` is absent or has the
    /// wrong shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.d.as_ref().and_then(|d| T::deserialize(d).ok())
    }

    /// Heartbeat `d` is the last sequence the client saw, or null.
    /// Outer `None` means any other shape.
    #[must_use]
    pub fn heartbeat_seq(&self) -> Option<Option<u64>> {
        match &self.d {
            None | Some(Value::Null) => Some(None),
            Some(v) => v.as_u64().map(Some),
        }
    }

    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        self.t.as_deref()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}", self.op)?;
        if let Some(t) = &self.t {
            write!(f, " {t}")?;
        }
        if let Some(s) = self.s {
            write!(f, " #{s}")?;
        }
        write!(f, "]")
    }
}
