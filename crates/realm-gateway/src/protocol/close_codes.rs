//! Gateway close codes
//!
//! Sent in the WebSocket close frame when the server ends a session.

/// Application close codes in the 4000 range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    UnknownError,
    /// A server-only op arrived from the client
    UnknownOpcode,
    /// Binary frame, invalid JSON, or a payload of the wrong shape
    DecodeError,
    /// Subscribe or Unsubscribe before Identify
    NotAuthenticated,
    /// Identify carried a missing, malformed or expired token
    AuthenticationFailed,
    /// Identify sent twice on one socket
    AlreadyAuthenticated,
    /// No heartbeat within the timeout
    SessionTimeout,
}

impl CloseCode {
    /// Reason text for the close frame
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::UnknownError => "unknown error",
            Self::UnknownOpcode => "unknown opcode",
            Self::DecodeError => "decode error",
            Self::NotAuthenticated => "not authenticated",
            Self::AuthenticationFailed => "authentication failed",
            Self::AlreadyAuthenticated => "already authenticated",
            Self::SessionTimeout => "session timed out",
        }
    }

    /// Reconnecting with the same credentials and client cannot succeed
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::UnknownOpcode | Self::AlreadyAuthenticated
        )
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        match code {
            CloseCode::UnknownError => 4000,
            CloseCode::UnknownOpcode => 4001,
            CloseCode::DecodeError => 4002,
            CloseCode::NotAuthenticated => 4003,
            CloseCode::AuthenticationFailed => 4004,
            CloseCode::AlreadyAuthenticated => 4005,
            CloseCode::SessionTimeout => 4009,
        }
    }
}

impl TryFrom<u16> for CloseCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            4000 => Self::UnknownError,
            4001 => Self::UnknownOpcode,
            4002 => Self::DecodeError,
            4003 => Self::NotAuthenticated,
            4004 => Self::AuthenticationFailed,
            4005 => Self::AlreadyAuthenticated,
            4009 => Self::SessionTimeout,
            other => return Err(other),
        })
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", u16::from(*self), self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_codes() {
        assert_eq!(u16::from(CloseCode::NotAuthenticated), 4003);
        assert_eq!(u16::from(CloseCode::SessionTimeout), 4009);
        assert_eq!(CloseCode::try_from(4004), Ok(CloseCode::AuthenticationFailed));
        assert_eq!(CloseCode::try_from(1000), Err(1000));
    }

    #[test]
    fn test_fatal_codes() {
        assert!(CloseCode::AuthenticationFailed.is_fatal());
        assert!(!CloseCode::SessionTimeout.is_fatal());
        assert!(!CloseCode::DecodeError.is_fatal());
    }

    #[test]
    fn test_display() {
        assert_eq!(CloseCode::DecodeError.to_string(), "4002 decode error");
    }
}
