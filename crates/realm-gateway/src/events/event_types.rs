//! Dispatch names (`t`) the gateway emits on its own
//!
//! Channel-scoped events such as `MESSAGE_CREATE` are relayed under the name
//! they were published with; the variants here exist for frames built locally.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    /// Answer to a successful Identify
    Ready,
    Subscribed,
    /// Ended by the client, or refused, or evicted
    Unsubscribed,
    MessageCreate,
    /// Channel list changed; clients refetch it
    ChannelsRefresh,
}

impl GatewayEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Subscribed => "SUBSCRIBED",
            Self::Unsubscribed => "UNSUBSCRIBED",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::ChannelsRefresh => realm_core::events::CHANNELS_REFRESH,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GatewayEventType> for String {
    fn from(event: GatewayEventType) -> Self {
        event.as_str().to_owned()
    }
}
