//! Wire protocol for `/gateway`: op codes, the frame envelope, payloads and
//! close codes.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::{OpCode, Sender};
pub use payloads::{ChannelPayload, HelloPayload, IdentifyPayload};
