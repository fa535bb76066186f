//! Bus-side protocol: which topics carry mesh traffic, and how a service
//! envelope is unwrapped into an application payload.

pub mod envelope;
pub mod error;
pub mod topic;

pub use envelope::{DecodedPacket, EnvelopeDecoder, SenderGate};
pub use error::ProtocolError;
pub use topic::{default_subscriptions, TopicFilter, DEFAULT_TOPIC_PATTERN};
