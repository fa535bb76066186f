//! The boundary between a pub/sub client and the observer.

/// One message delivered by the broker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokerMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl BrokerMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Capacity of the channel between the broker client and the observer.
pub const INBOUND_CHANNEL_CAPACITY: usize = 1024;
