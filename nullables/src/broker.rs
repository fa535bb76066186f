//! Nullable broker that feeds the observer without a network connection.

use tokio::sync::mpsc;

use meshmap_network::{BrokerMessage, INBOUND_CHANNEL_CAPACITY};

/// The sending half of an in-memory broker channel.
///
/// Drop every `NullBroker` clone to simulate the broker going away.
#[derive(Clone, Debug)]
pub struct NullBroker {
    tx: mpsc::Sender<BrokerMessage>,
}

impl NullBroker {
    /// A broker and the receiver to hand to the observer.
    pub fn channel() -> (Self, mpsc::Receiver<BrokerMessage>) {
        Self::with_capacity(INBOUND_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<BrokerMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Deliver a message. Returns `false` once the receiver is gone.
    pub async fn publish(&self, topic: &str, payload: impl Into<Vec<u8>>) -> bool {
        self.tx.send(BrokerMessage::new(topic, payload)).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_order() {
        let (broker, mut rx) = NullBroker::channel();
        assert!(broker.publish("a", vec![1]).await);
        assert!(broker.publish("b", vec![2]).await);
        assert_eq!(rx.recv().await.unwrap().topic, "a");
        assert_eq!(rx.recv().await.unwrap().payload, vec![2]);
    }

    #[tokio::test]
    async fn closes_when_dropped() {
        let (broker, mut rx) = NullBroker::channel();
        drop(broker);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn publish_fails_without_receiver() {
        let (broker, rx) = NullBroker::channel();
        drop(rx);
        assert!(!broker.publish("a", vec![]).await);
    }
}
