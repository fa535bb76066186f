//! Service envelope decoding and channel decryption.

use meshmap_crypto::ChannelCipher;
use meshmap_messages::{mesh_packet::PayloadVariant, Data, Message, ServiceEnvelope};
use meshmap_types::NodeNum;

use crate::{ProtocolError, TopicFilter};

/// Admission check run once the sender of a packet is known, before any
/// decryption work is spent on it.
pub trait SenderGate: Send + Sync {
    fn accept(&self, from: NodeNum) -> bool;
}

impl<F> SenderGate for F
where
    F: Fn(NodeNum) -> bool + Send + Sync,
{
    fn accept(&self, from: NodeNum) -> bool {
        self(from)
    }
}

/// An application payload recovered from a bus message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPacket {
    pub from: NodeNum,
    pub packet_id: u32,
    /// Topic the envelope arrived on; recorded as the relay in `seenBy`.
    pub topic: String,
    /// Raw application port number, possibly unknown to this schema.
    pub port: i32,
    pub payload: Vec<u8>,
}

/// Turns `(topic, bytes)` from the bus into a [`DecodedPacket`].
///
/// Holds no mutable state, so one decoder is shared by every intake task.
#[derive(Clone, Debug, Default)]
pub struct EnvelopeDecoder {
    topics: TopicFilter,
    cipher: ChannelCipher,
}

impl EnvelopeDecoder {
    pub fn new(topics: TopicFilter, cipher: ChannelCipher) -> Self {
        Self { topics, cipher }
    }

    pub fn decode(
        &self,
        topic: &str,
        bytes: &[u8],
        gate: &dyn SenderGate,
    ) -> Result<DecodedPacket, ProtocolError> {
        if !self.topics.matches(topic) {
            return Err(ProtocolError::TopicMismatch(topic.to_string()));
        }

        let envelope = ServiceEnvelope::decode(bytes)?;
        let packet = envelope.packet.ok_or(ProtocolError::MissingPacket)?;

        let from = NodeNum::new(packet.from);
        if from.is_unknown() {
            return Err(ProtocolError::AnonymousSender);
        }
        if !gate.accept(from) {
            return Err(ProtocolError::Rejected(from));
        }

        let data = match packet.payload_variant {
            Some(PayloadVariant::Decoded(data)) => data,
            Some(PayloadVariant::Encrypted(ciphertext)) => {
                let plaintext = self.cipher.decrypt(packet.id, from, &ciphertext);
                // Garbage after decryption means another channel's key.
                Data::decode(plaintext.as_slice())
                    .map_err(|_| ProtocolError::ForeignChannel(from))?
            }
            None => return Err(ProtocolError::MissingPayload(from)),
        };

        Ok(DecodedPacket {
            from,
            packet_id: packet.id,
            topic: topic.to_string(),
            port: data.portnum,
            payload: data.payload,
        })
    }
}
