use meshmap_types::NodeNum;
use thiserror::Error;

/// Why an inbound bus message was not turned into a [`crate::DecodedPacket`].
///
/// None of these are fatal; the intake path logs them and moves on.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("topic does not match mesh grammar: {0}")]
    TopicMismatch(String),

    #[error("malformed service envelope: {0}")]
    MalformedEnvelope(#[from] meshmap_messages::DecodeError),

    #[error("service envelope carries no packet")]
    MissingPacket,

    #[error("packet has no sender")]
    AnonymousSender,

    #[error("sender {0} rejected by gate")]
    Rejected(NodeNum),

    #[error("packet from {0} carries no payload")]
    MissingPayload(NodeNum),

    #[error("packet from {0} is encrypted under a different channel key")]
    ForeignChannel(NodeNum),

    #[error("invalid topic pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ProtocolError {
    /// Drops that happen constantly on a public bus and are only worth a
    /// debug line. The rest indicate garbled traffic and warrant a warning.
    pub fn is_routine(&self) -> bool {
        matches!(
            self,
            Self::TopicMismatch(_)
                | Self::AnonymousSender
                | Self::Rejected(_)
                | Self::ForeignChannel(_)
        )
    }

    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TopicMismatch(_) => "topic",
            Self::MalformedEnvelope(_) => "malformed_envelope",
            Self::MissingPacket => "missing_packet",
            Self::AnonymousSender => "anonymous",
            Self::Rejected(_) => "rate_limited",
            Self::MissingPayload(_) => "missing_payload",
            Self::ForeignChannel(_) => "foreign_channel",
            Self::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}
