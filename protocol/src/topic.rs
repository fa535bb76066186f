//! Topic grammar for mesh traffic on the bus.
//!
//! Relayed packets are published under a region/channel hierarchy rooted at
//! `msh`, ending in either `2/map/` (gateway map reports) or
//! `2/e/<channel>/!<gateway-id>` (encrypted service envelopes).

use std::sync::LazyLock;

use regex::Regex;

use crate::ProtocolError;

/// Pattern accepted by [`TopicFilter::default`].
pub const DEFAULT_TOPIC_PATTERN: &str = r"^msh(?:/[^/]+)+/2/(?:e/[^/]+/![0-9a-f]+|map/)$";

static DEFAULT_TOPIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_TOPIC_PATTERN).expect("Invalid regex pattern for mesh topics")
});

/// Subscription filters covering one to four region levels below `msh`.
const DEFAULT_SUBSCRIPTIONS: [&str; 8] = [
    "msh/+/2/map/",
    "msh/+/2/e/+/+",
    "msh/+/+/2/map/",
    "msh/+/+/2/e/+/+",
    "msh/+/+/+/2/map/",
    "msh/+/+/+/2/e/+/+",
    "msh/+/+/+/+/2/map/",
    "msh/+/+/+/+/2/e/+/+",
];

/// The broker subscription list used when none is configured.
pub fn default_subscriptions() -> Vec<String> {
    DEFAULT_SUBSCRIPTIONS.iter().map(|s| s.to_string()).collect()
}

/// Decides whether a topic carries mesh traffic worth decoding.
#[derive(Clone, Debug)]
pub struct TopicFilter {
    regex: Regex,
}

impl TopicFilter {
    /// Compile a custom topic pattern.
    pub fn new(pattern: &str) -> Result<Self, ProtocolError> {
        let regex = Regex::new(pattern).map_err(|e| ProtocolError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    pub fn matches(&self, topic: &str) -> bool {
        self.regex.is_match(topic)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for TopicFilter {
    fn default() -> Self {
        Self {
            regex: DEFAULT_TOPIC_REGEX.clone(),
        }
    }
}
