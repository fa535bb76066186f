//! Bus-facing plumbing: the broker client, and the sender admission checks
//! (blocklist and rate limit) applied before any decode work.

pub mod blocklist;
pub mod broker;
pub mod error;
pub mod mqtt;
pub mod rate_limit;

pub use blocklist::load_blocklist;
pub use broker::{BrokerMessage, INBOUND_CHANNEL_CAPACITY};
pub use error::NetworkError;
pub use mqtt::{MqttBroker, MqttConfig};
pub use rate_limit::{RateLimiter, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW_SECS};
