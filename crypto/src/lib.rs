//! Channel encryption for mesh packets.
//!
//! Packets relayed over the bus are encrypted with AES in CTR mode under the
//! channel's pre-shared key. The counter block is derived from the packet id
//! and the sender's node number, so the same function both encrypts and
//! decrypts.

pub mod channel;
pub mod error;

pub use channel::{packet_nonce, ChannelCipher, ChannelKey, DEFAULT_CHANNEL_KEY};
pub use error::CryptoError;
