//! AES-CTR channel cipher.
//!
//! The 16-byte initial counter block is laid out as:
//!
//! ```text
//! bytes  0..4   packet id, little-endian
//! bytes  4..8   zero
//! bytes  8..12  sender node number, little-endian
//! bytes 12..16  zero
//! ```
//!
//! The whole block is incremented as a 128-bit big-endian counter.

use std::fmt;

use aes::{Aes128, Aes256};
use ctr::cipher::generic_array::GenericArray;
use ctr::cipher::{KeyIvInit, StreamCipher};
use meshmap_types::NodeNum;
use serde::{Deserialize, Serialize};

use crate::CryptoError;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// The well-known key of the default public channel.
pub const DEFAULT_CHANNEL_KEY: [u8; 16] = [
    0xd4, 0xf1, 0xbb, 0x3a, 0x20, 0x29, 0x07, 0x59, 0xf0, 0xbc, 0xff, 0xab, 0xcf, 0x4e, 0x69, 0x01,
];

/// Build the initial counter block for a packet.
pub fn packet_nonce(packet_id: u32, from: NodeNum) -> [u8; 16] {
    let mut nonce = [0u8; 16];
    nonce[0..4].copy_from_slice(&packet_id.to_le_bytes());
    nonce[8..12].copy_from_slice(&from.get().to_le_bytes());
    nonce
}

/// A channel pre-shared key. The length selects AES-128 or AES-256.
///
/// Serialized as a lowercase hex string so it can live in the config file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChannelKey {
    Aes128([u8; 16]),
    Aes256([u8; 32]),
}

impl ChannelKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            16 => {
                let mut key = [0u8; 16];
                key.copy_from_slice(bytes);
                Ok(Self::Aes128(key))
            }
            32 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(bytes);
                Ok(Self::Aes256(key))
            }
            n => Err(CryptoError::InvalidKeyLength(n)),
        }
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Aes128(key) => key,
            Self::Aes256(key) => key,
        }
    }
}

impl Default for ChannelKey {
    fn default() -> Self {
        Self::Aes128(DEFAULT_CHANNEL_KEY)
    }
}

impl TryFrom<String> for ChannelKey {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<ChannelKey> for String {
    fn from(key: ChannelKey) -> Self {
        hex::encode(key.as_bytes())
    }
}

// Keys are pre-shared but still kept out of logs.
impl fmt::Debug for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes128(_) => f.write_str("ChannelKey::Aes128(..)"),
            Self::Aes256(_) => f.write_str("ChannelKey::Aes256(..)"),
        }
    }
}

/// Encrypts and decrypts packet payloads for one channel key.
#[derive(Clone, Debug, Default)]
pub struct ChannelCipher {
    key: ChannelKey,
}

impl ChannelCipher {
    pub fn new(key: ChannelKey) -> Self {
        Self { key }
    }

    /// XOR the keystream for `(packet_id, from)` into `data` in place.
    pub fn apply_keystream(&self, packet_id: u32, from: NodeNum, data: &mut [u8]) {
        let nonce = packet_nonce(packet_id, from);
        let iv = GenericArray::from_slice(&nonce);
        match &self.key {
            ChannelKey::Aes128(key) => {
                Aes128Ctr::new(GenericArray::from_slice(key), iv).apply_keystream(data)
            }
            ChannelKey::Aes256(key) => {
                Aes256Ctr::new(GenericArray::from_slice(key), iv).apply_keystream(data)
            }
        }
    }

    /// Decrypt an encrypted packet payload.
    ///
    /// CTR mode has no authentication: decrypting with the wrong key yields
    /// garbage rather than an error, which callers detect by failing to parse.
    pub fn decrypt(&self, packet_id: u32, from: NodeNum, ciphertext: &[u8]) -> Vec<u8> {
        let mut buf = ciphertext.to_vec();
        self.apply_keystream(packet_id, from, &mut buf);
        buf
    }

    /// Encrypt a payload. Identical to [`decrypt`](Self::decrypt); provided
    /// for readability at call sites that produce traffic.
    pub fn encrypt(&self, packet_id: u32, from: NodeNum, plaintext: &[u8]) -> Vec<u8> {
        self.decrypt(packet_id, from, plaintext)
    }
}
