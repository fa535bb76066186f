use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("channel key must be 16 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("channel key is not valid hex: {0}")]
    InvalidHex(String),
}
