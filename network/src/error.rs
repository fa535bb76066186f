use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("connect to {host}:{port} failed: {reason}")]
    ConnectFailed {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("no connection acknowledgement within {0}s")]
    ConnectTimeout(u64),

    #[error("subscribe failed: {0}")]
    SubscribeFailed(String),

    #[error("disconnect failed: {0}")]
    DisconnectFailed(String),

    #[error("could not generate client id: {0}")]
    ClientId(String),

    #[error("blocklist {path}: {source}")]
    Blocklist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
