use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot {path} is corrupted: {source}")]
    Corruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot path has no file name: {0}")]
    InvalidPath(PathBuf),
}
