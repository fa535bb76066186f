use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("store error: {0}")]
    Store(#[from] meshmap_store::StoreError),

    #[error("network error: {0}")]
    Network(#[from] meshmap_network::NetworkError),

    #[error("protocol error: {0}")]
    Protocol(#[from] meshmap_protocol::ProtocolError),

    #[error("config error: {0}")]
    Config(String),

    #[error("no messages received in the last {0}s")]
    Silence(u64),

    #[error("broker channel closed")]
    BrokerClosed,

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
