//! meshobserv: subscribe to the public mesh broker and maintain a JSON
//! snapshot of every node heard on it.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use meshmap_network::{load_blocklist, MqttBroker};
use meshmap_node::{init_logging, LogFormat, MeshObserver, ObserverConfig};
use meshmap_store::{JsonFileStore, SnapshotStore};

#[derive(Parser)]
#[command(name = "meshobserv", about = "Mesh network node map observer")]
struct Cli {
    /// Node database file. The valid nodes are written here every cycle.
    #[arg(short = 'f', long, env = "MESHOBSERV_NODES_FILE")]
    nodes_file: Option<PathBuf>,

    /// Node blocklist file, one decimal node number per line.
    #[arg(short = 'b', long, env = "MESHOBSERV_BLOCKLIST")]
    blocklist: Option<PathBuf>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "MESHOBSERV_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "MESHOBSERV_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "MESHOBSERV_LOG_FORMAT")]
    log_format: Option<String>,

    /// Broker host name.
    #[arg(long, env = "MESHOBSERV_BROKER_HOST")]
    broker_host: Option<String>,

    /// Broker port.
    #[arg(long, env = "MESHOBSERV_BROKER_PORT")]
    broker_port: Option<u16>,
}

impl Cli {
    /// Layer flags over the config file, or over the defaults.
    fn into_config(self) -> anyhow::Result<ObserverConfig> {
        let mut config = match &self.config {
            Some(path) => ObserverConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ObserverConfig::default(),
        };
        if let Some(path) = self.nodes_file {
            config.nodes_file = Some(path);
        }
        if let Some(path) = self.blocklist {
            config.blocklist_file = Some(path);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(host) = self.broker_host {
            config.broker.host = host;
        }
        if let Some(port) = self.broker_port {
            config.broker.port = port;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;

    let blocklist = match &config.blocklist_file {
        Some(path) => load_blocklist(path)?,
        None => HashSet::new(),
    };
    let snapshots = config
        .nodes_file
        .as_ref()
        .map(|path| Arc::new(JsonFileStore::new(path)) as Arc<dyn SnapshotStore>);

    let mut observer = MeshObserver::new(config.clone(), blocklist, snapshots)?;

    tracing::info!(
        host = %config.broker.host,
        port = config.broker.port,
        "connecting to broker"
    );
    let (broker, inbound) = MqttBroker::connect(&config.broker).await?;
    tracing::info!(client_id = broker.client_id(), "connected");

    let shutdown = observer.shutdown_handle();
    tokio::spawn(async move { shutdown.wait_for_signal().await });

    let result = observer.run(inbound).await;

    tracing::info!("exiting");
    if let Err(e) = broker.disconnect().await {
        tracing::warn!(error = %e, "broker disconnect failed");
    }
    observer.stop().await?;

    result?;
    Ok(())
}
