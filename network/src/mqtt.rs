//! MQTT client feeding bus traffic to the observer.
//!
//! The client owns the connection, subscriptions and reconnect policy. It
//! forwards every publish as a [`BrokerMessage`] on a bounded channel and
//! never looks inside the payload.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS,
    SubscribeFilter,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use meshmap_protocol::default_subscriptions;

use crate::{BrokerMessage, NetworkError, INBOUND_CHANNEL_CAPACITY};

/// Pending requests the client may queue before the event loop drains them.
const REQUEST_CAPACITY: usize = 64;

/// How long `disconnect` waits for the event loop to wind down.
const DISCONNECT_GRACE: Duration = Duration::from_secs(1);

/// Connection settings for the public mesh broker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// A random hex suffix is appended so concurrent observers never share an id.
    pub client_id_prefix: String,
    pub keep_alive_secs: u64,
    pub connect_timeout_secs: u64,
    pub reconnect_delay_secs: u64,
    pub subscriptions: Vec<String>,
    pub channel_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "mqtt.meshtastic.org".to_string(),
            port: 1883,
            username: "meshdev".to_string(),
            password: "large4cats".to_string(),
            client_id_prefix: "meshobserv".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 30,
            reconnect_delay_secs: 5,
            subscriptions: default_subscriptions(),
            channel_capacity: INBOUND_CHANNEL_CAPACITY,
        }
    }
}

/// A connected, subscribed broker session.
pub struct MqttBroker {
    client: AsyncClient,
    client_id: String,
    stopping: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl MqttBroker {
    /// Connect, wait for the broker to acknowledge, and subscribe.
    ///
    /// Failing to get the first acknowledgement is an error. Once connected,
    /// transient failures are retried in the background.
    pub async fn connect(
        config: &MqttConfig,
    ) -> Result<(Self, mpsc::Receiver<BrokerMessage>), NetworkError> {
        let client_id = client_id(&config.client_id_prefix)?;
        let mut options = MqttOptions::new(client_id.clone(), config.host.clone(), config.port);
        options.set_credentials(config.username.clone(), config.password.clone());
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs.max(5)));
        options.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        let timeout = Duration::from_secs(config.connect_timeout_secs);
        tokio::time::timeout(timeout, wait_for_connack(&mut eventloop))
            .await
            .map_err(|_| NetworkError::ConnectTimeout(config.connect_timeout_secs))?
            .map_err(|e| NetworkError::ConnectFailed {
                host: config.host.clone(),
                port: config.port,
                reason: e.to_string(),
            })?;
        tracing::info!(%client_id, host = %config.host, port = config.port, "connected");

        subscribe(&client, &config.subscriptions)?;
        tracing::info!(count = config.subscriptions.len(), "subscribed");

        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let stopping = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(pump(
            eventloop,
            client.clone(),
            config.subscriptions.clone(),
            tx,
            Arc::clone(&stopping),
            Duration::from_secs(config.reconnect_delay_secs),
        ));

        Ok((
            Self {
                client,
                client_id,
                stopping,
                task,
            },
            rx,
        ))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Send a clean disconnect and stop the event loop.
    pub async fn disconnect(self) -> Result<(), NetworkError> {
        self.stopping.store(true, Ordering::Release);
        let result = self
            .client
            .disconnect()
            .await
            .map_err(|e| NetworkError::DisconnectFailed(e.to_string()));

        let mut task = self.task;
        if tokio::time::timeout(DISCONNECT_GRACE, &mut task).await.is_err() {
            tracing::warn!("broker event loop did not stop in time, aborting");
            task.abort();
        }
        tracing::info!("disconnected");
        result
    }
}

fn client_id(prefix: &str) -> Result<String, NetworkError> {
    let mut suffix = [0u8; 4];
    getrandom::getrandom(&mut suffix).map_err(|e| NetworkError::ClientId(e.to_string()))?;
    Ok(format!("{prefix}-{}", hex::encode(suffix)))
}

fn subscribe(client: &AsyncClient, topics: &[String]) -> Result<(), NetworkError> {
    let filters = topics
        .iter()
        .map(|topic| SubscribeFilter::new(topic.clone(), QoS::AtMostOnce));
    client
        .try_subscribe_many(filters)
        .map_err(|e| NetworkError::SubscribeFailed(e.to_string()))
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), ConnectionError> {
    loop {
        if let Event::Incoming(Packet::ConnAck(_)) = eventloop.poll().await? {
            return Ok(());
        }
    }
}

async fn pump(
    mut eventloop: EventLoop,
    client: AsyncClient,
    subscriptions: Vec<String>,
    tx: mpsc::Sender<BrokerMessage>,
    stopping: Arc<AtomicBool>,
    reconnect_delay: Duration,
) {
    // Once the receiver is gone, publishes are discarded but the loop keeps
    // polling so a later disconnect request still reaches the broker.
    let mut forwarding = true;
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if !forwarding {
                    continue;
                }
                let message = BrokerMessage::new(publish.topic, publish.payload.to_vec());
                if tx.send(message).await.is_err() {
                    tracing::debug!("inbound receiver dropped, discarding publishes");
                    forwarding = false;
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                // Clean sessions forget subscriptions across reconnects.
                tracing::info!("reconnected");
                if let Err(e) = subscribe(&client, &subscriptions) {
                    tracing::warn!(error = %e, "resubscribe failed");
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => break,
            Ok(_) => {}
            Err(e) => {
                if stopping.load(Ordering::Acquire) {
                    break;
                }
                tracing::warn!(error = %e, "broker connection error");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn default_config_targets_public_broker() {
        let config = MqttConfig::default();
        assert_eq!(config.host, "mqtt.meshtastic.org");
        assert_eq!(config.port, 1883);
        assert_eq!(config.username, "meshdev");
        assert_eq!(config.password, "large4cats");
        assert_eq!(config.subscriptions, default_subscriptions());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: MqttConfig = serde_json::from_str(r#"{"host":"localhost"}"#).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1883);
        assert_eq!(config.client_id_prefix, "meshobserv");
    }

    #[test]
    fn client_id_has_random_hex_suffix() {
        let id = client_id("meshobserv").unwrap();
        let suffix = id.strip_prefix("meshobserv-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    /// Read one MQTT control packet and return its type.
    async fn read_packet<R: AsyncRead + Unpin>(reader: &mut R) -> Option<u8> {
        let header = reader.read_u8().await.ok()?;
        let mut len = 0usize;
        let mut shift = 0;
        loop {
            let byte = reader.read_u8().await.ok()?;
            len |= usize::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).await.ok()?;
        Some(header >> 4)
    }

    /// Accept one client, acknowledge it, flood it with QoS 0 publishes and
    /// report whether it ever sent DISCONNECT.
    async fn flooding_broker(listener: TcpListener) -> bool {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, mut writer) = stream.into_split();
        assert_eq!(read_packet(&mut reader).await, Some(PACKET_CONNECT));
        writer.write_all(&[0x20, 0x02, 0x00, 0x00]).await.unwrap();

        let publisher = tokio::spawn(async move {
            let publish = [0x30, 0x07, 0x00, 0x03, b'm', b's', b'h', b'h', b'i'];
            while writer.write_all(&publish).await.is_ok() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });

        let mut disconnected = false;
        while let Some(kind) = read_packet(&mut reader).await {
            if kind == PACKET_DISCONNECT {
                disconnected = true;
                break;
            }
        }
        publisher.abort();
        disconnected
    }

    const PACKET_CONNECT: u8 = 1;
    const PACKET_DISCONNECT: u8 = 14;

    #[tokio::test]
    async fn disconnect_reaches_broker_after_receiver_dropped() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(flooding_broker(listener));

        let config = MqttConfig {
            host: "127.0.0.1".to_string(),
            port,
            connect_timeout_secs: 5,
            ..MqttConfig::default()
        };
        let (broker, rx) = MqttBroker::connect(&config).await.unwrap();
        drop(rx);
        tokio::time::sleep(Duration::from_millis(200)).await;

        broker.disconnect().await.unwrap();
        let disconnected = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert!(disconnected);
    }

    #[tokio::test]
    async fn connect_to_closed_port_fails() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = MqttConfig {
            host: "127.0.0.1".to_string(),
            port,
            connect_timeout_secs: 5,
            ..MqttConfig::default()
        };
        let err = MqttBroker::connect(&config).await.err().unwrap();
        assert!(matches!(
            err,
            NetworkError::ConnectFailed { .. } | NetworkError::ConnectTimeout(_)
        ));
    }
}
