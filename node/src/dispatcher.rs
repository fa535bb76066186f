//! Application payload dispatch.
//!
//! A [`DecodedPacket`] carries a port number and opaque bytes. This module
//! decodes the bytes according to the port, validates the result, and turns
//! it into a [`NodeUpdate`] that is applied to the node table under the lock.
//! Decoding and validation are pure so they run before the lock is taken.

use meshmap_messages::{
    telemetry_variant::Variant, wire_name, DecodeError, HardwareModel, Message, ModemPreset,
    NeighborInfo, PortNum, RegionCode, Role, Telemetry, User, WireName,
};
use meshmap_protocol::DecodedPacket;
use meshmap_store::{DeviceMetrics, EnvironmentMetrics, Identity, MapReport, NodeDb, Position};
use meshmap_types::{NodeNum, Timestamp};
use thiserror::Error;

/// Why a decoded packet did not produce a node update.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed {port} payload: {source}")]
    Malformed {
        port: &'static str,
        #[source]
        source: DecodeError,
    },

    #[error("payload rejected: {0}")]
    Rejected(&'static str),
}

impl DispatchError {
    /// Rejections are ordinary mesh noise. Malformed payloads are not.
    pub fn is_routine(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "malformed_payload",
            Self::Rejected(reason) => reason,
        }
    }
}

/// A payload decoded according to its port.
#[derive(Clone, Debug, PartialEq)]
pub enum AppPayload {
    Text(String),
    Position(meshmap_messages::Position),
    NodeInfo(User),
    Telemetry(Telemetry),
    NeighborInfo(NeighborInfo),
    MapReport(meshmap_messages::MapReport),
    /// A port the observer does not interpret.
    Other(i32),
}

impl AppPayload {
    pub fn decode(port: i32, bytes: &[u8]) -> Result<Self, DispatchError> {
        let payload = match PortNum::try_from(port) {
            Ok(PortNum::TextMessageApp) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            Ok(PortNum::PositionApp) => Self::Position(decode_as(PortNum::PositionApp, bytes)?),
            Ok(PortNum::NodeinfoApp) => Self::NodeInfo(decode_as(PortNum::NodeinfoApp, bytes)?),
            Ok(PortNum::TelemetryApp) => Self::Telemetry(decode_as(PortNum::TelemetryApp, bytes)?),
            Ok(PortNum::NeighborinfoApp) => {
                Self::NeighborInfo(decode_as(PortNum::NeighborinfoApp, bytes)?)
            }
            Ok(PortNum::MapReportApp) => Self::MapReport(decode_as(PortNum::MapReportApp, bytes)?),
            _ => Self::Other(port),
        };
        Ok(payload)
    }
}

fn decode_as<M: Message + Default>(port: PortNum, bytes: &[u8]) -> Result<M, DispatchError> {
    M::decode(bytes).map_err(|source| DispatchError::Malformed {
        port: port.as_str_name(),
        source,
    })
}

/// A validated change to one node record.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeUpdate {
    Position(Position),
    User(Identity),
    DeviceMetrics(DeviceMetrics),
    EnvironmentMetrics(EnvironmentMetrics),
    /// Neighbor number and SNR, as reported.
    Neighbors(Vec<(NodeNum, f32)>),
    MapReport {
        identity: Identity,
        report: MapReport,
        position: Position,
    },
}

impl NodeUpdate {
    /// Validate a payload sent by `from`.
    ///
    /// Returns `Ok(None)` for payloads that are observed but never stored.
    pub fn from_payload(from: NodeNum, payload: AppPayload) -> Result<Option<Self>, DispatchError> {
        let update = match payload {
            AppPayload::Position(p) => position(p)?,
            AppPayload::NodeInfo(user) => identity(user)?,
            AppPayload::Telemetry(t) => telemetry(t)?,
            AppPayload::NeighborInfo(info) => neighbors(from, info)?,
            AppPayload::MapReport(report) => map_report(report)?,
            AppPayload::Text(text) => {
                tracing::debug!(from = %from.to_user_id(), %text, "text message");
                return Ok(None);
            }
            AppPayload::Other(port) => {
                tracing::debug!(from = %from.to_user_id(), port = %wire_name::<PortNum>(port), "ignored port");
                return Ok(None);
            }
        };
        Ok(Some(update))
    }

    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Position(_) => "position",
            Self::User(_) => "user",
            Self::DeviceMetrics(_) => "device_metrics",
            Self::EnvironmentMetrics(_) => "environment_metrics",
            Self::Neighbors(_) => "neighbors",
            Self::MapReport { .. } => "map_report",
        }
    }

    /// Apply to the node `from`, creating it as first heard on `topic`.
    ///
    /// Position and map reports also refresh the relay observation.
    pub fn apply(self, db: &mut NodeDb, from: NodeNum, topic: &str, now: Timestamp) {
        let node = db.entry(from, topic, now);
        match self {
            Self::Position(position) => {
                node.update_position(position);
                node.touch_seen_by(topic, now);
            }
            Self::User(identity) => node.update_user(identity),
            Self::DeviceMetrics(metrics) => node.update_device_metrics(metrics, now),
            Self::EnvironmentMetrics(metrics) => node.update_environment_metrics(metrics, now),
            Self::Neighbors(neighbors) => {
                for (num, snr) in neighbors {
                    node.update_neighbor(num, snr, now);
                }
            }
            Self::MapReport {
                identity,
                report,
                position,
            } => {
                node.update_user(identity);
                node.update_map_report(report, now);
                node.update_position(position);
                node.touch_seen_by(topic, now);
            }
        }
    }
}

/// Decode and validate the payload of `packet`.
pub fn dispatch(packet: &DecodedPacket) -> Result<Option<NodeUpdate>, DispatchError> {
    let payload = AppPayload::decode(packet.port, &packet.payload)?;
    NodeUpdate::from_payload(packet.from, payload)
}

fn position(p: meshmap_messages::Position) -> Result<NodeUpdate, DispatchError> {
    let position = Position {
        latitude: p.latitude_i,
        longitude: p.longitude_i,
        altitude: p.altitude,
        precision: p.precision_bits,
    };
    if position.is_unset() {
        return Err(DispatchError::Rejected("no_fix"));
    }
    Ok(NodeUpdate::Position(position))
}

fn identity(user: User) -> Result<NodeUpdate, DispatchError> {
    if user.long_name.is_empty() {
        return Err(DispatchError::Rejected("unnamed"));
    }
    Ok(NodeUpdate::User(Identity {
        long_name: user.long_name,
        short_name: user.short_name,
        hw_model: wire_name::<HardwareModel>(user.hw_model),
        role: wire_name::<Role>(user.role),
    }))
}

fn telemetry(t: Telemetry) -> Result<NodeUpdate, DispatchError> {
    match t.variant {
        Some(Variant::DeviceMetrics(m)) => Ok(NodeUpdate::DeviceMetrics(DeviceMetrics {
            battery_level: m.battery_level,
            voltage: m.voltage,
            ch_util: m.channel_utilization,
            air_util_tx: m.air_util_tx,
            uptime: m.uptime_seconds,
            last_device_metrics: None,
        })),
        Some(Variant::EnvironmentMetrics(m)) => {
            Ok(NodeUpdate::EnvironmentMetrics(EnvironmentMetrics {
                temperature: m.temperature,
                relative_humidity: m.relative_humidity,
                barometric_pressure: m.barometric_pressure,
                lux: m.lux,
                wind_direction: m.wind_direction,
                wind_speed: m.wind_speed,
                wind_gust: m.wind_gust,
                radiation: m.radiation,
                rainfall_1h: m.rainfall_1h,
                rainfall_24h: m.rainfall_24h,
                last_environment_metrics: None,
            }))
        }
        None => Err(DispatchError::Rejected("empty_telemetry")),
    }
}

fn neighbors(from: NodeNum, info: NeighborInfo) -> Result<NodeUpdate, DispatchError> {
    if NodeNum::new(info.node_id) != from {
        return Err(DispatchError::Rejected("neighbor_mismatch"));
    }
    if info.neighbors.is_empty() {
        return Err(DispatchError::Rejected("no_neighbors"));
    }
    // Entries without an id are skipped, but the report still counts.
    let neighbors = info
        .neighbors
        .iter()
        .map(|n| (NodeNum::new(n.node_id), n.snr))
        .filter(|(num, _)| !num.is_unknown())
        .collect();
    Ok(NodeUpdate::Neighbors(neighbors))
}

fn map_report(r: meshmap_messages::MapReport) -> Result<NodeUpdate, DispatchError> {
    if r.long_name.is_empty() {
        return Err(DispatchError::Rejected("unnamed"));
    }
    let position = Position {
        latitude: r.latitude_i,
        longitude: r.longitude_i,
        altitude: r.altitude,
        precision: r.position_precision,
    };
    if position.is_unset() {
        return Err(DispatchError::Rejected("no_fix"));
    }
    Ok(NodeUpdate::MapReport {
        identity: Identity {
            long_name: r.long_name,
            short_name: r.short_name,
            hw_model: wire_name::<HardwareModel>(r.hw_model),
            role: wire_name::<Role>(r.role),
        },
        report: MapReport {
            fw_version: r.firmware_version,
            region: wire_name::<RegionCode>(r.region),
            modem_preset: wire_name::<ModemPreset>(r.modem_preset),
            has_default_ch: r.has_default_channel,
            online_local_nodes: r.num_online_local_nodes,
            last_map_report: None,
        },
        position,
    })
}
