//! Wire schema for mesh traffic relayed over the pub/sub bus.
//!
//! Only the subset of the radio protobuf schema that the observer reads is
//! declared here, using `prost` derives. Field numbers and scalar encodings
//! match the upstream `.proto` files; fields not declared are skipped by the
//! decoder as unknown fields, so newer firmware stays readable.

pub mod config;
pub mod mesh;
pub mod mqtt;
pub mod portnums;
pub mod telemetry;

pub use config::{ModemPreset, RegionCode, Role};
pub use mesh::{
    mesh_packet, Data, HardwareModel, MeshPacket, Neighbor, NeighborInfo, Position, User,
};
pub use mqtt::{MapReport, ServiceEnvelope};
pub use portnums::PortNum;
pub use telemetry::{telemetry as telemetry_variant, DeviceMetrics, EnvironmentMetrics, Telemetry};

pub use prost::{DecodeError, Message};

/// Enumerations that have an upstream symbolic name.
pub trait WireName: TryFrom<i32> + Copy {
    /// The `SCREAMING_SNAKE_CASE` name used in the `.proto` definition.
    fn as_str_name(&self) -> &'static str;
}

/// Render a raw enumeration value by name, or as its decimal number when the
/// value is unknown to this schema (newer firmware).
pub fn wire_name<E: WireName>(raw: i32) -> String {
    match E::try_from(raw) {
        Ok(value) => value.as_str_name().to_string(),
        Err(_) => raw.to_string(),
    }
}
