//! Telemetry payloads (`TELEMETRY_APP`).
//!
//! Upstream marks most metric fields `optional`; absence and zero are treated
//! the same by the observer, so plain scalars are used here.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Telemetry {
    #[prost(fixed32, tag = "1")]
    pub time: u32,
    #[prost(oneof = "telemetry::Variant", tags = "2, 3")]
    pub variant: ::core::option::Option<telemetry::Variant>,
}

pub mod telemetry {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Variant {
        #[prost(message, tag = "2")]
        DeviceMetrics(super::DeviceMetrics),
        #[prost(message, tag = "3")]
        EnvironmentMetrics(super::EnvironmentMetrics),
    }
}

/// Battery and airtime figures.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceMetrics {
    /// Percent, with values above 100 meaning externally powered.
    #[prost(uint32, tag = "1")]
    pub battery_level: u32,
    #[prost(float, tag = "2")]
    pub voltage: f32,
    #[prost(float, tag = "3")]
    pub channel_utilization: f32,
    #[prost(float, tag = "4")]
    pub air_util_tx: f32,
    #[prost(uint32, tag = "5")]
    pub uptime_seconds: u32,
}

/// Readings from attached environment sensors.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvironmentMetrics {
    #[prost(float, tag = "1")]
    pub temperature: f32,
    #[prost(float, tag = "2")]
    pub relative_humidity: f32,
    #[prost(float, tag = "3")]
    pub barometric_pressure: f32,
    #[prost(float, tag = "4")]
    pub gas_resistance: f32,
    #[prost(float, tag = "5")]
    pub voltage: f32,
    #[prost(float, tag = "6")]
    pub current: f32,
    #[prost(uint32, tag = "7")]
    pub iaq: u32,
    #[prost(float, tag = "8")]
    pub distance: f32,
    #[prost(float, tag = "9")]
    pub lux: f32,
    #[prost(float, tag = "10")]
    pub white_lux: f32,
    #[prost(float, tag = "11")]
    pub ir_lux: f32,
    #[prost(float, tag = "12")]
    pub uv_lux: f32,
    #[prost(uint32, tag = "13")]
    pub wind_direction: u32,
    #[prost(float, tag = "14")]
    pub wind_speed: f32,
    #[prost(float, tag = "15")]
    pub weight: f32,
    #[prost(float, tag = "16")]
    pub wind_gust: f32,
    #[prost(float, tag = "17")]
    pub wind_lull: f32,
    #[prost(float, tag = "18")]
    pub radiation: f32,
    #[prost(float, tag = "19")]
    pub rainfall_1h: f32,
    #[prost(float, tag = "20")]
    pub rainfall_24h: f32,
}
