//! Messages that only exist on the pub/sub side of the network.

/// Outer wrapper for every packet published to the broker.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceEnvelope {
    #[prost(message, optional, tag = "1")]
    pub packet: ::core::option::Option<crate::MeshPacket>,
    /// Channel name the packet was heard on.
    #[prost(string, tag = "2")]
    pub channel_id: ::prost::alloc::string::String,
    /// `!xxxxxxxx` id of the gateway that uplinked the packet.
    #[prost(string, tag = "3")]
    pub gateway_id: ::prost::alloc::string::String,
}

/// Periodic summary a gateway publishes on the `map/` topic.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MapReport {
    #[prost(string, tag = "1")]
    pub long_name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub short_name: ::prost::alloc::string::String,
    #[prost(enumeration = "crate::Role", tag = "3")]
    pub role: i32,
    #[prost(enumeration = "crate::HardwareModel", tag = "4")]
    pub hw_model: i32,
    #[prost(string, tag = "5")]
    pub firmware_version: ::prost::alloc::string::String,
    #[prost(enumeration = "crate::RegionCode", tag = "6")]
    pub region: i32,
    #[prost(enumeration = "crate::ModemPreset", tag = "7")]
    pub modem_preset: i32,
    #[prost(bool, tag = "8")]
    pub has_default_channel: bool,
    #[prost(sfixed32, tag = "9")]
    pub latitude_i: i32,
    #[prost(sfixed32, tag = "10")]
    pub longitude_i: i32,
    #[prost(int32, tag = "11")]
    pub altitude: i32,
    #[prost(uint32, tag = "12")]
    pub position_precision: u32,
    #[prost(uint32, tag = "13")]
    pub num_online_local_nodes: u32,
}
