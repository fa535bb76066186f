//! Core mesh messages: the routed packet, its decoded payload, and the
//! position / user / neighbor application payloads.

use crate::WireName;

/// One routed message within the radio network.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MeshPacket {
    /// Sender node number. Zero means anonymous.
    #[prost(fixed32, tag = "1")]
    pub from: u32,
    #[prost(fixed32, tag = "2")]
    pub to: u32,
    /// Channel index (decoded packets) or channel hash (encrypted packets).
    #[prost(uint32, tag = "3")]
    pub channel: u32,
    #[prost(oneof = "mesh_packet::PayloadVariant", tags = "4, 5")]
    pub payload_variant: ::core::option::Option<mesh_packet::PayloadVariant>,
    /// Packet id, unique per sender. Part of the encryption nonce.
    #[prost(fixed32, tag = "6")]
    pub id: u32,
    #[prost(fixed32, tag = "7")]
    pub rx_time: u32,
    #[prost(float, tag = "8")]
    pub rx_snr: f32,
    #[prost(uint32, tag = "9")]
    pub hop_limit: u32,
    #[prost(bool, tag = "10")]
    pub want_ack: bool,
    /// `MeshPacket.Priority` upstream; only carried through, never interpreted.
    #[prost(int32, tag = "11")]
    pub priority: i32,
    #[prost(int32, tag = "12")]
    pub rx_rssi: i32,
    #[prost(int32, tag = "13")]
    pub delayed: i32,
    #[prost(bool, tag = "14")]
    pub via_mqtt: bool,
    #[prost(uint32, tag = "15")]
    pub hop_start: u32,
}

pub mod mesh_packet {
    /// Either an already-decoded payload or the encrypted bytes of one.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum PayloadVariant {
        #[prost(message, tag = "4")]
        Decoded(super::Data),
        #[prost(bytes, tag = "5")]
        Encrypted(::prost::alloc::vec::Vec<u8>),
    }
}

/// The application payload of a packet, tagged with its port number.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Data {
    #[prost(enumeration = "crate::PortNum", tag = "1")]
    pub portnum: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
    #[prost(bool, tag = "3")]
    pub want_response: bool,
    #[prost(fixed32, tag = "4")]
    pub dest: u32,
    #[prost(fixed32, tag = "5")]
    pub source: u32,
    #[prost(fixed32, tag = "6")]
    pub request_id: u32,
    #[prost(fixed32, tag = "7")]
    pub reply_id: u32,
    #[prost(fixed32, tag = "8")]
    pub emoji: u32,
}

/// A position fix. Coordinates are degrees × 1e7.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Position {
    #[prost(sfixed32, tag = "1")]
    pub latitude_i: i32,
    #[prost(sfixed32, tag = "2")]
    pub longitude_i: i32,
    /// Meters above MSL.
    #[prost(int32, tag = "3")]
    pub altitude: i32,
    #[prost(fixed32, tag = "4")]
    pub time: u32,
    /// Number of significant bits kept in the coordinates (privacy setting).
    #[prost(uint32, tag = "23")]
    pub precision_bits: u32,
}

/// Identity broadcast by a node (the `NODEINFO_APP` payload).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct User {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub long_name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub short_name: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "4")]
    pub macaddr: ::prost::alloc::vec::Vec<u8>,
    #[prost(enumeration = "HardwareModel", tag = "5")]
    pub hw_model: i32,
    #[prost(bool, tag = "6")]
    pub is_licensed: bool,
    #[prost(enumeration = "crate::Role", tag = "7")]
    pub role: i32,
    #[prost(bytes = "vec", tag = "8")]
    pub public_key: ::prost::alloc::vec::Vec<u8>,
}

/// A node's report of the neighbors it hears directly.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NeighborInfo {
    /// The node the report is about. Must equal the packet sender to be trusted.
    #[prost(uint32, tag = "1")]
    pub node_id: u32,
    #[prost(uint32, tag = "2")]
    pub last_sent_by_id: u32,
    #[prost(uint32, tag = "3")]
    pub node_broadcast_interval_secs: u32,
    #[prost(message, repeated, tag = "4")]
    pub neighbors: ::prost::alloc::vec::Vec<Neighbor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Neighbor {
    #[prost(uint32, tag = "1")]
    pub node_id: u32,
    #[prost(float, tag = "2")]
    pub snr: f32,
    #[prost(fixed32, tag = "3")]
    pub last_rx_time: u32,
    #[prost(uint32, tag = "4")]
    pub node_broadcast_interval_secs: u32,
}

/// Radio hardware models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HardwareModel {
    Unset = 0,
    TloraV2 = 1,
    TloraV1 = 2,
    TloraV211p6 = 3,
    Tbeam = 4,
    HeltecV20 = 5,
    TbeamV0p7 = 6,
    TEcho = 7,
    TloraV11p3 = 8,
    Rak4631 = 9,
    HeltecV21 = 10,
    HeltecV1 = 11,
    LilygoTbeamS3Core = 12,
    Rak11200 = 13,
    NanoG1 = 14,
    TloraV211p8 = 15,
    TloraT3S3 = 16,
    NanoG1Explorer = 17,
    NanoG2Ultra = 18,
    LoraType = 19,
    Wiphone = 20,
    WioWm1110 = 21,
    Rak2560 = 22,
    HeltecHru3601 = 23,
    HeltecWirelessBridge = 24,
    StationG1 = 25,
    Rak11310 = 26,
    SenseloraRp2040 = 27,
    SenseloraS3 = 28,
    Canaryone = 29,
    Rp2040Lora = 30,
    StationG2 = 31,
    LoraRelayV1 = 32,
    Nrf52840dk = 33,
    Ppr = 34,
    Genieblocks = 35,
    Nrf52Unknown = 36,
    Portduino = 37,
    AndroidSim = 38,
    DiyV1 = 39,
    Nrf52840Pca10059 = 40,
    DrDev = 41,
    M5stack = 42,
    HeltecV3 = 43,
    HeltecWslV3 = 44,
    Betafpv2400Tx = 45,
    Betafpv900NanoTx = 46,
    RpiPico = 47,
    HeltecWirelessTracker = 48,
    HeltecWirelessPaper = 49,
    TDeck = 50,
    TWatchS3 = 51,
    PicomputerS3 = 52,
    HeltecHt62 = 53,
    EbyteEsp32S3 = 54,
    Esp32S3Pico = 55,
    Chatter2 = 56,
    HeltecWirelessPaperV10 = 57,
    HeltecWirelessTrackerV10 = 58,
    Unphone = 59,
    TdLorac = 60,
    CdebyteEoraS3 = 61,
    TwcMeshV4 = 62,
    Nrf52PromicroDiy = 63,
    Radiomaster900BanditNano = 64,
    HeltecCapsuleSensorV3 = 65,
    HeltecVisionMasterT190 = 66,
    HeltecVisionMasterE213 = 67,
    HeltecVisionMasterE290 = 68,
    HeltecMeshNodeT114 = 69,
    SensecapIndicator = 70,
    TrackerT1000E = 71,
    PrivateHw = 255,
}

impl WireName for HardwareModel {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::TloraV2 => "TLORA_V2",
            Self::TloraV1 => "TLORA_V1",
            Self::TloraV211p6 => "TLORA_V2_1_1P6",
            Self::Tbeam => "TBEAM",
            Self::HeltecV20 => "HELTEC_V2_0",
            Self::TbeamV0p7 => "TBEAM_V0P7",
            Self::TEcho => "T_ECHO",
            Self::TloraV11p3 => "TLORA_V1_1P3",
            Self::Rak4631 => "RAK4631",
            Self::HeltecV21 => "HELTEC_V2_1",
            Self::HeltecV1 => "HELTEC_V1",
            Self::LilygoTbeamS3Core => "LILYGO_TBEAM_S3_CORE",
            Self::Rak11200 => "RAK11200",
            Self::NanoG1 => "NANO_G1",
            Self::TloraV211p8 => "TLORA_V2_1_1P8",
            Self::TloraT3S3 => "TLORA_T3_S3",
            Self::NanoG1Explorer => "NANO_G1_EXPLORER",
            Self::NanoG2Ultra => "NANO_G2_ULTRA",
            Self::LoraType => "LORA_TYPE",
            Self::Wiphone => "WIPHONE",
            Self::WioWm1110 => "WIO_WM1110",
            Self::Rak2560 => "RAK2560",
            Self::HeltecHru3601 => "HELTEC_HRU_3601",
            Self::HeltecWirelessBridge => "HELTEC_WIRELESS_BRIDGE",
            Self::StationG1 => "STATION_G1",
            Self::Rak11310 => "RAK11310",
            Self::SenseloraRp2040 => "SENSELORA_RP2040",
            Self::SenseloraS3 => "SENSELORA_S3",
            Self::Canaryone => "CANARYONE",
            Self::Rp2040Lora => "RP2040_LORA",
            Self::StationG2 => "STATION_G2",
            Self::LoraRelayV1 => "LORA_RELAY_V1",
            Self::Nrf52840dk => "NRF52840DK",
            Self::Ppr => "PPR",
            Self::Genieblocks => "GENIEBLOCKS",
            Self::Nrf52Unknown => "NRF52_UNKNOWN",
            Self::Portduino => "PORTDUINO",
            Self::AndroidSim => "ANDROID_SIM",
            Self::DiyV1 => "DIY_V1",
            Self::Nrf52840Pca10059 => "NRF52840_PCA10059",
            Self::DrDev => "DR_DEV",
            Self::M5stack => "M5STACK",
            Self::HeltecV3 => "HELTEC_V3",
            Self::HeltecWslV3 => "HELTEC_WSL_V3",
            Self::Betafpv2400Tx => "BETAFPV_2400_TX",
            Self::Betafpv900NanoTx => "BETAFPV_900_NANO_TX",
            Self::RpiPico => "RPI_PICO",
            Self::HeltecWirelessTracker => "HELTEC_WIRELESS_TRACKER",
            Self::HeltecWirelessPaper => "HELTEC_WIRELESS_PAPER",
            Self::TDeck => "T_DECK",
            Self::TWatchS3 => "T_WATCH_S3",
            Self::PicomputerS3 => "PICOMPUTER_S3",
            Self::HeltecHt62 => "HELTEC_HT62",
            Self::EbyteEsp32S3 => "EBYTE_ESP32_S3",
            Self::Esp32S3Pico => "ESP32_S3_PICO",
            Self::Chatter2 => "CHATTER_2",
            Self::HeltecWirelessPaperV10 => "HELTEC_WIRELESS_PAPER_V1_0",
            Self::HeltecWirelessTrackerV10 => "HELTEC_WIRELESS_TRACKER_V1_0",
            Self::Unphone => "UNPHONE",
            Self::TdLorac => "TD_LORAC",
            Self::CdebyteEoraS3 => "CDEBYTE_EORA_S3",
            Self::TwcMeshV4 => "TWC_MESH_V4",
            Self::Nrf52PromicroDiy => "NRF52_PROMICRO_DIY",
            Self::Radiomaster900BanditNano => "RADIOMASTER_900_BANDIT_NANO",
            Self::HeltecCapsuleSensorV3 => "HELTEC_CAPSULE_SENSOR_V3",
            Self::HeltecVisionMasterT190 => "HELTEC_VISION_MASTER_T190",
            Self::HeltecVisionMasterE213 => "HELTEC_VISION_MASTER_E213",
            Self::HeltecVisionMasterE290 => "HELTEC_VISION_MASTER_E290",
            Self::HeltecMeshNodeT114 => "HELTEC_MESH_NODE_T114",
            Self::SensecapIndicator => "SENSECAP_INDICATOR",
            Self::TrackerT1000E => "TRACKER_T1000_E",
            Self::PrivateHw => "PRIVATE_HW",
        }
    }
}
