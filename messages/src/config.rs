//! Device and LoRa configuration enumerations referenced by node info and
//! map reports.

use crate::WireName;

/// The role a device plays in the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Role {
    Client = 0,
    ClientMute = 1,
    Router = 2,
    RouterClient = 3,
    Repeater = 4,
    Tracker = 5,
    Sensor = 6,
    Tak = 7,
    ClientHidden = 8,
    LostAndFound = 9,
    TakTracker = 10,
    RouterLate = 11,
}

impl WireName for Role {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::ClientMute => "CLIENT_MUTE",
            Self::Router => "ROUTER",
            Self::RouterClient => "ROUTER_CLIENT",
            Self::Repeater => "REPEATER",
            Self::Tracker => "TRACKER",
            Self::Sensor => "SENSOR",
            Self::Tak => "TAK",
            Self::ClientHidden => "CLIENT_HIDDEN",
            Self::LostAndFound => "LOST_AND_FOUND",
            Self::TakTracker => "TAK_TRACKER",
            Self::RouterLate => "ROUTER_LATE",
        }
    }
}

/// Regulatory region the radio is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RegionCode {
    Unset = 0,
    Us = 1,
    Eu433 = 2,
    Eu868 = 3,
    Cn = 4,
    Jp = 5,
    Anz = 6,
    Kr = 7,
    Tw = 8,
    Ru = 9,
    In = 10,
    Nz865 = 11,
    Th = 12,
    Lora24 = 13,
    Ua433 = 14,
    Ua868 = 15,
    My433 = 16,
    My919 = 17,
    Sg923 = 18,
    Ph433 = 19,
    Ph868 = 20,
    Ph915 = 21,
}

impl WireName for RegionCode {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::Us => "US",
            Self::Eu433 => "EU_433",
            Self::Eu868 => "EU_868",
            Self::Cn => "CN",
            Self::Jp => "JP",
            Self::Anz => "ANZ",
            Self::Kr => "KR",
            Self::Tw => "TW",
            Self::Ru => "RU",
            Self::In => "IN",
            Self::Nz865 => "NZ_865",
            Self::Th => "TH",
            Self::Lora24 => "LORA_24",
            Self::Ua433 => "UA_433",
            Self::Ua868 => "UA_868",
            Self::My433 => "MY_433",
            Self::My919 => "MY_919",
            Self::Sg923 => "SG_923",
            Self::Ph433 => "PH_433",
            Self::Ph868 => "PH_868",
            Self::Ph915 => "PH_915",
        }
    }
}

/// Named LoRa modulation presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ModemPreset {
    LongFast = 0,
    LongSlow = 1,
    VeryLongSlow = 2,
    MediumSlow = 3,
    MediumFast = 4,
    ShortSlow = 5,
    ShortFast = 6,
    LongModerate = 7,
    ShortTurbo = 8,
}

impl WireName for ModemPreset {
    fn as_str_name(&self) -> &'static str {
        match self {
            Self::LongFast => "LONG_FAST",
            Self::LongSlow => "LONG_SLOW",
            Self::VeryLongSlow => "VERY_LONG_SLOW",
            Self::MediumSlow => "MEDIUM_SLOW",
            Self::MediumFast => "MEDIUM_FAST",
            Self::ShortSlow => "SHORT_SLOW",
            Self::ShortFast => "SHORT_FAST",
            Self::LongModerate => "LONG_MODERATE",
            Self::ShortTurbo => "SHORT_TURBO",
        }
    }
}
