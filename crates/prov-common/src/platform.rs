//! Static platform registry
//!
//! Platform is an explicit inventory field. Each platform maps to a fixed
//! command profile the network driver selects its templates by; nothing is
//! inferred from device or VLAN naming conventions.

use serde::{Deserialize, Serialize};

/// Supported device platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Cisco IOS XR routers.
    #[serde(rename = "cisco-iosxr")]
    CiscoIosXr,
    /// Ubiquiti Wave access points.
    #[serde(rename = "ubiquiti-wave")]
    UbiquitiWave,
    /// Ubiquiti airMAX access points.
    #[serde(rename = "ubiquiti-airmax")]
    UbiquitiAirMax,
    /// Cambium access points.
    #[serde(rename = "cambium")]
    Cambium,
    /// Mikrotik access points.
    #[serde(rename = "mikrotik")]
    Mikrotik,
}

impl Platform {
    /// Inventory slug for the platform.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::CiscoIosXr => "cisco-iosxr",
            Self::UbiquitiWave => "ubiquiti-wave",
            Self::UbiquitiAirMax => "ubiquiti-airmax",
            Self::Cambium => "cambium",
            Self::Mikrotik => "mikrotik",
        }
    }

    /// Parse an inventory slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "cisco-iosxr" => Some(Self::CiscoIosXr),
            "ubiquiti-wave" => Some(Self::UbiquitiWave),
            "ubiquiti-airmax" => Some(Self::UbiquitiAirMax),
            "cambium" => Some(Self::Cambium),
            "mikrotik" => Some(Self::Mikrotik),
            _ => None,
        }
    }

    /// Command profile the network driver selects its command set by.
    pub fn command_profile(&self) -> &'static str {
        match self {
            Self::CiscoIosXr => "cisco_iosxr",
            Self::UbiquitiWave => "ubiquiti_wave",
            Self::UbiquitiAirMax => "ubiquiti_airmax",
            Self::Cambium => "cambium",
            Self::Mikrotik => "mikrotik",
        }
    }

    /// Manufacturer display name.
    pub fn manufacturer(&self) -> &'static str {
        match self {
            Self::CiscoIosXr => "Cisco",
            Self::UbiquitiWave | Self::UbiquitiAirMax => "Ubiquiti",
            Self::Cambium => "Cambium",
            Self::Mikrotik => "Mikrotik",
        }
    }
}
