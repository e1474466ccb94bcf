use std::fmt;

use bit_struct::u3;

use crate::bits::BitString;
use crate::error::Result;
use crate::sentence;

pub mod base_station;
pub mod binary;
pub mod class_b;
pub mod position;
pub mod static_voyage;

pub use base_station::BaseStationReport;
pub use binary::{BinaryAddressedMessage, BinaryBroadcastMessage};
pub use class_b::{ExtendedPositionReportClassB, StandardPositionReportClassB};
pub use position::{NavigationStatus, PositionReportClassA};
pub use static_voyage::{ShipType, StaticAndVoyageData};

// Raw "not available" sentinels shared across the position-bearing types.
pub(crate) const LONGITUDE_NOT_AVAILABLE: i32 = 0x679_1AC0; // 181 degrees in 1/10000'
pub(crate) const LATITUDE_NOT_AVAILABLE: i32 = 0x341_2140; // 91 degrees in 1/10000'
pub(crate) const SOG_NOT_AVAILABLE: u16 = 1023;
pub(crate) const COG_NOT_AVAILABLE: u16 = 3600;
pub(crate) const HEADING_NOT_AVAILABLE: u16 = 511;

// 1/10000 minute = 1/600000 degree.
pub(crate) fn longitude_to_degrees(raw: i32) -> f64 {
    if raw == LONGITUDE_NOT_AVAILABLE {
        181.0
    } else {
        f64::from(raw) / 600_000.0
    }
}

pub(crate) fn latitude_to_degrees(raw: i32) -> f64 {
    if raw == LATITUDE_NOT_AVAILABLE {
        91.0
    } else {
        f64::from(raw) / 600_000.0
    }
}

pub(crate) fn longitude_from_degrees(degrees: f64) -> i32 {
    if (-180.0..=180.0).contains(&degrees) {
        (degrees * 600_000.0).round() as i32
    } else {
        LONGITUDE_NOT_AVAILABLE
    }
}

pub(crate) fn latitude_from_degrees(degrees: f64) -> i32 {
    if (-90.0..=90.0).contains(&degrees) {
        (degrees * 600_000.0).round() as i32
    } else {
        LATITUDE_NOT_AVAILABLE
    }
}

/// A decoded AIS message, tagged by its 6-bit message type.
#[derive(Debug, Clone, PartialEq)]
pub enum AisMessage {
    /// Types 1, 2, 3.
    PositionReportClassA(PositionReportClassA),
    /// Type 4.
    BaseStationReport(BaseStationReport),
    /// Type 5.
    StaticAndVoyageData(StaticAndVoyageData),
    /// Type 6.
    BinaryAddressed(BinaryAddressedMessage),
    /// Type 8.
    BinaryBroadcast(BinaryBroadcastMessage),
    /// Type 18.
    StandardClassBReport(StandardPositionReportClassB),
    /// Type 19.
    ExtendedClassBReport(ExtendedPositionReportClassB),
}

impl AisMessage {
    pub fn message_type(&self) -> u8 {
        match self {
            AisMessage::PositionReportClassA(m) => m.message_type(),
            AisMessage::BaseStationReport(_) => 4,
            AisMessage::StaticAndVoyageData(_) => 5,
            AisMessage::BinaryAddressed(_) => 6,
            AisMessage::BinaryBroadcast(_) => 8,
            AisMessage::StandardClassBReport(_) => 18,
            AisMessage::ExtendedClassBReport(_) => 19,
        }
    }

    pub fn mmsi(&self) -> u32 {
        match self {
            AisMessage::PositionReportClassA(m) => m.mmsi(),
            AisMessage::BaseStationReport(m) => m.mmsi(),
            AisMessage::StaticAndVoyageData(m) => m.mmsi(),
            AisMessage::BinaryAddressed(m) => m.mmsi(),
            AisMessage::BinaryBroadcast(m) => m.mmsi(),
            AisMessage::StandardClassBReport(m) => m.mmsi(),
            AisMessage::ExtendedClassBReport(m) => m.mmsi(),
        }
    }

    pub fn repeat_indicator(&self) -> u8 {
        match self {
            AisMessage::PositionReportClassA(m) => m.repeat_indicator(),
            AisMessage::BaseStationReport(m) => m.repeat_indicator(),
            AisMessage::StaticAndVoyageData(m) => m.repeat_indicator(),
            AisMessage::BinaryAddressed(m) => m.repeat_indicator(),
            AisMessage::BinaryBroadcast(m) => m.repeat_indicator(),
            AisMessage::StandardClassBReport(m) => m.repeat_indicator(),
            AisMessage::ExtendedClassBReport(m) => m.repeat_indicator(),
        }
    }

    /// Append the full wire image of this message.
    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        match self {
            AisMessage::PositionReportClassA(m) => m.to_bits(bits),
            AisMessage::BaseStationReport(m) => m.to_bits(bits),
            AisMessage::StaticAndVoyageData(m) => m.to_bits(bits),
            AisMessage::BinaryAddressed(m) => m.to_bits(bits),
            AisMessage::BinaryBroadcast(m) => m.to_bits(bits),
            AisMessage::StandardClassBReport(m) => m.to_bits(bits),
            AisMessage::ExtendedClassBReport(m) => m.to_bits(bits),
        }
    }

    pub fn to_bit_string(&self) -> Result<BitString> {
        let mut bits = BitString::new();
        self.to_bits(&mut bits)?;
        Ok(bits)
    }

    /// Decode through the process-wide builtin factory.
    pub fn from_bits(bits: &BitString) -> Result<Self> {
        crate::factory::global().decode(bits)
    }

    /// Render as one or more checksummed sentences, splitting when the
    /// armored payload exceeds the per-sentence budget.
    pub fn encode_to_nmea(&self) -> Result<Vec<String>> {
        let bits = self.to_bit_string()?;
        let payload = bits.to_armored();
        let fill = ((6 - bits.len() % 6) % 6) as u8;
        let sentences =
            sentence::to_sentences(&payload, u3::new(fill).expect("fill bits below 6"))?;
        Ok(sentences.iter().map(ToString::to_string).collect())
    }
}

impl fmt::Display for AisMessage {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AisMessage::PositionReportClassA(m) => fmt::Display::fmt(m, fmt),
            AisMessage::BaseStationReport(m) => fmt::Display::fmt(m, fmt),
            AisMessage::StaticAndVoyageData(m) => fmt::Display::fmt(m, fmt),
            AisMessage::BinaryAddressed(m) => fmt::Display::fmt(m, fmt),
            AisMessage::BinaryBroadcast(m) => fmt::Display::fmt(m, fmt),
            AisMessage::StandardClassBReport(m) => fmt::Display::fmt(m, fmt),
            AisMessage::ExtendedClassBReport(m) => fmt::Display::fmt(m, fmt),
        }
    }
}
