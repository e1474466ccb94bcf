use std::fmt;

use crate::bits::BitString;
use crate::error::{Error, Result};

/// Broad classification of the 8-bit ship-and-cargo code. The raw code is
/// kept on the message so re-encoding is exact; this enum only names the
/// ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipType {
    NotAvailable,
    WingInGround,
    Fishing,
    Towing,
    TowingLarge,
    Dredger,
    Diving,
    Military,
    Sailing,
    Pleasure,
    HighSpeedCraft,
    Pilot,
    SearchAndRescue,
    Tug,
    PortTender,
    AntiPollution,
    LawEnforcement,
    Medical,
    Passenger,
    Cargo,
    Tanker,
    Other,
    Reserved,
}

impl ShipType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ShipType::NotAvailable,
            20..=29 => ShipType::WingInGround,
            30 => ShipType::Fishing,
            31 => ShipType::Towing,
            32 => ShipType::TowingLarge,
            33 => ShipType::Dredger,
            34 => ShipType::Diving,
            35 => ShipType::Military,
            36 => ShipType::Sailing,
            37 => ShipType::Pleasure,
            40..=49 => ShipType::HighSpeedCraft,
            50 => ShipType::Pilot,
            51 => ShipType::SearchAndRescue,
            52 => ShipType::Tug,
            53 => ShipType::PortTender,
            54 => ShipType::AntiPollution,
            55 => ShipType::LawEnforcement,
            58 => ShipType::Medical,
            60..=69 => ShipType::Passenger,
            70..=79 => ShipType::Cargo,
            80..=89 => ShipType::Tanker,
            90..=99 => ShipType::Other,
            _ => ShipType::Reserved,
        }
    }
}

// Text fields are space-padded on the wire; the pad is not part of the
// value.
pub(crate) fn trim_field(mut value: String) -> String {
    value.truncate(value.trim_end_matches(' ').len());
    value
}

/// Static and Voyage Related Data, message type 5. 424 bits.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAndVoyageData {
    repeat_indicator: u8,
    mmsi: u32,
    ais_version: u8,
    imo_number: u32,
    call_sign: String,
    vessel_name: String,
    ship_type: u8,
    dimension_to_bow: u16,
    dimension_to_stern: u16,
    dimension_to_port: u8,
    dimension_to_starboard: u8,
    epfd_type: u8,
    eta_month: u8,
    eta_day: u8,
    eta_hour: u8,
    eta_minute: u8,
    draught: u8,
    destination: String,
    dte: bool,
}

impl StaticAndVoyageData {
    pub const BIT_LENGTH: usize = 424;

    pub fn new(mmsi: u32, repeat_indicator: u8) -> Self {
        Self {
            repeat_indicator,
            mmsi,
            ais_version: 0,
            imo_number: 0,
            call_sign: String::new(),
            vessel_name: String::new(),
            ship_type: 0,
            dimension_to_bow: 0,
            dimension_to_stern: 0,
            dimension_to_port: 0,
            dimension_to_starboard: 0,
            epfd_type: 0,
            eta_month: 0,
            eta_day: 0,
            eta_hour: 24,
            eta_minute: 60,
            draught: 0,
            destination: String::new(),
            dte: false,
        }
    }

    pub fn from_bits(bits: &BitString) -> Result<Self> {
        if bits.len() < Self::BIT_LENGTH {
            return Err(Error::Truncated {
                needed: Self::BIT_LENGTH,
                have: bits.len(),
            });
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        if message_type != 5 {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            ais_version: bits.get_uint(38, 2)? as u8,
            imo_number: bits.get_uint(40, 30)? as u32,
            call_sign: trim_field(bits.get_string(70, 42)?),
            vessel_name: trim_field(bits.get_string(112, 120)?),
            ship_type: bits.get_uint(232, 8)? as u8,
            dimension_to_bow: bits.get_uint(240, 9)? as u16,
            dimension_to_stern: bits.get_uint(249, 9)? as u16,
            dimension_to_port: bits.get_uint(258, 6)? as u8,
            dimension_to_starboard: bits.get_uint(264, 6)? as u8,
            epfd_type: bits.get_uint(270, 4)? as u8,
            eta_month: bits.get_uint(274, 4)? as u8,
            eta_day: bits.get_uint(278, 5)? as u8,
            eta_hour: bits.get_uint(283, 5)? as u8,
            eta_minute: bits.get_uint(288, 6)? as u8,
            draught: bits.get_uint(294, 8)? as u8,
            destination: trim_field(bits.get_string(302, 120)?),
            dte: bits.get_bit(422)?,
            // Spare (1 bit) ignored.
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(5, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.ais_version), 2)?;
        bits.append_uint(u64::from(self.imo_number), 30)?;
        bits.append_string(&self.call_sign, 42)?;
        bits.append_string(&self.vessel_name, 120)?;
        bits.append_uint(u64::from(self.ship_type), 8)?;
        bits.append_uint(u64::from(self.dimension_to_bow), 9)?;
        bits.append_uint(u64::from(self.dimension_to_stern), 9)?;
        bits.append_uint(u64::from(self.dimension_to_port), 6)?;
        bits.append_uint(u64::from(self.dimension_to_starboard), 6)?;
        bits.append_uint(u64::from(self.epfd_type), 4)?;
        bits.append_uint(u64::from(self.eta_month), 4)?;
        bits.append_uint(u64::from(self.eta_day), 5)?;
        bits.append_uint(u64::from(self.eta_hour), 5)?;
        bits.append_uint(u64::from(self.eta_minute), 6)?;
        bits.append_uint(u64::from(self.draught), 8)?;
        bits.append_string(&self.destination, 120)?;
        bits.append_bit(self.dte);
        bits.append_bit(false); // spare
        Ok(())
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    pub fn ais_version(&self) -> u8 {
        self.ais_version
    }

    pub fn set_ais_version(&mut self, version: u8) {
        self.ais_version = if version > 3 { 0 } else { version };
    }

    pub fn imo_number(&self) -> u32 {
        self.imo_number
    }

    pub fn set_imo_number(&mut self, imo: u32) {
        self.imo_number = imo;
    }

    /// Call sign, at most 7 six-bit characters on the wire.
    pub fn call_sign(&self) -> &str {
        &self.call_sign
    }

    pub fn set_call_sign(&mut self, call_sign: &str) {
        self.call_sign = call_sign.to_owned();
    }

    /// Vessel name, at most 20 six-bit characters on the wire.
    pub fn vessel_name(&self) -> &str {
        &self.vessel_name
    }

    pub fn set_vessel_name(&mut self, name: &str) {
        self.vessel_name = name.to_owned();
    }

    pub fn ship_type(&self) -> ShipType {
        ShipType::from_raw(self.ship_type)
    }

    pub fn ship_type_raw(&self) -> u8 {
        self.ship_type
    }

    pub fn set_ship_type(&mut self, raw: u8) {
        self.ship_type = raw;
    }

    pub fn dimension_to_bow(&self) -> u16 {
        self.dimension_to_bow
    }

    pub fn dimension_to_stern(&self) -> u16 {
        self.dimension_to_stern
    }

    pub fn dimension_to_port(&self) -> u8 {
        self.dimension_to_port
    }

    pub fn dimension_to_starboard(&self) -> u8 {
        self.dimension_to_starboard
    }

    pub fn set_ship_dimensions(
        &mut self,
        to_bow: u16,
        to_stern: u16,
        to_port: u8,
        to_starboard: u8,
    ) {
        self.dimension_to_bow = to_bow;
        self.dimension_to_stern = to_stern;
        self.dimension_to_port = to_port;
        self.dimension_to_starboard = to_starboard;
    }

    pub fn epfd_type(&self) -> u8 {
        self.epfd_type
    }

    pub fn set_epfd_type(&mut self, epfd_type: u8) {
        self.epfd_type = if epfd_type > 15 { 0 } else { epfd_type };
    }

    pub fn eta_month(&self) -> u8 {
        self.eta_month
    }

    pub fn eta_day(&self) -> u8 {
        self.eta_day
    }

    pub fn eta_hour(&self) -> u8 {
        self.eta_hour
    }

    pub fn eta_minute(&self) -> u8 {
        self.eta_minute
    }

    /// Out-of-range components store their "not available" codes
    /// (0 for month/day, 24 for hour, 60 for minute).
    pub fn set_eta(&mut self, month: u8, day: u8, hour: u8, minute: u8) {
        self.eta_month = if month > 12 { 0 } else { month };
        self.eta_day = if day > 31 { 0 } else { day };
        self.eta_hour = if hour > 23 { 24 } else { hour };
        self.eta_minute = if minute > 59 { 60 } else { minute };
    }

    /// Draught in meters, 0.1 m resolution.
    pub fn draught(&self) -> f32 {
        f32::from(self.draught) * 0.1
    }

    pub fn set_draught(&mut self, draught: f32) {
        self.draught = if draught < 0.0 {
            0
        } else if draught > 25.5 {
            255
        } else {
            (draught * 10.0).round() as u8
        };
    }

    /// Destination, at most 20 six-bit characters on the wire.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_destination(&mut self, destination: &str) {
        self.destination = destination.to_owned();
    }

    pub fn dte(&self) -> bool {
        self.dte
    }

    pub fn set_dte(&mut self, dte: bool) {
        self.dte = dte;
    }
}

impl fmt::Display for StaticAndVoyageData {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "AIS Message Type: 5 (Static and Voyage Data)")?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;
        writeln!(fmt, "AIS Version: {}", self.ais_version)?;
        writeln!(fmt, "IMO Number: {}", self.imo_number)?;
        writeln!(fmt, "Call Sign: {}", self.call_sign)?;
        writeln!(fmt, "Vessel Name: {}", self.vessel_name)?;
        writeln!(fmt, "Ship Type: {}", self.ship_type)?;
        writeln!(
            fmt,
            "Ship Dimensions: {}m (bow) x {}m (stern) x {}m (port) x {}m (starboard)",
            self.dimension_to_bow,
            self.dimension_to_stern,
            self.dimension_to_port,
            self.dimension_to_starboard
        )?;
        writeln!(fmt, "EPFD Type: {}", self.epfd_type)?;
        if self.eta_month == 0 || self.eta_day == 0 || self.eta_hour >= 24 || self.eta_minute >= 60
        {
            writeln!(fmt, "ETA: Not available")?;
        } else {
            writeln!(
                fmt,
                "ETA: Month {}, Day {}, {}:{:02} UTC",
                self.eta_month, self.eta_day, self.eta_hour, self.eta_minute
            )?;
        }
        writeln!(fmt, "Draught: {} meters", self.draught())?;
        writeln!(fmt, "Destination: {}", self.destination)?;
        write!(fmt, "DTE: {}", if self.dte { "Ready" } else { "Not ready" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StaticAndVoyageData {
        let mut data = StaticAndVoyageData::new(123456789, 0);
        data.set_ais_version(0);
        data.set_imo_number(9876543);
        data.set_call_sign("TEST123");
        data.set_vessel_name("VESSEL NAME TEST 123");
        data.set_ship_type(70);
        data.set_ship_dimensions(100, 50, 10, 15);
        data.set_epfd_type(1);
        data.set_eta(5, 15, 14, 30);
        data.set_draught(5.0);
        data.set_destination("ROTTERDAM");
        data.set_dte(false);
        data
    }

    #[test]
    fn encode_decode_roundtrip() {
        let data = sample();
        let mut bits = BitString::new();
        data.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), StaticAndVoyageData::BIT_LENGTH);

        let decoded = StaticAndVoyageData::from_bits(&bits).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(decoded.vessel_name(), "VESSEL NAME TEST 123");
        assert_eq!(decoded.call_sign(), "TEST123");
        assert_eq!(decoded.destination(), "ROTTERDAM");
        assert_eq!(decoded.ship_type(), ShipType::Cargo);
        assert_eq!(decoded.draught(), 5.0);
    }

    #[test]
    fn short_strings_decode_without_padding() {
        let mut data = sample();
        data.set_destination("OSLO");
        let mut bits = BitString::new();
        data.to_bits(&mut bits).unwrap();
        // The space padding is trimmed back off on decode.
        let decoded = StaticAndVoyageData::from_bits(&bits).unwrap();
        assert_eq!(decoded.destination(), "OSLO");
        assert_eq!(decoded, data);
    }

    #[test]
    fn oversized_strings_fail_at_encode() {
        let mut data = sample();
        data.set_vessel_name("THIS NAME IS FAR TOO LONG FOR THE FIELD");
        let mut bits = BitString::new();
        assert!(matches!(
            data.to_bits(&mut bits),
            Err(Error::BadAlignment(120))
        ));
    }

    #[test]
    fn eta_clamping() {
        let mut data = sample();
        data.set_eta(13, 32, 25, 61);
        assert_eq!(data.eta_month(), 0);
        assert_eq!(data.eta_day(), 0);
        assert_eq!(data.eta_hour(), 24);
        assert_eq!(data.eta_minute(), 60);
    }

    #[test]
    fn draught_clamping() {
        let mut data = sample();
        data.set_draught(-1.0);
        assert_eq!(data.draught(), 0.0);
        data.set_draught(99.0);
        assert_eq!(data.draught(), 25.5);
        data.set_draught(7.35);
        assert!((data.draught() - 7.4).abs() < 1e-5);
    }

    #[test]
    fn ship_type_classification() {
        assert_eq!(ShipType::from_raw(0), ShipType::NotAvailable);
        assert_eq!(ShipType::from_raw(24), ShipType::WingInGround);
        assert_eq!(ShipType::from_raw(36), ShipType::Sailing);
        assert_eq!(ShipType::from_raw(65), ShipType::Passenger);
        assert_eq!(ShipType::from_raw(83), ShipType::Tanker);
        assert_eq!(ShipType::from_raw(12), ShipType::Reserved);
        assert_eq!(ShipType::from_raw(255), ShipType::Reserved);
    }
}
