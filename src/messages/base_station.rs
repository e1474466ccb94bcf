use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::bits::BitString;
use crate::error::{Error, Result};
use crate::messages::{
    LATITUDE_NOT_AVAILABLE, LONGITUDE_NOT_AVAILABLE, latitude_from_degrees, latitude_to_degrees,
    longitude_from_degrees, longitude_to_degrees,
};

/// Base Station Report, message type 4. 168 bits.
///
/// Carries the station's UTC clock and surveyed position. Unavailable time
/// components use 0 (date) and 24/60/60 (time of day) on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseStationReport {
    repeat_indicator: u8,
    mmsi: u32,
    utc_year: u16,
    utc_month: u8,
    utc_day: u8,
    utc_hour: u8,
    utc_minute: u8,
    utc_second: u8,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    epfd_type: u8,
    spare: u16,
    raim: bool,
    radio_status: u32,
}

impl BaseStationReport {
    pub const BIT_LENGTH: usize = 168;

    pub fn new(mmsi: u32, repeat_indicator: u8) -> Self {
        Self {
            repeat_indicator,
            mmsi,
            utc_year: 0,
            utc_month: 0,
            utc_day: 0,
            utc_hour: 24,
            utc_minute: 60,
            utc_second: 60,
            position_accuracy: false,
            longitude: LONGITUDE_NOT_AVAILABLE,
            latitude: LATITUDE_NOT_AVAILABLE,
            epfd_type: 15,
            spare: 0,
            raim: false,
            radio_status: 0,
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
        if message_type != 4 {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            utc_year: bits.get_uint(38, 14)? as u16,
            utc_month: bits.get_uint(52, 4)? as u8,
            utc_day: bits.get_uint(56, 5)? as u8,
            utc_hour: bits.get_uint(61, 5)? as u8,
            utc_minute: bits.get_uint(66, 6)? as u8,
            utc_second: bits.get_uint(72, 6)? as u8,
            position_accuracy: bits.get_bit(78)?,
            longitude: bits.get_int(79, 28)? as i32,
            latitude: bits.get_int(107, 27)? as i32,
            epfd_type: bits.get_uint(134, 4)? as u8,
            spare: bits.get_uint(138, 10)? as u16,
            raim: bits.get_bit(148)?,
            radio_status: bits.get_uint(149, 19)? as u32,
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(4, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.utc_year), 14)?;
        bits.append_uint(u64::from(self.utc_month), 4)?;
        bits.append_uint(u64::from(self.utc_day), 5)?;
        bits.append_uint(u64::from(self.utc_hour), 5)?;
        bits.append_uint(u64::from(self.utc_minute), 6)?;
        bits.append_uint(u64::from(self.utc_second), 6)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.epfd_type), 4)?;
        bits.append_uint(u64::from(self.spare), 10)?;
        bits.append_bit(self.raim);
        bits.append_uint(u64::from(self.radio_status), 19)?;
        Ok(())
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    pub fn utc_year(&self) -> u16 {
        self.utc_year
    }

    pub fn utc_month(&self) -> u8 {
        self.utc_month
    }

    pub fn utc_day(&self) -> u8 {
        self.utc_day
    }

    pub fn utc_hour(&self) -> u8 {
        self.utc_hour
    }

    pub fn utc_minute(&self) -> u8 {
        self.utc_minute
    }

    pub fn utc_second(&self) -> u8 {
        self.utc_second
    }

    /// Station clock as a calendar value, or `None` when any component
    /// carries its "not available" code or the combination is not a real
    /// calendar date.
    pub fn utc_datetime(&self) -> Option<NaiveDateTime> {
        if self.utc_year == 0
            || self.utc_month == 0
            || self.utc_day == 0
            || self.utc_hour >= 24
            || self.utc_minute >= 60
            || self.utc_second >= 60
        {
            return None;
        }
        NaiveDate::from_ymd_opt(
            i32::from(self.utc_year),
            u32::from(self.utc_month),
            u32::from(self.utc_day),
        )?
        .and_hms_opt(
            u32::from(self.utc_hour),
            u32::from(self.utc_minute),
            u32::from(self.utc_second),
        )
    }

    pub fn set_utc_datetime(&mut self, datetime: NaiveDateTime) {
        self.set_utc_time(
            datetime.year().clamp(0, 9999) as u16,
            datetime.month() as u8,
            datetime.day() as u8,
            datetime.hour() as u8,
            datetime.minute() as u8,
            datetime.second() as u8,
        );
    }

    /// Out-of-range components store their "not available" codes.
    pub fn set_utc_time(
        &mut self,
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) {
        self.utc_year = if year > 9999 { 0 } else { year };
        self.utc_month = if month > 12 { 0 } else { month };
        self.utc_day = if day > 31 { 0 } else { day };
        self.utc_hour = if hour > 23 { 24 } else { hour };
        self.utc_minute = if minute > 59 { 60 } else { minute };
        self.utc_second = if second > 59 { 60 } else { second };
    }

    pub fn position_accuracy(&self) -> bool {
        self.position_accuracy
    }

    pub fn set_position_accuracy(&mut self, accuracy: bool) {
        self.position_accuracy = accuracy;
    }

    pub fn longitude(&self) -> f64 {
        longitude_to_degrees(self.longitude)
    }

    pub fn latitude(&self) -> f64 {
        latitude_to_degrees(self.latitude)
    }

    pub fn set_longitude(&mut self, degrees: f64) {
        self.longitude = longitude_from_degrees(degrees);
    }

    pub fn set_latitude(&mut self, degrees: f64) {
        self.latitude = latitude_from_degrees(degrees);
    }

    pub fn epfd_type(&self) -> u8 {
        self.epfd_type
    }

    /// Codes above 8 other than 15 collapse to 15 (not available).
    pub fn set_epfd_type(&mut self, epfd_type: u8) {
        self.epfd_type = if epfd_type > 8 && epfd_type != 15 {
            15
        } else {
            epfd_type
        };
    }

    pub fn raim(&self) -> bool {
        self.raim
    }

    pub fn set_raim(&mut self, raim: bool) {
        self.raim = raim;
    }

    pub fn radio_status(&self) -> u32 {
        self.radio_status
    }

    pub fn set_radio_status(&mut self, radio_status: u32) {
        self.radio_status = radio_status;
    }
}

fn epfd_description(epfd_type: u8) -> &'static str {
    match epfd_type {
        0 => "Undefined",
        1 => "GPS",
        2 => "GLONASS",
        3 => "Combined GPS/GLONASS",
        4 => "Loran-C",
        5 => "Chayka",
        6 => "Integrated Navigation System",
        7 => "Surveyed",
        8 => "Galileo",
        15 => "Not available",
        _ => "Unknown",
    }
}

impl fmt::Display for BaseStationReport {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "AIS Message Type: 4 (Base Station Report)")?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;

        if self.utc_year == 0 || self.utc_month == 0 || self.utc_day == 0 {
            writeln!(fmt, "UTC Date: Not available")?;
        } else {
            writeln!(
                fmt,
                "UTC Date: {}-{:02}-{:02}",
                self.utc_year, self.utc_month, self.utc_day
            )?;
        }
        if self.utc_hour >= 24 || self.utc_minute >= 60 || self.utc_second >= 60 {
            writeln!(fmt, "UTC Time: Not available")?;
        } else {
            writeln!(
                fmt,
                "UTC Time: {:02}:{:02}:{:02}",
                self.utc_hour, self.utc_minute, self.utc_second
            )?;
        }

        writeln!(
            fmt,
            "Position Accuracy: {}",
            if self.position_accuracy { "High" } else { "Low" }
        )?;
        let lon = self.longitude();
        if lon > 180.0 {
            writeln!(fmt, "Longitude: Not available")?;
        } else {
            writeln!(fmt, "Longitude: {lon:.6} degrees")?;
        }
        let lat = self.latitude();
        if lat > 90.0 {
            writeln!(fmt, "Latitude: Not available")?;
        } else {
            writeln!(fmt, "Latitude: {lat:.6} degrees")?;
        }
        writeln!(fmt, "EPFD Type: {}", epfd_description(self.epfd_type))?;
        writeln!(
            fmt,
            "RAIM Flag: {}",
            if self.raim { "In use" } else { "Not in use" }
        )?;
        write!(fmt, "Radio Status: 0x{:05X}", self.radio_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let mut report = BaseStationReport::new(3669987, 0);
        report.set_utc_time(2024, 7, 14, 11, 30, 5);
        report.set_position_accuracy(true);
        report.set_longitude(4.419);
        report.set_latitude(51.23);
        report.set_epfd_type(1);
        report.set_raim(false);
        report.set_radio_status(0x224C8);

        let mut bits = BitString::new();
        report.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), BaseStationReport::BIT_LENGTH);
        assert_eq!(BaseStationReport::from_bits(&bits).unwrap(), report);
    }

    #[test]
    fn datetime_conversion() {
        let mut report = BaseStationReport::new(1, 0);
        assert_eq!(report.utc_datetime(), None);

        report.set_utc_time(2024, 2, 29, 23, 59, 59);
        let datetime = report.utc_datetime().unwrap();
        assert_eq!(datetime.year(), 2024);
        assert_eq!(datetime.month(), 2);
        assert_eq!(datetime.second(), 59);

        report.set_utc_datetime(
            NaiveDate::from_ymd_opt(2025, 12, 1)
                .unwrap()
                .and_hms_opt(6, 7, 8)
                .unwrap(),
        );
        assert_eq!(report.utc_hour(), 6);
        assert_eq!(report.utc_day(), 1);

        // Not a real date: wire components survive, the conversion refuses.
        report.set_utc_time(2023, 2, 30, 0, 0, 0);
        assert_eq!(report.utc_day(), 30);
        assert_eq!(report.utc_datetime(), None);
    }

    #[test]
    fn out_of_range_components_become_unavailable() {
        let mut report = BaseStationReport::new(1, 0);
        report.set_utc_time(10000, 13, 32, 25, 61, 75);
        assert_eq!(report.utc_year(), 0);
        assert_eq!(report.utc_month(), 0);
        assert_eq!(report.utc_day(), 0);
        assert_eq!(report.utc_hour(), 24);
        assert_eq!(report.utc_minute(), 60);
        assert_eq!(report.utc_second(), 60);
    }

    #[test]
    fn epfd_clamping() {
        let mut report = BaseStationReport::new(1, 0);
        report.set_epfd_type(8);
        assert_eq!(report.epfd_type(), 8);
        report.set_epfd_type(9);
        assert_eq!(report.epfd_type(), 15);
        report.set_epfd_type(15);
        assert_eq!(report.epfd_type(), 15);
    }

    #[test]
    fn wrong_type_tag_rejected() {
        let mut bits = BitString::new();
        bits.append_uint(1, 6).unwrap();
        while bits.len() < 168 {
            bits.append_bit(false);
        }
        assert!(matches!(
            BaseStationReport::from_bits(&bits),
            Err(Error::UnsupportedType(1))
        ));
    }
}
