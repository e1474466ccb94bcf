use std::fmt;

use crate::bits::BitString;
use crate::error::{Error, Result};
use crate::messages::static_voyage::trim_field;
use crate::messages::{
    COG_NOT_AVAILABLE, HEADING_NOT_AVAILABLE, SOG_NOT_AVAILABLE, latitude_from_degrees,
    latitude_to_degrees, longitude_from_degrees, longitude_to_degrees,
};

/// Standard Class B Position Report, message type 18. 168 bits.
///
/// Unavailable SOG/COG read back as −1.0 rather than NaN; Class B
/// equipment reports no rate of turn or navigation status.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardPositionReportClassB {
    repeat_indicator: u8,
    mmsi: u32,
    sog: u16,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    cog: u16,
    true_heading: u16,
    timestamp: u8,
    cs_flag: bool,
    display_flag: bool,
    dsc_flag: bool,
    band_flag: bool,
    message_22_flag: bool,
    assigned_flag: bool,
    raim: bool,
    radio_status: u32,
}

impl StandardPositionReportClassB {
    pub const BIT_LENGTH: usize = 168;

    pub fn new(mmsi: u32, repeat_indicator: u8) -> Self {
        Self {
            repeat_indicator,
            mmsi,
            sog: SOG_NOT_AVAILABLE,
            position_accuracy: false,
            longitude: super::LONGITUDE_NOT_AVAILABLE,
            latitude: super::LATITUDE_NOT_AVAILABLE,
            cog: COG_NOT_AVAILABLE,
            true_heading: HEADING_NOT_AVAILABLE,
            timestamp: 60,
            cs_flag: true,
            display_flag: false,
            dsc_flag: false,
            band_flag: false,
            message_22_flag: false,
            assigned_flag: false,
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
        if message_type != 18 {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            // Regional reserved (8 bits) skipped.
            sog: bits.get_uint(46, 10)? as u16,
            position_accuracy: bits.get_bit(56)?,
            longitude: bits.get_int(57, 28)? as i32,
            latitude: bits.get_int(85, 27)? as i32,
            cog: bits.get_uint(112, 12)? as u16,
            true_heading: bits.get_uint(124, 9)? as u16,
            timestamp: bits.get_uint(133, 6)? as u8,
            // Regional reserved (2 bits) skipped.
            cs_flag: bits.get_bit(141)?,
            display_flag: bits.get_bit(142)?,
            dsc_flag: bits.get_bit(143)?,
            band_flag: bits.get_bit(144)?,
            message_22_flag: bits.get_bit(145)?,
            assigned_flag: bits.get_bit(146)?,
            raim: bits.get_bit(147)?,
            radio_status: bits.get_uint(148, 20)? as u32,
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(18, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(0, 8)?; // regional reserved
        bits.append_uint(u64::from(self.sog), 10)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.cog), 12)?;
        bits.append_uint(u64::from(self.true_heading), 9)?;
        bits.append_uint(u64::from(self.timestamp), 6)?;
        bits.append_uint(0, 2)?; // regional reserved
        bits.append_bit(self.cs_flag);
        bits.append_bit(self.display_flag);
        bits.append_bit(self.dsc_flag);
        bits.append_bit(self.band_flag);
        bits.append_bit(self.message_22_flag);
        bits.append_bit(self.assigned_flag);
        bits.append_bit(self.raim);
        bits.append_uint(u64::from(self.radio_status), 20)?;
        Ok(())
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    /// Speed over ground in knots; −1.0 when unavailable.
    pub fn speed_over_ground(&self) -> f32 {
        if self.sog == SOG_NOT_AVAILABLE {
            -1.0
        } else {
            f32::from(self.sog) * 0.1
        }
    }

    pub fn set_speed_over_ground(&mut self, sog: f32) {
        self.sog = if sog < 0.0 || sog.is_nan() {
            SOG_NOT_AVAILABLE
        } else if sog > 102.2 {
            1022
        } else {
            (sog * 10.0).round() as u16
        };
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

    /// Course over ground in degrees; −1.0 when unavailable.
    pub fn course_over_ground(&self) -> f32 {
        if self.cog == COG_NOT_AVAILABLE {
            -1.0
        } else {
            f32::from(self.cog) * 0.1
        }
    }

    pub fn set_course_over_ground(&mut self, cog: f32) {
        self.cog = if !(0.0..360.0).contains(&cog) {
            COG_NOT_AVAILABLE
        } else {
            (cog * 10.0).round() as u16
        };
    }

    pub fn true_heading(&self) -> u16 {
        self.true_heading
    }

    pub fn set_true_heading(&mut self, heading: u16) {
        self.true_heading = if heading > 359 && heading != HEADING_NOT_AVAILABLE {
            HEADING_NOT_AVAILABLE
        } else {
            heading
        };
    }

    pub fn timestamp(&self) -> u8 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u8) {
        self.timestamp = if timestamp > 63 { 60 } else { timestamp };
    }

    pub fn cs_flag(&self) -> bool {
        self.cs_flag
    }

    pub fn set_cs_flag(&mut self, cs_flag: bool) {
        self.cs_flag = cs_flag;
    }

    pub fn display_flag(&self) -> bool {
        self.display_flag
    }

    pub fn set_display_flag(&mut self, display_flag: bool) {
        self.display_flag = display_flag;
    }

    pub fn dsc_flag(&self) -> bool {
        self.dsc_flag
    }

    pub fn set_dsc_flag(&mut self, dsc_flag: bool) {
        self.dsc_flag = dsc_flag;
    }

    pub fn band_flag(&self) -> bool {
        self.band_flag
    }

    pub fn set_band_flag(&mut self, band_flag: bool) {
        self.band_flag = band_flag;
    }

    pub fn message_22_flag(&self) -> bool {
        self.message_22_flag
    }

    pub fn set_message_22_flag(&mut self, message_22_flag: bool) {
        self.message_22_flag = message_22_flag;
    }

    pub fn assigned_flag(&self) -> bool {
        self.assigned_flag
    }

    pub fn set_assigned_flag(&mut self, assigned_flag: bool) {
        self.assigned_flag = assigned_flag;
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

impl fmt::Display for StandardPositionReportClassB {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            fmt,
            "AIS Message Type: 18 (Standard Position Report Class B)"
        )?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;
        fmt_class_b_position(
            fmt,
            self.speed_over_ground(),
            self.position_accuracy,
            self.longitude(),
            self.latitude(),
            self.course_over_ground(),
            self.true_heading,
            self.timestamp,
        )?;
        writeln!(
            fmt,
            "Class B CS Flag: {}",
            if self.cs_flag { "SOTDMA" } else { "ITDMA" }
        )?;
        writeln!(
            fmt,
            "Band Flag: {}",
            if self.band_flag {
                "All marine bands"
            } else {
                "Single band"
            }
        )?;
        writeln!(
            fmt,
            "RAIM Flag: {}",
            if self.raim { "In use" } else { "Not in use" }
        )?;
        write!(fmt, "Radio Status: 0x{:05X}", self.radio_status)
    }
}

/// Extended Class B Position Report, message type 19. 312 bits.
///
/// The type 18 position fields plus the static descriptors of type 5
/// (name, ship type, dimensions, EPFD); no radio status.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedPositionReportClassB {
    repeat_indicator: u8,
    mmsi: u32,
    sog: u16,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    cog: u16,
    true_heading: u16,
    timestamp: u8,
    vessel_name: String,
    ship_type: u8,
    dimension_to_bow: u16,
    dimension_to_stern: u16,
    dimension_to_port: u8,
    dimension_to_starboard: u8,
    epfd_type: u8,
    raim: bool,
    dte: bool,
    assigned_flag: bool,
}

impl ExtendedPositionReportClassB {
    pub const BIT_LENGTH: usize = 312;

    pub fn new(mmsi: u32, repeat_indicator: u8) -> Self {
        Self {
            repeat_indicator,
            mmsi,
            sog: SOG_NOT_AVAILABLE,
            position_accuracy: false,
            longitude: super::LONGITUDE_NOT_AVAILABLE,
            latitude: super::LATITUDE_NOT_AVAILABLE,
            cog: COG_NOT_AVAILABLE,
            true_heading: HEADING_NOT_AVAILABLE,
            timestamp: 60,
            vessel_name: String::new(),
            ship_type: 0,
            dimension_to_bow: 0,
            dimension_to_stern: 0,
            dimension_to_port: 0,
            dimension_to_starboard: 0,
            epfd_type: 0,
            raim: false,
            dte: false,
            assigned_flag: false,
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
        if message_type != 19 {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            // Regional reserved (8 bits) skipped.
            sog: bits.get_uint(46, 10)? as u16,
            position_accuracy: bits.get_bit(56)?,
            longitude: bits.get_int(57, 28)? as i32,
            latitude: bits.get_int(85, 27)? as i32,
            cog: bits.get_uint(112, 12)? as u16,
            true_heading: bits.get_uint(124, 9)? as u16,
            timestamp: bits.get_uint(133, 6)? as u8,
            // Regional reserved (4 bits) skipped.
            vessel_name: trim_field(bits.get_string(143, 120)?),
            ship_type: bits.get_uint(263, 8)? as u8,
            dimension_to_bow: bits.get_uint(271, 9)? as u16,
            dimension_to_stern: bits.get_uint(280, 9)? as u16,
            dimension_to_port: bits.get_uint(289, 6)? as u8,
            dimension_to_starboard: bits.get_uint(295, 6)? as u8,
            epfd_type: bits.get_uint(301, 4)? as u8,
            raim: bits.get_bit(305)?,
            dte: bits.get_bit(306)?,
            assigned_flag: bits.get_bit(307)?,
            // Spare (4 bits) ignored.
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(19, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(0, 8)?; // regional reserved
        bits.append_uint(u64::from(self.sog), 10)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.cog), 12)?;
        bits.append_uint(u64::from(self.true_heading), 9)?;
        bits.append_uint(u64::from(self.timestamp), 6)?;
        bits.append_uint(0, 4)?; // regional reserved
        bits.append_string(&self.vessel_name, 120)?;
        bits.append_uint(u64::from(self.ship_type), 8)?;
        bits.append_uint(u64::from(self.dimension_to_bow), 9)?;
        bits.append_uint(u64::from(self.dimension_to_stern), 9)?;
        bits.append_uint(u64::from(self.dimension_to_port), 6)?;
        bits.append_uint(u64::from(self.dimension_to_starboard), 6)?;
        bits.append_uint(u64::from(self.epfd_type), 4)?;
        bits.append_bit(self.raim);
        bits.append_bit(self.dte);
        bits.append_bit(self.assigned_flag);
        bits.append_uint(0, 4)?; // spare
        Ok(())
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    /// Speed over ground in knots; −1.0 when unavailable.
    pub fn speed_over_ground(&self) -> f32 {
        if self.sog == SOG_NOT_AVAILABLE {
            -1.0
        } else {
            f32::from(self.sog) * 0.1
        }
    }

    pub fn set_speed_over_ground(&mut self, sog: f32) {
        self.sog = if sog < 0.0 || sog.is_nan() {
            SOG_NOT_AVAILABLE
        } else if sog > 102.2 {
            1022
        } else {
            (sog * 10.0).round() as u16
        };
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

    /// Course over ground in degrees; −1.0 when unavailable.
    pub fn course_over_ground(&self) -> f32 {
        if self.cog == COG_NOT_AVAILABLE {
            -1.0
        } else {
            f32::from(self.cog) * 0.1
        }
    }

    pub fn set_course_over_ground(&mut self, cog: f32) {
        self.cog = if !(0.0..360.0).contains(&cog) {
            COG_NOT_AVAILABLE
        } else {
            (cog * 10.0).round() as u16
        };
    }

    pub fn true_heading(&self) -> u16 {
        self.true_heading
    }

    pub fn set_true_heading(&mut self, heading: u16) {
        self.true_heading = if heading > 359 && heading != HEADING_NOT_AVAILABLE {
            HEADING_NOT_AVAILABLE
        } else {
            heading
        };
    }

    pub fn timestamp(&self) -> u8 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u8) {
        self.timestamp = if timestamp > 63 { 60 } else { timestamp };
    }

    pub fn vessel_name(&self) -> &str {
        &self.vessel_name
    }

    pub fn set_vessel_name(&mut self, name: &str) {
        self.vessel_name = name.to_owned();
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
        self.epfd_type = epfd_type;
    }

    pub fn raim(&self) -> bool {
        self.raim
    }

    pub fn set_raim(&mut self, raim: bool) {
        self.raim = raim;
    }

    pub fn dte(&self) -> bool {
        self.dte
    }

    pub fn set_dte(&mut self, dte: bool) {
        self.dte = dte;
    }

    pub fn assigned_flag(&self) -> bool {
        self.assigned_flag
    }

    pub fn set_assigned_flag(&mut self, assigned_flag: bool) {
        self.assigned_flag = assigned_flag;
    }
}

impl fmt::Display for ExtendedPositionReportClassB {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            fmt,
            "AIS Message Type: 19 (Extended Position Report Class B)"
        )?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;
        fmt_class_b_position(
            fmt,
            self.speed_over_ground(),
            self.position_accuracy,
            self.longitude(),
            self.latitude(),
            self.course_over_ground(),
            self.true_heading,
            self.timestamp,
        )?;
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
        writeln!(
            fmt,
            "RAIM Flag: {}",
            if self.raim { "In use" } else { "Not in use" }
        )?;
        write!(
            fmt,
            "Assigned Flag: {}",
            if self.assigned_flag { "Yes" } else { "No" }
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn fmt_class_b_position(
    fmt: &mut fmt::Formatter,
    sog: f32,
    accuracy: bool,
    lon: f64,
    lat: f64,
    cog: f32,
    heading: u16,
    timestamp: u8,
) -> fmt::Result {
    if sog < 0.0 {
        writeln!(fmt, "Speed Over Ground: Not available")?;
    } else {
        writeln!(fmt, "Speed Over Ground: {sog} knots")?;
    }
    writeln!(
        fmt,
        "Position Accuracy: {}",
        if accuracy { "High" } else { "Low" }
    )?;
    if lon > 180.0 {
        writeln!(fmt, "Longitude: Not available")?;
    } else {
        writeln!(fmt, "Longitude: {lon:.6} degrees")?;
    }
    if lat > 90.0 {
        writeln!(fmt, "Latitude: Not available")?;
    } else {
        writeln!(fmt, "Latitude: {lat:.6} degrees")?;
    }
    if cog < 0.0 {
        writeln!(fmt, "Course Over Ground: Not available")?;
    } else {
        writeln!(fmt, "Course Over Ground: {cog:.1} degrees")?;
    }
    if heading == HEADING_NOT_AVAILABLE {
        writeln!(fmt, "True Heading: Not available")?;
    } else {
        writeln!(fmt, "True Heading: {heading} degrees")?;
    }
    match timestamp {
        60 => writeln!(fmt, "Timestamp: Not available"),
        61 => writeln!(fmt, "Timestamp: Manual input mode"),
        62 => writeln!(fmt, "Timestamp: Dead reckoning mode"),
        63 => writeln!(fmt, "Timestamp: Positioning system inoperative"),
        seconds => writeln!(fmt, "Timestamp: {seconds} seconds"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_roundtrip() {
        let mut report = StandardPositionReportClassB::new(235099999, 0);
        report.set_speed_over_ground(7.8);
        report.set_position_accuracy(true);
        report.set_longitude(-1.12);
        report.set_latitude(50.78);
        report.set_course_over_ground(182.3);
        report.set_true_heading(184);
        report.set_timestamp(12);
        report.set_cs_flag(true);
        report.set_band_flag(true);
        report.set_radio_status(0x3FFFF);

        let mut bits = BitString::new();
        report.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), StandardPositionReportClassB::BIT_LENGTH);
        assert_eq!(
            StandardPositionReportClassB::from_bits(&bits).unwrap(),
            report
        );
    }

    #[test]
    fn standard_unavailable_sentinels() {
        let report = StandardPositionReportClassB::new(1, 0);
        assert_eq!(report.speed_over_ground(), -1.0);
        assert_eq!(report.course_over_ground(), -1.0);
        assert_eq!(report.true_heading(), 511);
        assert_eq!(report.longitude(), 181.0);
        assert_eq!(report.latitude(), 91.0);
    }

    #[test]
    fn extended_roundtrip() {
        let mut report = ExtendedPositionReportClassB::new(987654321, 2);
        report.set_speed_over_ground(11.1);
        report.set_longitude(18.06);
        report.set_latitude(59.33);
        report.set_course_over_ground(93.0);
        report.set_true_heading(95);
        report.set_timestamp(4);
        report.set_vessel_name("SVEALAND");
        report.set_ship_type(60);
        report.set_ship_dimensions(24, 8, 4, 4);
        report.set_epfd_type(1);
        report.set_raim(true);
        report.set_dte(true);
        report.set_assigned_flag(false);

        let mut bits = BitString::new();
        report.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), ExtendedPositionReportClassB::BIT_LENGTH);

        let decoded = ExtendedPositionReportClassB::from_bits(&bits).unwrap();
        assert_eq!(decoded, report);
        assert_eq!(decoded.vessel_name(), "SVEALAND");
    }

    #[test]
    fn extended_rejects_type_18_image() {
        let mut bits = BitString::new();
        StandardPositionReportClassB::new(1, 0)
            .to_bits(&mut bits)
            .unwrap();
        while bits.len() < ExtendedPositionReportClassB::BIT_LENGTH {
            bits.append_bit(false);
        }
        assert!(matches!(
            ExtendedPositionReportClassB::from_bits(&bits),
            Err(Error::UnsupportedType(18))
        ));
    }
}
