use std::fmt;

use crate::bits::BitString;
use crate::error::{Error, Result};
use crate::messages::{
    COG_NOT_AVAILABLE, HEADING_NOT_AVAILABLE, LATITUDE_NOT_AVAILABLE, LONGITUDE_NOT_AVAILABLE,
    SOG_NOT_AVAILABLE, latitude_from_degrees, latitude_to_degrees, longitude_from_degrees,
    longitude_to_degrees,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NavigationStatus {
    UnderWayUsingEngine = 0,
    AtAnchor = 1,
    NotUnderCommand = 2,
    RestrictedManeuverability = 3,
    ConstrainedByDraught = 4,
    Moored = 5,
    Aground = 6,
    EngagedInFishing = 7,
    UnderWaySailing = 8,
    ReservedHsc = 9,
    ReservedWig = 10,
    Reserved11 = 11,
    Reserved12 = 12,
    Reserved13 = 13,
    AisSartActive = 14,
    NotDefined = 15,
}

impl NavigationStatus {
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x0F {
            0 => NavigationStatus::UnderWayUsingEngine,
            1 => NavigationStatus::AtAnchor,
            2 => NavigationStatus::NotUnderCommand,
            3 => NavigationStatus::RestrictedManeuverability,
            4 => NavigationStatus::ConstrainedByDraught,
            5 => NavigationStatus::Moored,
            6 => NavigationStatus::Aground,
            7 => NavigationStatus::EngagedInFishing,
            8 => NavigationStatus::UnderWaySailing,
            9 => NavigationStatus::ReservedHsc,
            10 => NavigationStatus::ReservedWig,
            11 => NavigationStatus::Reserved11,
            12 => NavigationStatus::Reserved12,
            13 => NavigationStatus::Reserved13,
            14 => NavigationStatus::AisSartActive,
            _ => NavigationStatus::NotDefined,
        }
    }
}

/// Position Report Class A, message types 1, 2 and 3. 168 bits.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReportClassA {
    message_type: u8,
    repeat_indicator: u8,
    mmsi: u32,
    nav_status: NavigationStatus,
    rot: i8,
    sog: u16,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    cog: u16,
    true_heading: u16,
    timestamp: u8,
    special_maneuver: u8,
    spare: u8,
    raim: bool,
    radio_status: u32,
}

impl PositionReportClassA {
    pub const BIT_LENGTH: usize = 168;

    pub fn new(
        message_type: u8,
        mmsi: u32,
        repeat_indicator: u8,
        nav_status: NavigationStatus,
    ) -> Result<Self> {
        if !(1..=3).contains(&message_type) {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            message_type,
            repeat_indicator,
            mmsi,
            nav_status,
            rot: -128,
            sog: SOG_NOT_AVAILABLE,
            position_accuracy: false,
            longitude: LONGITUDE_NOT_AVAILABLE,
            latitude: LATITUDE_NOT_AVAILABLE,
            cog: COG_NOT_AVAILABLE,
            true_heading: HEADING_NOT_AVAILABLE,
            timestamp: 60,
            special_maneuver: 0,
            spare: 0,
            raim: false,
            radio_status: 0,
        })
    }

    pub fn from_bits(bits: &BitString) -> Result<Self> {
        if bits.len() < Self::BIT_LENGTH {
            return Err(Error::Truncated {
                needed: Self::BIT_LENGTH,
                have: bits.len(),
            });
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        if !(1..=3).contains(&message_type) {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            message_type,
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            nav_status: NavigationStatus::from_raw(bits.get_uint(38, 4)? as u8),
            rot: bits.get_int(42, 8)? as i8,
            sog: bits.get_uint(50, 10)? as u16,
            position_accuracy: bits.get_bit(60)?,
            longitude: bits.get_int(61, 28)? as i32,
            latitude: bits.get_int(89, 27)? as i32,
            cog: bits.get_uint(116, 12)? as u16,
            true_heading: bits.get_uint(128, 9)? as u16,
            timestamp: bits.get_uint(137, 6)? as u8,
            special_maneuver: bits.get_uint(143, 2)? as u8,
            spare: bits.get_uint(145, 3)? as u8,
            raim: bits.get_bit(148)?,
            radio_status: bits.get_uint(149, 19)? as u32,
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(u64::from(self.message_type), 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.nav_status as u8), 4)?;
        bits.append_int(i64::from(self.rot), 8)?;
        bits.append_uint(u64::from(self.sog), 10)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.cog), 12)?;
        bits.append_uint(u64::from(self.true_heading), 9)?;
        bits.append_uint(u64::from(self.timestamp), 6)?;
        bits.append_uint(u64::from(self.special_maneuver), 2)?;
        bits.append_uint(u64::from(self.spare), 3)?;
        bits.append_bit(self.raim);
        bits.append_uint(u64::from(self.radio_status), 19)?;
        Ok(())
    }

    pub fn message_type(&self) -> u8 {
        self.message_type
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    pub fn navigation_status(&self) -> NavigationStatus {
        self.nav_status
    }

    pub fn rate_of_turn_raw(&self) -> i8 {
        self.rot
    }

    /// Rate of turn in degrees per minute. Raw −128 decodes to NaN
    /// (not available), ±127 to ±infinity (turning faster than 5°/30 s).
    pub fn rate_of_turn(&self) -> f32 {
        match self.rot {
            -128 => f32::NAN,
            127 => f32::INFINITY,
            -127 => f32::NEG_INFINITY,
            0 => 0.0,
            raw => {
                let magnitude = 4.733 * f32::from(raw.unsigned_abs()).sqrt();
                if raw > 0 { magnitude } else { -magnitude }
            }
        }
    }

    /// Speed over ground in knots; NaN when unavailable, 102.2 means
    /// "102.2 knots or more".
    pub fn speed_over_ground(&self) -> f32 {
        match self.sog {
            SOG_NOT_AVAILABLE => f32::NAN,
            1022 => 102.2,
            raw => f32::from(raw) / 10.0,
        }
    }

    pub fn position_accuracy(&self) -> bool {
        self.position_accuracy
    }

    /// Longitude in degrees; 181.0 when unavailable.
    pub fn longitude(&self) -> f64 {
        longitude_to_degrees(self.longitude)
    }

    /// Latitude in degrees; 91.0 when unavailable.
    pub fn latitude(&self) -> f64 {
        latitude_to_degrees(self.latitude)
    }

    /// Course over ground in degrees; NaN when unavailable.
    pub fn course_over_ground(&self) -> f32 {
        if self.cog == COG_NOT_AVAILABLE {
            f32::NAN
        } else {
            f32::from(self.cog) / 10.0
        }
    }

    /// True heading in degrees; 511 when unavailable.
    pub fn true_heading(&self) -> u16 {
        self.true_heading
    }

    /// UTC second of the fix; 60..=63 are the special codes of the wire
    /// format and surface unchanged.
    pub fn timestamp(&self) -> u8 {
        self.timestamp
    }

    pub fn special_maneuver(&self) -> u8 {
        self.special_maneuver
    }

    pub fn raim(&self) -> bool {
        self.raim
    }

    pub fn radio_status(&self) -> u32 {
        self.radio_status
    }

    pub fn set_navigation_status(&mut self, status: NavigationStatus) {
        self.nav_status = status;
    }

    pub fn set_rate_of_turn_raw(&mut self, rot: i8) {
        self.rot = rot;
    }

    /// Store a rate of turn given in degrees per minute. NaN maps to the
    /// "not available" code, magnitudes of 708°/min or more to the
    /// "turning faster than 5°/30 s" codes, anything else through
    /// `(|x|/4.733)²` clamped to ±126.
    pub fn set_rate_of_turn(&mut self, deg_per_min: f32) {
        if deg_per_min.is_nan() {
            self.rot = -128;
        } else if deg_per_min >= 708.0 {
            self.rot = 127;
        } else if deg_per_min <= -708.0 {
            self.rot = -127;
        } else if deg_per_min == 0.0 {
            self.rot = 0;
        } else {
            let indicator = (deg_per_min.abs() / 4.733).powi(2).round();
            let signed = if deg_per_min > 0.0 { indicator } else { -indicator };
            self.rot = signed.clamp(-126.0, 126.0) as i8;
        }
    }

    pub fn set_speed_over_ground(&mut self, sog: f32) {
        if sog.is_nan() {
            self.sog = SOG_NOT_AVAILABLE;
        } else if sog >= 102.2 {
            self.sog = 1022;
        } else if sog < 0.0 {
            self.sog = 0;
        } else {
            self.sog = ((sog * 10.0).round() as u16).min(1022);
        }
    }

    pub fn set_position_accuracy(&mut self, accuracy: bool) {
        self.position_accuracy = accuracy;
    }

    /// Values outside [−180, 180] store the "not available" sentinel.
    pub fn set_longitude(&mut self, degrees: f64) {
        self.longitude = longitude_from_degrees(degrees);
    }

    /// Values outside [−90, 90] store the "not available" sentinel.
    pub fn set_latitude(&mut self, degrees: f64) {
        self.latitude = latitude_from_degrees(degrees);
    }

    /// Wraps into [0, 360), snapping values within 0.05° of 360 down to 0.
    pub fn set_course_over_ground(&mut self, cog: f32) {
        if cog.is_nan() {
            self.cog = COG_NOT_AVAILABLE;
            return;
        }
        let mut cog = cog;
        if !(0.0..360.0).contains(&cog) {
            cog = cog.rem_euclid(360.0);
            if (360.0 - cog).abs() < 0.05 {
                cog = 0.0;
            }
        }
        self.cog = ((cog * 10.0).round() as u16).min(3599);
    }

    pub fn set_true_heading(&mut self, heading: u16) {
        self.true_heading = if heading >= 360 && heading != HEADING_NOT_AVAILABLE {
            HEADING_NOT_AVAILABLE
        } else {
            heading
        };
    }

    pub fn set_timestamp(&mut self, timestamp: u8) {
        self.timestamp = if timestamp > 63 { 60 } else { timestamp };
    }

    pub fn set_special_maneuver(&mut self, indicator: u8) {
        self.special_maneuver = if indicator > 2 { 0 } else { indicator };
    }

    pub fn set_raim(&mut self, raim: bool) {
        self.raim = raim;
    }

    pub fn set_radio_status(&mut self, radio_status: u32) {
        self.radio_status = radio_status;
    }
}

impl fmt::Display for PositionReportClassA {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "AIS Message Type: {}", self.message_type)?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;
        writeln!(fmt, "Navigation Status: {}", self.nav_status as u8)?;

        let rot = self.rate_of_turn();
        if rot.is_nan() {
            writeln!(fmt, "Rate of Turn: Not available")?;
        } else if rot.is_infinite() {
            writeln!(
                fmt,
                "Rate of Turn: Turning {} at more than 5 deg/30s",
                if rot > 0.0 { "right" } else { "left" }
            )?;
        } else {
            writeln!(fmt, "Rate of Turn: {rot} deg/min")?;
        }

        let sog = self.speed_over_ground();
        if sog.is_nan() {
            writeln!(fmt, "Speed Over Ground: Not available")?;
        } else {
            writeln!(fmt, "Speed Over Ground: {sog} knots")?;
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

        let cog = self.course_over_ground();
        if cog.is_nan() {
            writeln!(fmt, "Course Over Ground: Not available")?;
        } else {
            writeln!(fmt, "Course Over Ground: {cog:.1} degrees")?;
        }

        if self.true_heading == HEADING_NOT_AVAILABLE {
            writeln!(fmt, "True Heading: Not available")?;
        } else {
            writeln!(fmt, "True Heading: {} degrees", self.true_heading)?;
        }

        match self.timestamp {
            60 => writeln!(fmt, "Timestamp: Not available")?,
            61 => writeln!(fmt, "Timestamp: Positioning system in manual input mode")?,
            62 => writeln!(fmt, "Timestamp: Positioning system in estimated mode")?,
            63 => writeln!(fmt, "Timestamp: Positioning system is inoperative")?,
            seconds => writeln!(fmt, "Timestamp: {seconds} seconds")?,
        }

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
    fn decode_live_sentence_payload() {
        // !AIVDM,1,1,,A,15MgK45P3@G?fl0E`JbR0OwT0@MS,0*4E
        let bits = BitString::from_armored("15MgK45P3@G?fl0E`JbR0OwT0@MS").unwrap();
        let report = PositionReportClassA::from_bits(&bits).unwrap();
        assert_eq!(report.message_type(), 1);
        assert_eq!(report.mmsi(), 366730000);
        assert_eq!(report.repeat_indicator(), 0);
        assert_eq!(report.navigation_status(), NavigationStatus::Moored);
        assert_eq!(report.rate_of_turn_raw(), -128);
        assert!(report.rate_of_turn().is_nan());
        assert!((report.speed_over_ground() - 20.8).abs() < 1e-4);
        assert!((report.longitude() - -122.392_533).abs() < 1e-5);
        assert!((report.latitude() - 37.803_803).abs() < 1e-5);
        assert!((report.course_over_ground() - 51.3).abs() < 1e-4);
        assert_eq!(report.true_heading(), 511);
        assert_eq!(report.timestamp(), 50);
        assert_eq!(report.radio_status(), 67427);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut report =
            PositionReportClassA::new(3, 366123456, 1, NavigationStatus::UnderWayUsingEngine)
                .unwrap();
        report.set_rate_of_turn(12.0);
        report.set_speed_over_ground(14.2);
        report.set_position_accuracy(true);
        report.set_longitude(-122.5);
        report.set_latitude(47.25);
        report.set_course_over_ground(251.0);
        report.set_true_heading(252);
        report.set_timestamp(33);
        report.set_special_maneuver(1);
        report.set_raim(true);
        report.set_radio_status(0x5FFFF);

        let mut bits = BitString::new();
        report.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), PositionReportClassA::BIT_LENGTH);
        assert_eq!(PositionReportClassA::from_bits(&bits).unwrap(), report);
    }

    #[test]
    fn position_sentinels() {
        let mut report =
            PositionReportClassA::new(1, 1, 0, NavigationStatus::NotDefined).unwrap();
        report.set_longitude(181.0);
        report.set_latitude(91.0);
        assert_eq!(report.longitude(), 181.0);
        assert_eq!(report.latitude(), 91.0);

        report.set_longitude(-180.0);
        report.set_latitude(90.0);
        assert_eq!(report.longitude(), -180.0);
        assert_eq!(report.latitude(), 90.0);
    }

    #[test]
    fn rate_of_turn_mapping() {
        let mut report =
            PositionReportClassA::new(1, 1, 0, NavigationStatus::NotDefined).unwrap();

        report.set_rate_of_turn(f32::NAN);
        assert_eq!(report.rate_of_turn_raw(), -128);
        assert!(report.rate_of_turn().is_nan());

        report.set_rate_of_turn(720.0);
        assert_eq!(report.rate_of_turn_raw(), 127);
        assert_eq!(report.rate_of_turn(), f32::INFINITY);

        report.set_rate_of_turn(-720.0);
        assert_eq!(report.rate_of_turn_raw(), -127);
        assert_eq!(report.rate_of_turn(), f32::NEG_INFINITY);

        report.set_rate_of_turn(0.0);
        assert_eq!(report.rate_of_turn_raw(), 0);
        assert_eq!(report.rate_of_turn(), 0.0);

        // 4.733 * sqrt(4) = 9.466 deg/min maps to raw 4 and back.
        report.set_rate_of_turn(9.466);
        assert_eq!(report.rate_of_turn_raw(), 4);
        assert!((report.rate_of_turn() - 9.466).abs() < 1e-3);

        report.set_rate_of_turn(-9.466);
        assert_eq!(report.rate_of_turn_raw(), -4);
    }

    #[test]
    fn course_wrapping() {
        let mut report =
            PositionReportClassA::new(1, 1, 0, NavigationStatus::NotDefined).unwrap();
        report.set_course_over_ground(-90.0);
        assert!((report.course_over_ground() - 270.0).abs() < 1e-4);
        report.set_course_over_ground(-0.01);
        assert_eq!(report.course_over_ground(), 0.0);
        report.set_course_over_ground(f32::NAN);
        assert!(report.course_over_ground().is_nan());
        report.set_course_over_ground(359.94);
        assert!((report.course_over_ground() - 359.9).abs() < 1e-4);
    }

    #[test]
    fn speed_clamping() {
        let mut report =
            PositionReportClassA::new(1, 1, 0, NavigationStatus::NotDefined).unwrap();
        report.set_speed_over_ground(f32::NAN);
        assert!(report.speed_over_ground().is_nan());
        report.set_speed_over_ground(500.0);
        assert_eq!(report.speed_over_ground(), 102.2);
        report.set_speed_over_ground(-3.0);
        assert_eq!(report.speed_over_ground(), 0.0);
        report.set_speed_over_ground(12.34);
        assert!((report.speed_over_ground() - 12.3).abs() < 1e-4);
    }

    #[test]
    fn timestamp_special_codes_pass_through() {
        let mut report =
            PositionReportClassA::new(1, 1, 0, NavigationStatus::NotDefined).unwrap();
        for code in 60..=63 {
            report.set_timestamp(code);
            assert_eq!(report.timestamp(), code);
        }
        report.set_timestamp(64);
        assert_eq!(report.timestamp(), 60);
    }

    #[test]
    fn invalid_message_type_rejected() {
        assert!(matches!(
            PositionReportClassA::new(4, 1, 0, NavigationStatus::NotDefined),
            Err(Error::UnsupportedType(4))
        ));
        let mut bits = BitString::new();
        bits.append_uint(5, 6).unwrap();
        while bits.len() < 168 {
            bits.append_bit(false);
        }
        assert!(matches!(
            PositionReportClassA::from_bits(&bits),
            Err(Error::UnsupportedType(5))
        ));
    }

    #[test]
    fn truncated_input_rejected() {
        let mut bits = BitString::new();
        bits.append_uint(1, 6).unwrap();
        assert!(matches!(
            PositionReportClassA::from_bits(&bits),
            Err(Error::Truncated { needed: 168, have: 6 })
        ));
    }
}
