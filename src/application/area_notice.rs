use std::fmt;

use crate::bits::{self, BitString};
use crate::error::{Error, Result};
use crate::messages::{BinaryAddressedMessage, BinaryBroadcastMessage};

use super::ids;

// Shape tag (3) plus the position pair (28 + 27); no subarea is shorter.
const SUBAREA_MIN_BITS: usize = 58;
const TEXT_MAX_CHARS: usize = 14;

/// One geographic record inside an Area Notice.
///
/// All positions and offsets are fixed point in 1/10000 minute, the same
/// scale the position reports use.
#[derive(Debug, Clone, PartialEq)]
pub enum SubArea {
    Circle {
        longitude: i32,
        latitude: i32,
        /// Radius in meters.
        radius: u16,
    },
    Rectangle {
        longitude: i32,
        latitude: i32,
        /// East dimension in meters.
        e_dimension: u16,
        /// North dimension in meters.
        n_dimension: u16,
        /// Orientation in degrees.
        orientation: u16,
    },
    Sector {
        longitude: i32,
        latitude: i32,
        radius: u16,
        left_bound: u16,
        right_bound: u16,
    },
    Polyline {
        longitude: i32,
        latitude: i32,
        scale: u8,
        /// Two offset pairs `(longitude, latitude)`.
        points: [(i32, i32); 2],
    },
    Polygon {
        longitude: i32,
        latitude: i32,
        scale: u8,
        points: [(i32, i32); 2],
    },
    Text {
        longitude: i32,
        latitude: i32,
        text: String,
    },
}

impl SubArea {
    pub fn circle(lon: f64, lat: f64, radius: u16) -> Self {
        SubArea::Circle {
            longitude: (lon * 600_000.0).round() as i32,
            latitude: (lat * 600_000.0).round() as i32,
            radius,
        }
    }

    pub fn rectangle(lon: f64, lat: f64, e_dimension: u16, n_dimension: u16, orientation: u16) -> Self {
        SubArea::Rectangle {
            longitude: (lon * 600_000.0).round() as i32,
            latitude: (lat * 600_000.0).round() as i32,
            e_dimension,
            n_dimension,
            orientation,
        }
    }

    pub fn sector(lon: f64, lat: f64, radius: u16, left_bound: u16, right_bound: u16) -> Self {
        SubArea::Sector {
            longitude: (lon * 600_000.0).round() as i32,
            latitude: (lat * 600_000.0).round() as i32,
            radius,
            left_bound,
            right_bound,
        }
    }

    pub fn text(lon: f64, lat: f64, text: &str) -> Self {
        let mut text = text.to_owned();
        text.truncate(TEXT_MAX_CHARS);
        SubArea::Text {
            longitude: (lon * 600_000.0).round() as i32,
            latitude: (lat * 600_000.0).round() as i32,
            text,
        }
    }

    fn shape_tag(&self) -> u8 {
        match self {
            SubArea::Circle { .. } => 0,
            SubArea::Rectangle { .. } => 1,
            SubArea::Sector { .. } => 2,
            SubArea::Polyline { .. } => 3,
            SubArea::Polygon { .. } => 4,
            SubArea::Text { .. } => 5,
        }
    }

    /// Reference position in degrees.
    pub fn position(&self) -> (f64, f64) {
        let (lon, lat) = match *self {
            SubArea::Circle { longitude, latitude, .. }
            | SubArea::Rectangle { longitude, latitude, .. }
            | SubArea::Sector { longitude, latitude, .. }
            | SubArea::Polyline { longitude, latitude, .. }
            | SubArea::Polygon { longitude, latitude, .. }
            | SubArea::Text { longitude, latitude, .. } => (longitude, latitude),
        };
        (f64::from(lon) / 600_000.0, f64::from(lat) / 600_000.0)
    }
}

/// Area Notice application payload, DAC 1 / FI 22.
///
/// A 51-bit header (version, notice type, start time, duration) followed
/// by zero or more shape records.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaNotice {
    message_version: u8,
    notice_type: u8,
    start_month: u8,
    start_day: u8,
    start_hour: u8,
    start_minute: u8,
    duration: u16,
    subareas: Vec<SubArea>,
}

impl AreaNotice {
    pub const HEADER_BITS: usize = 51;

    pub fn new(
        message_version: u8,
        notice_type: u8,
        start_month: u8,
        start_day: u8,
        start_hour: u8,
        start_minute: u8,
        duration: u16,
        subareas: Vec<SubArea>,
    ) -> Self {
        Self {
            message_version,
            notice_type: notice_type & 0x7F,
            start_month,
            start_day,
            start_hour,
            start_minute,
            duration,
            subareas,
        }
    }

    pub fn from_bits(bits: &BitString) -> Result<Self> {
        if bits.len() < Self::HEADER_BITS {
            return Err(Error::Truncated {
                needed: Self::HEADER_BITS,
                have: bits.len(),
            });
        }
        let mut notice = Self {
            message_version: bits.get_uint(0, 8)? as u8,
            notice_type: bits.get_uint(8, 7)? as u8,
            start_month: bits.get_uint(15, 4)? as u8,
            start_day: bits.get_uint(19, 5)? as u8,
            start_hour: bits.get_uint(24, 5)? as u8,
            start_minute: bits.get_uint(29, 6)? as u8,
            duration: bits.get_uint(35, 16)? as u16,
            subareas: Vec::new(),
        };

        let mut index = Self::HEADER_BITS;
        while bits.len() - index >= SUBAREA_MIN_BITS {
            let tag = bits.get_uint(index, 3)? as u8;
            let longitude = bits.get_int(index + 3, 28)? as i32;
            let latitude = bits.get_int(index + 31, 27)? as i32;
            index += SUBAREA_MIN_BITS;
            let remaining = bits.len() - index;

            let subarea = match tag {
                0 => {
                    if remaining < 14 {
                        break;
                    }
                    let radius = bits.get_uint(index, 12)? as u16;
                    index += 14; // radius + 2 spare
                    SubArea::Circle {
                        longitude,
                        latitude,
                        radius,
                    }
                }
                1 => {
                    if remaining < 27 {
                        break;
                    }
                    let e_dimension = bits.get_uint(index, 8)? as u16;
                    let n_dimension = bits.get_uint(index + 8, 8)? as u16;
                    let orientation = bits.get_uint(index + 16, 9)? as u16;
                    index += 27; // dimensions + orientation + 2 spare
                    SubArea::Rectangle {
                        longitude,
                        latitude,
                        e_dimension,
                        n_dimension,
                        orientation,
                    }
                }
                2 => {
                    if remaining < 32 {
                        break;
                    }
                    let radius = bits.get_uint(index, 12)? as u16;
                    let left_bound = bits.get_uint(index + 12, 9)? as u16;
                    let right_bound = bits.get_uint(index + 21, 9)? as u16;
                    index += 32; // radius + bounds + 2 spare
                    SubArea::Sector {
                        longitude,
                        latitude,
                        radius,
                        left_bound,
                        right_bound,
                    }
                }
                3 | 4 => {
                    if remaining < 112 {
                        break;
                    }
                    let scale = bits.get_uint(index, 2)? as u8;
                    index += 2;
                    let mut points = [(0i32, 0i32); 2];
                    for point in &mut points {
                        point.0 = bits.get_int(index, 28)? as i32;
                        point.1 = bits.get_int(index + 28, 27)? as i32;
                        index += 55;
                    }
                    if tag == 3 {
                        SubArea::Polyline {
                            longitude,
                            latitude,
                            scale,
                            points,
                        }
                    } else {
                        SubArea::Polygon {
                            longitude,
                            latitude,
                            scale,
                            points,
                        }
                    }
                }
                5 => {
                    let mut text = String::new();
                    while text.len() < TEXT_MAX_CHARS && bits.len() - index >= 6 {
                        let code = bits.get_uint(index, 6)? as u8;
                        index += 6;
                        if code == 0 {
                            break;
                        }
                        text.push(bits::decode_sixbit(code));
                    }
                    SubArea::Text {
                        longitude,
                        latitude,
                        text,
                    }
                }
                // Reserved shapes carry no suffix; the record is dropped.
                _ => continue,
            };
            notice.subareas.push(subarea);
        }
        Ok(notice)
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(u64::from(self.message_version), 8)?;
        bits.append_uint(u64::from(self.notice_type), 7)?;
        bits.append_uint(u64::from(self.start_month), 4)?;
        bits.append_uint(u64::from(self.start_day), 5)?;
        bits.append_uint(u64::from(self.start_hour), 5)?;
        bits.append_uint(u64::from(self.start_minute), 6)?;
        bits.append_uint(u64::from(self.duration), 16)?;

        for subarea in &self.subareas {
            bits.append_uint(u64::from(subarea.shape_tag()), 3)?;
            match *subarea {
                SubArea::Circle {
                    longitude,
                    latitude,
                    radius,
                } => {
                    bits.append_int(i64::from(longitude), 28)?;
                    bits.append_int(i64::from(latitude), 27)?;
                    bits.append_uint(u64::from(radius), 12)?;
                    bits.append_uint(0, 2)?;
                }
                SubArea::Rectangle {
                    longitude,
                    latitude,
                    e_dimension,
                    n_dimension,
                    orientation,
                } => {
                    bits.append_int(i64::from(longitude), 28)?;
                    bits.append_int(i64::from(latitude), 27)?;
                    bits.append_uint(u64::from(e_dimension), 8)?;
                    bits.append_uint(u64::from(n_dimension), 8)?;
                    bits.append_uint(u64::from(orientation), 9)?;
                    bits.append_uint(0, 2)?;
                }
                SubArea::Sector {
                    longitude,
                    latitude,
                    radius,
                    left_bound,
                    right_bound,
                } => {
                    bits.append_int(i64::from(longitude), 28)?;
                    bits.append_int(i64::from(latitude), 27)?;
                    bits.append_uint(u64::from(radius), 12)?;
                    bits.append_uint(u64::from(left_bound), 9)?;
                    bits.append_uint(u64::from(right_bound), 9)?;
                    bits.append_uint(0, 2)?;
                }
                SubArea::Polyline {
                    longitude,
                    latitude,
                    scale,
                    points,
                }
                | SubArea::Polygon {
                    longitude,
                    latitude,
                    scale,
                    points,
                } => {
                    bits.append_int(i64::from(longitude), 28)?;
                    bits.append_int(i64::from(latitude), 27)?;
                    bits.append_uint(u64::from(scale), 2)?;
                    for (lon, lat) in points {
                        bits.append_int(i64::from(lon), 28)?;
                        bits.append_int(i64::from(lat), 27)?;
                    }
                }
                SubArea::Text {
                    longitude,
                    latitude,
                    ref text,
                } => {
                    bits.append_int(i64::from(longitude), 28)?;
                    bits.append_int(i64::from(latitude), 27)?;
                    for &byte in text.as_bytes().iter().take(TEXT_MAX_CHARS) {
                        bits.append_uint(u64::from(bits::encode_sixbit(byte)), 6)?;
                    }
                    if text.len() < TEXT_MAX_CHARS {
                        bits.append_uint(0, 6)?; // terminator
                    }
                }
            }
        }
        Ok(())
    }

    pub fn to_bit_string(&self) -> Result<BitString> {
        let mut bits = BitString::new();
        self.to_bits(&mut bits)?;
        Ok(bits)
    }

    /// Wrap into a type 6 envelope addressed to `dest_mmsi`.
    pub fn to_addressed_message(
        &self,
        source_mmsi: u32,
        dest_mmsi: u32,
        sequence_number: u8,
        repeat_indicator: u8,
    ) -> Result<BinaryAddressedMessage> {
        let mut message =
            BinaryAddressedMessage::new(source_mmsi, dest_mmsi, sequence_number, repeat_indicator);
        message.set_application_id(ids::DAC_INTERNATIONAL, ids::FI_AREA_NOTICE);
        message.set_data(self.to_bit_string()?);
        Ok(message)
    }

    /// Wrap into a type 8 broadcast envelope.
    pub fn to_broadcast_message(
        &self,
        source_mmsi: u32,
        repeat_indicator: u8,
    ) -> Result<BinaryBroadcastMessage> {
        let mut message = BinaryBroadcastMessage::new(source_mmsi, repeat_indicator);
        message.set_application_id(ids::DAC_INTERNATIONAL, ids::FI_AREA_NOTICE);
        message.set_data(self.to_bit_string()?);
        Ok(message)
    }

    pub fn message_version(&self) -> u8 {
        self.message_version
    }

    pub fn notice_type(&self) -> u8 {
        self.notice_type
    }

    pub fn start_month(&self) -> u8 {
        self.start_month
    }

    pub fn start_day(&self) -> u8 {
        self.start_day
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn start_minute(&self) -> u8 {
        self.start_minute
    }

    /// Duration in minutes; 0 means unlimited.
    pub fn duration(&self) -> u16 {
        self.duration
    }

    pub fn subareas(&self) -> &[SubArea] {
        &self.subareas
    }

    pub fn set_duration(&mut self, duration: u16) {
        self.duration = duration;
    }

    pub fn set_subareas(&mut self, subareas: Vec<SubArea>) {
        self.subareas = subareas;
    }
}

impl fmt::Display for AreaNotice {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "Area Notice Message:")?;
        writeln!(fmt, "  Message Version: {}", self.message_version)?;
        writeln!(fmt, "  Notice Type: {}", self.notice_type)?;
        if self.start_month > 0 && self.start_day > 0 {
            writeln!(
                fmt,
                "  Start Time: Month {}, Day {}, {}:{:02} UTC",
                self.start_month, self.start_day, self.start_hour, self.start_minute
            )?;
        } else {
            writeln!(fmt, "  Start Time: Not available")?;
        }
        if self.duration == 0 {
            writeln!(fmt, "  Duration: Unlimited")?;
        } else {
            writeln!(fmt, "  Duration: {} minutes", self.duration)?;
        }
        writeln!(fmt, "  Subareas ({}):", self.subareas.len())?;
        for (i, subarea) in self.subareas.iter().enumerate() {
            let (lon, lat) = subarea.position();
            write!(fmt, "    Subarea {}: Pos({lon}, {lat}), ", i + 1)?;
            match subarea {
                SubArea::Circle { radius, .. } => writeln!(fmt, "Circle, radius {radius} m")?,
                SubArea::Rectangle {
                    e_dimension,
                    n_dimension,
                    orientation,
                    ..
                } => writeln!(
                    fmt,
                    "Rectangle, E/W {e_dimension} m, N/S {n_dimension} m, orientation {orientation}"
                )?,
                SubArea::Sector {
                    radius,
                    left_bound,
                    right_bound,
                    ..
                } => writeln!(
                    fmt,
                    "Sector, radius {radius} m, from {left_bound} to {right_bound}"
                )?,
                SubArea::Polyline { points, .. } => writeln!(fmt, "Polyline {points:?}")?,
                SubArea::Polygon { points, .. } => writeln!(fmt, "Polygon {points:?}")?,
                SubArea::Text { text, .. } => writeln!(fmt, "Text: {text:?}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AreaNotice {
        AreaNotice::new(
            1,
            20, // security zone
            7,
            14,
            10,
            30,
            120,
            vec![
                SubArea::circle(-122.41, 37.77, 500),
                SubArea::rectangle(-122.40, 37.78, 100, 200, 45),
            ],
        )
    }

    #[test]
    fn roundtrip_circle_and_rectangle() {
        let notice = sample();
        let bits = notice.to_bit_string().unwrap();
        assert_eq!(
            bits.len(),
            AreaNotice::HEADER_BITS + (58 + 14) + (58 + 27)
        );
        let decoded = AreaNotice::from_bits(&bits).unwrap();
        assert_eq!(decoded, notice);
    }

    #[test]
    fn roundtrip_sector_polygon_text() {
        let notice = AreaNotice::new(
            0,
            35,
            1,
            2,
            3,
            4,
            0,
            vec![
                SubArea::sector(4.0, 52.0, 1200, 10, 90),
                SubArea::Polygon {
                    longitude: 2_400_000,
                    latitude: 31_200_000,
                    scale: 1,
                    points: [(1000, -1000), (-2000, 2000)],
                },
                SubArea::text(4.0, 52.0, "KEEP CLEAR"),
            ],
        );
        let bits = notice.to_bit_string().unwrap();
        let decoded = AreaNotice::from_bits(&bits).unwrap();
        assert_eq!(decoded, notice);
        assert_eq!(decoded.duration(), 0);
        let SubArea::Text { text, .. } = &decoded.subareas()[2] else {
            panic!("expected text subarea");
        };
        assert_eq!(text, "KEEP CLEAR");
    }

    #[test]
    fn full_length_text_has_no_terminator() {
        let notice = AreaNotice::new(
            0,
            0,
            1,
            1,
            0,
            0,
            60,
            vec![SubArea::text(0.0, 0.0, "FOURTEEN CHARS")],
        );
        let bits = notice.to_bit_string().unwrap();
        assert_eq!(bits.len(), AreaNotice::HEADER_BITS + 58 + 14 * 6);
        let decoded = AreaNotice::from_bits(&bits).unwrap();
        assert_eq!(decoded, notice);
    }

    #[test]
    fn trailing_partial_record_is_dropped() {
        let notice = sample();
        let mut bits = notice.to_bit_string().unwrap();
        // A shape tag and position with no circle suffix behind them.
        bits.append_uint(0, 3).unwrap();
        bits.append_int(0, 28).unwrap();
        bits.append_int(0, 27).unwrap();
        let decoded = AreaNotice::from_bits(&bits).unwrap();
        assert_eq!(decoded.subareas().len(), 2);
    }

    #[test]
    fn short_tail_below_prefix_is_ignored() {
        let notice = sample();
        let mut bits = notice.to_bit_string().unwrap();
        bits.append_uint(0, 40).unwrap();
        let decoded = AreaNotice::from_bits(&bits).unwrap();
        assert_eq!(decoded.subareas().len(), 2);
    }

    #[test]
    fn header_only_notice() {
        let notice = AreaNotice::new(2, 5, 12, 31, 23, 59, 65535, Vec::new());
        let bits = notice.to_bit_string().unwrap();
        assert_eq!(bits.len(), AreaNotice::HEADER_BITS);
        let decoded = AreaNotice::from_bits(&bits).unwrap();
        assert_eq!(decoded, notice);
        assert!(decoded.subareas().is_empty());
    }

    #[test]
    fn truncated_header_rejected() {
        let mut bits = BitString::new();
        bits.append_uint(0, 20).unwrap();
        assert!(matches!(
            AreaNotice::from_bits(&bits),
            Err(Error::Truncated { needed: 51, have: 20 })
        ));
    }

    #[test]
    fn envelope_constructors_stamp_application_id() {
        let notice = sample();
        let addressed = notice.to_addressed_message(123456789, 987654321, 0, 0).unwrap();
        assert_eq!(addressed.dac(), 1);
        assert_eq!(addressed.fi(), 22);

        let broadcast = notice.to_broadcast_message(123456789, 0).unwrap();
        assert_eq!(broadcast.dac(), 1);
        assert_eq!(broadcast.fi(), 22);
        assert_eq!(
            AreaNotice::from_bits(broadcast.data()).unwrap(),
            notice
        );
    }
}
