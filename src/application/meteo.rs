use std::fmt;

use crate::bits::BitString;
use crate::error::{Error, Result};
use crate::messages::{BinaryAddressedMessage, BinaryBroadcastMessage};

use super::ids;

// All-ones is the "not available" code for unsigned fields.
fn take_unsigned(bits: &BitString, index: &mut usize, width: usize) -> Result<Option<u64>> {
    let value = bits.get_uint(*index, width)?;
    *index += width;
    Ok((value != (1u64 << width) - 1).then_some(value))
}

// The most negative value is the "not available" code for signed fields.
fn take_signed(bits: &BitString, index: &mut usize, width: usize) -> Result<Option<i64>> {
    let value = bits.get_int(*index, width)?;
    *index += width;
    Ok((value != -(1i64 << (width - 1))).then_some(value))
}

/// Meteorological and Hydrological Data, DAC 1 / FI 31. 244 bits.
///
/// The position is fixed point in 1/1000 minute, ten times coarser than
/// the 1/10000-minute scale of the position reports. Every optional field
/// has a dedicated all-ones (unsigned) or most-negative (signed) wire
/// sentinel; those decode to `None` here and `None` encodes the sentinel.
/// Raw field units are the wire units; the getters scale.
#[derive(Debug, Clone, PartialEq)]
pub struct MeteoHydroData {
    latitude: i32,
    longitude: i32,
    day: u8,
    hour: u8,
    minute: u8,
    /// 0.1 knot.
    wind_speed: Option<u16>,
    /// 0.1 knot.
    wind_gust: Option<u16>,
    /// Degrees.
    wind_direction: Option<u16>,
    /// 0.1 °C, signed.
    air_temperature: Option<i16>,
    /// Percent.
    relative_humidity: Option<u8>,
    /// 0.1 °C, signed.
    dew_point: Option<i16>,
    /// hPa.
    air_pressure: Option<u16>,
    /// 0 steady, 1 decreasing, 2 increasing.
    air_pressure_tendency: Option<u8>,
    /// 0.1 NM.
    horizontal_visibility: Option<u8>,
    /// 0.01 m, signed.
    water_level: Option<i16>,
    water_level_trend: Option<u8>,
    /// 0.1 knot.
    surface_current_speed: Option<u8>,
    surface_current_direction: Option<u16>,
    /// 0.1 m.
    wave_height: Option<u8>,
    /// Seconds.
    wave_period: Option<u8>,
    wave_direction: Option<u16>,
    swell_height: Option<u8>,
    swell_period: Option<u8>,
    swell_direction: Option<u16>,
    /// 0.1 °C, signed.
    sea_temperature: Option<i16>,
    precipitation_type: Option<u8>,
    /// 0.1 ‰.
    salinity: Option<u16>,
    /// 0 no ice, 1 ice present.
    ice: Option<u8>,
}

impl MeteoHydroData {
    pub const BIT_LENGTH: usize = 244;

    pub fn new(latitude: f64, longitude: f64, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            latitude: (latitude * 60_000.0).round() as i32,
            longitude: (longitude * 60_000.0).round() as i32,
            day,
            hour,
            minute,
            wind_speed: None,
            wind_gust: None,
            wind_direction: None,
            air_temperature: None,
            relative_humidity: None,
            dew_point: None,
            air_pressure: None,
            air_pressure_tendency: None,
            horizontal_visibility: None,
            water_level: None,
            water_level_trend: None,
            surface_current_speed: None,
            surface_current_direction: None,
            wave_height: None,
            wave_period: None,
            wave_direction: None,
            swell_height: None,
            swell_period: None,
            swell_direction: None,
            sea_temperature: None,
            precipitation_type: None,
            salinity: None,
            ice: None,
        }
    }

    pub fn from_bits(bits: &BitString) -> Result<Self> {
        if bits.len() < Self::BIT_LENGTH {
            return Err(Error::Truncated {
                needed: Self::BIT_LENGTH,
                have: bits.len(),
            });
        }

        // Each optional read advances the cursor and maps the field's
        // sentinel to None.
        let mut index = 65;
        let wind_speed = take_unsigned(bits, &mut index, 10)?.map(|v| v as u16);
        let wind_gust = take_unsigned(bits, &mut index, 10)?.map(|v| v as u16);
        let wind_direction = take_unsigned(bits, &mut index, 9)?.map(|v| v as u16);
        let air_temperature = take_signed(bits, &mut index, 11)?.map(|v| v as i16);
        let relative_humidity = take_unsigned(bits, &mut index, 7)?.map(|v| v as u8);
        let dew_point = take_signed(bits, &mut index, 11)?.map(|v| v as i16);
        let air_pressure = take_unsigned(bits, &mut index, 9)?.map(|v| v as u16);
        let air_pressure_tendency = take_unsigned(bits, &mut index, 2)?.map(|v| v as u8);
        let horizontal_visibility = take_unsigned(bits, &mut index, 8)?.map(|v| v as u8);
        let water_level = take_signed(bits, &mut index, 12)?.map(|v| v as i16);
        let water_level_trend = take_unsigned(bits, &mut index, 2)?.map(|v| v as u8);
        let surface_current_speed = take_unsigned(bits, &mut index, 8)?.map(|v| v as u8);
        let surface_current_direction = take_unsigned(bits, &mut index, 9)?.map(|v| v as u16);
        let wave_height = take_unsigned(bits, &mut index, 8)?.map(|v| v as u8);
        let wave_period = take_unsigned(bits, &mut index, 6)?.map(|v| v as u8);
        let wave_direction = take_unsigned(bits, &mut index, 9)?.map(|v| v as u16);
        let swell_height = take_unsigned(bits, &mut index, 8)?.map(|v| v as u8);
        let swell_period = take_unsigned(bits, &mut index, 6)?.map(|v| v as u8);
        let swell_direction = take_unsigned(bits, &mut index, 9)?.map(|v| v as u16);
        let sea_temperature = take_signed(bits, &mut index, 11)?.map(|v| v as i16);
        let precipitation_type = take_unsigned(bits, &mut index, 3)?.map(|v| v as u8);
        let salinity = take_unsigned(bits, &mut index, 9)?.map(|v| v as u16);
        let ice = take_unsigned(bits, &mut index, 2)?.map(|v| v as u8);

        Ok(Self {
            latitude: bits.get_int(0, 24)? as i32,
            longitude: bits.get_int(24, 25)? as i32,
            day: bits.get_uint(49, 5)? as u8,
            hour: bits.get_uint(54, 5)? as u8,
            minute: bits.get_uint(59, 6)? as u8,
            wind_speed,
            wind_gust,
            wind_direction,
            air_temperature,
            relative_humidity,
            dew_point,
            air_pressure,
            air_pressure_tendency,
            horizontal_visibility,
            water_level,
            water_level_trend,
            surface_current_speed,
            surface_current_direction,
            wave_height,
            wave_period,
            wave_direction,
            swell_height,
            swell_period,
            swell_direction,
            sea_temperature,
            precipitation_type,
            salinity,
            ice,
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        fn unsigned<T: Into<u64> + Copy>(
            bits: &mut BitString,
            field: Option<T>,
            width: usize,
        ) -> Result<()> {
            let sentinel = (1u64 << width) - 1;
            bits.append_uint(field.map_or(sentinel, Into::into), width)
        }
        fn signed<T: Into<i64> + Copy>(
            bits: &mut BitString,
            field: Option<T>,
            width: usize,
        ) -> Result<()> {
            let sentinel = -(1i64 << (width - 1));
            bits.append_int(field.map_or(sentinel, Into::into), width)
        }

        bits.append_int(i64::from(self.latitude), 24)?;
        bits.append_int(i64::from(self.longitude), 25)?;
        bits.append_uint(u64::from(self.day), 5)?;
        bits.append_uint(u64::from(self.hour), 5)?;
        bits.append_uint(u64::from(self.minute), 6)?;
        unsigned(bits, self.wind_speed, 10)?;
        unsigned(bits, self.wind_gust, 10)?;
        unsigned(bits, self.wind_direction, 9)?;
        signed(bits, self.air_temperature, 11)?;
        unsigned(bits, self.relative_humidity, 7)?;
        signed(bits, self.dew_point, 11)?;
        unsigned(bits, self.air_pressure, 9)?;
        unsigned(bits, self.air_pressure_tendency, 2)?;
        unsigned(bits, self.horizontal_visibility, 8)?;
        signed(bits, self.water_level, 12)?;
        unsigned(bits, self.water_level_trend, 2)?;
        unsigned(bits, self.surface_current_speed, 8)?;
        unsigned(bits, self.surface_current_direction, 9)?;
        unsigned(bits, self.wave_height, 8)?;
        unsigned(bits, self.wave_period, 6)?;
        unsigned(bits, self.wave_direction, 9)?;
        unsigned(bits, self.swell_height, 8)?;
        unsigned(bits, self.swell_period, 6)?;
        unsigned(bits, self.swell_direction, 9)?;
        signed(bits, self.sea_temperature, 11)?;
        unsigned(bits, self.precipitation_type, 3)?;
        unsigned(bits, self.salinity, 9)?;
        unsigned(bits, self.ice, 2)?;
        Ok(())
    }

    pub fn to_bit_string(&self) -> Result<BitString> {
        let mut bits = BitString::new();
        self.to_bits(&mut bits)?;
        Ok(bits)
    }

    pub fn to_addressed_message(
        &self,
        source_mmsi: u32,
        dest_mmsi: u32,
        sequence_number: u8,
        repeat_indicator: u8,
    ) -> Result<BinaryAddressedMessage> {
        let mut message =
            BinaryAddressedMessage::new(source_mmsi, dest_mmsi, sequence_number, repeat_indicator);
        message.set_application_id(ids::DAC_INTERNATIONAL, ids::FI_METEO_HYDRO);
        message.set_data(self.to_bit_string()?);
        Ok(message)
    }

    pub fn to_broadcast_message(
        &self,
        source_mmsi: u32,
        repeat_indicator: u8,
    ) -> Result<BinaryBroadcastMessage> {
        let mut message = BinaryBroadcastMessage::new(source_mmsi, repeat_indicator);
        message.set_application_id(ids::DAC_INTERNATIONAL, ids::FI_METEO_HYDRO);
        message.set_data(self.to_bit_string()?);
        Ok(message)
    }

    /// Latitude in degrees (1/1000-minute wire resolution).
    pub fn latitude(&self) -> f64 {
        f64::from(self.latitude) / 60_000.0
    }

    /// Longitude in degrees (1/1000-minute wire resolution).
    pub fn longitude(&self) -> f64 {
        f64::from(self.longitude) / 60_000.0
    }

    pub fn set_latitude(&mut self, degrees: f64) {
        self.latitude = (degrees * 60_000.0).round() as i32;
    }

    pub fn set_longitude(&mut self, degrees: f64) {
        self.longitude = (degrees * 60_000.0).round() as i32;
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Average wind speed in knots.
    pub fn wind_speed(&self) -> Option<f32> {
        self.wind_speed.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_wind_speed(&mut self, knots: Option<f32>) {
        self.wind_speed = knots
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u16);
    }

    /// Wind gust speed in knots.
    pub fn wind_gust(&self) -> Option<f32> {
        self.wind_gust.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_wind_gust(&mut self, knots: Option<f32>) {
        self.wind_gust = knots
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u16);
    }

    /// Wind direction in degrees.
    pub fn wind_direction(&self) -> Option<u16> {
        self.wind_direction
    }

    pub fn set_wind_direction(&mut self, degrees: Option<u16>) {
        self.wind_direction = degrees.filter(|v| *v <= 359);
    }

    /// Air temperature in °C.
    pub fn air_temperature(&self) -> Option<f32> {
        self.air_temperature.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_air_temperature(&mut self, celsius: Option<f32>) {
        self.air_temperature = celsius
            .filter(|v| !v.is_nan())
            .map(|v| (v * 10.0).round() as i16);
    }

    /// Relative humidity in percent.
    pub fn relative_humidity(&self) -> Option<u8> {
        self.relative_humidity
    }

    pub fn set_relative_humidity(&mut self, percent: Option<u8>) {
        self.relative_humidity = percent.filter(|v| *v <= 100);
    }

    /// Dew point in °C.
    pub fn dew_point(&self) -> Option<f32> {
        self.dew_point.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_dew_point(&mut self, celsius: Option<f32>) {
        self.dew_point = celsius
            .filter(|v| !v.is_nan())
            .map(|v| (v * 10.0).round() as i16);
    }

    /// Air pressure in hPa.
    pub fn air_pressure(&self) -> Option<u16> {
        self.air_pressure
    }

    pub fn set_air_pressure(&mut self, hpa: Option<u16>) {
        self.air_pressure = hpa;
    }

    /// 0 steady, 1 decreasing, 2 increasing.
    pub fn air_pressure_tendency(&self) -> Option<u8> {
        self.air_pressure_tendency
    }

    pub fn set_air_pressure_tendency(&mut self, tendency: Option<u8>) {
        self.air_pressure_tendency = tendency.filter(|v| *v <= 2);
    }

    /// Horizontal visibility in nautical miles.
    pub fn horizontal_visibility(&self) -> Option<f32> {
        self.horizontal_visibility.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_horizontal_visibility(&mut self, nautical_miles: Option<f32>) {
        self.horizontal_visibility = nautical_miles
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u8);
    }

    /// Water level in meters.
    pub fn water_level(&self) -> Option<f32> {
        self.water_level.map(|v| f32::from(v) * 0.01)
    }

    pub fn set_water_level(&mut self, meters: Option<f32>) {
        self.water_level = meters
            .filter(|v| !v.is_nan())
            .map(|v| (v * 100.0).round() as i16);
    }

    pub fn water_level_trend(&self) -> Option<u8> {
        self.water_level_trend
    }

    pub fn set_water_level_trend(&mut self, trend: Option<u8>) {
        self.water_level_trend = trend.filter(|v| *v <= 2);
    }

    /// Surface current speed in knots.
    pub fn surface_current_speed(&self) -> Option<f32> {
        self.surface_current_speed.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_surface_current_speed(&mut self, knots: Option<f32>) {
        self.surface_current_speed = knots
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u8);
    }

    pub fn surface_current_direction(&self) -> Option<u16> {
        self.surface_current_direction
    }

    pub fn set_surface_current_direction(&mut self, degrees: Option<u16>) {
        self.surface_current_direction = degrees.filter(|v| *v <= 359);
    }

    /// Wave height in meters.
    pub fn wave_height(&self) -> Option<f32> {
        self.wave_height.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_wave_height(&mut self, meters: Option<f32>) {
        self.wave_height = meters
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u8);
    }

    /// Wave period in seconds.
    pub fn wave_period(&self) -> Option<u8> {
        self.wave_period
    }

    pub fn set_wave_period(&mut self, seconds: Option<u8>) {
        self.wave_period = seconds;
    }

    pub fn wave_direction(&self) -> Option<u16> {
        self.wave_direction
    }

    pub fn set_wave_direction(&mut self, degrees: Option<u16>) {
        self.wave_direction = degrees.filter(|v| *v <= 359);
    }

    /// Swell height in meters.
    pub fn swell_height(&self) -> Option<f32> {
        self.swell_height.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_swell_height(&mut self, meters: Option<f32>) {
        self.swell_height = meters
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u8);
    }

    pub fn swell_period(&self) -> Option<u8> {
        self.swell_period
    }

    pub fn set_swell_period(&mut self, seconds: Option<u8>) {
        self.swell_period = seconds;
    }

    pub fn swell_direction(&self) -> Option<u16> {
        self.swell_direction
    }

    pub fn set_swell_direction(&mut self, degrees: Option<u16>) {
        self.swell_direction = degrees.filter(|v| *v <= 359);
    }

    /// Sea surface temperature in °C.
    pub fn sea_temperature(&self) -> Option<f32> {
        self.sea_temperature.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_sea_temperature(&mut self, celsius: Option<f32>) {
        self.sea_temperature = celsius
            .filter(|v| !v.is_nan())
            .map(|v| (v * 10.0).round() as i16);
    }

    /// 1 rain, 2 thunderstorm, 3 freezing rain, 4 mixed/ice, 5 snow.
    pub fn precipitation_type(&self) -> Option<u8> {
        self.precipitation_type
    }

    pub fn set_precipitation_type(&mut self, kind: Option<u8>) {
        self.precipitation_type = kind.filter(|v| *v <= 5);
    }

    /// Salinity in parts per thousand.
    pub fn salinity(&self) -> Option<f32> {
        self.salinity.map(|v| f32::from(v) * 0.1)
    }

    pub fn set_salinity(&mut self, per_mille: Option<f32>) {
        self.salinity = per_mille
            .filter(|v| *v >= 0.0)
            .map(|v| (v * 10.0).round() as u16);
    }

    /// 0 no ice, 1 ice present.
    pub fn ice(&self) -> Option<u8> {
        self.ice
    }

    pub fn set_ice(&mut self, ice: Option<u8>) {
        self.ice = ice.filter(|v| *v <= 1);
    }
}

impl fmt::Display for MeteoHydroData {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "Meteorological and Hydrological Data:")?;
        writeln!(
            fmt,
            "Position: {:.4}, {:.4}",
            self.latitude(),
            self.longitude()
        )?;
        writeln!(
            fmt,
            "Time: Day {}, {:02}:{:02} UTC",
            self.day, self.hour, self.minute
        )?;
        if let Some(speed) = self.wind_speed() {
            writeln!(fmt, "Wind Speed: {speed} knots")?;
        }
        if let Some(gust) = self.wind_gust() {
            writeln!(fmt, "Wind Gust: {gust} knots")?;
        }
        if let Some(direction) = self.wind_direction() {
            writeln!(fmt, "Wind Direction: {direction} degrees")?;
        }
        if let Some(temperature) = self.air_temperature() {
            writeln!(fmt, "Air Temperature: {temperature} C")?;
        }
        if let Some(humidity) = self.relative_humidity() {
            writeln!(fmt, "Relative Humidity: {humidity}%")?;
        }
        if let Some(dew_point) = self.dew_point() {
            writeln!(fmt, "Dew Point: {dew_point} C")?;
        }
        if let Some(pressure) = self.air_pressure() {
            writeln!(fmt, "Air Pressure: {pressure} hPa")?;
        }
        if let Some(visibility) = self.horizontal_visibility() {
            writeln!(fmt, "Horizontal Visibility: {visibility} NM")?;
        }
        if let Some(level) = self.water_level() {
            writeln!(fmt, "Water Level: {level} m")?;
        }
        if let Some(speed) = self.surface_current_speed() {
            writeln!(fmt, "Surface Current: {speed} knots")?;
        }
        if let Some(height) = self.wave_height() {
            writeln!(fmt, "Wave Height: {height} m")?;
        }
        if let Some(height) = self.swell_height() {
            writeln!(fmt, "Swell Height: {height} m")?;
        }
        if let Some(temperature) = self.sea_temperature() {
            writeln!(fmt, "Sea Temperature: {temperature} C")?;
        }
        if let Some(salinity) = self.salinity() {
            writeln!(fmt, "Salinity: {salinity} ppt")?;
        }
        if let Some(ice) = self.ice() {
            writeln!(fmt, "Ice: {}", if ice == 0 { "No" } else { "Yes" })?;
        }
        Ok(())
    }
}
