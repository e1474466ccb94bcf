use crate::bits::BitString;
use crate::error::Result;

pub mod area_notice;
pub mod meteo;

pub use area_notice::{AreaNotice, SubArea};
pub use meteo::MeteoHydroData;

/// Well-known `(DAC, FI)` application identifiers.
pub mod ids {
    /// Test and development.
    pub const DAC_TEST: u16 = 0;
    /// IMO / international.
    pub const DAC_INTERNATIONAL: u16 = 1;
    /// European inland waterways.
    pub const DAC_EUROPE: u16 = 200;
    /// Canada.
    pub const DAC_CANADA: u16 = 316;
    /// United States.
    pub const DAC_USA: u16 = 366;

    // International FIs (DAC = 1).
    pub const FI_VESSEL_TRAFFIC_DATA: u8 = 1;
    pub const FI_DANGEROUS_CARGO: u8 = 2;
    pub const FI_FAIRWAY_CLOSED: u8 = 3;
    pub const FI_TIDAL_WINDOW: u8 = 4;
    pub const FI_MARINE_TRAFFIC_SIGNAL: u8 = 5;
    pub const FI_BERTHING_DATA: u8 = 6;
    pub const FI_WEATHER_OBSERVATION: u8 = 11;
    pub const FI_AREA_NOTICE: u8 = 22;
    pub const FI_METEO_HYDRO: u8 = 31;
    pub const FI_ROUTE_INFO: u8 = 32;
}

/// A decoded application payload, keyed by the envelope's `(DAC, FI)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationPayload {
    /// DAC 1, FI 22.
    AreaNotice(AreaNotice),
    /// DAC 1, FI 31.
    MeteoHydro(MeteoHydroData),
}

impl ApplicationPayload {
    /// Decode the data bits of a binary envelope. Unrecognized pairs come
    /// back as `Ok(None)` and leave the data opaque to the caller.
    pub fn decode(dac: u16, fi: u8, data: &BitString) -> Result<Option<Self>> {
        match (dac, fi) {
            (ids::DAC_INTERNATIONAL, ids::FI_AREA_NOTICE) => {
                AreaNotice::from_bits(data).map(|n| Some(ApplicationPayload::AreaNotice(n)))
            }
            (ids::DAC_INTERNATIONAL, ids::FI_METEO_HYDRO) => {
                MeteoHydroData::from_bits(data).map(|m| Some(ApplicationPayload::MeteoHydro(m)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_pairs_stay_opaque() {
        let mut data = BitString::new();
        data.append_uint(0xABCD, 16).unwrap();
        assert_eq!(ApplicationPayload::decode(200, 10, &data).unwrap(), None);
        assert_eq!(ApplicationPayload::decode(366, 1, &data).unwrap(), None);
    }
}
