//! Encoder/decoder for AIS messages carried in NMEA 0183 `!AIVDM`/`!AIVDO`
//! sentences: sentence framing and checksums, multipart reassembly, the
//! bit-exact message catalogue, and `(DAC, FI)` application payloads.

pub mod application;
pub mod assembler;
pub mod bits;
pub mod error;
pub mod factory;
pub mod messages;
pub mod parser;
pub mod sentence;

pub use application::{ApplicationPayload, AreaNotice, MeteoHydroData, SubArea};
pub use assembler::FragmentAssembler;
pub use bits::BitString;
pub use error::{Error, Result};
pub use factory::MessageFactory;
pub use messages::{
    AisMessage, BaseStationReport, BinaryAddressedMessage, BinaryBroadcastMessage,
    ExtendedPositionReportClassB, NavigationStatus, PositionReportClassA, ShipType,
    StandardPositionReportClassB, StaticAndVoyageData,
};
pub use parser::{Parser, ParserConfig, parse_ais};
pub use sentence::{Channel, NmeaSentence, Talker, verify_checksum};
