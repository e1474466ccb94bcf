use std::collections::HashMap;
use std::sync::OnceLock;

use crate::bits::BitString;
use crate::error::{Error, Result};
use crate::messages::{
    AisMessage, BaseStationReport, BinaryAddressedMessage, BinaryBroadcastMessage,
    ExtendedPositionReportClassB, PositionReportClassA, StandardPositionReportClassB,
    StaticAndVoyageData,
};

/// Shortest prefix any registered decoder needs: type, repeat, MMSI.
pub const MIN_MESSAGE_BITS: usize = 38;

pub type MessageDecoder = fn(&BitString) -> Result<AisMessage>;

/// Table from the leading 6-bit message type to its decoder.
///
/// Built once at startup (or through the lazy [`global`] instance) and read
/// thereafter; re-registering a type replaces its decoder.
pub struct MessageFactory {
    decoders: HashMap<u8, MessageDecoder>,
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MessageFactory {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// A factory with every message type of this crate registered.
    pub fn builtin() -> Self {
        let mut factory = Self::empty();
        for message_type in 1..=3 {
            factory.register(message_type, |bits| {
                PositionReportClassA::from_bits(bits).map(AisMessage::PositionReportClassA)
            });
        }
        factory.register(4, |bits| {
            BaseStationReport::from_bits(bits).map(AisMessage::BaseStationReport)
        });
        factory.register(5, |bits| {
            StaticAndVoyageData::from_bits(bits).map(AisMessage::StaticAndVoyageData)
        });
        factory.register(6, |bits| {
            BinaryAddressedMessage::from_bits(bits).map(AisMessage::BinaryAddressed)
        });
        factory.register(8, |bits| {
            BinaryBroadcastMessage::from_bits(bits).map(AisMessage::BinaryBroadcast)
        });
        factory.register(18, |bits| {
            StandardPositionReportClassB::from_bits(bits).map(AisMessage::StandardClassBReport)
        });
        factory.register(19, |bits| {
            ExtendedPositionReportClassB::from_bits(bits).map(AisMessage::ExtendedClassBReport)
        });
        factory
    }

    pub fn register(&mut self, message_type: u8, decoder: MessageDecoder) {
        self.decoders.insert(message_type, decoder);
    }

    pub fn is_registered(&self, message_type: u8) -> bool {
        self.decoders.contains_key(&message_type)
    }

    /// Dispatch on the leading 6 bits.
    pub fn decode(&self, bits: &BitString) -> Result<AisMessage> {
        if bits.len() < MIN_MESSAGE_BITS {
            return Err(Error::Truncated {
                needed: MIN_MESSAGE_BITS,
                have: bits.len(),
            });
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        let decoder = self
            .decoders
            .get(&message_type)
            .ok_or(Error::UnsupportedType(message_type))?;
        decoder(bits)
    }
}

/// Process-wide factory with the builtin registrations, built on first use.
pub fn global() -> &'static MessageFactory {
    static FACTORY: OnceLock<MessageFactory> = OnceLock::new();
    FACTORY.get_or_init(MessageFactory::builtin)
}
