use std::fmt;

use crate::bits::BitString;
use crate::error::{Error, Result};

/// Binary Addressed Message, type 6: a point-to-point envelope carrying an
/// opaque application payload identified by `(DAC, FI)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryAddressedMessage {
    repeat_indicator: u8,
    mmsi: u32,
    sequence_number: u8,
    dest_mmsi: u32,
    retransmit_flag: bool,
    dac: u16,
    fi: u8,
    data: BitString,
}

impl BinaryAddressedMessage {
    /// Bits before the application data begin.
    pub const HEADER_BITS: usize = 88;

    pub fn new(mmsi: u32, dest_mmsi: u32, sequence_number: u8, repeat_indicator: u8) -> Self {
        Self {
            repeat_indicator,
            mmsi,
            sequence_number: if sequence_number > 3 {
                0
            } else {
                sequence_number
            },
            dest_mmsi,
            retransmit_flag: false,
            dac: 0,
            fi: 0,
            data: BitString::new(),
        }
    }

    pub fn from_bits(bits: &BitString) -> Result<Self> {
        if bits.len() < Self::HEADER_BITS {
            return Err(Error::Truncated {
                needed: Self::HEADER_BITS,
                have: bits.len(),
            });
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        if message_type != 6 {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            sequence_number: bits.get_uint(38, 2)? as u8,
            dest_mmsi: bits.get_uint(40, 30)? as u32,
            retransmit_flag: bits.get_bit(70)?,
            // Spare (1 bit) skipped.
            dac: bits.get_uint(72, 10)? as u16,
            fi: bits.get_uint(82, 6)? as u8,
            data: bits.slice(Self::HEADER_BITS, bits.len() - Self::HEADER_BITS)?,
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(6, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.sequence_number), 2)?;
        bits.append_uint(u64::from(self.dest_mmsi), 30)?;
        bits.append_bit(self.retransmit_flag);
        bits.append_bit(false); // spare
        bits.append_uint(u64::from(self.dac), 10)?;
        bits.append_uint(u64::from(self.fi), 6)?;
        bits.append_bits(&self.data);
        Ok(())
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    pub fn dest_mmsi(&self) -> u32 {
        self.dest_mmsi
    }

    pub fn set_dest_mmsi(&mut self, dest_mmsi: u32) {
        self.dest_mmsi = dest_mmsi;
    }

    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        self.sequence_number = if sequence_number > 3 {
            0
        } else {
            sequence_number
        };
    }

    pub fn retransmit_flag(&self) -> bool {
        self.retransmit_flag
    }

    pub fn set_retransmit_flag(&mut self, retransmit: bool) {
        self.retransmit_flag = retransmit;
    }

    pub fn dac(&self) -> u16 {
        self.dac
    }

    pub fn fi(&self) -> u8 {
        self.fi
    }

    pub fn application_id(&self) -> u32 {
        u32::from(self.dac) << 16 | u32::from(self.fi)
    }

    pub fn set_application_id(&mut self, dac: u16, fi: u8) {
        self.dac = dac;
        self.fi = fi;
    }

    pub fn data(&self) -> &BitString {
        &self.data
    }

    pub fn set_data(&mut self, data: BitString) {
        self.data = data;
    }

    /// Decode the payload when the `(DAC, FI)` pair is recognized.
    pub fn application_payload(&self) -> Result<Option<crate::application::ApplicationPayload>> {
        crate::application::ApplicationPayload::decode(self.dac, self.fi, &self.data)
    }
}

impl fmt::Display for BinaryAddressedMessage {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "AIS Message Type: 6 (Binary Addressed Message)")?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;
        writeln!(fmt, "Sequence Number: {}", self.sequence_number)?;
        writeln!(fmt, "Destination MMSI: {}", self.dest_mmsi)?;
        writeln!(
            fmt,
            "Retransmit Flag: {}",
            if self.retransmit_flag { "Yes" } else { "No" }
        )?;
        writeln!(fmt, "Application ID: DAC={}, FI={}", self.dac, self.fi)?;
        write!(fmt, "Data Length: {} bits", self.data.len())?;
        if !self.data.is_empty() {
            write!(fmt, "\nData (hex): {}", self.data.to_hex())?;
        }
        Ok(())
    }
}

/// Binary Broadcast Message, type 8: the broadcast counterpart of type 6.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryBroadcastMessage {
    repeat_indicator: u8,
    mmsi: u32,
    dac: u16,
    fi: u8,
    data: BitString,
}

impl BinaryBroadcastMessage {
    /// Bits before the application data begin.
    pub const HEADER_BITS: usize = 56;

    pub fn new(mmsi: u32, repeat_indicator: u8) -> Self {
        Self {
            repeat_indicator,
            mmsi,
            dac: 0,
            fi: 0,
            data: BitString::new(),
        }
    }

    pub fn from_bits(bits: &BitString) -> Result<Self> {
        if bits.len() < Self::HEADER_BITS {
            return Err(Error::Truncated {
                needed: Self::HEADER_BITS,
                have: bits.len(),
            });
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        if message_type != 8 {
            return Err(Error::UnsupportedType(message_type));
        }
        Ok(Self {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: bits.get_uint(8, 30)? as u32,
            // Spare (2 bits) skipped.
            dac: bits.get_uint(40, 10)? as u16,
            fi: bits.get_uint(50, 6)? as u8,
            data: bits.slice(Self::HEADER_BITS, bits.len() - Self::HEADER_BITS)?,
        })
    }

    pub fn to_bits(&self, bits: &mut BitString) -> Result<()> {
        bits.append_uint(8, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(0, 2)?; // spare
        bits.append_uint(u64::from(self.dac), 10)?;
        bits.append_uint(u64::from(self.fi), 6)?;
        bits.append_bits(&self.data);
        Ok(())
    }

    pub fn mmsi(&self) -> u32 {
        self.mmsi
    }

    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    pub fn dac(&self) -> u16 {
        self.dac
    }

    pub fn fi(&self) -> u8 {
        self.fi
    }

    pub fn application_id(&self) -> u32 {
        u32::from(self.dac) << 16 | u32::from(self.fi)
    }

    pub fn set_application_id(&mut self, dac: u16, fi: u8) {
        self.dac = dac;
        self.fi = fi;
    }

    pub fn data(&self) -> &BitString {
        &self.data
    }

    pub fn set_data(&mut self, data: BitString) {
        self.data = data;
    }

    /// Decode the payload when the `(DAC, FI)` pair is recognized.
    pub fn application_payload(&self) -> Result<Option<crate::application::ApplicationPayload>> {
        crate::application::ApplicationPayload::decode(self.dac, self.fi, &self.data)
    }
}

impl fmt::Display for BinaryBroadcastMessage {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "AIS Message Type: 8 (Binary Broadcast Message)")?;
        writeln!(fmt, "MMSI: {}", self.mmsi)?;
        writeln!(fmt, "Repeat Indicator: {}", self.repeat_indicator)?;
        writeln!(fmt, "Application ID: DAC={}, FI={}", self.dac, self.fi)?;
        write!(fmt, "Data Length: {} bits", self.data.len())?;
        if !self.data.is_empty() {
            write!(fmt, "\nData (hex): {}", self.data.to_hex())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> BitString {
        let mut data = BitString::new();
        data.append_uint(1, 8).unwrap();
        data.append_string("TEST", 24).unwrap();
        data
    }

    #[test]
    fn addressed_roundtrip() {
        let mut message = BinaryAddressedMessage::new(123456789, 987654321, 1, 0);
        message.set_application_id(1, 22);
        message.set_retransmit_flag(true);
        message.set_data(sample_data());

        let mut bits = BitString::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), BinaryAddressedMessage::HEADER_BITS + 32);

        let decoded = BinaryAddressedMessage::from_bits(&bits).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.dac(), 1);
        assert_eq!(decoded.fi(), 22);
        assert_eq!(decoded.data().get_string(8, 24).unwrap(), "TEST");
        assert_eq!(decoded.application_id(), 1 << 16 | 22);
    }

    #[test]
    fn broadcast_roundtrip() {
        let mut message = BinaryBroadcastMessage::new(123456789, 0);
        message.set_application_id(1, 31);
        message.set_data(sample_data());

        let mut bits = BitString::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), BinaryBroadcastMessage::HEADER_BITS + 32);

        let decoded = BinaryBroadcastMessage::from_bits(&bits).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.data().get_string(8, 24).unwrap(), "TEST");
    }

    #[test]
    fn empty_payload_is_legal() {
        let message = BinaryBroadcastMessage::new(1, 0);
        let mut bits = BitString::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), BinaryBroadcastMessage::HEADER_BITS);
        let decoded = BinaryBroadcastMessage::from_bits(&bits).unwrap();
        assert!(decoded.data().is_empty());
    }

    #[test]
    fn sequence_number_clamped() {
        let mut message = BinaryAddressedMessage::new(1, 2, 9, 0);
        assert_eq!(message.sequence_number(), 0);
        message.set_sequence_number(3);
        assert_eq!(message.sequence_number(), 3);
        message.set_sequence_number(4);
        assert_eq!(message.sequence_number(), 0);
    }

    #[test]
    fn truncated_envelope_rejected() {
        let mut bits = BitString::new();
        bits.append_uint(6, 6).unwrap();
        assert!(matches!(
            BinaryAddressedMessage::from_bits(&bits),
            Err(Error::Truncated { needed: 88, have: 6 })
        ));
    }
}
