//! Frame structure and encoding/decoding

use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::Opcode,
    constants::{packet_types, START_CODE},
    error::{FrameError, Result},
};

/// Packet type identifier (byte 6 of a frame)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    Command = packet_types::COMMAND,
    Data = packet_types::DATA,
    Ack = packet_types::ACK,
    EndData = packet_types::END_DATA,
}

impl From<PacketType> for u8 {
    fn from(packet_type: PacketType) -> u8 {
        packet_type as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = FrameError;

    fn try_from(value: u8) -> std::result::Result<Self, FrameError> {
        match value {
            packet_types::COMMAND => Ok(Self::Command),
            packet_types::DATA => Ok(Self::Data),
            packet_types::ACK => Ok(Self::Ack),
            packet_types::END_DATA => Ok(Self::EndData),
            _ => Err(FrameError::UnexpectedPacketType(value)),
        }
    }
}

/// Sensor protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌───────────┬───────────┬───────────┬───────────┬──────────┬────────────┬───────────┐
/// │ StartCode │  Address  │   Type    │  Length   │   Code   │ Parameters │ Checksum  │
/// │  2 bytes  │  4 bytes  │  1 byte   │  2 bytes  │  1 byte  │  N bytes   │  2 bytes  │
/// │  0xEF01   │ (BE u32)  │           │ (BE u16)  │          │            │ (BE u16)  │
/// └───────────┴───────────┴───────────┴───────────┴──────────┴────────────┴───────────┘
/// ```
///
/// `Length` counts the code, the parameters and the checksum. The code is the
/// instruction for command packets and the confirmation code for
/// acknowledgements.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use fpmrust_core::{Opcode, Packet};
///
/// let packet = Packet::command(0xFFFF_FFFF, Opcode::CheckSensor, Bytes::new());
/// let encoded = packet.encode();
///
/// let decoded = Packet::decode(encoded).unwrap();
/// assert_eq!(packet, decoded);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Module address
    pub address: u32,

    /// Packet type identifier
    pub packet_type: PacketType,

    /// Instruction code or confirmation code
    pub code: u8,

    /// Bytes between the code and the checksum
    pub parameters: Bytes,
}

impl Packet {
    /// Start code, address, type and length
    pub const HEADER_SIZE: usize = 9;

    /// Header, code and checksum with no parameters
    pub const MIN_FRAME_SIZE: usize = Self::HEADER_SIZE + 1 + 2;

    /// Largest parameter block the 16-bit length field can describe
    pub const MAX_PARAMETERS: usize = u16::MAX as usize - 3;

    /// Create a packet
    ///
    /// # Panics
    ///
    /// Panics if `parameters` is longer than [`Packet::MAX_PARAMETERS`], since
    /// the length field could not describe it.
    pub fn new(
        packet_type: PacketType,
        address: u32,
        code: u8,
        parameters: impl Into<Bytes>,
    ) -> Self {
        let parameters = parameters.into();
        assert!(
            parameters.len() <= Self::MAX_PARAMETERS,
            "{} parameter bytes do not fit the length field",
            parameters.len()
        );

        Self {
            address,
            packet_type,
            code,
            parameters,
        }
    }

    /// Create a command packet
    ///
    /// Same bound on `parameters` as [`Packet::new`].
    pub fn command(address: u32, opcode: Opcode, parameters: impl Into<Bytes>) -> Self {
        Self::new(PacketType::Command, address, opcode.into(), parameters)
    }

    /// Value of the length field
    pub fn length(&self) -> u16 {
        (self.parameters.len() + 3) as u16
    }

    /// Calculate checksum for this packet
    pub fn checksum(&self) -> u16 {
        checksum::calculate(
            self.packet_type.into(),
            self.length(),
            self.code,
            &self.parameters,
        )
    }

    /// Encode packet to bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use fpmrust_core::{Opcode, Packet};
    ///
    /// let packet = Packet::command(0xFFFF_FFFF, Opcode::GetFirmwareVersion, Bytes::new());
    /// assert_eq!(packet.encode().len(), Packet::MIN_FRAME_SIZE);
    /// ```
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(START_CODE);
        buf.put_u32(self.address);
        buf.put_u8(self.packet_type.into());
        buf.put_u16(self.length());
        buf.put_u8(self.code);
        buf.put_slice(&self.parameters);
        buf.put_u16(self.checksum());

        buf
    }

    /// Decode any frame from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than [`Packet::MIN_FRAME_SIZE`]
    /// - Start code is not 0xEF01
    /// - Packet type is unknown
    /// - Length field disagrees with the buffer size
    /// - Checksum verification fails
    pub fn decode(mut buf: BytesMut) -> Result<Self> {
        if buf.len() < Self::MIN_FRAME_SIZE {
            return Err(FrameError::TooShort {
                expected: Self::MIN_FRAME_SIZE,
                actual: buf.len(),
            }
            .into());
        }

        let start_code = BigEndian::read_u16(&buf[0..2]);
        if start_code != START_CODE {
            return Err(FrameError::BadStartCode(start_code).into());
        }

        let packet_type = PacketType::try_from(buf[6])?;

        let declared = BigEndian::read_u16(&buf[7..9]);
        let actual = buf.len() - Self::HEADER_SIZE;
        if usize::from(declared) != actual {
            return Err(FrameError::LengthFieldMismatch { declared, actual }.into());
        }

        // Header
        buf.advance(2);
        let address = buf.get_u32();
        buf.advance(3);

        let code = buf.get_u8();
        let parameters = buf.split_to(buf.len() - 2).freeze();
        let checksum_received = buf.get_u16();

        let packet = Self {
            address,
            packet_type,
            code,
            parameters,
        };

        let checksum_calculated = packet.checksum();
        if checksum_calculated != checksum_received {
            return Err(FrameError::ChecksumMismatch {
                expected: checksum_calculated,
                received: checksum_received,
            }
            .into());
        }

        Ok(packet)
    }

    /// Decode an acknowledgement frame of a known size
    ///
    /// The size is checked first, then the packet type, then the rest of the
    /// frame. A frame of the wrong type is reported as such even when its
    /// checksum is also broken.
    pub fn decode_ack(buf: BytesMut, expected_len: usize) -> Result<Self> {
        if buf.len() != expected_len {
            return Err(FrameError::LengthMismatch {
                expected: expected_len,
                actual: buf.len(),
            }
            .into());
        }

        if let Some(&raw_type) = buf.get(6) {
            if raw_type != packet_types::ACK {
                return Err(FrameError::UnexpectedPacketType(raw_type).into());
            }
        }

        Self::decode(buf)
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        Self::MIN_FRAME_SIZE + self.parameters.len()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("address", &format!("0x{:08X}", self.address))
            .field("packet_type", &self.packet_type)
            .field("code", &format!("0x{:02X}", self.code))
            .field("parameters", &hex::encode_upper(&self.parameters))
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet[{:?}](address=0x{:08X}, code=0x{:02X}, len={})",
            self.packet_type,
            self.address,
            self.code,
            self.parameters.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::BROADCAST_ADDRESS, error::Error};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ack(code: u8, parameters: &[u8]) -> BytesMut {
        Packet::new(
            PacketType::Ack,
            BROADCAST_ADDRESS,
            code,
            Bytes::copy_from_slice(parameters),
        )
        .encode()
    }

    fn frame_error(result: Result<Packet>) -> FrameError {
        match result {
            Err(Error::MalformedFrame(reason)) => reason,
            other => panic!("Expected MalformedFrame, got {:?}", other),
        }
    }

    #[test]
    fn test_packet_command() {
        let packet = Packet::command(BROADCAST_ADDRESS, Opcode::VerifyPassword, vec![0u8, 0, 0, 0]);

        assert_eq!(packet.packet_type, PacketType::Command);
        assert_eq!(packet.code, 0x13);
        assert_eq!(packet.length(), 0x0007);
        assert_eq!(packet.checksum(), 0x001B);
    }

    #[test]
    fn test_largest_parameter_block() {
        let packet = Packet::new(
            PacketType::Data,
            BROADCAST_ADDRESS,
            0x00,
            vec![0u8; Packet::MAX_PARAMETERS],
        );
        assert_eq!(packet.length(), u16::MAX);
    }

    #[test]
    #[should_panic(expected = "do not fit the length field")]
    fn test_oversized_parameters_rejected() {
        Packet::new(
            PacketType::Data,
            BROADCAST_ADDRESS,
            0x00,
            vec![0u8; Packet::MAX_PARAMETERS + 1],
        );
    }

    #[test]
    fn test_packet_encode_layout() {
        let packet = Packet::command(0x1234_5678, Opcode::AuraLedConfig, vec![1u8, 2, 3, 4]);
        let encoded = packet.encode();

        assert_eq!(encoded.len(), packet.size());
        assert_eq!(&encoded[0..2], &[0xEF, 0x01]);
        assert_eq!(&encoded[2..6], &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(encoded[6], 0x01);
        assert_eq!(&encoded[7..9], &[0x00, 0x07]);
        assert_eq!(encoded[9], 0x35);
        assert_eq!(&encoded[10..14], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_packet_encode_decode() {
        let original =
            Packet::command(BROADCAST_ADDRESS, Opcode::VerifyPassword, vec![9u8, 8, 7, 6]);

        let decoded = Packet::decode(original.encode()).unwrap();

        assert_eq!(original.address, decoded.address);
        assert_eq!(original.packet_type, decoded.packet_type);
        assert_eq!(original.code, decoded.code);
        assert_eq!(original.parameters, decoded.parameters);
    }

    #[test]
    fn test_decode_ack() {
        let packet = Packet::decode_ack(ack(0x00, &[]), 12).unwrap();

        assert_eq!(packet.packet_type, PacketType::Ack);
        assert_eq!(packet.code, 0x00);
        assert!(packet.parameters.is_empty());
    }

    #[test]
    fn test_decode_ack_reference_reply() {
        let buf = BytesMut::from(
            &[0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x00, 0x00, 0x0A][..],
        );

        let packet = Packet::decode_ack(buf, 12).unwrap();
        assert_eq!(packet.code, 0x00);
    }

    #[test]
    fn test_decode_ack_wrong_packet_type() {
        let buf = Packet::command(BROADCAST_ADDRESS, Opcode::CheckSensor, Bytes::new()).encode();

        let reason = frame_error(Packet::decode_ack(buf, 12));
        assert_eq!(reason, FrameError::UnexpectedPacketType(0x01));
    }

    #[test]
    fn test_decode_ack_wrong_type_reported_before_checksum() {
        let mut buf = ack(0x00, &[]);
        buf[6] = 0x55;

        let reason = frame_error(Packet::decode_ack(buf, 12));
        assert_eq!(reason, FrameError::UnexpectedPacketType(0x55));
    }

    #[test]
    fn test_decode_ack_length_mismatch() {
        let reason = frame_error(Packet::decode_ack(ack(0x00, &[]), 44));
        assert_eq!(
            reason,
            FrameError::LengthMismatch {
                expected: 44,
                actual: 12
            }
        );
    }

    #[test]
    fn test_packet_checksum_verification() {
        let mut encoded = ack(0x00, &[]);

        // Corrupt checksum (last two bytes)
        encoded[10] ^= 0xFF;
        encoded[11] ^= 0xFF;

        let reason = frame_error(Packet::decode(encoded));
        if let FrameError::ChecksumMismatch { expected, received } = reason {
            assert_eq!(expected, 0x000A);
            assert_eq!(received, 0xFFF5);
        } else {
            panic!("Expected ChecksumMismatch error");
        }
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let mut encoded = ack(0x00, &[0x10, 0x20]);
        encoded[10] ^= 0x01;

        assert!(matches!(
            frame_error(Packet::decode(encoded)),
            FrameError::ChecksumMismatch { .. }
        ));
    }

    #[test]
    fn test_bad_start_code() {
        let mut encoded = ack(0x00, &[]);
        encoded[0] = 0xAA;

        assert_eq!(
            frame_error(Packet::decode(encoded)),
            FrameError::BadStartCode(0xAA01)
        );
    }

    #[test]
    fn test_length_field_mismatch() {
        let mut encoded = ack(0x00, &[]);
        encoded[8] = 0x05;

        assert_eq!(
            frame_error(Packet::decode(encoded)),
            FrameError::LengthFieldMismatch {
                declared: 5,
                actual: 3
            }
        );
    }

    #[test]
    fn test_packet_too_short() {
        let buf = BytesMut::from(&[0xEF, 0x01, 0xFF][..]);

        assert!(matches!(
            frame_error(Packet::decode(buf)),
            FrameError::TooShort { actual: 3, .. }
        ));
    }

    #[test]
    fn test_unknown_packet_type() {
        assert_eq!(
            PacketType::try_from(0x42),
            Err(FrameError::UnexpectedPacketType(0x42))
        );
        assert_eq!(PacketType::try_from(0x07), Ok(PacketType::Ack));
    }

    proptest! {
        #[test]
        fn prop_catalog_round_trip(
            index in 0usize..Opcode::ALL.len(),
            address in any::<u32>(),
            parameters in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let opcode = Opcode::ALL[index];
            let original = Packet::command(address, opcode, parameters.clone());

            let decoded = Packet::decode(original.encode()).unwrap();

            prop_assert_eq!(decoded.packet_type, PacketType::Command);
            prop_assert_eq!(decoded.code, u8::from(opcode));
            prop_assert_eq!(decoded.address, address);
            prop_assert_eq!(decoded.parameters.as_ref(), parameters.as_slice());
        }

        #[test]
        fn prop_any_packet_type_round_trip(
            raw_type in prop::sample::select(vec![0x01u8, 0x02, 0x07, 0x08]),
            code in any::<u8>(),
            parameters in proptest::collection::vec(any::<u8>(), 0..300),
        ) {
            let packet_type = PacketType::try_from(raw_type).unwrap();
            let original = Packet::new(packet_type, BROADCAST_ADDRESS, code, parameters);

            prop_assert_eq!(Packet::decode(original.encode()).unwrap(), original);
        }
    }
}
