// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use byteorder::{BigEndian, ByteOrder};

use crate::era;
use crate::error::CodecError;
use crate::fixed_point::FixedPoint;

use super::{
    BASE_LENGTH, ConstPackedSizeBytes, FromBytes, LeapIndicator, MESSAGE_LENGTHS, Message, Mode,
    ModeSet, ORIGIN_TIMESTAMP_OFFSET, PacketByte1, RECEIVE_TIMESTAMP_OFFSET, REFERENCE_ID_OFFSET,
    REFERENCE_TIMESTAMP_OFFSET, ROOT_DELAY_OFFSET, ROOT_DISPERSION_OFFSET, Stratum,
    TRANSMIT_TIMESTAMP_OFFSET, TimestampFormat, ToBytes, Version,
};

impl FromBytes for PacketByte1 {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), CodecError> {
        let Some(&li_vn_mode) = buf.first() else {
            return Err(CodecError::truncated("header", Self::PACKED_SIZE_BYTES, 0));
        };
        let li_u8 = li_vn_mode >> 6;
        let vn_u8 = (li_vn_mode >> 3) & 0b111;
        let mode_u8 = li_vn_mode & 0b111;
        let li = LeapIndicator::try_from(li_u8)
            .map_err(|_| CodecError::unknown_value("leap indicator", li_u8))?;
        let vn = Version(vn_u8);
        let mode = Mode::try_from(mode_u8)
            .map_err(|_| CodecError::unknown_value("association mode", mode_u8))?;
        Ok(((li, vn, mode), Self::PACKED_SIZE_BYTES))
    }
}

impl ToBytes for PacketByte1 {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let Some(out) = buf.first_mut() else {
            return Err(CodecError::truncated("header", Self::PACKED_SIZE_BYTES, 0));
        };
        let (li, vn, mode) = *self;
        let mut li_vn_mode = 0u8;
        li_vn_mode |= (li as u8 & 0b11) << 6;
        li_vn_mode |= (vn.0 & 0b111) << 3;
        li_vn_mode |= mode as u8 & 0b111;
        *out = li_vn_mode;
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl FromBytes for TimestampFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), CodecError> {
        if buf.len() < Self::PACKED_SIZE_BYTES {
            return Err(CodecError::truncated(
                "timestamp",
                Self::PACKED_SIZE_BYTES,
                buf.len(),
            ));
        }
        let seconds = BigEndian::read_u32(&buf[0..4]);
        let fraction = BigEndian::read_u32(&buf[4..8]);
        Ok((
            TimestampFormat { seconds, fraction },
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

impl ToBytes for TimestampFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        if buf.len() < Self::PACKED_SIZE_BYTES {
            return Err(CodecError::truncated(
                "timestamp",
                Self::PACKED_SIZE_BYTES,
                buf.len(),
            ));
        }
        BigEndian::write_u32(&mut buf[0..4], self.seconds);
        BigEndian::write_u32(&mut buf[4..8], self.fraction);
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl Message {
    /// Decode a received datagram, accepting only modes in `expected`.
    ///
    /// `buf` must be exactly one of [`MESSAGE_LENGTHS`]. Bytes past the base
    /// message (key identifier and digest) are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sntp_proto::protocol::{Message, Mode, ModeSet, Version};
    ///
    /// let mut buf = [0u8; 48];
    /// buf[0] = 0b0010_0011; // LI 0, version 4, client
    /// let msg = Message::decode(&buf, ModeSet::only(Mode::Client)).unwrap();
    /// assert_eq!(msg.mode, Mode::Client);
    /// assert_eq!(msg.version, Version::V4);
    /// ```
    pub fn decode(buf: &[u8], expected: ModeSet) -> Result<Self, CodecError> {
        if !MESSAGE_LENGTHS.contains(&buf.len()) {
            return Err(CodecError::InvalidLength { length: buf.len() });
        }

        let ((leap_indicator, version, mode), _) = PacketByte1::from_bytes(buf)?;
        if !expected.contains(mode) {
            return Err(CodecError::UnexpectedMode { mode });
        }

        let stratum = Stratum(buf[1]);
        let poll = buf[2];
        let precision = buf[3] as i8;
        let root_delay = FixedPoint::ROOT_DELAY.decode(&buf[ROOT_DELAY_OFFSET..])?;
        let root_dispersion = FixedPoint::ROOT_DISPERSION.decode(&buf[ROOT_DISPERSION_OFFSET..])?;

        let mut reference_id = [0u8; 4];
        reference_id.copy_from_slice(&buf[REFERENCE_ID_OFFSET..REFERENCE_ID_OFFSET + 4]);

        Ok(Message {
            leap_indicator,
            version,
            mode,
            stratum,
            poll,
            precision,
            root_delay,
            root_dispersion,
            reference_id,
            reference_timestamp: read_timestamp(buf, REFERENCE_TIMESTAMP_OFFSET)?,
            origin_timestamp: read_timestamp(buf, ORIGIN_TIMESTAMP_OFFSET)?,
            receive_timestamp: read_timestamp(buf, RECEIVE_TIMESTAMP_OFFSET)?,
            transmit_timestamp: read_timestamp(buf, TRANSMIT_TIMESTAMP_OFFSET)?,
        })
    }

    /// Encode into a base-length (48 byte) datagram.
    pub fn encode(&self) -> Result<[u8; BASE_LENGTH], CodecError> {
        let mut buf = [0u8; BASE_LENGTH];
        self.to_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Whether `len` is one of the authenticated message lengths (52, 64 or 68).
    pub fn is_extended_length(len: usize) -> bool {
        len != BASE_LENGTH && MESSAGE_LENGTHS.contains(&len)
    }
}

fn read_timestamp(
    buf: &[u8],
    offset: usize,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, CodecError> {
    let (ts, _) = TimestampFormat::from_bytes(&buf[offset..])?;
    Ok(era::timestamp_to_datetime(ts))
}

fn write_timestamp(
    time: Option<chrono::DateTime<chrono::Utc>>,
    buf: &mut [u8],
    offset: usize,
) -> Result<(), CodecError> {
    era::datetime_to_timestamp(time)?.to_bytes(&mut buf[offset..])?;
    Ok(())
}

/// Decodes the base message in any mode. Consumes [`BASE_LENGTH`] bytes.
impl FromBytes for Message {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), CodecError> {
        let msg = Message::decode(buf, ModeSet::ALL)?;
        Ok((msg, Self::PACKED_SIZE_BYTES))
    }
}

impl ToBytes for Message {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        if buf.len() < Self::PACKED_SIZE_BYTES {
            return Err(CodecError::truncated(
                "message",
                Self::PACKED_SIZE_BYTES,
                buf.len(),
            ));
        }

        // Assembled locally so a failure leaves `buf` untouched.
        let mut out = [0u8; BASE_LENGTH];
        (self.leap_indicator, self.version, self.mode).to_bytes(&mut out)?;
        out[1] = self.stratum.0;
        out[2] = self.poll;
        out[3] = self.precision as u8;
        FixedPoint::ROOT_DELAY.encode(self.root_delay, &mut out[ROOT_DELAY_OFFSET..])?;
        FixedPoint::ROOT_DISPERSION
            .encode(self.root_dispersion, &mut out[ROOT_DISPERSION_OFFSET..])?;
        out[REFERENCE_ID_OFFSET..REFERENCE_ID_OFFSET + 4].copy_from_slice(&self.reference_id);
        write_timestamp(self.reference_timestamp, &mut out, REFERENCE_TIMESTAMP_OFFSET)?;
        write_timestamp(self.origin_timestamp, &mut out, ORIGIN_TIMESTAMP_OFFSET)?;
        write_timestamp(self.receive_timestamp, &mut out, RECEIVE_TIMESTAMP_OFFSET)?;
        write_timestamp(self.transmit_timestamp, &mut out, TRANSMIT_TIMESTAMP_OFFSET)?;

        buf[..BASE_LENGTH].copy_from_slice(&out);
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FieldError, RangeError};

    #[test]
    fn header_unpack() {
        let ((li, vn, mode), n) = PacketByte1::from_bytes(&[0b0010_0011]).unwrap();
        assert_eq!(n, 1);
        assert_eq!(li, LeapIndicator::NoCorrection);
        assert_eq!(vn, Version::V4);
        assert_eq!(mode, Mode::Client);

        let ((li, vn, mode), _) = PacketByte1::from_bytes(&[0b1110_0100]).unwrap();
        assert_eq!(li, LeapIndicator::NotSynchronized);
        assert_eq!(vn, Version::V4);
        assert_eq!(mode, Mode::Server);
    }

    #[test]
    fn header_pack() {
        let mut buf = [0u8; 1];
        (LeapIndicator::FiftyNineSeconds, Version::V3, Mode::Broadcast)
            .to_bytes(&mut buf)
            .unwrap();
        assert_eq!(buf[0], 0b1001_1101);
    }

    #[test]
    fn header_pack_masks_version() {
        let mut buf = [0u8; 1];
        (LeapIndicator::NoCorrection, Version(0xFF), Mode::Client)
            .to_bytes(&mut buf)
            .unwrap();
        assert_eq!(buf[0], 0b0011_1011);
    }

    #[test]
    fn header_empty_buffer() {
        let err = PacketByte1::from_bytes(&[]).unwrap_err();
        assert_eq!(
            err,
            CodecError::MalformedField(FieldError::Truncated {
                field: "header",
                needed: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn timestamp_big_endian() {
        let ts = TimestampFormat {
            seconds: 0x0102_0304,
            fraction: 0xA0B0_C0D0,
        };
        let mut buf = [0u8; 8];
        ts.to_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0xA0, 0xB0, 0xC0, 0xD0]);
        assert_eq!(TimestampFormat::from_bytes(&buf).unwrap(), (ts, 8));
    }

    #[test]
    fn timestamp_truncated() {
        assert!(matches!(
            TimestampFormat::from_bytes(&[0u8; 7]),
            Err(CodecError::MalformedField(FieldError::Truncated { needed: 8, available: 7, .. }))
        ));
    }

    #[test]
    fn decode_accepts_only_known_lengths() {
        for len in 0..80 {
            let mut buf = vec![0u8; len];
            if let Some(b) = buf.first_mut() {
                *b = 0b0010_0011;
            }
            let result = Message::decode(&buf, ModeSet::ALL);
            if MESSAGE_LENGTHS.contains(&len) {
                assert!(result.is_ok(), "length {len}");
            } else {
                assert_eq!(result, Err(CodecError::InvalidLength { length: len }));
            }
        }
    }

    #[test]
    fn decode_rejects_unexpected_mode() {
        let mut buf = [0u8; 48];
        buf[0] = 0b0010_0100;
        assert_eq!(
            Message::decode(&buf, ModeSet::only(Mode::Client)),
            Err(CodecError::UnexpectedMode { mode: Mode::Server })
        );
    }

    #[test]
    fn decode_raw_fields() {
        let mut buf = [0u8; 48];
        buf[0] = 0b0010_0011;
        buf[1] = 2;
        buf[2] = 0xFF;
        buf[3] = 0xEE;
        buf[4..8].copy_from_slice(&[0x80, 0x01, 0x80, 0x00]);
        buf[8..12].copy_from_slice(&[0x00, 0x02, 0x40, 0x00]);
        buf[12..16].copy_from_slice(b"GPS\0");
        let msg = Message::decode(&buf, ModeSet::ALL).unwrap();
        assert_eq!(msg.stratum, Stratum(2));
        assert_eq!(msg.poll, 255);
        assert_eq!(msg.precision, -18);
        assert_eq!(msg.root_delay, -1.5);
        assert_eq!(msg.root_dispersion, 2.25);
        assert_eq!(&msg.reference_id, b"GPS\0");
        assert!(msg.reference_timestamp.is_none());
        assert!(msg.transmit_timestamp.is_none());
    }

    #[test]
    fn encode_precision_twos_complement() {
        let msg = Message {
            precision: -18,
            ..Message::default()
        };
        let buf = msg.encode().unwrap();
        assert_eq!(buf[3], 0xEE);
        assert_eq!(buf[0], 0b0010_0011);
    }

    #[test]
    fn encode_failure_leaves_buffer_untouched() {
        let msg = Message {
            root_dispersion: -1.0,
            ..Message::default()
        };
        let mut buf = [0xAAu8; 48];
        let err = msg.to_bytes(&mut buf).unwrap_err();
        assert_eq!(
            err,
            CodecError::EncodeRange(RangeError::NegativeUnsigned { value: -1.0 })
        );
        assert_eq!(buf, [0xAAu8; 48]);
    }

    #[test]
    fn to_bytes_short_buffer() {
        let mut buf = [0u8; 47];
        assert!(matches!(
            Message::default().to_bytes(&mut buf),
            Err(CodecError::MalformedField(FieldError::Truncated { needed: 48, .. }))
        ));
    }

    #[test]
    fn from_bytes_consumes_base_length() {
        let mut buf = [0u8; 68];
        buf[0] = 0b0010_0101;
        let (msg, n) = Message::from_bytes(&buf).unwrap();
        assert_eq!(msg.mode, Mode::Broadcast);
        assert_eq!(n, BASE_LENGTH);
    }

    #[test]
    fn extended_lengths() {
        assert!(!Message::is_extended_length(48));
        assert!(Message::is_extended_length(52));
        assert!(Message::is_extended_length(64));
        assert!(Message::is_extended_length(68));
        assert!(!Message::is_extended_length(56));
    }
}
