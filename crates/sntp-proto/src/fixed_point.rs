// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Fixed-point seconds fields.
//!
//! A [`FixedPoint`] describes a byte-aligned big-endian field holding a real
//! number as integer bits followed by fractional bits. Bit `fraction_start`
//! (counted from the most significant bit) is worth 0.5, the next 0.25, and so
//! on. A signed field reserves the most significant bit as a sign flag and
//! stores the magnitude in the remaining bits.
//!
//! The root delay and root dispersion header fields are both 32 bits wide with
//! 16 fractional bits; root delay is signed, root dispersion is not.
//!
//! ```
//! use sntp_proto::fixed_point::FixedPoint;
//!
//! let mut buf = [0u8; 4];
//! FixedPoint::ROOT_DELAY.encode(-1.5, &mut buf).unwrap();
//! assert_eq!(buf, [0x80, 0x01, 0x80, 0x00]);
//! assert_eq!(FixedPoint::ROOT_DELAY.decode(&buf).unwrap(), -1.5);
//! ```

use byteorder::{BigEndian, ByteOrder};

use crate::error::{CodecError, RangeError};

/// Layout of a fixed-point field: width, position of the first fractional bit,
/// and signedness.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FixedPoint {
    field: &'static str,
    bytes: usize,
    fraction_start: u32,
    signed: bool,
}

impl FixedPoint {
    /// The signed root delay field: 32 bits, 16 of them fractional.
    pub const ROOT_DELAY: Self = FixedPoint {
        field: "root delay",
        bytes: 4,
        fraction_start: 16,
        signed: true,
    };

    /// The unsigned root dispersion field: 32 bits, 16 of them fractional.
    pub const ROOT_DISPERSION: Self = FixedPoint {
        field: "root dispersion",
        bytes: 4,
        fraction_start: 16,
        signed: false,
    };

    /// Describe a field `bytes` wide whose fraction starts at bit `fraction_start`.
    ///
    /// Returns `None` unless `bytes` is between 1 and 8. The fraction start is
    /// checked when the layout is used, so an impossible layout surfaces as a
    /// [`RangeError::FractionStartOutOfRange`].
    pub const fn new(
        field: &'static str,
        bytes: usize,
        fraction_start: u32,
        signed: bool,
    ) -> Option<Self> {
        if bytes == 0 || bytes > 8 {
            return None;
        }
        Some(FixedPoint {
            field,
            bytes,
            fraction_start,
            signed,
        })
    }

    /// Width of the field in bytes.
    pub const fn bytes(&self) -> usize {
        self.bytes
    }

    /// Width of the field in bits.
    pub const fn bits(&self) -> u32 {
        self.bytes as u32 * 8
    }

    /// Whether the most significant bit is a sign flag.
    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    /// Number of fractional bits.
    pub const fn fraction_length(&self) -> u32 {
        self.bits().saturating_sub(self.fraction_start)
    }

    /// Number of bits available for the integer part (excluding the sign bit).
    pub const fn int_length(&self) -> u32 {
        if self.signed {
            self.fraction_start.saturating_sub(1)
        } else {
            self.fraction_start
        }
    }

    /// Smallest representable step, 2^-fraction_length.
    pub fn resolution(&self) -> f64 {
        scale(self.fraction_length()).recip()
    }

    fn check_layout(&self) -> Result<(), CodecError> {
        let bits = self.bits();
        if self.fraction_start > bits || (self.signed && self.fraction_start == 0) {
            return Err(RangeError::FractionStartOutOfRange {
                bits,
                fraction_start: self.fraction_start,
            }
            .into());
        }
        Ok(())
    }

    fn check_len(&self, available: usize) -> Result<(), CodecError> {
        if available < self.bytes {
            return Err(CodecError::truncated(self.field, self.bytes, available));
        }
        Ok(())
    }

    const fn sign_mask(&self) -> u64 {
        1 << (self.bits() - 1)
    }

    /// Read the field from the front of `buf`.
    pub fn decode(&self, buf: &[u8]) -> Result<f64, CodecError> {
        self.check_layout()?;
        self.check_len(buf.len())?;

        let raw = BigEndian::read_uint(&buf[..self.bytes], self.bytes);
        let negative = self.signed && raw & self.sign_mask() != 0;
        let magnitude = if self.signed {
            raw & !self.sign_mask()
        } else {
            raw
        };

        let value = magnitude as f64 / scale(self.fraction_length());
        Ok(if negative { -value } else { value })
    }

    /// Write `value` into the front of `buf`.
    ///
    /// The integer part is masked to the available integer bits and the
    /// fractional part is truncated to the available fractional bits. A field
    /// with no integer bits stores only the fractional part.
    pub fn encode(&self, value: f64, buf: &mut [u8]) -> Result<(), CodecError> {
        if !value.is_finite() {
            return Err(RangeError::NotFinite.into());
        }
        if !self.signed && value < 0.0 {
            return Err(RangeError::NegativeUnsigned { value }.into());
        }
        self.check_layout()?;
        self.check_len(buf.len())?;

        let fraction_length = self.fraction_length();
        let magnitude = value.abs();
        let whole = magnitude.trunc();

        let int_part = (whole as u64) & int_mask(self.int_length());
        let frac_part = ((magnitude - whole) * scale(fraction_length)) as u64;

        let mut raw = int_part.checked_shl(fraction_length).unwrap_or(0) | frac_part;
        if self.signed && value < 0.0 {
            raw |= self.sign_mask();
        }

        BigEndian::write_uint(&mut buf[..self.bytes], raw, self.bytes);
        Ok(())
    }
}

// 2^bits as a float.
fn scale(bits: u32) -> f64 {
    2f64.powi(bits as i32)
}

fn int_mask(int_length: u32) -> u64 {
    match int_length {
        0 => 0,
        64.. => u64::MAX,
        n => (1u64 << n) - 1,
    }
}
