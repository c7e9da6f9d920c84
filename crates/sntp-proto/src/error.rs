// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for SNTP message decoding and encoding.
//!
//! Every codec operation either fully succeeds or returns a [`CodecError`];
//! no partial message or partial byte buffer is ever produced. The error also
//! converts into [`std::io::Error`] so it can travel through `io::Result` APIs.

use std::fmt;
use std::io;

use crate::protocol::{MESSAGE_LENGTHS, Mode};

/// Errors that can occur while decoding or encoding an SNTP message.
#[derive(Clone, Debug, PartialEq)]
pub enum CodecError {
    /// The buffer length is not one of the accepted message lengths (48, 52, 64, 68).
    InvalidLength {
        /// Length of the rejected buffer.
        length: usize,
    },
    /// The decoded mode is not in the caller's expected set.
    UnexpectedMode {
        /// The mode carried by the message.
        mode: Mode,
    },
    /// A value cannot be represented in its wire format.
    EncodeRange(RangeError),
    /// A field is structurally inconsistent (truncated or unknown discriminant).
    MalformedField(FieldError),
}

/// A value that falls outside the representable range of its wire field.
#[derive(Clone, Debug, PartialEq)]
pub enum RangeError {
    /// A negative value was given for an unsigned fixed-point field.
    NegativeUnsigned {
        /// The rejected value.
        value: f64,
    },
    /// NaN or an infinity was given for a fixed-point field.
    NotFinite,
    /// The fixed-point layout is impossible for the field width.
    FractionStartOutOfRange {
        /// Width of the field in bits.
        bits: u32,
        /// Bit index where the fraction starts.
        fraction_start: u32,
    },
    /// The date precedes 1968-01-01.
    DateTooEarly,
    /// The date is in the reserved upper half of the post-2036 era.
    DateTooLate,
}

/// A field that cannot be read from the given bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldError {
    /// Fewer bytes than the field occupies.
    Truncated {
        /// Name of the field.
        field: &'static str,
        /// Number of bytes the field needs.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// The raw value does not match any known enumerant.
    UnknownValue {
        /// Name of the field.
        field: &'static str,
        /// The raw value.
        value: u8,
    },
}

impl CodecError {
    pub(crate) fn truncated(field: &'static str, needed: usize, available: usize) -> Self {
        CodecError::MalformedField(FieldError::Truncated {
            field,
            needed,
            available,
        })
    }

    pub(crate) fn unknown_value(field: &'static str, value: u8) -> Self {
        CodecError::MalformedField(FieldError::UnknownValue { field, value })
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidLength { length } => {
                write!(
                    f,
                    "invalid message length: expected one of {:?}, got {}",
                    MESSAGE_LENGTHS, length
                )
            }
            CodecError::UnexpectedMode { mode } => {
                write!(f, "unexpected mode: {:?}", mode)
            }
            CodecError::EncodeRange(e) => write!(f, "value out of range: {}", e),
            CodecError::MalformedField(e) => write!(f, "malformed field: {}", e),
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::NegativeUnsigned { value } => {
                write!(f, "negative value for unsigned field: {}", value)
            }
            RangeError::NotFinite => write!(f, "non-finite value for fixed-point field"),
            RangeError::FractionStartOutOfRange {
                bits,
                fraction_start,
            } => {
                write!(
                    f,
                    "fraction start out of range: bits {} fraction start {}",
                    bits, fraction_start
                )
            }
            RangeError::DateTooEarly => write!(f, "date too early to encode"),
            RangeError::DateTooLate => write!(f, "date too late to encode"),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Truncated {
                field,
                needed,
                available,
            } => {
                write!(
                    f,
                    "{} truncated: needed {} bytes, got {}",
                    field, needed, available
                )
            }
            FieldError::UnknownValue { field, value } => {
                write!(f, "unknown {} value: {}", field, value)
            }
        }
    }
}

impl From<RangeError> for CodecError {
    fn from(err: RangeError) -> CodecError {
        CodecError::EncodeRange(err)
    }
}

impl From<FieldError> for CodecError {
    fn from(err: FieldError) -> CodecError {
        CodecError::MalformedField(err)
    }
}

impl From<CodecError> for io::Error {
    fn from(err: CodecError) -> io::Error {
        let kind = match &err {
            CodecError::InvalidLength { .. } => io::ErrorKind::InvalidData,
            CodecError::UnexpectedMode { .. } => io::ErrorKind::InvalidData,
            CodecError::EncodeRange(_) => io::ErrorKind::InvalidInput,
            CodecError::MalformedField(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

impl std::error::Error for CodecError {}
impl std::error::Error for RangeError {}
impl std::error::Error for FieldError {}
