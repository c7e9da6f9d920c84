// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Types and constants that precisely match the SNTP message layout.
//!
//! Provides [`FromBytes`] and [`ToBytes`] implementations for the wire types,
//! built on the big-endian helpers of the byteorder crate.
//!
//! Every multi-byte field is big-endian. Offsets are in bytes from the start of
//! the message:
//!
//! ```ignore
//! +--------+------+----------------------------------------------+
//! | Offset | Size | Field                                        |
//! +--------+------+----------------------------------------------+
//! | 0      | 1    | LI(2) / VN(3) / Mode(3)                      |
//! | 1      | 1    | Stratum                                      |
//! | 2      | 1    | Poll                                         |
//! | 3      | 1    | Precision (signed)                           |
//! | 4      | 4    | Root Delay (fixed-point, signed, 16 frac)    |
//! | 8      | 4    | Root Dispersion (fixed-point, unsigned)      |
//! | 12     | 4    | Reference Identifier                         |
//! | 16     | 8    | Reference Timestamp                          |
//! | 24     | 8    | Origin Timestamp                             |
//! | 32     | 8    | Receive Timestamp                            |
//! | 40     | 8    | Transmit Timestamp                           |
//! +--------+------+----------------------------------------------+
//! ```

/// SNTP port number.
pub const PORT: u16 = 123;

/// Length of the base message, without authentication fields.
pub const BASE_LENGTH: usize = 48;

/// Every accepted datagram length.
///
/// The 52, 64 and 68 byte variants carry a key identifier and/or message digest
/// after the base message. Their trailing bytes are accepted but not decoded.
pub const MESSAGE_LENGTHS: [usize; 4] = [48, 52, 64, 68];

/// Offset of the root delay field.
pub const ROOT_DELAY_OFFSET: usize = 4;
/// Offset of the root dispersion field.
pub const ROOT_DISPERSION_OFFSET: usize = 8;
/// Offset of the reference identifier.
pub const REFERENCE_ID_OFFSET: usize = 12;
/// Offset of the reference timestamp.
pub const REFERENCE_TIMESTAMP_OFFSET: usize = 16;
/// Offset of the origin timestamp.
pub const ORIGIN_TIMESTAMP_OFFSET: usize = 24;
/// Offset of the receive timestamp.
pub const RECEIVE_TIMESTAMP_OFFSET: usize = 32;
/// Offset of the transmit timestamp.
pub const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

mod bytes;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
