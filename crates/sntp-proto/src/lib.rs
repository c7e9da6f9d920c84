// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP message codec.
//!
//! This crate translates between 48-byte SNTP datagrams and the structured
//! [`Message`](protocol::Message) type. It is pure and stateless: every call is
//! synchronous, performs no I/O, and either fully succeeds or returns a
//! [`CodecError`](error::CodecError).
//!
//! ```
//! use sntp_proto::protocol::{Mode, ModeSet};
//!
//! let mut request = [0u8; 48];
//! request[0] = 0b0010_0011;
//! let msg = sntp_proto::decode(&request, ModeSet::only(Mode::Client)).unwrap();
//! let bytes = sntp_proto::encode(&msg).unwrap();
//! assert_eq!(bytes, request);
//! ```

#![warn(missing_docs)]

/// Codec error types.
pub mod error;

/// SNTP wire types, constants and byte conversions.
pub mod protocol;

/// Generic fixed-point conversion for the root delay and root dispersion fields.
pub mod fixed_point;

/// Era-aware conversion between calendar time and NTP timestamps.
pub mod era;

use crate::error::CodecError;
use crate::protocol::{BASE_LENGTH, Message, ModeSet};

/// Decode `buf` into a [`Message`], failing unless its mode is in `expected`.
///
/// Shorthand for [`Message::decode`].
pub fn decode(buf: &[u8], expected: ModeSet) -> Result<Message, CodecError> {
    Message::decode(buf, expected)
}

/// Encode `msg` into a 48-byte datagram.
///
/// Shorthand for [`Message::encode`].
pub fn encode(msg: &Message) -> Result<[u8; BASE_LENGTH], CodecError> {
    msg.encode()
}
