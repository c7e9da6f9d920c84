// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::io;

use sntp_proto::protocol::{Message, Mode, ModeSet};

use crate::error::SntpServerError;

/// Validate an incoming SNTP client request.
///
/// The datagram must have one of the accepted message lengths and carry the
/// client mode. Returns the decoded message on success.
pub fn validate_client_request(recv_buf: &[u8]) -> io::Result<Message> {
    sntp_proto::decode(recv_buf, ModeSet::only(Mode::Client))
        .map_err(|e| SntpServerError::Protocol(e).into())
}
