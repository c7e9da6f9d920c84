// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::io;

use chrono::{DateTime, Utc};
use sntp_proto::error::{CodecError, FieldError};
use sntp_proto::protocol::{
    BASE_LENGTH, Message, Mode, ORIGIN_TIMESTAMP_OFFSET, TRANSMIT_TIMESTAMP_OFFSET,
};

use crate::error::SntpServerError;

use super::ServerSystemState;

/// Build a server reply.
///
/// - `reference_timestamp` and `transmit_timestamp` are `now`
/// - `receive_timestamp` is T2 (when the request arrived)
/// - `origin_timestamp` is left unset; [`serialize_response`] fills it with
///   the request's raw transmit timestamp bytes
/// - `mode` is `Server`; every other header field comes from `server_state`
pub fn build_server_response(
    server_state: &ServerSystemState,
    now: DateTime<Utc>,
    t2: DateTime<Utc>,
) -> Message {
    Message {
        leap_indicator: server_state.leap_indicator,
        version: server_state.version,
        mode: Mode::Server,
        stratum: server_state.stratum,
        poll: server_state.poll,
        precision: server_state.precision,
        root_delay: server_state.root_delay,
        root_dispersion: server_state.root_dispersion,
        reference_id: server_state.reference_id,
        reference_timestamp: Some(now),
        origin_timestamp: None,
        receive_timestamp: Some(t2),
        transmit_timestamp: Some(now),
    }
}

/// Encode a reply and copy the request's transmit timestamp bytes into its
/// origin timestamp field.
///
/// The copy is byte-for-byte, so the client sees exactly the value it sent.
pub fn serialize_response(
    response: &Message,
    request_buf: &[u8],
) -> io::Result<[u8; BASE_LENGTH]> {
    let transmit = TRANSMIT_TIMESTAMP_OFFSET..TRANSMIT_TIMESTAMP_OFFSET + 8;
    let Some(request_transmit) = request_buf.get(transmit) else {
        return Err(SntpServerError::Protocol(CodecError::MalformedField(
            FieldError::Truncated {
                field: "transmit timestamp",
                needed: BASE_LENGTH,
                available: request_buf.len(),
            },
        ))
        .into());
    };

    let mut buf = response.encode().map_err(SntpServerError::Protocol)?;
    buf[ORIGIN_TIMESTAMP_OFFSET..ORIGIN_TIMESTAMP_OFFSET + 8].copy_from_slice(request_transmit);

    Ok(buf)
}
