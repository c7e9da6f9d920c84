// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;

use log::{debug, info, warn};
use sntp_proto::protocol::BASE_LENGTH;

use super::{
    Clock, ServerSystemState, build_server_response, serialize_response, validate_client_request,
};

/// The complete result of handling a client request.
#[derive(Debug, PartialEq)]
pub enum HandleResult {
    /// Send this response buffer to the client.
    Response([u8; BASE_LENGTH]),
    /// Drop the datagram (invalid request or unencodable reply).
    Drop,
}

/// Handle a single incoming SNTP request (pure logic, no I/O).
///
/// `recv_buf[..recv_len]` is the received datagram. The receive timestamp is
/// taken from `clock` before anything else, then the request is validated and
/// the reply assembled with a second reading of `clock` for the reference and
/// transmit timestamps.
pub fn handle_request(
    recv_buf: &[u8],
    recv_len: usize,
    src_addr: SocketAddr,
    server_state: &ServerSystemState,
    clock: &impl Clock,
) -> HandleResult {
    // 1. Record T2 (receive timestamp).
    let t2 = clock.now();
    debug!("received {} bytes from {}", recv_len, src_addr);

    let Some(request_buf) = recv_buf.get(..recv_len) else {
        debug!(
            "dropping request from {}: length {} exceeds buffer",
            src_addr, recv_len
        );
        return HandleResult::Drop;
    };

    // 2. Validate the request.
    if let Err(e) = validate_client_request(request_buf) {
        debug!("dropping invalid request from {}: {}", src_addr, e);
        return HandleResult::Drop;
    }

    // 3. Build and serialize the reply.
    let response = build_server_response(server_state, clock.now(), t2);
    match serialize_response(&response, request_buf) {
        Ok(buf) => {
            info!("exchange with {} was successful", src_addr);
            HandleResult::Response(buf)
        }
        Err(e) => {
            warn!("failed to serialize response for {}: {}", src_addr, e);
            HandleResult::Drop
        }
    }
}
