// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for server integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use sntp_server::protocol::{BASE_LENGTH, Message, ModeSet};
use sntp_server::server::SntpServerBuilder;
use tokio::net::UdpSocket;

/// Transmit timestamp pattern carried by [`build_client_packet`].
#[allow(dead_code)]
pub(crate) const TRANSMIT_PATTERN: [u8; 8] = [0xE9, 0x3C, 0x2A, 0x10, 0x12, 0x34, 0x56, 0x78];

/// Spawn a test server on an ephemeral loopback port and return its address.
///
/// The server runs in a background tokio task. It will shut down when the
/// tokio runtime is dropped.
pub(crate) async fn spawn_test_server(builder: SntpServerBuilder) -> SocketAddr {
    let server = builder
        .listen("127.0.0.1:0")
        .build()
        .await
        .expect("failed to bind test server");
    let addr = server.local_addr().expect("failed to get local addr");
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    // Small yield to ensure the server task is running.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Build a minimal version 4 client request whose only non-zero timestamp is
/// the transmit timestamp [`TRANSMIT_PATTERN`].
pub(crate) fn build_client_packet() -> [u8; BASE_LENGTH] {
    let mut buf = [0u8; BASE_LENGTH];
    buf[0] = 0b0010_0011;
    buf[40..48].copy_from_slice(&TRANSMIT_PATTERN);
    buf
}

/// Send a raw UDP packet to `addr` and receive the response with a timeout.
///
/// Returns `None` if the server doesn't respond within the timeout.
pub(crate) async fn send_receive_raw(
    addr: SocketAddr,
    packet: &[u8],
    timeout: Duration,
) -> Option<Vec<u8>> {
    let sock = UdpSocket::bind("127.0.0.1:0").await.expect("bind failed");
    sock.send_to(packet, addr).await.expect("send failed");

    let mut buf = vec![0u8; 2048];
    match tokio::time::timeout(timeout, sock.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => {
            buf.truncate(len);
            Some(buf)
        }
        _ => None,
    }
}

/// Decode a response buffer in any mode.
#[allow(dead_code)]
pub(crate) fn parse_response(buf: &[u8]) -> Message {
    Message::decode(buf, ModeSet::ALL).expect("failed to parse response")
}
