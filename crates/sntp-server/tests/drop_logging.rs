// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Dropped datagrams are reported through the `log` facade.

mod common;

use std::sync::Mutex;
use std::time::Duration;

use log::{Level, LevelFilter, Log, Metadata, Record};
use sntp_server::server::SntpServer;

use common::{build_client_packet, send_receive_raw, spawn_test_server};

const SHORT_TIMEOUT: Duration = Duration::from_millis(300);

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

fn logged(needle: &str) -> bool {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .any(|(level, msg)| *level == Level::Debug && msg.contains(needle))
}

#[tokio::test]
async fn test_dropped_datagrams_are_logged() {
    log::set_logger(&LOGGER).expect("logger already installed");
    log::set_max_level(LevelFilter::Debug);

    let addr = spawn_test_server(SntpServer::builder().recv_buffer_size(64)).await;

    let mut oversized = vec![0u8; 200];
    oversized[..48].copy_from_slice(&build_client_packet());
    assert!(send_receive_raw(addr, &oversized, SHORT_TIMEOUT).await.is_none());
    assert!(logged("dropped oversized datagram"));

    let mut server_mode = build_client_packet();
    server_mode[0] = 0b0010_0100;
    assert!(send_receive_raw(addr, &server_mode, SHORT_TIMEOUT).await.is_none());
    assert!(logged("dropped packet from"));
}
