// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Example SNTP server on an unprivileged port, running five minutes fast.
//!
//! Run with: `cargo run -p sntp_server --example server`
//! Query with any SNTP client pointed at 127.0.0.1 port 1123.

use chrono::TimeDelta;
use sntp_server::protocol::Stratum;
use sntp_server::server::SntpServer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let server = SntpServer::builder()
        .listen("127.0.0.1:1123")
        .deviation(TimeDelta::minutes(5))
        .stratum(Stratum(2))
        .build()
        .await?;

    println!("SNTP server listening on {}", server.local_addr()?);

    server.run().await
}
