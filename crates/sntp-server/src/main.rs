// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// SNTP server binary.
//
// Usage:
//   sntp-server [CONFIG]
//
// CONFIG (default `config.txt`) holds the clock deviation in whole seconds on
// its first line. A missing file means no deviation.
//
// Requirements:
//   - Root privileges or CAP_NET_BIND_SERVICE for binding to port 123
//
// Testing:
//   ntpdate -q localhost

use std::env;
use std::io;
use std::process::ExitCode;

use log::{error, info};
use sntp_server::error::SntpServerError;
use sntp_server::server::SntpServer;
use sntp_server::server_common::ServerConfig;

const DEFAULT_CONFIG_PATH: &str = "config.txt";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    match serve(&config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: &str) -> io::Result<()> {
    let config = ServerConfig::load(config_path).map_err(SntpServerError::Config)?;
    let server = SntpServer::builder().config(config).build().await?;

    info!(
        "deviation of server time: {}s",
        server.deviation().num_seconds()
    );
    info!("started server at {}", server.local_addr()?);

    let result = server.run().await;
    info!("the session was terminated");
    result
}
