// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP server using the Tokio runtime.
//!
//! # Architecture
//!
//! The server uses a builder pattern for configuration and processes incoming
//! UDP datagrams one at a time on a single async task.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use chrono::TimeDelta;
//! use sntp_server::server::SntpServer;
//!
//! let server = SntpServer::builder()
//!     .listen("0.0.0.0:123")
//!     .deviation(TimeDelta::seconds(30))
//!     .stratum(sntp_server::protocol::Stratum(2))
//!     .build()
//!     .await?;
//!
//! server.run().await
//! # }
//! ```

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use chrono::TimeDelta;
use log::{debug, warn};
use tokio::net::UdpSocket;

use crate::error::{ConfigError, SntpServerError};
use crate::protocol::{self, BASE_LENGTH};
use crate::server_common::{
    DEFAULT_LISTEN_ADDR, DEFAULT_RECV_BUFFER_SIZE, DeviatedClock, HandleResult, ServerConfig,
    ServerSystemState, handle_request,
};

/// Builder for configuring and creating an [`SntpServer`].
#[derive(Debug)]
pub struct SntpServerBuilder {
    listen_addr: String,
    system_state: ServerSystemState,
    deviation: TimeDelta,
    recv_buffer_size: usize,
}

impl SntpServerBuilder {
    fn new() -> Self {
        SntpServerBuilder {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            system_state: ServerSystemState::default(),
            deviation: TimeDelta::zero(),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }

    /// Apply a loaded [`ServerConfig`] (listen address, deviation and buffer size).
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.listen_addr = config.listen_addr;
        self.deviation = config.deviation;
        self.recv_buffer_size = config.recv_buffer_size;
        self
    }

    /// Set the listen address (default: `"localhost:123"`).
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set the offset added to every timestamp the server generates.
    pub fn deviation(mut self, deviation: TimeDelta) -> Self {
        self.deviation = deviation;
        self
    }

    /// Set the server's stratum level.
    pub fn stratum(mut self, stratum: protocol::Stratum) -> Self {
        self.system_state.stratum = stratum;
        self
    }

    /// Set the poll exponent announced in replies.
    pub fn poll(mut self, poll: u8) -> Self {
        self.system_state.poll = poll;
        self
    }

    /// Set the server's clock precision in log2 seconds (e.g., -18 ≈ 4μs).
    pub fn precision(mut self, precision: i8) -> Self {
        self.system_state.precision = precision;
        self
    }

    /// Set the server's leap indicator.
    pub fn leap_indicator(mut self, li: protocol::LeapIndicator) -> Self {
        self.system_state.leap_indicator = li;
        self
    }

    /// Set the server's reference identifier.
    pub fn reference_id(mut self, id: [u8; 4]) -> Self {
        self.system_state.reference_id = id;
        self
    }

    /// Set the server's root delay, in seconds.
    pub fn root_delay(mut self, delay: f64) -> Self {
        self.system_state.root_delay = delay;
        self
    }

    /// Set the server's root dispersion, in seconds.
    pub fn root_dispersion(mut self, dispersion: f64) -> Self {
        self.system_state.root_dispersion = dispersion;
        self
    }

    /// Set the datagram receive buffer size (default 1024, minimum 48).
    ///
    /// Datagrams longer than this are dropped without a reply.
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size;
        self
    }

    /// Build the server. Binds to the configured listen address.
    pub async fn build(self) -> io::Result<SntpServer> {
        if self.recv_buffer_size < BASE_LENGTH {
            return Err(SntpServerError::Config(ConfigError::Other(format!(
                "receive buffer of {} bytes cannot hold a {}-byte message",
                self.recv_buffer_size, BASE_LENGTH
            )))
            .into());
        }
        let clock = DeviatedClock::new(self.deviation).map_err(SntpServerError::Config)?;

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&self.listen_addr)
            .await
            .map_err(|e| invalid_listen_address(&self.listen_addr, e.to_string()))?
            .collect();
        if addrs.is_empty() {
            return Err(invalid_listen_address(
                &self.listen_addr,
                "no addresses resolved".to_string(),
            ));
        }

        let sock = UdpSocket::bind(&addrs[..]).await?;
        tracing::debug!("SNTP server listening on {}", self.listen_addr);

        Ok(SntpServer {
            sock,
            system_state: Arc::new(RwLock::new(self.system_state)),
            clock,
            recv_buffer_size: self.recv_buffer_size,
        })
    }
}

fn invalid_listen_address(address: &str, detail: String) -> io::Error {
    SntpServerError::Config(ConfigError::InvalidListenAddress {
        address: address.to_string(),
        detail,
    })
    .into()
}

/// An SNTP server that responds to client requests.
///
/// Created via [`SntpServer::builder()`]. Call [`run()`](SntpServer::run) to start
/// serving requests.
#[derive(Debug)]
pub struct SntpServer {
    sock: UdpSocket,
    system_state: Arc<RwLock<ServerSystemState>>,
    clock: DeviatedClock,
    recv_buffer_size: usize,
}

impl SntpServer {
    /// Create a builder for configuring the server.
    pub fn builder() -> SntpServerBuilder {
        SntpServerBuilder::new()
    }

    /// Get a reference to the server's system state for external updates.
    ///
    /// Use this to change the stratum, reference ID, leap indicator, etc.
    /// while the server is running.
    pub fn system_state(&self) -> &Arc<RwLock<ServerSystemState>> {
        &self.system_state
    }

    /// The deviation added to every generated timestamp.
    pub fn deviation(&self) -> TimeDelta {
        self.clock.deviation()
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Run the server, processing incoming SNTP requests indefinitely.
    ///
    /// This future runs until an I/O error occurs while receiving. Use
    /// `tokio::select!` or a shutdown signal to stop the server gracefully.
    pub async fn run(self) -> io::Result<()> {
        // One spare byte detects datagrams the kernel would otherwise truncate.
        let mut recv_buf = vec![0u8; self.recv_buffer_size + 1];

        loop {
            let (recv_len, src_addr) = self.sock.recv_from(&mut recv_buf).await?;
            if recv_len > self.recv_buffer_size {
                debug!("dropped oversized datagram from {}", src_addr);
                continue;
            }

            let server_state = self
                .system_state
                .read()
                .map_err(|_| io::Error::other("system state lock poisoned"))?
                .clone();

            match handle_request(&recv_buf, recv_len, src_addr, &server_state, &self.clock) {
                HandleResult::Response(resp_buf) => {
                    if let Err(e) = self.sock.send_to(&resp_buf, src_addr).await {
                        warn!("failed to send reply to {}: {}", src_addr, e);
                    }
                }
                HandleResult::Drop => {
                    debug!("dropped packet from {}", src_addr);
                }
            }
        }
    }
}
