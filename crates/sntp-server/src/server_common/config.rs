// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Startup configuration for the responder.
//!
//! The only on-disk setting is the clock deviation: a text file whose first
//! line is a signed integer number of seconds added to every timestamp the
//! server generates. A deliberately deviated server is useful for testing
//! how clients cope with a wrong time source.
//!
//! # Examples
//!
//! ```no_run
//! use sntp_server::server_common::ServerConfig;
//!
//! # fn example() -> Result<(), sntp_server::error::ConfigError> {
//! let config = ServerConfig::load("config.txt")?;
//! println!("deviation: {}s", config.deviation.num_seconds());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use chrono::TimeDelta;
use log::warn;
use sntp_proto::era::ERA_SECONDS;

use crate::error::ConfigError;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "localhost:123";

/// Default receive buffer size in bytes.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1024;

/// Largest accepted deviation magnitude, in seconds (one NTP era).
pub const MAX_DEVIATION_SECS: i64 = ERA_SECONDS;

/// Responder startup configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Address to bind, resolved at startup (default `localhost:123`).
    pub listen_addr: String,
    /// Offset added to every locally generated timestamp.
    pub deviation: TimeDelta,
    /// Size of the datagram receive buffer (default 1024 bytes).
    pub recv_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            deviation: TimeDelta::zero(),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    /// Default configuration with the deviation read from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            deviation: Self::load_deviation(path)?,
            ..ServerConfig::default()
        })
    }

    /// Read the deviation from the first line of `path`.
    ///
    /// A file that cannot be read yields a zero deviation and a warning. A
    /// first line that is not an integer is an error.
    pub fn load_deviation(path: impl AsRef<Path>) -> Result<TimeDelta, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => parse_deviation(contents.lines().next().unwrap_or_default()),
            Err(e) => {
                warn!(
                    "cannot read deviation from {}: {}; using 0s",
                    path.display(),
                    e
                );
                Ok(TimeDelta::zero())
            }
        }
    }
}

/// Parse a deviation line: an optionally signed integer number of seconds,
/// surrounded by optional whitespace.
pub fn parse_deviation(line: &str) -> Result<TimeDelta, ConfigError> {
    let text = line.trim();
    let secs: i64 = text.parse().map_err(|e: std::num::ParseIntError| {
        ConfigError::InvalidDeviation {
            value: text.to_string(),
            detail: e.to_string(),
        }
    })?;
    check_deviation(secs)
}

/// Convert whole seconds into a deviation, rejecting magnitudes beyond
/// [`MAX_DEVIATION_SECS`].
pub(crate) fn check_deviation(secs: i64) -> Result<TimeDelta, ConfigError> {
    let out_of_range = || ConfigError::InvalidDeviation {
        value: secs.to_string(),
        detail: format!("magnitude exceeds {MAX_DEVIATION_SECS} seconds"),
    };
    if secs.unsigned_abs() > MAX_DEVIATION_SECS as u64 {
        return Err(out_of_range());
    }
    TimeDelta::try_seconds(secs).ok_or_else(out_of_range)
}
