// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use sntp_proto::protocol::{LeapIndicator, Stratum, Version};

/// Server-wide header values copied into every reply.
///
/// These can be updated at runtime (e.g. to announce a leap second) by
/// obtaining a write lock on the `Arc<RwLock<ServerSystemState>>` returned by
/// [`SntpServer::system_state()`](crate::server::SntpServer::system_state).
#[derive(Clone, Debug, PartialEq)]
pub struct ServerSystemState {
    /// Leap indicator warning of impending leap second.
    pub leap_indicator: LeapIndicator,
    /// Protocol version announced in replies.
    pub version: Version,
    /// Stratum level of this server.
    pub stratum: Stratum,
    /// Poll exponent announced in replies, in log2 seconds.
    pub poll: u8,
    /// Precision of the server's clock, in log2 seconds (e.g., -18 ≈ 4μs).
    pub precision: i8,
    /// Total round-trip delay to the primary reference source, in seconds.
    pub root_delay: f64,
    /// Total dispersion to the primary reference source, in seconds.
    pub root_dispersion: f64,
    /// Opaque reference clock identifier.
    pub reference_id: [u8; 4],
}

impl Default for ServerSystemState {
    fn default() -> Self {
        ServerSystemState {
            leap_indicator: LeapIndicator::NoCorrection,
            version: Version::V4,
            stratum: Stratum::PRIMARY,
            poll: 4,
            precision: -18,
            root_delay: 0.0,
            root_dispersion: 0.0,
            reference_id: [0; 4],
        }
    }
}
