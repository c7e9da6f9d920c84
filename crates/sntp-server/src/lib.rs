// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Single-socket SNTP responder built on the [`sntp_proto`] codec.
//!
//! Every valid client request is answered with a server-mode reply whose
//! receive and transmit timestamps come from the local clock shifted by a
//! configurable deviation, and whose origin timestamp is the request's
//! transmit timestamp copied byte for byte. Invalid datagrams are logged and
//! dropped.

#![warn(missing_docs)]

// Re-export protocol types from sntp_proto for convenience.
pub use sntp_proto::{era, protocol};

/// Custom error types for the SNTP server.
pub mod error;

/// Request handling, reply assembly and configuration, independent of the
/// socket loop.
pub mod server_common;

/// SNTP server using the Tokio runtime.
pub mod server;
