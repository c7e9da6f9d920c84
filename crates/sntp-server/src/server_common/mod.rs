// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request handling for the SNTP server, independent of the socket loop.
//!
//! Provides startup configuration, the reply header state, request
//! validation, response building and the per-datagram pipeline that ties
//! them together.

mod clock;
mod config;
mod pipeline;
mod response;
mod state;
mod validation;

pub use self::clock::{Clock, DeviatedClock};
pub use self::config::{
    DEFAULT_LISTEN_ADDR, DEFAULT_RECV_BUFFER_SIZE, MAX_DEVIATION_SECS, ServerConfig,
    parse_deviation,
};
pub use self::pipeline::{HandleResult, handle_request};
pub use self::response::{build_server_response, serialize_response};
pub use self::state::ServerSystemState;
pub use self::validation::validate_client_request;
