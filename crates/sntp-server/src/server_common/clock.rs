// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ConfigError;

use super::config::check_deviation;

/// Source of the server's notion of "now".
pub trait Clock {
    /// The current time as reported to clients.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock shifted by a fixed deviation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviatedClock {
    deviation: TimeDelta,
}

impl DeviatedClock {
    /// A clock running `deviation` ahead of (or, if negative, behind) the
    /// system clock. Sub-second parts of `deviation` are kept.
    ///
    /// Fails if the magnitude exceeds one NTP era.
    pub fn new(deviation: TimeDelta) -> Result<Self, ConfigError> {
        check_deviation(deviation.num_seconds())?;
        Ok(DeviatedClock { deviation })
    }

    /// The configured deviation.
    pub fn deviation(&self) -> TimeDelta {
        self.deviation
    }
}

impl Clock for DeviatedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now() + self.deviation
    }
}
