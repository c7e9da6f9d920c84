// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};

use super::{BASE_LENGTH, ConstPackedSizeBytes};

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current day.
///
/// Note that this field is packed in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap required.
    #[default]
    NoCorrection = 0,
    /// Last minute of the day has 61 seconds.
    SixtyOneSeconds = 1,
    /// Last minute of the day has 59 seconds.
    FiftyNineSeconds = 2,
    /// Clock unsynchronized.
    NotSynchronized = 3,
}

impl TryFrom<u8> for LeapIndicator {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeapIndicator::NoCorrection),
            1 => Ok(LeapIndicator::SixtyOneSeconds),
            2 => Ok(LeapIndicator::FiftyNineSeconds),
            3 => Ok(LeapIndicator::NotSynchronized),
            _ => Err(()),
        }
    }
}

/// A 3-bit integer representing the protocol version number, nominally 4.
///
/// Note that while this struct is 8-bits, this field is packed to 3 in the actual header.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(pub(super) u8);

/// A 3-bit integer representing the association mode.
///
/// Note that while this enum is 8-bits, this field is packed to 3 in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved mode (value 0).
    Reserved = 0,
    /// Symmetric active mode (value 1).
    SymmetricActive = 1,
    /// Symmetric passive mode (value 2).
    SymmetricPassive = 2,
    /// Client mode (value 3).
    #[default]
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
    /// Broadcast mode (value 5).
    Broadcast = 5,
    /// Control message mode (value 6).
    Control = 6,
    /// Reserved for private use (value 7).
    PrivateReserved = 7,
}

impl Mode {
    /// Every mode, in discriminant order.
    pub const ALL: [Mode; 8] = [
        Mode::Reserved,
        Mode::SymmetricActive,
        Mode::SymmetricPassive,
        Mode::Client,
        Mode::Server,
        Mode::Broadcast,
        Mode::Control,
        Mode::PrivateReserved,
    ];
}

impl TryFrom<u8> for Mode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Reserved),
            1 => Ok(Mode::SymmetricActive),
            2 => Ok(Mode::SymmetricPassive),
            3 => Ok(Mode::Client),
            4 => Ok(Mode::Server),
            5 => Ok(Mode::Broadcast),
            6 => Ok(Mode::Control),
            7 => Ok(Mode::PrivateReserved),
            _ => Err(()),
        }
    }
}

/// The set of modes a decoder accepts.
///
/// A server passes `ModeSet::only(Mode::Client)` so that anything other than a
/// client request is rejected during decoding.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ModeSet(u8);

impl ModeSet {
    /// The empty set; decoding against it always fails.
    pub const EMPTY: Self = ModeSet(0);
    /// Every mode.
    pub const ALL: Self = ModeSet(u8::MAX);

    /// A set holding exactly `mode`.
    pub const fn only(mode: Mode) -> Self {
        ModeSet(1 << mode as u8)
    }

    /// This set with `mode` added.
    pub const fn with(self, mode: Mode) -> Self {
        ModeSet(self.0 | 1 << mode as u8)
    }

    /// Add `mode` to the set.
    pub fn insert(&mut self, mode: Mode) {
        self.0 |= 1 << mode as u8;
    }

    /// Whether `mode` is a member of the set.
    pub const fn contains(&self, mode: Mode) -> bool {
        self.0 & (1 << mode as u8) != 0
    }

    /// Whether the set has no members.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the members in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl From<Mode> for ModeSet {
    fn from(mode: Mode) -> Self {
        ModeSet::only(mode)
    }
}

impl FromIterator<Mode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        let mut set = ModeSet::EMPTY;
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

/// An 8-bit integer representing the stratum.
///
/// ```ignore
/// +--------+-----------------------------------------------------+
/// | Value  | Meaning                                             |
/// +--------+-----------------------------------------------------+
/// | 0      | unspecified or invalid                              |
/// | 1      | primary server (e.g., equipped with a GPS receiver) |
/// | 2-15   | secondary server                                    |
/// | 16     | unsynchronized                                      |
/// | 17-255 | reserved                                            |
/// +--------+-----------------------------------------------------+
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

/// **NTP Timestamp Format** - the raw 64-bit wire timestamp: a 32-bit unsigned seconds field
/// and a 32-bit fraction field resolving 232 picoseconds.
///
/// The seconds field is relative to an era epoch chosen by [`crate::era`]; on its own it does
/// not name an absolute instant. All bits zero means "unset".
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimestampFormat {
    /// Whole seconds since the era epoch (32-bit unsigned).
    pub seconds: u32,
    /// Fractional seconds (32-bit unsigned).
    pub fraction: u32,
}

/// A decoded SNTP message.
///
/// Constructed either by decoding a received datagram or field by field when
/// assembling a reply. A message is encoded once and discarded.
///
/// Timestamps are absolute UTC instants; `None` stands for an all-zero wire
/// timestamp (e.g. an origin timestamp that is not yet known).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Message {
    /// Leap indicator warning of impending leap second.
    pub leap_indicator: LeapIndicator,
    /// Protocol version number.
    pub version: Version,
    /// Association mode.
    pub mode: Mode,
    /// Stratum level of the time source.
    pub stratum: Stratum,
    /// Maximum interval between successive messages, in log2 seconds.
    pub poll: u8,
    /// Precision of the system clock, in log2 seconds. For instance, -18 corresponds to about
    /// one microsecond.
    pub precision: i8,
    /// Total round-trip delay to the reference clock, in seconds.
    pub root_delay: f64,
    /// Total dispersion to the reference clock, in seconds. Never negative.
    pub root_dispersion: f64,
    /// Opaque reference identifier.
    pub reference_id: [u8; 4],
    /// Time when the system clock was last set or corrected.
    pub reference_timestamp: Option<DateTime<Utc>>,
    /// Time at the client when the request departed for the server.
    pub origin_timestamp: Option<DateTime<Utc>>,
    /// Time at the server when the request arrived from the client.
    pub receive_timestamp: Option<DateTime<Utc>>,
    /// Time at the server when the response left for the client.
    pub transmit_timestamp: Option<DateTime<Utc>>,
}

/// The consecutive types within the first packed byte of the message.
pub type PacketByte1 = (LeapIndicator, Version, Mode);

// Inherent implementations.

impl Version {
    /// Version 1.
    pub const V1: Self = Version(1);
    /// Version 2.
    pub const V2: Self = Version(2);
    /// Version 3.
    pub const V3: Self = Version(3);
    /// Version 4 (current standard).
    pub const V4: Self = Version(4);

    /// Create a `Version` from a raw version number.
    ///
    /// Returns `None` if the value does not fit in 3 bits.
    pub fn new(v: u8) -> Option<Self> {
        if v <= 0b111 { Some(Version(v)) } else { None }
    }

    /// Returns the raw version number as a `u8`.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Stratum {
    /// Unspecified or invalid.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// The primary server.
    pub const PRIMARY: Self = Stratum(1);
    /// An unsynchronized stratum.
    pub const UNSYNCHRONIZED: Self = Stratum(16);
}

impl TimestampFormat {
    /// Whether every bit is zero (the "unset" timestamp).
    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }
}

// Size implementations.

impl ConstPackedSizeBytes for PacketByte1 {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for TimestampFormat {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for Message {
    const PACKED_SIZE_BYTES: usize = BASE_LENGTH;
}

// Default implementations.

impl Default for Version {
    /// Defaults to version 4.
    fn default() -> Self {
        Version::V4
    }
}

impl Default for Message {
    /// Defaults to a version 4 client request template.
    ///
    /// All numeric fields are zero and every timestamp is unset. Set
    /// `transmit_timestamp` before sending.
    fn default() -> Self {
        Message {
            leap_indicator: LeapIndicator::default(),
            version: Version::default(),
            mode: Mode::default(),
            stratum: Stratum::default(),
            poll: 0,
            precision: 0,
            root_delay: 0.0,
            root_dispersion: 0.0,
            reference_id: [0; 4],
            reference_timestamp: None,
            origin_timestamp: None,
            receive_timestamp: None,
            transmit_timestamp: None,
        }
    }
}
