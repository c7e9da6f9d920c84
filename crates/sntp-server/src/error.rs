// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the SNTP server.
//!
//! Public APIs return `io::Result<T>`. Internally, errors are constructed as
//! `SntpServerError` variants and converted to `io::Error` automatically via
//! `From<SntpServerError> for io::Error`.
//!
//! Callers who want programmatic error matching can downcast via
//! `io::Error::get_ref()`:
//!
//! ```no_run
//! use sntp_server::error::SntpServerError;
//!
//! # fn example(result: std::io::Result<()>) {
//! match result {
//!     Ok(()) => println!("server running"),
//!     Err(e) => {
//!         if let Some(srv_err) = e.get_ref()
//!             .and_then(|inner| inner.downcast_ref::<SntpServerError>())
//!         {
//!             match srv_err {
//!                 SntpServerError::Config(c) => eprintln!("config error: {c}"),
//!                 _ => eprintln!("server error: {srv_err}"),
//!             }
//!         }
//!     }
//! }
//! # }
//! ```

pub use sntp_proto::error::CodecError;

use std::fmt;
use std::io;

/// Errors that can occur during SNTP server operations.
#[derive(Debug)]
pub enum SntpServerError {
    /// A datagram could not be decoded, or a reply could not be encoded.
    Protocol(CodecError),
    /// Invalid configuration (bad listen address, bad deviation).
    Config(ConfigError),
    /// Underlying I/O error (socket bind, send/recv, etc.).
    Io(io::Error),
}

/// Server configuration errors.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Invalid listen address.
    InvalidListenAddress {
        /// The address that was invalid.
        address: String,
        /// Detail about why it is invalid.
        detail: String,
    },
    /// The deviation is not an integer number of seconds, or is too large.
    InvalidDeviation {
        /// The rejected text or value.
        value: String,
        /// Detail about why it is invalid.
        detail: String,
    },
    /// Generic configuration error.
    Other(String),
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for SntpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SntpServerError::Protocol(e) => write!(f, "SNTP protocol error: {e}"),
            SntpServerError::Config(e) => write!(f, "SNTP server config error: {e}"),
            SntpServerError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidListenAddress { address, detail } => {
                write!(f, "invalid listen address '{address}': {detail}")
            }
            ConfigError::InvalidDeviation { value, detail } => {
                write!(f, "invalid deviation '{value}': {detail}")
            }
            ConfigError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for SntpServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SntpServerError::Protocol(e) => Some(e),
            SntpServerError::Config(e) => Some(e),
            SntpServerError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── From conversions ────────────────────────────────────────────────

impl From<SntpServerError> for io::Error {
    fn from(err: SntpServerError) -> io::Error {
        let kind = match &err {
            SntpServerError::Protocol(CodecError::EncodeRange(_)) => io::ErrorKind::InvalidInput,
            SntpServerError::Protocol(_) => io::ErrorKind::InvalidData,
            SntpServerError::Config(_) => io::ErrorKind::InvalidInput,
            SntpServerError::Io(e) => e.kind(),
        };
        // Preserve the original io::Error directly for the Io variant.
        if let SntpServerError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for SntpServerError {
    fn from(err: io::Error) -> SntpServerError {
        SntpServerError::Io(err)
    }
}

impl From<CodecError> for SntpServerError {
    fn from(err: CodecError) -> SntpServerError {
        SntpServerError::Protocol(err)
    }
}

impl From<ConfigError> for SntpServerError {
    fn from(err: ConfigError) -> SntpServerError {
        SntpServerError::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sntp_proto::error::RangeError;
    use sntp_proto::protocol::Mode;

    #[test]
    fn test_config_error_display() {
        let e = ConfigError::InvalidListenAddress {
            address: "bad:addr".to_string(),
            detail: "not a valid socket address".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid listen address 'bad:addr': not a valid socket address"
        );
    }

    #[test]
    fn test_config_error_deviation() {
        let e = ConfigError::InvalidDeviation {
            value: "abc".to_string(),
            detail: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid deviation 'abc': invalid digit found in string"
        );
    }

    #[test]
    fn test_protocol_error_display() {
        let e = SntpServerError::Protocol(CodecError::UnexpectedMode { mode: Mode::Server });
        assert_eq!(e.to_string(), "SNTP protocol error: unexpected mode: Server");
    }

    #[test]
    fn test_server_error_to_io_error_kind() {
        let cases: Vec<(SntpServerError, io::ErrorKind)> = vec![
            (
                SntpServerError::Protocol(CodecError::InvalidLength { length: 10 }),
                io::ErrorKind::InvalidData,
            ),
            (
                SntpServerError::Protocol(CodecError::EncodeRange(RangeError::DateTooLate)),
                io::ErrorKind::InvalidInput,
            ),
            (
                SntpServerError::Config(ConfigError::Other("test".to_string())),
                io::ErrorKind::InvalidInput,
            ),
        ];
        for (srv_err, expected_kind) in cases {
            let io_err: io::Error = srv_err.into();
            assert_eq!(io_err.kind(), expected_kind);
        }
    }

    #[test]
    fn test_server_error_downcast_roundtrip() {
        let err = SntpServerError::Protocol(CodecError::InvalidLength { length: 10 });
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

        let inner = io_err
            .get_ref()
            .unwrap()
            .downcast_ref::<SntpServerError>()
            .unwrap();
        assert!(matches!(
            inner,
            SntpServerError::Protocol(CodecError::InvalidLength { length: 10 })
        ));
    }

    #[test]
    fn test_io_error_passthrough() {
        let orig = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let kind = orig.kind();
        let srv_err = SntpServerError::Io(orig);
        let io_err: io::Error = srv_err.into();
        assert_eq!(io_err.kind(), kind);
        assert_eq!(io_err.to_string(), "reset");
    }

    #[test]
    fn test_from_conversions() {
        let srv_err: SntpServerError = io::Error::new(io::ErrorKind::BrokenPipe, "broken").into();
        assert!(matches!(srv_err, SntpServerError::Io(_)));

        let srv_err: SntpServerError = CodecError::InvalidLength { length: 1 }.into();
        assert!(matches!(srv_err, SntpServerError::Protocol(_)));

        let srv_err: SntpServerError = ConfigError::Other("test".to_string()).into();
        assert!(matches!(srv_err, SntpServerError::Config(_)));
    }

    #[test]
    fn test_server_error_source() {
        let srv_err = SntpServerError::Config(ConfigError::Other("x".to_string()));
        assert!(std::error::Error::source(&srv_err).is_some());
    }
}
