//! Error types shared by the distance functions and the column layer.

use std::str::Utf8Error;
use thiserror::Error;

/// Which input column a row-level error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Errors raised at the API boundary.
///
/// Distance computation itself never fails; these cover parameter
/// validation, malformed input bytes and column shape problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A caller-supplied parameter is outside its accepted range
    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Input bytes are not a valid UTF-8 sequence
    #[error("Row {row} of the {side} column is not valid UTF-8: {source}")]
    Encoding {
        row: usize,
        side: Side,
        #[source]
        source: Utf8Error,
    },

    /// Columns cannot be aligned element-wise
    #[error(
        "Inputs must have the same length, or one of them must be a literal: got {left} and {right}"
    )]
    LengthMismatch { left: usize, right: usize },

    /// A dedicated worker pool could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = Error::invalid("weighted_geometric_ratio", 1.5, "must be in [0.0, 1.0]");
        let msg = err.to_string();
        assert!(msg.contains("weighted_geometric_ratio"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_length_mismatch_message() {
        let err = Error::LengthMismatch { left: 3, right: 5 };
        assert!(err.to_string().contains("3 and 5"));
    }

    #[test]
    fn test_encoding_message_names_side() {
        let bytes = [0x66u8, 0xff];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        let err = Error::Encoding {
            row: 7,
            side: Side::Right,
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 7"));
        assert!(msg.contains("right"));
    }
}
