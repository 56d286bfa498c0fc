//! Error types for OxiLHA header operations.
//!
//! Every variant here is fatal for the header being processed: no field of a
//! partially decoded header is returned. Checksum and header-CRC mismatches are
//! not errors; they are reported as validation results on the decoded
//! header instead.

use thiserror::Error;

/// The main error type for OxiLHA operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LhaError {
    /// A read went past the end of the available bytes.
    #[error("Truncated header at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        /// Offset of the read within the buffer being consumed.
        offset: usize,
        /// Number of bytes requested.
        needed: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// A declared header or record size exceeds the scratch capacity.
    #[error("Header too large: {size} bytes exceeds scratch capacity of {capacity}")]
    HeaderTooLarge {
        /// Declared size in bytes.
        size: usize,
        /// Scratch capacity in bytes.
        capacity: usize,
    },

    /// The header level byte is not one of 0, 1, 2 or 3.
    #[error("Unknown header level: {0}")]
    UnknownLevel(u8),

    /// The header level cannot be encoded.
    #[error("Unsupported header level for encoding: {0}")]
    UnsupportedLevel(u8),

    /// A level 0 header whose extension remainder is negative.
    #[error("Malformed level 0 extension remainder: {0}")]
    MalformedRemainder(i64),

    /// Sizes inside the header contradict each other.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },
}

/// Result type alias for OxiLHA operations.
pub type Result<T> = std::result::Result<T, LhaError>;

impl LhaError {
    /// Create a truncated source error.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Create a header too large error.
    pub fn header_too_large(size: usize, capacity: usize) -> Self {
        Self::HeaderTooLarge { size, capacity }
    }

    /// Create an unknown level error.
    pub fn unknown_level(level: u8) -> Self {
        Self::UnknownLevel(level)
    }

    /// Create an unsupported encode level error.
    pub fn unsupported_level(level: u8) -> Self {
        Self::UnsupportedLevel(level)
    }

    /// Create a malformed level 0 remainder error.
    pub fn malformed_remainder(remainder: i64) -> Self {
        Self::MalformedRemainder(remainder)
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LhaError::truncated(21, 4, 1);
        assert!(err.to_string().contains("offset 21"));

        let err = LhaError::unknown_level(7);
        assert_eq!(err.to_string(), "Unknown header level: 7");

        let err = LhaError::header_too_large(5000, 4096);
        assert!(err.to_string().contains("4096"));

        let err = LhaError::malformed_remainder(-5);
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn test_invalid_header_message() {
        let err = LhaError::invalid_header("record shorter than framing");
        assert!(matches!(err, LhaError::InvalidHeader { .. }));
        assert!(err.to_string().contains("record shorter"));
    }
}
