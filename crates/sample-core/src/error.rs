//! Error handling for the sample specification library
//!
//! Every error in this module is a caller contract violation: an unknown
//! item selector, a channel count past the supported maximum, a policy index
//! outside the channel range, or a conversion whose result cannot be
//! represented. Recoverable conditions (null frame size, null sample rate,
//! mismatching channel policy) never surface here; they are logged and
//! resolved with a sentinel value instead.

use std::fmt;
use thiserror::Error;

/// Result type alias for sample specification operations
pub type Result<T> = std::result::Result<T, SampleSpecError>;

/// Contract violations raised by [`SampleSpec`](crate::SampleSpec)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleSpecError {
    /// Raw item selector does not name a sample specification item
    #[error("Invalid sample specification item: {item}")]
    InvalidItem {
        /// The unrecognized selector
        item: u32,
    },

    /// Channel count at or above the supported maximum
    #[error("Max channel number reached: {requested} (max {max})")]
    MaxChannelsReached {
        /// Requested channel count
        requested: u32,
        /// Exclusive upper bound
        max: u32,
    },

    /// Channel policy requested outside of the channel range
    #[error("Channel policy requested for channel {index} of {channels}")]
    ChannelIndexOutOfRange {
        /// Requested channel index
        index: usize,
        /// Number of channels carrying a policy
        channels: usize,
    },

    /// Conversion result exceeds the representable range
    #[error("Conversion exceeds limit: {operation}({value})")]
    ConversionOverflow {
        /// Name of the conversion
        operation: &'static str,
        /// Input that triggered the overflow
        value: u64,
    },
}

impl SampleSpecError {
    /// Create a new conversion overflow error
    pub fn conversion_overflow(operation: &'static str, value: impl Into<u64>) -> Self {
        Self::ConversionOverflow {
            operation,
            value: value.into(),
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidItem { .. }
            | Self::MaxChannelsReached { .. }
            | Self::ChannelIndexOutOfRange { .. } => ErrorCategory::ContractViolation,
            Self::ConversionOverflow { .. } => ErrorCategory::Overflow,
        }
    }
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Argument outside the documented domain
    ContractViolation,
    /// Arithmetic result not representable
    Overflow,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractViolation => write!(f, "Contract violation"),
            Self::Overflow => write!(f, "Overflow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            SampleSpecError::InvalidItem { item: 7 }.category(),
            ErrorCategory::ContractViolation
        );
        assert_eq!(
            SampleSpecError::conversion_overflow("frames_to_bytes", 42u64).category(),
            ErrorCategory::Overflow
        );
    }

    #[test]
    fn test_only_overflow_leaves_contract_category() {
        let contract = [
            SampleSpecError::InvalidItem { item: 3 },
            SampleSpecError::MaxChannelsReached { requested: 32, max: 32 },
            SampleSpecError::ChannelIndexOutOfRange { index: 2, channels: 2 },
        ];
        for err in &contract {
            assert_eq!(err.category(), ErrorCategory::ContractViolation, "{err}");
        }
        assert_eq!(
            SampleSpecError::conversion_overflow("frames_to_usec", 1u64).category(),
            ErrorCategory::Overflow
        );
    }

    #[test]
    fn test_error_display() {
        let err = SampleSpecError::MaxChannelsReached { requested: 40, max: 32 };
        let display = format!("{}", err);
        assert!(display.contains("40"));
        assert!(display.contains("max 32"));
    }
}
