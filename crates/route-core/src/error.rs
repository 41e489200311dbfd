//! Error types for stream route configuration

use halaudio_sample_core::{SampleSpecError, UnknownChannelsPolicy};
use thiserror::Error;

/// Result type alias for route operations
pub type Result<T> = std::result::Result<T, RouteError>;

/// Error type for stream route operations
#[derive(Error, Debug)]
pub enum RouteError {
    /// Channel policy string holds an unknown tag
    #[error("Invalid channel policy: {tag:?}")]
    InvalidChannelPolicy {
        /// The unrecognized tag
        tag: String,
    },

    /// Route mapping is incomplete or malformed
    #[error("Invalid route mapping: {details}")]
    InvalidMapping {
        /// What is wrong with the mapping
        details: String,
    },

    /// Route configuration cannot describe a stream
    #[error("Sample specification error: {0}")]
    SampleSpec(#[from] SampleSpecError),

    /// Route configuration cannot be deserialized
    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Route manager refused the request
    #[error("Route manager rejected {route}: {reason}")]
    Rejected {
        /// Route the request was made for
        route: String,
        /// Request that was refused
        reason: String,
    },

    /// Logging setup failed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl RouteError {
    /// Create a new invalid mapping error
    pub fn invalid_mapping(details: impl Into<String>) -> Self {
        Self::InvalidMapping {
            details: details.into(),
        }
    }

    /// Create a new rejection error
    pub fn rejected(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            route: route.into(),
            reason: reason.into(),
        }
    }

    /// A rejected update can be retried once the route manager is ready;
    /// anything else needs a configuration fix.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<UnknownChannelsPolicy> for RouteError {
    fn from(error: UnknownChannelsPolicy) -> Self {
        Self::InvalidChannelPolicy { tag: error.0 }
    }
}
