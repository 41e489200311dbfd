//! # Sample-Core: PCM Stream Geometry for the Audio HAL
//!
//! This library describes the geometry of a PCM stream (channel count,
//! sample format, sample rate and per-channel mixing policy) and converts
//! between byte counts, frame counts and durations for that geometry. Stream
//! routes use it to size their periods and to decide whether two streams are
//! format-compatible.
//!
//! ## Usage
//!
//! ```rust
//! use halaudio_sample_core::{ChannelsPolicy, SampleFormat, SampleSpec, SampleSpecItem};
//!
//! let mut spec = SampleSpec::new(2, SampleFormat::Pcm16Bit, 48000, Vec::new())?;
//! assert_eq!(spec.frame_size(), 4);
//! assert_eq!(spec.frames_to_bytes(480)?, 1920);
//! assert_eq!(spec.frames_to_usec(480)?, 10_000);
//!
//! // Changing the channel count resets the channel policy
//! spec.set_channels_policy(vec![ChannelsPolicy::Ignore, ChannelsPolicy::Average]);
//! spec.set_sample_spec_item(SampleSpecItem::ChannelCount, 4)?;
//! assert_eq!(spec.channels_policy(), &[ChannelsPolicy::Copy; 4]);
//! # Ok::<(), halaudio_sample_core::SampleSpecError>(())
//! ```
//!
//! ## Threading
//!
//! [`SampleSpec`] is a plain value without interior synchronization. Routes
//! own one instance per stream; callers that share one across threads wrap it
//! themselves.

#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod channel;
pub mod dump;
pub mod error;
pub mod format;
pub mod spec;

// Re-export commonly used types
pub use channel::{ChannelMask, ChannelsPolicy, StreamDirection, UnknownChannelsPolicy};
pub use error::{ErrorCategory, Result, SampleSpecError};
pub use format::{SampleFormat, UnknownFormat};
pub use spec::{SampleSpec, SampleSpecItem, MAX_CHANNELS, USEC_PER_SEC};

/// Version information for the sample specification library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
