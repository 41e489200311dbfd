//! Sample specification of a PCM stream
//!
//! A [`SampleSpec`] describes the geometry of a PCM stream: how many channels
//! it carries, how each sample is encoded, how many frames are played per
//! second and how each channel is treated when the stream is remixed. It also
//! provides the conversions between byte counts, frame counts and durations
//! that the stream routes rely on to size their buffers.
//!
//! Two kinds of failures are distinguished:
//!
//! - requests outside the documented domain (unknown item, too many
//!   channels, policy index out of range, overflowing conversion) return a
//!   [`SampleSpecError`];
//! - a null frame size or a null sample rate is a valid state: conversions
//!   log an error and return `0`.

use crate::channel::{ChannelMask, ChannelsPolicy};
use crate::error::{Result, SampleSpecError};
use crate::format::SampleFormat;
use std::fmt;
use tracing::{debug, error, warn};

/// Exclusive upper bound of the channel count
pub const MAX_CHANNELS: u32 = 32;

/// Number of microseconds in one second
pub const USEC_PER_SEC: u64 = 1_000_000;

/// Items of a sample specification reachable through the generic accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleSpecItem {
    /// Number of channels
    ChannelCount,
    /// Sample format code
    Format,
    /// Sample rate in Hz
    Rate,
}

impl SampleSpecItem {
    /// All items, in selector order
    pub const ALL: [Self; 3] = [Self::ChannelCount, Self::Format, Self::Rate];
}

impl TryFrom<u32> for SampleSpecItem {
    type Error = SampleSpecError;

    fn try_from(selector: u32) -> Result<Self> {
        match selector {
            0 => Ok(Self::ChannelCount),
            1 => Ok(Self::Format),
            2 => Ok(Self::Rate),
            item => Err(SampleSpecError::InvalidItem { item }),
        }
    }
}

/// Geometry of a PCM stream
///
/// The channel policy always holds exactly one entry per channel: changing
/// the channel count resets it to [`ChannelsPolicy::Copy`] for every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSpec {
    channel_count: u32,
    format: SampleFormat,
    sample_rate: u32,
    channels_policy: Vec<ChannelsPolicy>,
    channel_mask: ChannelMask,
}

impl Default for SampleSpec {
    /// Stereo, 16-bit PCM at 48 kHz
    fn default() -> Self {
        Self {
            channel_count: 2,
            format: SampleFormat::Pcm16Bit,
            sample_rate: 48000,
            channels_policy: vec![ChannelsPolicy::Copy; 2],
            channel_mask: ChannelMask::NONE,
        }
    }
}

impl SampleSpec {
    /// Create a new sample specification
    ///
    /// An empty `channels_policy` selects the default policy. A non-empty one
    /// is installed through [`set_channels_policy`](Self::set_channels_policy)
    /// and is therefore ignored if its length does not match `channel_count`.
    ///
    /// # Errors
    ///
    /// Returns [`SampleSpecError::MaxChannelsReached`] if `channel_count` is
    /// not below [`MAX_CHANNELS`].
    pub fn new(
        channel_count: u32,
        format: SampleFormat,
        sample_rate: u32,
        channels_policy: Vec<ChannelsPolicy>,
    ) -> Result<Self> {
        let mut spec = Self {
            channel_count: 0,
            format,
            sample_rate,
            channels_policy: Vec::new(),
            channel_mask: ChannelMask::NONE,
        };
        spec.set_channel_count(channel_count)?;
        if !channels_policy.is_empty() {
            spec.set_channels_policy(channels_policy);
        }
        Ok(spec)
    }

    /// Set one item from its raw value
    ///
    /// Setting the channel count resets the channel policy.
    ///
    /// # Errors
    ///
    /// Returns [`SampleSpecError::MaxChannelsReached`] if a channel count is
    /// not below [`MAX_CHANNELS`].
    pub fn set_sample_spec_item(&mut self, item: SampleSpecItem, value: u32) -> Result<()> {
        match item {
            SampleSpecItem::ChannelCount => {
                if value >= MAX_CHANNELS {
                    return Err(SampleSpecError::MaxChannelsReached {
                        requested: value,
                        max: MAX_CHANNELS,
                    });
                }
                self.channels_policy = vec![ChannelsPolicy::Copy; value as usize];
                self.channel_count = value;
            }
            SampleSpecItem::Format => self.format = SampleFormat::from(value),
            SampleSpecItem::Rate => self.sample_rate = value,
        }
        Ok(())
    }

    /// Raw value of one item
    pub fn sample_spec_item(&self, item: SampleSpecItem) -> u32 {
        match item {
            SampleSpecItem::ChannelCount => self.channel_count,
            SampleSpecItem::Format => self.format.code(),
            SampleSpecItem::Rate => self.sample_rate,
        }
    }

    /// Number of channels
    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// Set the number of channels, resetting the channel policy
    pub fn set_channel_count(&mut self, channel_count: u32) -> Result<()> {
        self.set_sample_spec_item(SampleSpecItem::ChannelCount, channel_count)
    }

    /// Sample format
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Set the sample format
    pub fn set_format(&mut self, format: SampleFormat) {
        self.format = format;
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set the sample rate in Hz
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    /// Channel mask, only used for diagnostics
    pub fn channel_mask(&self) -> ChannelMask {
        self.channel_mask
    }

    /// Set the channel mask
    pub fn set_channel_mask(&mut self, channel_mask: ChannelMask) {
        self.channel_mask = channel_mask;
    }

    /// Replace the channel policy
    ///
    /// The policy must hold one entry per channel. Otherwise the request is
    /// dropped with a warning, the current policy is kept and `false` is
    /// returned.
    pub fn set_channels_policy(&mut self, channels_policy: Vec<ChannelsPolicy>) -> bool {
        if channels_policy.len() != self.channel_count as usize {
            warn!(
                "set_channels_policy: Cannot set requested channel policy ({} for {} channels)",
                channels_policy.len(),
                self.channel_count
            );
            return false;
        }
        self.channels_policy = channels_policy;
        true
    }

    /// Policy of one channel
    ///
    /// # Errors
    ///
    /// Returns [`SampleSpecError::ChannelIndexOutOfRange`] if `channel_index`
    /// is not a channel of this specification.
    pub fn channel_policy(&self, channel_index: usize) -> Result<ChannelsPolicy> {
        self.channels_policy
            .get(channel_index)
            .copied()
            .ok_or(SampleSpecError::ChannelIndexOutOfRange {
                index: channel_index,
                channels: self.channels_policy.len(),
            })
    }

    /// Policy of every channel, in channel order
    pub fn channels_policy(&self) -> &[ChannelsPolicy] {
        &self.channels_policy
    }

    /// Size in bytes of one frame
    ///
    /// Zero when the stream has no channel or the format has no fixed width.
    pub fn frame_size(&self) -> usize {
        self.format.bytes_per_sample() * self.channel_count as usize
    }

    /// Number of whole frames held in `bytes`
    ///
    /// Returns 0 and logs an error if the frame size is null.
    pub fn bytes_to_frames(&self, bytes: usize) -> usize {
        let frame_size = self.frame_size();
        if frame_size == 0 {
            error!("bytes_to_frames: Null frame size");
            return 0;
        }
        bytes / frame_size
    }

    /// Number of bytes held in `frames`
    ///
    /// Returns 0 and logs an error if the frame size is null.
    ///
    /// # Errors
    ///
    /// Returns [`SampleSpecError::ConversionOverflow`] if the byte count does
    /// not fit in a `usize`.
    pub fn frames_to_bytes(&self, frames: usize) -> Result<usize> {
        let frame_size = self.frame_size();
        if frame_size == 0 {
            error!("frames_to_bytes: Null frame size");
            return Ok(0);
        }
        if frames > usize::MAX / frame_size {
            return Err(SampleSpecError::conversion_overflow("frames_to_bytes", frames as u64));
        }
        Ok(frames * frame_size)
    }

    /// Duration of `frames` in microseconds, rounded down
    ///
    /// Returns 0 and logs an error if the sample rate is null.
    ///
    /// # Errors
    ///
    /// Returns [`SampleSpecError::ConversionOverflow`] if the duration does
    /// not fit in a `u64`.
    pub fn frames_to_usec(&self, frames: u64) -> Result<u64> {
        if self.sample_rate == 0 {
            error!("frames_to_usec: Null sample rate");
            return Ok(0);
        }
        let rate = u64::from(self.sample_rate);
        if frames / rate > u64::MAX / USEC_PER_SEC {
            return Err(SampleSpecError::conversion_overflow("frames_to_usec", frames));
        }
        let usec = u128::from(USEC_PER_SEC) * u128::from(frames) / u128::from(rate);
        u64::try_from(usec)
            .map_err(|_| SampleSpecError::conversion_overflow("frames_to_usec", frames))
    }

    /// Number of frames played in `interval_usec`, rounded down
    ///
    /// # Errors
    ///
    /// Returns [`SampleSpecError::ConversionOverflow`] if the frame count does
    /// not fit in a `u64`.
    pub fn usec_to_frames(&self, interval_usec: u64) -> Result<u64> {
        let frames =
            u128::from(interval_usec) * u128::from(self.sample_rate) / u128::from(USEC_PER_SEC);
        u64::try_from(frames)
            .map_err(|_| SampleSpecError::conversion_overflow("usec_to_frames", interval_usec))
    }

    /// Compare one item of two specifications
    ///
    /// Channel counts are only equal if both specifications also share the
    /// same policy for every channel.
    pub fn items_equal(item: SampleSpecItem, a: &SampleSpec, b: &SampleSpec) -> bool {
        if a.sample_spec_item(item) != b.sample_spec_item(item) {
            return false;
        }
        let equal = item != SampleSpecItem::ChannelCount || a.channels_policy == b.channels_policy;
        if !equal {
            debug!("items_equal: same channel count, different channel policy");
        }
        equal
    }
}

impl fmt::Display for SampleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ch {} @ {}Hz",
            self.channel_count, self.format, self.sample_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn stereo_16bit() -> SampleSpec {
        SampleSpec::new(2, SampleFormat::Pcm16Bit, 48000, Vec::new()).unwrap()
    }

    #[test]
    fn test_new_fills_default_policy() {
        let spec = stereo_16bit();
        assert_eq!(spec.channels_policy(), &[ChannelsPolicy::Copy, ChannelsPolicy::Copy]);
        assert_eq!(spec.channel_mask(), ChannelMask::NONE);
    }

    #[test]
    fn test_new_installs_policy() {
        let spec = SampleSpec::new(
            2,
            SampleFormat::Pcm16Bit,
            48000,
            vec![ChannelsPolicy::Ignore, ChannelsPolicy::Average],
        )
        .unwrap();
        assert_eq!(spec.channel_policy(0).unwrap(), ChannelsPolicy::Ignore);
        assert_eq!(spec.channel_policy(1).unwrap(), ChannelsPolicy::Average);
    }

    #[test]
    fn test_new_rejects_too_many_channels() {
        let err = SampleSpec::new(MAX_CHANNELS, SampleFormat::Pcm16Bit, 48000, Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            SampleSpecError::MaxChannelsReached { requested: MAX_CHANNELS, max: MAX_CHANNELS }
        );
        let widest = SampleSpec::new(MAX_CHANNELS - 1, SampleFormat::Pcm16Bit, 48000, Vec::new());
        assert!(widest.is_ok());
    }

    #[test]
    fn test_item_selector() {
        assert_eq!(SampleSpecItem::try_from(0).unwrap(), SampleSpecItem::ChannelCount);
        assert_eq!(SampleSpecItem::try_from(2).unwrap(), SampleSpecItem::Rate);
        assert_eq!(
            SampleSpecItem::try_from(3),
            Err(SampleSpecError::InvalidItem { item: 3 })
        );
    }

    #[test]
    fn test_generic_accessors() {
        let mut spec = stereo_16bit();
        spec.set_sample_spec_item(SampleSpecItem::Rate, 44100).unwrap();
        spec.set_sample_spec_item(SampleSpecItem::Format, 0x5).unwrap();
        assert_eq!(spec.sample_rate(), 44100);
        assert_eq!(spec.format(), SampleFormat::PcmFloat);
        assert_eq!(spec.sample_spec_item(SampleSpecItem::Format), 0x5);
        assert_eq!(spec.sample_spec_item(SampleSpecItem::ChannelCount), 2);
    }

    #[test]
    fn test_rejected_channel_count_keeps_state() {
        let mut spec = stereo_16bit();
        spec.set_channels_policy(vec![ChannelsPolicy::Ignore, ChannelsPolicy::Copy]);
        assert!(spec.set_channel_count(64).is_err());
        assert_eq!(spec.channel_count(), 2);
        assert_eq!(spec.channel_policy(0).unwrap(), ChannelsPolicy::Ignore);
    }

    #[test]
    #[traced_test]
    fn test_policy_mismatch_is_logged() {
        let mut spec = stereo_16bit();
        assert!(!spec.set_channels_policy(vec![ChannelsPolicy::Average]));
        assert!(logs_contain("Cannot set requested channel policy"));
        assert_eq!(spec.channels_policy().len(), 2);
    }

    #[test]
    fn test_policy_index_out_of_range() {
        let spec = stereo_16bit();
        assert_eq!(
            spec.channel_policy(2),
            Err(SampleSpecError::ChannelIndexOutOfRange { index: 2, channels: 2 })
        );
    }

    #[test]
    #[traced_test]
    fn test_null_frame_size_is_logged() {
        let spec = SampleSpec::new(0, SampleFormat::Pcm16Bit, 48000, Vec::new()).unwrap();
        assert_eq!(spec.bytes_to_frames(128), 0);
        assert!(logs_contain("bytes_to_frames: Null frame size"));
        assert_eq!(spec.frames_to_bytes(128).unwrap(), 0);
        assert!(logs_contain("frames_to_bytes: Null frame size"));
    }

    #[test]
    #[traced_test]
    fn test_null_rate_is_logged() {
        let spec = SampleSpec::new(2, SampleFormat::Pcm16Bit, 0, Vec::new()).unwrap();
        assert_eq!(spec.frames_to_usec(480).unwrap(), 0);
        assert!(logs_contain("frames_to_usec: Null sample rate"));
        assert_eq!(spec.usec_to_frames(10_000).unwrap(), 0);
    }

    #[test]
    fn test_frames_to_usec_guard_runs_before_multiply() {
        let spec = SampleSpec::new(1, SampleFormat::Pcm16Bit, 1, Vec::new()).unwrap();
        let limit = u64::MAX / USEC_PER_SEC;
        assert!(spec.frames_to_usec(limit).is_ok());
        assert!(matches!(
            spec.frames_to_usec(limit + 1),
            Err(SampleSpecError::ConversionOverflow { operation: "frames_to_usec", .. })
        ));
    }

    #[test]
    fn test_usec_to_frames_overflow() {
        let spec = SampleSpec::new(1, SampleFormat::Pcm16Bit, u32::MAX, Vec::new()).unwrap();
        assert!(spec.usec_to_frames(u64::MAX).is_err());
        assert_eq!(spec.usec_to_frames(USEC_PER_SEC).unwrap(), u64::from(u32::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(stereo_16bit().to_string(), "2ch AUDIO_FORMAT_PCM_16_BIT @ 48000Hz");
    }

    #[test]
    fn test_default() {
        let spec = SampleSpec::default();
        assert_eq!(spec, stereo_16bit());
        assert_eq!(spec.frame_size(), 4);
    }
}
