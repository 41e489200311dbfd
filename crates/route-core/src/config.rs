//! Stream route configuration
//!
//! The configuration of a stream route as handed over by the platform
//! description: PCM geometry, period layout, thresholds and the effects the
//! route supports. List-valued settings (channel policy, effects) are carried
//! as comma-separated strings and parsed on demand.

use crate::error::{Result, RouteError};
use halaudio_sample_core::{ChannelsPolicy, SampleFormat, SampleSpec};
use serde::{Deserialize, Serialize};

/// Delimiter of list-valued configuration strings
pub const LIST_DELIMITER: char = ',';

/// Configuration of one stream route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamRouteConfig {
    /// Route must be enabled before the stream starts
    pub require_pre_enable: bool,
    /// Route must be disabled after the stream stops
    pub require_post_disable: bool,
    /// Silence played when the device is opened, in milliseconds
    pub silence_prolog_ms: u32,
    /// Number of PCM channels
    pub channel: u32,
    /// Comma-separated channel policy, e.g. `"copy,ignore"`
    pub channels_policy: String,
    /// PCM sample rate in Hz
    pub rate: u32,
    /// Raw PCM format code
    pub format: u32,
    /// Period size in frames
    pub period_size: u32,
    /// Number of periods in the ring buffer
    pub period_count: u32,
    /// Start threshold in frames
    pub start_threshold: u32,
    /// Stop threshold in frames
    pub stop_threshold: u32,
    /// Silence threshold in frames
    pub silence_threshold: u32,
    /// Minimum available frames before waking up the stream
    pub avail_min: u32,
    /// Input sources or output flags the route applies to
    pub applicability_mask: u32,
    /// Comma-separated effects supported by the route
    pub effects_supported: String,
}

impl Default for StreamRouteConfig {
    fn default() -> Self {
        Self {
            require_pre_enable: false,
            require_post_disable: false,
            silence_prolog_ms: 0,
            channel: 2,
            channels_policy: String::new(),
            rate: 48000,
            format: SampleFormat::Pcm16Bit.code(),
            period_size: 0,
            period_count: 0,
            start_threshold: 0,
            stop_threshold: 0,
            silence_threshold: 0,
            avail_min: 0,
            applicability_mask: 0,
            effects_supported: String::new(),
        }
    }
}

impl StreamRouteConfig {
    /// Load a configuration from JSON; missing fields take their default
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parsed channel policy
    pub fn channels_policy(&self) -> Result<Vec<ChannelsPolicy>> {
        parse_channel_policy_list(&self.channels_policy)
    }

    /// Parsed list of supported effects
    pub fn effects(&self) -> Vec<String> {
        parse_effects(&self.effects_supported)
    }

    /// Sample specification described by this configuration
    ///
    /// A channel policy whose length differs from the channel count is
    /// dropped with a warning in favor of the default policy.
    pub fn sample_spec(&self) -> Result<SampleSpec> {
        let policy = self.channels_policy()?;
        Ok(SampleSpec::new(
            self.channel,
            SampleFormat::from(self.format),
            self.rate,
            policy,
        )?)
    }
}

/// Parse a comma-separated list of channel policy tags
///
/// Blank entries around delimiters are trimmed; an empty string yields an
/// empty list.
pub fn parse_channel_policy_list(channels_policy: &str) -> Result<Vec<ChannelsPolicy>> {
    if channels_policy.trim().is_empty() {
        return Ok(Vec::new());
    }
    channels_policy
        .split(LIST_DELIMITER)
        .map(|tag| tag.trim().parse::<ChannelsPolicy>().map_err(RouteError::from))
        .collect()
}

/// Parse a comma-separated list of effect names, dropping empty entries
pub fn parse_effects(effects: &str) -> Vec<String> {
    effects
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|effect| !effect.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_policy_list() {
        assert_eq!(
            parse_channel_policy_list("copy, ignore,average").unwrap(),
            vec![ChannelsPolicy::Copy, ChannelsPolicy::Ignore, ChannelsPolicy::Average]
        );
        assert!(parse_channel_policy_list("").unwrap().is_empty());
        assert!(parse_channel_policy_list("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_channel_policy_list_rejects_unknown_tag() {
        let err = parse_channel_policy_list("copy,mute").unwrap_err();
        assert!(matches!(err, RouteError::InvalidChannelPolicy { ref tag } if tag == "mute"));

        let err = parse_channel_policy_list("copy,,ignore").unwrap_err();
        assert!(matches!(err, RouteError::InvalidChannelPolicy { ref tag } if tag.is_empty()));
    }

    #[test]
    fn test_parse_effects() {
        assert_eq!(parse_effects("aec, ns,,agc "), vec!["aec", "ns", "agc"]);
        assert!(parse_effects("").is_empty());
    }

    #[test]
    fn test_from_json_partial() {
        let config = StreamRouteConfig::from_json(
            r#"{ "channel": 1, "rate": 16000, "channels_policy": "average", "period_size": 320 }"#,
        )
        .unwrap();
        assert_eq!(config.channel, 1);
        assert_eq!(config.rate, 16000);
        assert_eq!(config.period_size, 320);
        assert_eq!(config.format, SampleFormat::Pcm16Bit.code());
        assert!(!config.require_pre_enable);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            StreamRouteConfig::from_json("{ \"channel\": \"two\" }"),
            Err(RouteError::Json(_))
        ));
    }

    #[test]
    fn test_sample_spec_from_config() {
        let config = StreamRouteConfig {
            channels_policy: "copy,ignore".to_string(),
            ..Default::default()
        };
        let spec = config.sample_spec().unwrap();
        assert_eq!(spec.channel_count(), 2);
        assert_eq!(spec.format(), SampleFormat::Pcm16Bit);
        assert_eq!(spec.channels_policy(), &[ChannelsPolicy::Copy, ChannelsPolicy::Ignore]);
    }

    #[test]
    fn test_sample_spec_falls_back_to_default_policy() {
        let config = StreamRouteConfig {
            channel: 4,
            channels_policy: "copy,ignore".to_string(),
            ..Default::default()
        };
        let spec = config.sample_spec().unwrap();
        assert_eq!(spec.channels_policy(), &[ChannelsPolicy::Copy; 4]);
    }

    #[test]
    fn test_sample_spec_rejects_channel_count() {
        let config = StreamRouteConfig {
            channel: 64,
            ..Default::default()
        };
        assert!(matches!(config.sample_spec(), Err(RouteError::SampleSpec(_))));
    }
}
