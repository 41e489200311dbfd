//! Per-channel policies and channel masks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a channel's content is derived when mixing or down-mixing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelsPolicy {
    /// Take the channel verbatim
    #[default]
    Copy,
    /// Silence the channel
    Ignore,
    /// Average the channel with the other averaged channels
    Average,
}

impl ChannelsPolicy {
    /// Tag used in route configuration strings
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Ignore => "ignore",
            Self::Average => "average",
        }
    }
}

impl fmt::Display for ChannelsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag that does not name a [`ChannelsPolicy`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown channel policy: {0:?}")]
pub struct UnknownChannelsPolicy(pub String);

impl FromStr for ChannelsPolicy {
    type Err = UnknownChannelsPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(Self::Copy),
            "ignore" => Ok(Self::Ignore),
            "average" => Ok(Self::Average),
            other => Err(UnknownChannelsPolicy(other.to_string())),
        }
    }
}

/// Direction of the stream a mask belongs to
///
/// Output and input masks share bit values with different meanings, so a
/// mask can only be rendered once its direction is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamDirection {
    /// Playback
    Output,
    /// Capture
    Input,
}

impl StreamDirection {
    /// Whether this is the playback direction
    pub const fn is_output(self) -> bool {
        matches!(self, Self::Output)
    }
}

const OUTPUT_NAMED_MASKS: &[(u32, &str)] = &[
    (0x1, "AUDIO_CHANNEL_OUT_MONO"),
    (0x3, "AUDIO_CHANNEL_OUT_STEREO"),
    (0x33, "AUDIO_CHANNEL_OUT_QUAD"),
    (0x3F, "AUDIO_CHANNEL_OUT_5POINT1"),
    (0x63F, "AUDIO_CHANNEL_OUT_7POINT1"),
];

const OUTPUT_POSITIONS: &[(u32, &str)] = &[
    (0x1, "AUDIO_CHANNEL_OUT_FRONT_LEFT"),
    (0x2, "AUDIO_CHANNEL_OUT_FRONT_RIGHT"),
    (0x4, "AUDIO_CHANNEL_OUT_FRONT_CENTER"),
    (0x8, "AUDIO_CHANNEL_OUT_LOW_FREQUENCY"),
    (0x10, "AUDIO_CHANNEL_OUT_BACK_LEFT"),
    (0x20, "AUDIO_CHANNEL_OUT_BACK_RIGHT"),
    (0x40, "AUDIO_CHANNEL_OUT_FRONT_LEFT_OF_CENTER"),
    (0x80, "AUDIO_CHANNEL_OUT_FRONT_RIGHT_OF_CENTER"),
    (0x100, "AUDIO_CHANNEL_OUT_BACK_CENTER"),
    (0x200, "AUDIO_CHANNEL_OUT_SIDE_LEFT"),
    (0x400, "AUDIO_CHANNEL_OUT_SIDE_RIGHT"),
    (0x800, "AUDIO_CHANNEL_OUT_TOP_CENTER"),
];

const INPUT_NAMED_MASKS: &[(u32, &str)] = &[
    (0x10, "AUDIO_CHANNEL_IN_MONO"),
    (0xC, "AUDIO_CHANNEL_IN_STEREO"),
];

const INPUT_POSITIONS: &[(u32, &str)] = &[
    (0x4, "AUDIO_CHANNEL_IN_LEFT"),
    (0x8, "AUDIO_CHANNEL_IN_RIGHT"),
    (0x10, "AUDIO_CHANNEL_IN_FRONT"),
    (0x20, "AUDIO_CHANNEL_IN_BACK"),
    (0x40, "AUDIO_CHANNEL_IN_LEFT_PROCESSED"),
    (0x80, "AUDIO_CHANNEL_IN_RIGHT_PROCESSED"),
    (0x100, "AUDIO_CHANNEL_IN_FRONT_PROCESSED"),
    (0x200, "AUDIO_CHANNEL_IN_BACK_PROCESSED"),
    (0x400, "AUDIO_CHANNEL_IN_PRESSURE"),
    (0x800, "AUDIO_CHANNEL_IN_X_AXIS"),
    (0x1000, "AUDIO_CHANNEL_IN_Y_AXIS"),
    (0x2000, "AUDIO_CHANNEL_IN_Z_AXIS"),
    (0x4000, "AUDIO_CHANNEL_IN_VOICE_UPLINK"),
    (0x8000, "AUDIO_CHANNEL_IN_VOICE_DNLINK"),
];

/// Channel position bitmask, `audio_channel_mask_t` in the HAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelMask(pub u32);

impl ChannelMask {
    /// Mask with no channel position
    pub const NONE: Self = Self(0);

    /// Raw bitmask
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Render the mask as a playback mask
    pub fn to_output_string(self) -> String {
        self.render(OUTPUT_NAMED_MASKS, OUTPUT_POSITIONS)
    }

    /// Render the mask as a capture mask
    pub fn to_input_string(self) -> String {
        self.render(INPUT_NAMED_MASKS, INPUT_POSITIONS)
    }

    /// Render the mask for the given direction
    pub fn to_direction_string(self, direction: StreamDirection) -> String {
        match direction {
            StreamDirection::Output => self.to_output_string(),
            StreamDirection::Input => self.to_input_string(),
        }
    }

    fn render(self, named: &[(u32, &str)], positions: &[(u32, &str)]) -> String {
        if self.0 == 0 {
            return "AUDIO_CHANNEL_NONE".to_string();
        }
        if let Some((_, name)) = named.iter().find(|(bits, _)| *bits == self.0) {
            return (*name).to_string();
        }

        let mut remaining = self.0;
        let mut parts = Vec::new();
        for (bit, name) in positions {
            if remaining & bit != 0 {
                parts.push((*name).to_string());
                remaining &= !bit;
            }
        }
        if remaining != 0 {
            parts.push(format!("0x{:x}", remaining));
        }
        parts.join("|")
    }
}

impl From<u32> for ChannelMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_tags() {
        for policy in [ChannelsPolicy::Copy, ChannelsPolicy::Ignore, ChannelsPolicy::Average] {
            assert_eq!(policy.as_str().parse::<ChannelsPolicy>().unwrap(), policy);
        }
        assert_eq!(
            "mute".parse::<ChannelsPolicy>(),
            Err(UnknownChannelsPolicy("mute".to_string()))
        );
    }

    #[test]
    fn test_named_masks() {
        assert_eq!(ChannelMask(0x3).to_output_string(), "AUDIO_CHANNEL_OUT_STEREO");
        assert_eq!(ChannelMask(0xC).to_input_string(), "AUDIO_CHANNEL_IN_STEREO");
        assert_eq!(ChannelMask::NONE.to_output_string(), "AUDIO_CHANNEL_NONE");
    }

    #[test]
    fn test_direction_changes_rendering() {
        let mask = ChannelMask(0x10);
        assert_eq!(
            mask.to_direction_string(StreamDirection::Output),
            "AUDIO_CHANNEL_OUT_BACK_LEFT"
        );
        assert_eq!(mask.to_direction_string(StreamDirection::Input), "AUDIO_CHANNEL_IN_MONO");
    }

    #[test]
    fn test_unnamed_mask_is_split_per_position() {
        assert_eq!(
            ChannelMask(0x5).to_output_string(),
            "AUDIO_CHANNEL_OUT_FRONT_LEFT|AUDIO_CHANNEL_OUT_FRONT_CENTER"
        );
        assert_eq!(
            ChannelMask(0x1_0004).to_input_string(),
            "AUDIO_CHANNEL_IN_LEFT|0x10000"
        );
    }
}
