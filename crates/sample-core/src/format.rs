//! Sample format codes
//!
//! Formats are carried as the raw `audio_format_t` code used by the audio
//! HAL. Only the linear PCM encodings have a known sample width; any other
//! code is kept verbatim and reports a width of zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding of a single channel's sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum SampleFormat {
    /// Unspecified format, resolved by the HAL
    Default,
    /// Signed 16-bit PCM
    Pcm16Bit,
    /// Unsigned 8-bit PCM
    Pcm8Bit,
    /// Signed 32-bit PCM
    Pcm32Bit,
    /// 8.24 fixed point, stored in 32 bits
    Pcm8_24Bit,
    /// 32-bit IEEE float
    PcmFloat,
    /// Signed 24-bit PCM packed in 3 bytes
    Pcm24BitPacked,
    /// Any other format code, kept verbatim
    Other(UnknownFormat),
}

/// Format code without a dedicated [`SampleFormat`] variant
///
/// Only [`SampleFormat::from`] builds one, so a known code always maps to
/// its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownFormat(u32);

impl UnknownFormat {
    /// Raw `audio_format_t` code
    pub const fn code(self) -> u32 {
        self.0
    }
}

impl SampleFormat {
    /// Size in bytes of one sample of one channel
    ///
    /// Returns 0 for formats without a fixed linear PCM width.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::Pcm24BitPacked => 3,
            Self::Pcm32Bit | Self::Pcm8_24Bit | Self::PcmFloat => 4,
            Self::Pcm16Bit => 2,
            Self::Pcm8Bit => 1,
            Self::Default | Self::Other(_) => 0,
        }
    }

    /// Raw `audio_format_t` code
    pub const fn code(self) -> u32 {
        match self {
            Self::Default => 0x0,
            Self::Pcm16Bit => 0x1,
            Self::Pcm8Bit => 0x2,
            Self::Pcm32Bit => 0x3,
            Self::Pcm8_24Bit => 0x4,
            Self::PcmFloat => 0x5,
            Self::Pcm24BitPacked => 0x6,
            Self::Other(unknown) => unknown.code(),
        }
    }

    /// Literal name of the format
    pub fn name(self) -> String {
        let name = match self {
            Self::Default => "AUDIO_FORMAT_DEFAULT",
            Self::Pcm16Bit => "AUDIO_FORMAT_PCM_16_BIT",
            Self::Pcm8Bit => "AUDIO_FORMAT_PCM_8_BIT",
            Self::Pcm32Bit => "AUDIO_FORMAT_PCM_32_BIT",
            Self::Pcm8_24Bit => "AUDIO_FORMAT_PCM_8_24_BIT",
            Self::PcmFloat => "AUDIO_FORMAT_PCM_FLOAT",
            Self::Pcm24BitPacked => "AUDIO_FORMAT_PCM_24_BIT_PACKED",
            Self::Other(unknown) => {
                return format!("AUDIO_FORMAT_UNKNOWN(0x{:x})", unknown.code());
            }
        };
        name.to_string()
    }
}

impl Default for SampleFormat {
    fn default() -> Self {
        Self::Pcm16Bit
    }
}

impl From<u32> for SampleFormat {
    fn from(code: u32) -> Self {
        match code {
            0x0 => Self::Default,
            0x1 => Self::Pcm16Bit,
            0x2 => Self::Pcm8Bit,
            0x3 => Self::Pcm32Bit,
            0x4 => Self::Pcm8_24Bit,
            0x5 => Self::PcmFloat,
            0x6 => Self::Pcm24BitPacked,
            other => Self::Other(UnknownFormat(other)),
        }
    }
}

impl From<SampleFormat> for u32 {
    fn from(format: SampleFormat) -> Self {
        format.code()
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
