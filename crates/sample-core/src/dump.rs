//! Human readable dump of a sample specification

use crate::channel::StreamDirection;
use crate::spec::SampleSpec;
use std::io::{self, Write};

impl SampleSpec {
    /// Write the specification to `sink`, one `- key value` line per item,
    /// each line prefixed with `indent` spaces.
    ///
    /// The channel mask is rendered as a playback or a capture mask
    /// according to `direction`. The output is meant for operators, not for
    /// parsing.
    pub fn dump<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        direction: StreamDirection,
        indent: usize,
    ) -> io::Result<()> {
        let pad = " ".repeat(indent);
        let mut result = String::new();
        result.push_str(&format!("{pad}- rate {}\n", self.sample_rate()));
        result.push_str(&format!("{pad}- channels {}\n", self.channel_count()));
        result.push_str(&format!(
            "{pad}- channel mask {}\n",
            self.channel_mask().to_direction_string(direction)
        ));
        result.push_str(&format!("{pad}- format {}\n", self.format()));

        sink.write_all(result.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use crate::channel::{ChannelMask, StreamDirection};
    use crate::format::SampleFormat;
    use crate::spec::SampleSpec;

    #[test]
    fn test_dump_output_direction() {
        let mut spec = SampleSpec::new(2, SampleFormat::Pcm16Bit, 48000, Vec::new()).unwrap();
        spec.set_channel_mask(ChannelMask(0x3));

        let mut out = Vec::new();
        spec.dump(&mut out, StreamDirection::Output, 4).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            concat!(
                "    - rate 48000\n",
                "    - channels 2\n",
                "    - channel mask AUDIO_CHANNEL_OUT_STEREO\n",
                "    - format AUDIO_FORMAT_PCM_16_BIT\n",
            )
        );
    }

    #[test]
    fn test_dump_input_direction_without_indent() {
        let mut spec = SampleSpec::new(1, SampleFormat::Pcm16Bit, 16000, Vec::new()).unwrap();
        spec.set_channel_mask(ChannelMask(0x10));

        let mut out = Vec::new();
        spec.dump(&mut out, StreamDirection::Input, 0).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("- rate 16000\n"));
        assert!(text.contains("- channel mask AUDIO_CHANNEL_IN_MONO\n"));
    }

    #[test]
    fn test_dump_leaves_spec_untouched() {
        let spec = SampleSpec::default();
        let before = spec.clone();
        spec.dump(&mut std::io::sink(), StreamDirection::Output, 2).unwrap();
        assert_eq!(spec, before);
    }
}
