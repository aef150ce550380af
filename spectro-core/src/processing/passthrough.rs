/// Planar (per-channel contiguous) block of f32 samples.
///
/// Backed by one flat buffer so a reset never allocates once the buffer has
/// grown to the working block size.
#[derive(Debug, Default)]
pub struct PlanarBlock {
    data: Vec<f32>,
    channels: usize,
    frames: usize,
}

impl PlanarBlock {
    pub fn with_capacity(channels: usize, frames: usize) -> Self {
        Self {
            data: Vec::with_capacity(channels * frames),
            channels: 0,
            frames: 0,
        }
    }

    /// Re-dimension to `channels` × `frames`, zero-filling all samples.
    pub fn reset(&mut self, channels: usize, frames: usize) {
        self.channels = channels;
        self.frames = frames;
        self.data.clear();
        self.data.resize(channels * frames, 0.0);
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.data[index * self.frames..(index + 1) * self.frames]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.data[index * self.frames..(index + 1) * self.frames]
    }
}

/// Pass-through processing unit for the monitoring path.
///
/// Runs on the real-time audio thread once per block: copies each input
/// channel to the matching output channel, sample for sample. Channels
/// beyond `min(inputs, outputs)` keep their existing content. Missing or
/// empty blocks are tolerated; the unit performs no copy and still reports
/// that the graph should keep running. It never allocates and never fails.
#[derive(Debug, Default)]
pub struct PassThrough;

impl PassThrough {
    /// Returns `true` ("keep running") unconditionally.
    pub fn process(&self, input: &PlanarBlock, output: &mut PlanarBlock) -> bool {
        let channels = input.channels.min(output.channels);
        let frames = input.frames.min(output.frames);
        if channels == 0 || frames == 0 {
            return true;
        }
        for ch in 0..channels {
            let (src, dst) = (input.channel(ch), output.channel_mut(ch));
            dst[..frames].copy_from_slice(&src[..frames]);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_from(channels: &[&[f32]]) -> PlanarBlock {
        let frames = channels.first().map_or(0, |c| c.len());
        let mut block = PlanarBlock::with_capacity(channels.len(), frames);
        block.reset(channels.len(), frames);
        for (i, samples) in channels.iter().enumerate() {
            block.channel_mut(i).copy_from_slice(samples);
        }
        block
    }

    #[test]
    fn copies_matching_channels_verbatim() {
        let input = block_from(&[&[0.1, 0.2, 0.3], &[-0.5, 0.0, 0.5]]);
        let mut output = PlanarBlock::default();
        output.reset(2, 3);

        assert!(PassThrough.process(&input, &mut output));
        assert_eq!(output.channel(0), &[0.1, 0.2, 0.3]);
        assert_eq!(output.channel(1), &[-0.5, 0.0, 0.5]);
    }

    #[test]
    fn extra_output_channels_are_left_untouched() {
        let input = block_from(&[&[1.0, 1.0]]);
        let mut output = PlanarBlock::default();
        output.reset(2, 2);
        output.channel_mut(1).copy_from_slice(&[0.25, 0.25]);

        assert!(PassThrough.process(&input, &mut output));
        assert_eq!(output.channel(0), &[1.0, 1.0]);
        assert_eq!(output.channel(1), &[0.25, 0.25]);
    }

    #[test]
    fn extra_input_channels_are_dropped() {
        let input = block_from(&[&[1.0], &[2.0], &[3.0]]);
        let mut output = PlanarBlock::default();
        output.reset(1, 1);

        assert!(PassThrough.process(&input, &mut output));
        assert_eq!(output.channel(0), &[1.0]);
    }

    #[test]
    fn empty_blocks_keep_the_graph_running() {
        let empty = PlanarBlock::default();
        let mut output = PlanarBlock::default();
        assert!(PassThrough.process(&empty, &mut output));

        let input = block_from(&[&[1.0]]);
        let mut no_channels = PlanarBlock::default();
        no_channels.reset(0, 4);
        assert!(PassThrough.process(&input, &mut no_channels));
    }

    #[test]
    fn frame_count_mismatch_copies_the_shorter_run() {
        let input = block_from(&[&[1.0, 2.0, 3.0, 4.0]]);
        let mut output = PlanarBlock::default();
        output.reset(1, 2);

        assert!(PassThrough.process(&input, &mut output));
        assert_eq!(output.channel(0), &[1.0, 2.0]);
    }
}
