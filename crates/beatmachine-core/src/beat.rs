//! A single beat: one contiguous slice of interleaved audio

/// Interleaved `f32` samples for one beat. The sample count is always a
/// multiple of the channel count.
#[derive(Debug, Clone, PartialEq)]
pub struct Beat {
    samples: Vec<f32>,
    channels: u16,
}

impl Beat {
    pub fn new(channels: u16, samples: Vec<f32>) -> Self {
        debug_assert!(channels > 0, "a beat needs at least one channel");
        debug_assert_eq!(samples.len() % channels.max(1) as usize, 0);
        Self { samples, channels }
    }

    pub fn mono(samples: Vec<f32>) -> Self {
        Self::new(1, samples)
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channel_width()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Zeros with the same shape.
    pub fn silenced(&self) -> Self {
        Self::new(self.channels, vec![0.0; self.samples.len()])
    }

    /// Frames in reverse order. Channel order inside each frame is kept.
    pub fn reversed(&self) -> Self {
        let samples = self
            .samples
            .chunks_exact(self.channel_width())
            .rev()
            .flatten()
            .copied()
            .collect();
        Self::new(self.channels, samples)
    }

    /// `len` frames starting at frame `start`, clamped to the beat's end.
    pub fn slice_frames(&self, start: usize, len: usize) -> Self {
        let width = self.channel_width();
        let begin = (start * width).min(self.samples.len());
        let end = ((start + len) * width).min(self.samples.len());
        Self::new(self.channels, self.samples[begin..end].to_vec())
    }

    /// The beat played back to back `times` times.
    pub fn repeated(&self, times: usize) -> Self {
        Self::new(self.channels, self.samples.repeat(times))
    }

    fn channel_width(&self) -> usize {
        self.channels.max(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_keeps_channel_order() {
        let beat = Beat::new(2, vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        assert_eq!(beat.reversed().samples(), &[3.0, -3.0, 2.0, -2.0, 1.0, -1.0]);
    }

    #[test]
    fn test_slice_frames_clamps() {
        let beat = Beat::new(2, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(beat.slice_frames(1, 1).samples(), &[2.0, 2.0]);
        assert_eq!(beat.slice_frames(2, 5).samples(), &[3.0, 3.0]);
        assert!(beat.slice_frames(4, 1).is_empty());
    }

    #[test]
    fn test_frames_and_silence() {
        let beat = Beat::new(2, vec![0.5; 8]);
        assert_eq!(beat.frames(), 4);
        let silent = beat.silenced();
        assert_eq!(silent.frames(), 4);
        assert!(silent.samples().iter().all(|s| *s == 0.0));
    }
}
