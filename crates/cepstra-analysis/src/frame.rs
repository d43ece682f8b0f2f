//! Frame segmentation
//!
//! Frames start at sample 0 and advance by the hop size. Frame `k` covers
//! `[k * hop, k * hop + frame)` and is produced when it starts inside the
//! signal and the previous frame did not already reach the end. The last frame
//! is zero-padded. For a signal of `L` samples this yields
//!
//! ```text
//! 0                                                   if L == 0
//! min(ceil(L / hop), 1 + ceil(max(L - frame, 0) / hop))  otherwise
//! ```
//!
//! [`FrameSlicer`] produces the same frames incrementally: any frame that is
//! fully inside the samples received so far is emitted immediately, the rest
//! on [`finish()`](FrameSlicer::finish).

use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Number of frames produced for `len` samples.
///
/// A `frame_size` or `hop_size` of 0 yields 0 frames.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if len == 0 || frame_size == 0 || hop_size == 0 {
        return 0;
    }
    let by_start = len.div_ceil(hop_size);
    let by_coverage = 1 + len.saturating_sub(frame_size).div_ceil(hop_size);
    by_start.min(by_coverage)
}

/// Segments a whole signal at once.
pub fn frames(signal: &[f32], frame_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    let mut slicer = FrameSlicer::new(frame_size, hop_size);
    slicer.push(signal);
    let mut out: Vec<Vec<f32>> = slicer.by_ref().collect();
    out.extend(slicer.finish());
    out
}

/// Incremental frame cutter over a sample stream.
///
/// ```rust
/// use cepstra_analysis::frame::{FrameSlicer, frame_count};
///
/// let mut slicer = FrameSlicer::new(4, 2);
/// slicer.push(&[1.0, 2.0, 3.0]);
/// assert_eq!(slicer.next(), None); // no complete frame yet
///
/// slicer.push(&[4.0, 5.0]);
/// assert_eq!(slicer.next(), Some(vec![1.0, 2.0, 3.0, 4.0]));
///
/// let tail = slicer.finish();
/// assert_eq!(tail, [vec![3.0, 4.0, 5.0, 0.0]]);
/// assert_eq!(frame_count(5, 4, 2), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FrameSlicer {
    frame_size: usize,
    hop_size: usize,
    /// Samples not yet behind the next frame start.
    buffer: Vec<f32>,
    /// Absolute index of `buffer[0]`.
    buffer_start: usize,
    /// Samples received so far.
    received: usize,
    /// Index of the next frame to emit.
    next_frame: usize,
}

impl FrameSlicer {
    /// Creates a slicer. Sizes of 0 are treated as 1.
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            frame_size: frame_size.max(1),
            hop_size: hop_size.max(1),
            buffer: Vec::new(),
            buffer_start: 0,
            received: 0,
            next_frame: 0,
        }
    }

    /// Frame size in samples.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop size in samples.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Frames emitted so far.
    pub fn emitted(&self) -> usize {
        self.next_frame
    }

    /// Appends samples to the stream.
    pub fn push(&mut self, samples: &[f32]) {
        self.buffer.extend_from_slice(samples);
        self.received += samples.len();
    }

    /// Ends the stream and returns every remaining frame, zero-padded.
    ///
    /// The slicer is reset afterwards.
    pub fn finish(&mut self) -> Vec<Vec<f32>> {
        let mut out: Vec<Vec<f32>> = self.by_ref().collect();
        let total = frame_count(self.received, self.frame_size, self.hop_size);
        while self.next_frame < total {
            let frame = self.slice(true);
            out.push(frame);
        }
        self.reset();
        out
    }

    /// Drops all buffered samples and restarts at frame 0.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.buffer_start = 0;
        self.received = 0;
        self.next_frame = 0;
    }

    fn next_start(&self) -> usize {
        self.next_frame * self.hop_size
    }

    /// Copies out the next frame and advances. With `pad`, samples past the
    /// received range read as 0.
    fn slice(&mut self, pad: bool) -> Vec<f32> {
        let offset = self.next_start() - self.buffer_start;
        let mut frame = Vec::with_capacity(self.frame_size);
        let end = (offset + self.frame_size).min(self.buffer.len());
        if offset < end {
            frame.extend_from_slice(&self.buffer[offset..end]);
        }
        if pad {
            frame.resize(self.frame_size, 0.0);
        }
        self.next_frame += 1;

        // Discard samples every later frame starts after.
        let drop = (self.next_start() - self.buffer_start).min(self.buffer.len());
        self.buffer.drain(..drop);
        self.buffer_start += drop;
        frame
    }
}

impl Iterator for FrameSlicer {
    type Item = Vec<f32>;

    /// Next frame lying completely inside the received samples.
    fn next(&mut self) -> Option<Vec<f32>> {
        if self.next_start() + self.frame_size <= self.received {
            Some(self.slice(false))
        } else {
            None
        }
    }
}

/// What a frame cutter does with frames below the silence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SilencePolicy {
    /// Remove silent frames from the output.
    Drop,
    /// Pass silent frames through unchanged.
    Keep,
    /// Add low-level noise so silent frames behave like any other signal.
    #[default]
    Noise,
}

impl SilencePolicy {
    /// Parameter names accepted by [`FromStr`].
    pub const NAMES: &'static [&'static str] = &["drop", "keep", "noise"];

    /// Stable parameter name.
    pub const fn name(self) -> &'static str {
        match self {
            SilencePolicy::Drop => "drop",
            SilencePolicy::Keep => "keep",
            SilencePolicy::Noise => "noise",
        }
    }
}

impl fmt::Display for SilencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SilencePolicy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(SilencePolicy::Drop),
            "keep" => Ok(SilencePolicy::Keep),
            "noise" => Ok(SilencePolicy::Noise),
            other => Err(AnalysisError::UnknownSilencePolicy(other.to_string())),
        }
    }
}

/// Mean power `sum(x²) / N` of a frame; 0 for an empty frame.
pub fn instant_power(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().map(|&x| x * x).sum::<f32>() / frame.len() as f32
}

/// `true` if the frame's mean power lies below `threshold_db` (power dB).
pub fn is_silent(frame: &[f32], threshold_db: f32) -> bool {
    instant_power(frame) < 10.0_f32.powf(threshold_db / 10.0)
}

/// Deterministic white-noise source (xorshift32), uniform in `[-level, level]`.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    seed: u32,
    state: u32,
    level: f32,
}

impl NoiseGenerator {
    /// Noise level of the silent-frame policy: -100 dBFS.
    pub const SILENCE_LEVEL_DB: f32 = -100.0;

    /// Creates a generator with peak amplitude `level_db` (dBFS).
    pub fn new(seed: u32, level_db: f32) -> Self {
        let seed = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self {
            seed,
            state: seed,
            level: 10.0_f32.powf(level_db / 20.0),
        }
    }

    /// Peak amplitude (linear).
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Next noise sample.
    pub fn sample(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        // Map to [-1, 1)
        let unit = (x >> 8) as f32 / (1u32 << 23) as f32 - 1.0;
        unit * self.level
    }

    /// Adds noise to every sample of `frame`.
    pub fn add_to(&mut self, frame: &mut [f32]) {
        for sample in frame {
            *sample += self.sample();
        }
    }

    /// Restarts the sequence from the seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new(1, Self::SILENCE_LEVEL_DB)
    }
}
