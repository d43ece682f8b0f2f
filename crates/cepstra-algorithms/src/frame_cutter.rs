//! Frame cutter: sample stream to overlapping frames.
//!
//! Consumes the raw `signal` stream as it arrives and emits each frame as soon
//! as all of its samples have been received; the zero-padded tail frames are
//! emitted on end of stream. See [`cepstra_analysis::frame`] for the
//! segmentation rule.
//!
//! Silent frames (mean power below `silenceThreshold` dB) are handled per
//! `silentFrames`:
//!
//! | Policy | Effect |
//! |--------|--------|
//! | `noise` | add white noise at -100 dBFS, keeping every frame finite in the log domain |
//! | `keep` | pass unchanged |
//! | `drop` | skip the frame |

use cepstra_analysis::{FrameSlicer, NoiseGenerator, SilencePolicy, is_silent};
use cepstra_core::{
    Algorithm, ConfigError, DataError, ParamDescriptor, ParamRange, ParameterMap, PortSpec,
    StepIo, StepStatus,
};

use crate::{Params, config_error};

const INPUTS: &[PortSpec] = &[PortSpec::real("signal", "the input audio signal")];
const OUTPUTS: &[PortSpec] = &[PortSpec::vector("frame", "the frames of the audio signal")];
const PARAMETERS: &[ParamDescriptor] = &[
    ParamDescriptor::int(
        "frameSize",
        "the output frame size",
        ParamRange::samples(1),
        2048,
    ),
    ParamDescriptor::int(
        "hopSize",
        "the hop size between frames",
        ParamRange::samples(1),
        1024,
    ),
    ParamDescriptor::choice(
        "silentFrames",
        "whether to [keep/drop/add noise to] silent frames",
        SilencePolicy::NAMES,
        "noise",
    ),
    ParamDescriptor::real(
        "silenceThreshold",
        "mean power below which a frame counts as silent [dB]",
        ParamRange::Closed {
            min: -200.0,
            max: 0.0,
        },
        -100.0,
    ),
];

/// Streaming frame cutter.
///
/// # Example
///
/// ```rust
/// use cepstra_algorithms::FrameCutter;
///
/// let cutter = FrameCutter::new();
/// assert_eq!(cutter.frame_size(), 2048);
/// assert_eq!(cutter.hop_size(), 1024);
/// ```
#[derive(Debug, Clone)]
pub struct FrameCutter {
    slicer: FrameSlicer,
    policy: SilencePolicy,
    threshold_db: f32,
    noise: NoiseGenerator,
    /// Reused receive buffer for drained samples.
    scratch: Vec<f32>,
}

impl FrameCutter {
    /// Frame cutter with the default 2048 / 1024 segmentation.
    pub fn new() -> Self {
        Self {
            slicer: FrameSlicer::new(2048, 1024),
            policy: SilencePolicy::default(),
            threshold_db: NoiseGenerator::SILENCE_LEVEL_DB,
            noise: NoiseGenerator::default(),
            scratch: Vec::new(),
        }
    }

    /// Configured frame size.
    pub fn frame_size(&self) -> usize {
        self.slicer.frame_size()
    }

    /// Configured hop size.
    pub fn hop_size(&self) -> usize {
        self.slicer.hop_size()
    }

    /// Configured silent-frame policy.
    pub fn silence_policy(&self) -> SilencePolicy {
        self.policy
    }

    /// Applies the silence policy and stages the frame. Returns `false` if
    /// the frame was dropped.
    fn emit(&mut self, mut frame: Vec<f32>, io: &mut StepIo<'_>) -> bool {
        if is_silent(&frame, self.threshold_db) {
            match self.policy {
                SilencePolicy::Drop => return false,
                SilencePolicy::Keep => {}
                SilencePolicy::Noise => self.noise.add_to(&mut frame),
            }
        }
        io.push_vector(0, frame);
        true
    }
}

impl Default for FrameCutter {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for FrameCutter {
    fn name(&self) -> &'static str {
        "FrameCutter"
    }

    fn inputs(&self) -> &'static [PortSpec] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortSpec] {
        OUTPUTS
    }

    fn parameters(&self) -> &'static [ParamDescriptor] {
        PARAMETERS
    }

    fn configure(&mut self, params: &ParameterMap) -> Result<(), ConfigError> {
        let p = Params::new("FrameCutter", params);
        let frame_size = p.size("frameSize")?;
        let hop_size = p.size("hopSize")?;
        let policy = p
            .text("silentFrames")?
            .parse::<SilencePolicy>()
            .map_err(|e| config_error("FrameCutter", e))?;
        let threshold_db = p.real("silenceThreshold")?;

        self.slicer = FrameSlicer::new(frame_size, hop_size);
        self.policy = policy;
        self.threshold_db = threshold_db;
        self.noise.reset();
        Ok(())
    }

    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
        self.scratch.clear();
        io.drain_reals(0, &mut self.scratch);
        self.slicer.push(&self.scratch);

        let mut produced = false;
        while let Some(frame) = self.slicer.next() {
            produced |= self.emit(frame, io);
        }
        if io.end_of_stream() {
            for frame in self.slicer.finish() {
                produced |= self.emit(frame, io);
            }
        }

        Ok(if produced {
            StepStatus::Produced
        } else {
            StepStatus::Idle
        })
    }

    fn reset(&mut self) {
        self.slicer.reset();
        self.noise.reset();
        self.scratch.clear();
    }
}
