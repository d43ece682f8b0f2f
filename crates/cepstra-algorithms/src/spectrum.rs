//! Spectrum: magnitude spectrum of each frame.

use cepstra_analysis::Fft;
use cepstra_core::{Algorithm, DataError, ParamDescriptor, PortSpec, StepIo, StepStatus};

const INPUTS: &[PortSpec] = &[PortSpec::vector("frame", "the input audio frame")];
const OUTPUTS: &[PortSpec] = &[PortSpec::vector(
    "spectrum",
    "the magnitude spectrum of the input audio signal",
)];

/// Computes `|FFT(frame)|`, `frame.len() / 2 + 1` bins.
///
/// The FFT plan follows the length of the incoming frames.
pub struct Spectrum {
    fft: Fft,
}

impl Spectrum {
    /// Creates a spectrum node planned for 2048-sample frames.
    pub fn new() -> Self {
        Self {
            fft: Fft::new(2048),
        }
    }
}

impl Default for Spectrum {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for Spectrum {
    fn name(&self) -> &'static str {
        "Spectrum"
    }

    fn inputs(&self) -> &'static [PortSpec] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortSpec] {
        OUTPUTS
    }

    fn parameters(&self) -> &'static [ParamDescriptor] {
        &[]
    }

    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
        let mut status = StepStatus::Idle;
        while let Some(frame) = io.pop_vector(0) {
            self.fft.resize(frame.len());
            io.push_vector(0, self.fft.magnitude(&frame));
            status = StepStatus::Produced;
        }
        Ok(status)
    }
}
