//! RollOff: frequency below which `cutoff` of the spectral energy lies.

use cepstra_analysis::spectral_rolloff;
use cepstra_core::{
    Algorithm, ConfigError, DataError, ParamDescriptor, ParamRange, ParameterMap, PortSpec,
    StepIo, StepStatus,
};

use crate::Params;

const INPUTS: &[PortSpec] = &[PortSpec::vector("spectrum", "the input audio spectrum")];
const OUTPUTS: &[PortSpec] = &[PortSpec::real("rollOff", "the roll-off frequency [Hz]")];
const PARAMETERS: &[ParamDescriptor] = &[
    ParamDescriptor::real(
        "cutoff",
        "the ratio of total energy to attain before yielding the roll-off frequency",
        ParamRange::Open { min: 0.0, max: 1.0 },
        0.85,
    ),
    ParamDescriptor::real(
        "sampleRate",
        "the sampling rate of the audio signal (used to normalize rollOff) [Hz]",
        ParamRange::positive(),
        44100.0,
    ),
];

/// Spectral roll-off per spectrum; 0 Hz for an all-zero spectrum.
#[derive(Debug, Clone)]
pub struct RollOff {
    cutoff: f32,
    sample_rate: f32,
}

impl RollOff {
    /// Roll-off at 85 % energy, 44.1 kHz.
    pub fn new() -> Self {
        Self {
            cutoff: 0.85,
            sample_rate: 44100.0,
        }
    }
}

impl Default for RollOff {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for RollOff {
    fn name(&self) -> &'static str {
        "RollOff"
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
        let p = Params::new("RollOff", params);
        self.cutoff = p.real("cutoff")?;
        self.sample_rate = p.real("sampleRate")?;
        Ok(())
    }

    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
        let mut status = StepStatus::Idle;
        while let Some(spectrum) = io.pop_vector(0) {
            io.push_real(0, spectral_rolloff(&spectrum, self.sample_rate, self.cutoff));
            status = StepStatus::Produced;
        }
        Ok(status)
    }
}
