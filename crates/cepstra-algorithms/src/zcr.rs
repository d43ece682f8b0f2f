//! ZeroCrossingRate: sign changes per sample of each frame.

use cepstra_analysis::zero_crossing_rate;
use cepstra_core::{
    Algorithm, ConfigError, DataError, ParamDescriptor, ParamRange, ParameterMap, PortSpec,
    StepIo, StepStatus,
};

use crate::Params;

const INPUTS: &[PortSpec] = &[PortSpec::vector("signal", "the input signal")];
const OUTPUTS: &[PortSpec] = &[PortSpec::real(
    "zeroCrossingRate",
    "the zero-crossing rate",
)];
const PARAMETERS: &[ParamDescriptor] = &[ParamDescriptor::real(
    "threshold",
    "the threshold which will be taken as the zero axis in both positive and negative sign",
    ParamRange::Closed {
        min: 0.0,
        max: f64::INFINITY,
    },
    0.0,
)];

/// Zero-crossing rate of each frame.
#[derive(Debug, Clone, Default)]
pub struct ZeroCrossingRate {
    threshold: f32,
}

impl ZeroCrossingRate {
    /// Creates the node with a zero threshold.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Algorithm for ZeroCrossingRate {
    fn name(&self) -> &'static str {
        "ZeroCrossingRate"
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
        self.threshold = Params::new("ZeroCrossingRate", params).real("threshold")?;
        Ok(())
    }

    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
        let mut status = StepStatus::Idle;
        while let Some(frame) = io.pop_vector(0) {
            io.push_real(0, zero_crossing_rate(&frame, self.threshold));
            status = StepStatus::Produced;
        }
        Ok(status)
    }
}
