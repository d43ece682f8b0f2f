//! RMS: root mean square of each incoming array.

use cepstra_analysis::rms;
use cepstra_core::{Algorithm, DataError, ParamDescriptor, PortSpec, StepIo, StepStatus};

const INPUTS: &[PortSpec] = &[PortSpec::vector("array", "the input array")];
const OUTPUTS: &[PortSpec] = &[PortSpec::real("rms", "the root mean square of the input array")];

/// `sqrt(mean(x²))` of each array; 0 for an empty one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rms;

impl Rms {
    /// Creates the node.
    pub fn new() -> Self {
        Self
    }
}

impl Algorithm for Rms {
    fn name(&self) -> &'static str {
        "RMS"
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
        while let Some(array) = io.pop_vector(0) {
            io.push_real(0, rms(&array));
            status = StepStatus::Produced;
        }
        Ok(status)
    }
}
