//! Windowing: tapers each frame with an analysis window.

use cepstra_analysis::{Window, zero_phase};
use cepstra_core::{
    Algorithm, ConfigError, DataError, ParamDescriptor, ParameterMap, PortSpec, StepIo,
    StepStatus,
};

use crate::{Params, config_error};

const INPUTS: &[PortSpec] = &[PortSpec::vector("frame", "the input audio frame")];
const OUTPUTS: &[PortSpec] = &[PortSpec::vector("frame", "the windowed audio frame")];
const PARAMETERS: &[ParamDescriptor] = &[
    ParamDescriptor::choice("type", "the window type", Window::NAMES, "hann"),
    ParamDescriptor::flag(
        "normalized",
        "a boolean value to specify whether to normalize windows (to have an area of 2)",
        true,
    ),
    ParamDescriptor::flag(
        "zeroPhase",
        "a boolean value that enables zero-phase windowing",
        true,
    ),
];

/// Applies a window to every incoming frame.
///
/// Coefficients are computed once per frame length and cached.
#[derive(Debug, Clone)]
pub struct Windowing {
    window: Window,
    normalized: bool,
    zero_phase: bool,
    coefficients: Vec<f32>,
}

impl Windowing {
    /// Hann window, normalized, zero-phase.
    pub fn new() -> Self {
        Self {
            window: Window::Hann,
            normalized: true,
            zero_phase: true,
            coefficients: Vec::new(),
        }
    }

    /// Configured window shape.
    pub fn window(&self) -> Window {
        self.window
    }

    fn apply(&mut self, frame: &mut [f32]) {
        if self.coefficients.len() != frame.len() {
            self.coefficients = self.window.coefficients(frame.len(), self.normalized);
        }
        for (sample, w) in frame.iter_mut().zip(&self.coefficients) {
            *sample *= w;
        }
        if self.zero_phase {
            zero_phase(frame);
        }
    }
}

impl Default for Windowing {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for Windowing {
    fn name(&self) -> &'static str {
        "Windowing"
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
        let p = Params::new("Windowing", params);
        let window = p
            .text("type")?
            .parse::<Window>()
            .map_err(|e| config_error("Windowing", e))?;
        self.window = window;
        self.normalized = p.flag("normalized")?;
        self.zero_phase = p.flag("zeroPhase")?;
        self.coefficients.clear();
        Ok(())
    }

    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
        let mut status = StepStatus::Idle;
        while let Some(mut frame) = io.pop_vector(0) {
            self.apply(&mut frame);
            io.push_vector(0, frame);
            status = StepStatus::Produced;
        }
        Ok(status)
    }
}
