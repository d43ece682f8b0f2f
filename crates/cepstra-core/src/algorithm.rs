//! The leaf-node contract.
//!
//! An [`Algorithm`] is a named, parameterized processing unit with statically
//! declared ports. The scheduler owns it inside a graph node and calls
//! [`process`](Algorithm::process) whenever every input holds at least
//! [`input_demand`](Algorithm::input_demand) tokens, plus once more with
//! [`StepIo::end_of_stream`] set after its producers have finished.
//!
//! # Example
//!
//! ```rust
//! use cepstra_core::{Algorithm, DataError, ParamDescriptor, ParameterMap, PortSpec, StepIo, StepStatus};
//!
//! struct Square;
//!
//! impl Algorithm for Square {
//!     fn name(&self) -> &'static str { "Square" }
//!     fn inputs(&self) -> &'static [PortSpec] {
//!         const P: &[PortSpec] = &[PortSpec::real("x", "input")];
//!         P
//!     }
//!     fn outputs(&self) -> &'static [PortSpec] {
//!         const P: &[PortSpec] = &[PortSpec::real("y", "x squared")];
//!         P
//!     }
//!     fn parameters(&self) -> &'static [ParamDescriptor] { &[] }
//!     fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
//!         let mut produced = StepStatus::Idle;
//!         while let Some(cepstra_core::Token::Real(x)) = io.pop(0) {
//!             io.push_real(0, x * x);
//!             produced = StepStatus::Produced;
//!         }
//!         Ok(produced)
//!     }
//! }
//! ```

use crate::error::{ConfigError, DataError};
use crate::graph::{PortSpec, StepIo};
use crate::param::{ParamDescriptor, ParameterMap};

/// Outcome of one processing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// At least one token was staged on an output.
    Produced,
    /// Nothing was produced; the node waits for more input.
    Idle,
}

/// Object-safe trait implemented by every leaf node.
pub trait Algorithm {
    /// Stable algorithm name (e.g. `"FrameCutter"`).
    fn name(&self) -> &'static str;

    /// Declared input ports, in index order.
    fn inputs(&self) -> &'static [PortSpec];

    /// Declared output ports, in index order.
    fn outputs(&self) -> &'static [PortSpec];

    /// Declared parameters with their ranges and defaults.
    fn parameters(&self) -> &'static [ParamDescriptor];

    /// Applies a fully validated parameter set (every declared name present).
    ///
    /// Implementations may still reject combinations the per-parameter ranges
    /// cannot express.
    fn configure(&mut self, params: &ParameterMap) -> Result<(), ConfigError> {
        let _ = params;
        Ok(())
    }

    /// Minimum number of queued tokens on `port` for the node to be ready.
    fn input_demand(&self, port: usize) -> usize {
        let _ = port;
        1
    }

    /// Consumes available input and stages output.
    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError>;

    /// Clears all run state, keeping the configuration.
    fn reset(&mut self) {}
}
