//! Cepstra Algorithms - streaming leaf nodes for feature-extraction graphs
//!
//! Each type implements [`cepstra_core::Algorithm`] on top of the numeric
//! primitives in `cepstra-analysis`:
//!
//! - [`FrameCutter`] - Sample stream to overlapping frames
//! - [`Windowing`] - Tapers frames with an analysis window
//! - [`Spectrum`] - Magnitude spectrum of each frame
//! - [`Mfcc`] - Mel band energies and cepstral coefficients
//! - [`Rms`] - Root mean square of each array
//! - [`RollOff`] - Spectral roll-off frequency
//! - [`ZeroCrossingRate`] - Sign changes per sample
//!
//! ## Port and Parameter Names
//!
//! | Algorithm | Inputs | Outputs | Parameters |
//! |-----------|--------|---------|------------|
//! | FrameCutter | signal (real) | frame | frameSize, hopSize, silentFrames, silenceThreshold |
//! | Windowing | frame | frame | type, normalized, zeroPhase |
//! | Spectrum | frame | spectrum | - |
//! | MFCC | spectrum | bands, mfcc | sampleRate, numberBands, numberCoefficients, lowFrequencyBound, highFrequencyBound |
//! | RMS | array | rms (real) | - |
//! | RollOff | spectrum | rollOff (real) | sampleRate, cutoff |
//! | ZeroCrossingRate | signal | zeroCrossingRate (real) | threshold |
//!
//! Unmarked ports carry vectors.
//!
//! ## Example
//!
//! ```rust
//! use cepstra_algorithms::{FrameCutter, Rms};
//! use cepstra_core::{Network, ParameterMap, Pool, ProcessingGraph};
//!
//! let mut graph = ProcessingGraph::new();
//! let input = graph.add_input();
//! let cutter = graph.add_algorithm(Box::new(FrameCutter::new())).unwrap();
//! let rms = graph.add_algorithm(Box::new(Rms::new())).unwrap();
//! graph
//!     .configure_node(cutter, &ParameterMap::new().with("frameSize", 4).with("hopSize", 4))
//!     .unwrap();
//!
//! graph.connect(graph.output(input, "signal").unwrap(), graph.input(cutter, "signal").unwrap()).unwrap();
//! graph.connect(graph.output(cutter, "frame").unwrap(), graph.input(rms, "array").unwrap()).unwrap();
//! graph.connect_pool(graph.output(rms, "rms").unwrap(), "rms").unwrap();
//!
//! let network = Network::new(&graph, input).unwrap();
//! let mut pool = Pool::new();
//! network.run(&mut graph, &[1.0; 8], &mut pool).unwrap();
//! assert_eq!(pool.value::<f32>("rms").unwrap(), [1.0, 1.0]);
//! ```

pub mod frame_cutter;
pub mod mfcc;
pub mod rms;
pub mod rolloff;
pub mod spectrum;
pub mod windowing;
pub mod zcr;

pub use frame_cutter::FrameCutter;
pub use mfcc::Mfcc;
pub use rms::Rms;
pub use rolloff::RollOff;
pub use spectrum::Spectrum;
pub use windowing::Windowing;
pub use zcr::ZeroCrossingRate;

use cepstra_analysis::AnalysisError;
use cepstra_core::{ConfigError, DataError, ParameterMap};

/// Wraps a numeric failure raised while `node` was processing.
pub(crate) fn data_error(node: &str, err: AnalysisError) -> DataError {
    DataError::Algorithm {
        node: node.to_string(),
        reason: err.to_string(),
    }
}

/// Wraps a numeric failure raised while `node` was being configured.
pub(crate) fn config_error(node: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Algorithm {
        node: node.to_string(),
        reason: reason.to_string(),
    }
}

/// Typed lookups into a merged parameter set.
///
/// `configure` only ever sees maps holding every declared name, so a miss
/// means the declaration and the lookup disagree.
pub(crate) struct Params<'a> {
    node: &'static str,
    map: &'a ParameterMap,
}

impl<'a> Params<'a> {
    pub(crate) fn new(node: &'static str, map: &'a ParameterMap) -> Self {
        Self { node, map }
    }

    fn missing(&self, name: &str) -> ConfigError {
        config_error(self.node, format!("parameter '{name}' missing"))
    }

    pub(crate) fn size(&self, name: &str) -> Result<usize, ConfigError> {
        self.map
            .int(name)
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| self.missing(name))
    }

    pub(crate) fn real(&self, name: &str) -> Result<f32, ConfigError> {
        self.map
            .real(name)
            .map(|v| v as f32)
            .ok_or_else(|| self.missing(name))
    }

    pub(crate) fn flag(&self, name: &str) -> Result<bool, ConfigError> {
        self.map.flag(name).ok_or_else(|| self.missing(name))
    }

    pub(crate) fn text(&self, name: &str) -> Result<&'a str, ConfigError> {
        self.map.text(name).ok_or_else(|| self.missing(name))
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::collections::VecDeque;

    use cepstra_core::{Algorithm, DataError, ParameterMap, StepIo, StepStatus, Token};

    /// Configures `algorithm` with its defaults plus `overrides`.
    pub(crate) fn configured<A: Algorithm>(
        mut algorithm: A,
        overrides: &ParameterMap,
    ) -> Result<A, cepstra_core::ConfigError> {
        let merged = ParameterMap::defaults(algorithm.parameters()).merged(
            algorithm.name(),
            algorithm.parameters(),
            overrides,
        )?;
        algorithm.configure(&merged)?;
        Ok(algorithm)
    }

    /// Runs one step over `inputs` (one token list per input port) and
    /// returns the status plus the staged tokens per output port.
    pub(crate) fn step<A: Algorithm>(
        algorithm: &mut A,
        inputs: Vec<Vec<Token>>,
        end_of_stream: bool,
    ) -> Result<(StepStatus, Vec<Vec<Token>>), DataError> {
        let mut queues: Vec<VecDeque<Token>> = inputs.into_iter().map(VecDeque::from).collect();
        let mut outputs = vec![Vec::new(); algorithm.outputs().len()];
        let status = {
            let mut io = StepIo::new(&mut queues, &mut outputs, end_of_stream);
            algorithm.process(&mut io)?
        };
        Ok((status, outputs))
    }

    /// Unwraps real tokens.
    pub(crate) fn reals(tokens: &[Token]) -> Vec<f32> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Real(v) => Some(*v),
                Token::Vector(_) => None,
            })
            .collect()
    }

    /// Unwraps vector tokens.
    pub(crate) fn vectors(tokens: &[Token]) -> Vec<Vec<f32>> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Vector(v) => Some(v.clone()),
                Token::Real(_) => None,
            })
            .collect()
    }

    /// Wraps vectors as tokens.
    pub(crate) fn vector_tokens(vectors: &[Vec<f32>]) -> Vec<Token> {
        vectors.iter().cloned().map(Token::Vector).collect()
    }
}
