//! MFCC: mel band energies and cepstral coefficients of a magnitude spectrum.
//!
//! The filterbank is built for the length of the first spectrum received
//! after (re)configuration; a later spectrum of a different length is a data
//! error. `highFrequencyBound` is clamped to Nyquist.

use cepstra_analysis::{MfccConfig, mel};
use cepstra_core::{
    Algorithm, ConfigError, DataError, ParamDescriptor, ParamRange, ParameterMap, PortSpec,
    StepIo, StepStatus,
};

use crate::{Params, config_error, data_error};

const INPUTS: &[PortSpec] = &[PortSpec::vector("spectrum", "the audio spectrum")];
const OUTPUTS: &[PortSpec] = &[
    PortSpec::vector("bands", "the energies in mel bands"),
    PortSpec::vector("mfcc", "the mel frequency cepstrum coefficients"),
];
const PARAMETERS: &[ParamDescriptor] = &[
    ParamDescriptor::real(
        "sampleRate",
        "the sampling rate of the audio signal [Hz]",
        ParamRange::positive(),
        44100.0,
    ),
    ParamDescriptor::int(
        "numberBands",
        "the number of mel-bands in the filter",
        ParamRange::positive(),
        40,
    ),
    ParamDescriptor::int(
        "numberCoefficients",
        "the number of output mel coefficients",
        ParamRange::positive(),
        13,
    ),
    ParamDescriptor::real(
        "lowFrequencyBound",
        "the lower bound of the frequency range [Hz]",
        ParamRange::Closed {
            min: 0.0,
            max: f64::INFINITY,
        },
        0.0,
    ),
    ParamDescriptor::real(
        "highFrequencyBound",
        "the upper bound of the frequency range [Hz]",
        ParamRange::positive(),
        11000.0,
    ),
];

/// Streaming MFCC node.
///
/// Emits one `bands` vector (`numberBands` long) and one `mfcc` vector
/// (`numberCoefficients` long) per spectrum.
#[derive(Debug, Clone, Default)]
pub struct Mfcc {
    config: MfccConfig,
    processor: Option<mel::Mfcc>,
}

impl Mfcc {
    /// MFCC node with 40 bands, 13 coefficients, 0 to 11000 Hz at 44.1 kHz.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current settings.
    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    /// Filterbank for `bins`-bin spectra, built on first use.
    fn processor(&mut self, bins: usize) -> Result<&mel::Mfcc, DataError> {
        match &mut self.processor {
            Some(processor) => Ok(processor),
            slot @ None => {
                let built = mel::Mfcc::new(self.config, bins).map_err(|e| data_error("MFCC", e))?;
                #[cfg(feature = "tracing")]
                tracing::debug!("mfcc_build: {bins} bins, {:?}", self.config);
                Ok(slot.insert(built))
            }
        }
    }
}

impl Algorithm for Mfcc {
    fn name(&self) -> &'static str {
        "MFCC"
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
        let p = Params::new("MFCC", params);
        let config = MfccConfig {
            sample_rate: p.real("sampleRate")?,
            number_bands: p.size("numberBands")?,
            number_coefficients: p.size("numberCoefficients")?,
            low_frequency_bound: p.real("lowFrequencyBound")?,
            high_frequency_bound: p.real("highFrequencyBound")?,
        };

        if config.number_coefficients > config.number_bands {
            return Err(config_error(
                "MFCC",
                format!(
                    "numberCoefficients ({}) exceeds numberBands ({})",
                    config.number_coefficients, config.number_bands
                ),
            ));
        }
        let high = config.high_frequency_bound.min(config.sample_rate / 2.0);
        if config.low_frequency_bound >= high {
            return Err(config_error(
                "MFCC",
                format!(
                    "lowFrequencyBound ({}) must be below min(highFrequencyBound, sampleRate / 2) ({high})",
                    config.low_frequency_bound
                ),
            ));
        }

        self.config = config;
        self.processor = None;
        Ok(())
    }

    fn process(&mut self, io: &mut StepIo<'_>) -> Result<StepStatus, DataError> {
        let mut status = StepStatus::Idle;
        while let Some(spectrum) = io.pop_vector(0) {
            let frame = self
                .processor(spectrum.len())?
                .compute(&spectrum)
                .map_err(|e| data_error("MFCC", e))?;
            io.push_vector(0, frame.bands);
            io.push_vector(1, frame.mfcc);
            status = StepStatus::Produced;
        }
        Ok(status)
    }
}
