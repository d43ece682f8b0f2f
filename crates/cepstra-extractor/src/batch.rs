//! Batch adapter: buffer in, per-frame features out.
//!
//! [`BatchExtractor`] owns a [`LowLevelExtractor`], the [`Network`] compiled
//! over its graph and the [`Pool`] its outputs land in. Each
//! [`compute`](BatchExtractor::compute) streams one buffer through the graph,
//! harvests the pool and resets everything, so the same instance serves any
//! number of calls.

use cepstra_config::ExtractorParams;
use cepstra_core::{Composite, DataError, Network, ParameterMap, Pool, PoolValue};
use cepstra_registry::AlgorithmRegistry;

use crate::features::Features;
use crate::low_level::LowLevelExtractor;

/// Pool keys the extractor's outputs are bound to.
pub mod keys {
    /// MFCC vectors.
    pub const MFCC: &str = "mfcc";
    /// Spectral RMS.
    pub const RMS: &str = "rms";
    /// Spectral roll-off.
    pub const ROLLOFF: &str = "rollOff";
    /// Zero-crossing rate.
    pub const ZERO_CROSSING_RATE: &str = "zeroCrossingRate";
}

/// Synchronous wrapper over the streaming extractor.
///
/// Not meant for concurrent use; give each thread its own instance.
///
/// # Example
///
/// ```rust
/// use cepstra_extractor::BatchExtractor;
///
/// let mut extractor = BatchExtractor::new().unwrap();
/// let features = extractor.compute(&[0.0; 4096]).unwrap();
/// assert_eq!(features.frame_count(), 3);
/// assert_eq!(features.mfcc[0].len(), 13);
/// ```
pub struct BatchExtractor {
    extractor: LowLevelExtractor,
    network: Network,
    pool: Pool,
}

impl BatchExtractor {
    /// Creates an extractor with the built-in algorithms and default
    /// parameters.
    pub fn new() -> cepstra_core::Result<Self> {
        Self::with_registry(&AlgorithmRegistry::new())
    }

    /// Creates an extractor whose nodes come from `registry`.
    pub fn with_registry(registry: &AlgorithmRegistry) -> cepstra_core::Result<Self> {
        let mut extractor = LowLevelExtractor::new(registry)?;

        let signal = extractor.input("signal")?;
        let bindings = [
            ("mfcc", keys::MFCC),
            ("spectral_rms", keys::RMS),
            ("spectral_rolloff", keys::ROLLOFF),
            ("zerocrossingrate", keys::ZERO_CROSSING_RATE),
        ]
        .map(|(proxy, key)| extractor.output(proxy).map(|port| (port, key)));

        let graph = extractor.graph_mut();
        let input = graph.add_input();
        let source = graph.output(input, "signal")?;
        graph.connect(source, signal)?;
        for binding in bindings {
            let (port, key) = binding?;
            graph.connect_pool(port, key)?;
        }

        let network = Network::new(extractor.graph(), input)?;
        network.ensure_reachable(extractor.process_root())?;

        Ok(Self {
            extractor,
            network,
            pool: Pool::new(),
        })
    }

    /// Creates an extractor configured from `params`.
    pub fn from_config(params: &ExtractorParams) -> cepstra_core::Result<Self> {
        let mut extractor = Self::new()?;
        extractor.configure(&params.to_parameter_map())?;
        Ok(extractor)
    }

    /// Forwards `overrides` to the inner extractor and clears any run state.
    pub fn configure(&mut self, overrides: &ParameterMap) -> cepstra_core::Result<()> {
        self.extractor.configure(overrides)?;
        self.reset();
        Ok(())
    }

    /// Current `frameSize`, `hopSize` and `sampleRate`.
    pub fn parameters(&self) -> &ParameterMap {
        self.extractor.parameters()
    }

    /// The wrapped composite.
    pub fn extractor(&self) -> &LowLevelExtractor {
        &self.extractor
    }

    /// Extracts features from `signal`.
    ///
    /// An empty signal yields empty features. The extractor is reset before
    /// returning, on success and on error alike.
    ///
    /// # Errors
    ///
    /// A [`DataError`] if an algorithm rejects its input, or
    /// [`DataError::MissingOutput`] if a non-empty signal left a key unwritten.
    pub fn compute(&mut self, signal: &[f32]) -> cepstra_core::Result<Features> {
        let outcome = self.run(signal);
        self.reset();
        outcome
    }

    /// Clears queues, algorithm state and the pool.
    pub fn reset(&mut self) {
        self.network.reset(self.extractor.graph_mut());
        self.pool.clear();
    }

    fn run(&mut self, signal: &[f32]) -> cepstra_core::Result<Features> {
        self.network
            .run(self.extractor.graph_mut(), signal, &mut self.pool)?;

        let empty = signal.is_empty();
        let features = Features {
            mfcc: self.harvest(keys::MFCC, empty)?,
            spectral_rms: self.harvest(keys::RMS, empty)?,
            spectral_rolloff: self.harvest(keys::ROLLOFF, empty)?,
            zerocrossingrate: self.harvest(keys::ZERO_CROSSING_RATE, empty)?,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "batch_compute: {} samples -> {} frames",
            signal.len(),
            features.frame_count()
        );
        Ok(features)
    }

    fn harvest<T: PoolValue>(&mut self, key: &str, empty: bool) -> Result<Vec<T>, DataError> {
        match self.pool.take::<T>(key) {
            Err(DataError::KeyNotFound(_)) if empty => Ok(Vec::new()),
            Err(DataError::KeyNotFound(key)) => Err(DataError::MissingOutput(key)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cepstra_core::{ConfigError, Error};

    #[test]
    fn test_silence_yields_three_frames() {
        let mut ex = BatchExtractor::new().unwrap();
        let features = ex.compute(&[0.0; 4096]).unwrap();

        assert_eq!(features.frame_count(), 3);
        assert_eq!(features.mfcc.len(), 3);
        assert_eq!(features.spectral_rolloff.len(), 3);
        assert_eq!(features.zerocrossingrate.len(), 3);
        assert!(features.mfcc.iter().all(|c| c.len() == 13));
        assert!(features.mfcc.iter().flatten().all(|v| v.is_finite()));
        assert!(features.spectral_rms.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_signal_yields_empty_features() {
        let mut ex = BatchExtractor::new().unwrap();
        let features = ex.compute(&[]).unwrap();
        assert!(features.is_empty());
        assert!(features.mfcc.is_empty());
        assert!(features.zerocrossingrate.is_empty());
    }

    #[test]
    fn test_pool_is_cleared_after_compute() {
        let mut ex = BatchExtractor::new().unwrap();
        ex.compute(&[0.25; 3000]).unwrap();
        assert!(ex.pool.is_empty());
    }

    #[test]
    fn test_configure_changes_framing() {
        let mut ex = BatchExtractor::new().unwrap();
        ex.configure(&ParameterMap::new().with("frameSize", 1024).with("hopSize", 512))
            .unwrap();
        // ceil(4096 / 512) = 8, 1 + ceil(3072 / 512) = 7
        assert_eq!(ex.compute(&[0.0; 4096]).unwrap().frame_count(), 7);
    }

    #[test]
    fn test_from_config() {
        let params = ExtractorParams::default().with_frame_size(512).with_hop_size(512);
        let mut ex = BatchExtractor::from_config(&params).unwrap();
        assert_eq!(ex.parameters().int("frameSize"), Some(512));
        assert_eq!(ex.compute(&[0.0; 2048]).unwrap().frame_count(), 4);
    }

    #[test]
    fn test_invalid_configuration_is_reported() {
        let mut ex = BatchExtractor::new().unwrap();
        let err = ex
            .configure(&ParameterMap::new().with("sampleRate", -1.0))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::OutOfRange { .. })));
        // Still usable with the previous configuration
        assert_eq!(ex.compute(&[0.0; 4096]).unwrap().frame_count(), 3);
    }

    #[test]
    fn test_frame_size_bounds_checked_at_configure() {
        let mut ex = BatchExtractor::new().unwrap();
        for frame_size in [1, i64::MAX] {
            let err = ex
                .configure(&ParameterMap::new().with("frameSize", frame_size))
                .unwrap_err();
            assert!(
                matches!(err, Error::Config(ConfigError::OutOfRange { .. })),
                "{frame_size}: {err}"
            );
        }
        let err = ex
            .configure(&ParameterMap::new().with("hopSize", i64::MAX))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::OutOfRange { .. })));
        assert_eq!(ex.parameters().int("frameSize"), Some(2048));
    }

    #[test]
    fn test_reusable_after_run_time_error() {
        let signal: Vec<f32> = (0..8192).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut ex = BatchExtractor::new().unwrap();

        // One-sample frames give MFCC a spectrum it cannot use
        let cutter = ex.extractor.process_root();
        ex.extractor
            .graph_mut()
            .configure_node(cutter, &ParameterMap::new().with("frameSize", 1))
            .unwrap();
        let err = ex.compute(&signal).unwrap_err();
        assert!(matches!(err, Error::Data(_)), "{err}");
        assert!(ex.pool.is_empty());

        ex.configure(&ParameterMap::new().with("frameSize", 2048).with("hopSize", 1024))
            .unwrap();
        let features = ex.compute(&signal).unwrap();
        // min(ceil(8192 / 1024), 1 + ceil(6144 / 1024)) = 7
        assert_eq!(features.frame_count(), 7);
        assert_eq!(features, BatchExtractor::new().unwrap().compute(&signal).unwrap());
    }

    #[test]
    fn test_harvest_missing_key() {
        let mut ex = BatchExtractor::new().unwrap();
        assert_eq!(
            ex.harvest::<f32>(keys::RMS, false),
            Err(DataError::MissingOutput(keys::RMS.to_string()))
        );
        assert_eq!(ex.harvest::<Vec<f32>>(keys::MFCC, true), Ok(Vec::new()));
    }
}
