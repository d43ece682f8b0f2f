//! Algorithm registry and factory for cepstra processing graphs.
//!
//! This crate maps the closed set of built-in leaf algorithms to their
//! constructors. Composites receive a registry explicitly and create their
//! nodes through it; there is no global instance.
//!
//! # Features
//!
//! - **Closed kind set**: [`AlgorithmKind`] names every built-in algorithm
//! - **Factory Pattern**: Create algorithms by kind or by stable string id
//! - **Category System**: Algorithms organized by role (segmentation, spectral, ...)
//! - **Parameter Info**: Ports and parameter declarations for listings and tooling
//!
//! # Example
//!
//! ```rust
//! use cepstra_core::ParameterMap;
//! use cepstra_registry::{AlgorithmCategory, AlgorithmKind, AlgorithmRegistry};
//!
//! let registry = AlgorithmRegistry::new();
//!
//! // List all algorithms
//! for algorithm in registry.all() {
//!     println!("{}: {}", algorithm.id, algorithm.description);
//! }
//!
//! // Create an algorithm by kind, with overrides on top of its defaults
//! let cutter = registry
//!     .create_configured(AlgorithmKind::FrameCutter, &ParameterMap::new().with("hopSize", 512))
//!     .unwrap();
//! assert_eq!(cutter.name(), "FrameCutter");
//!
//! // Or by id
//! assert!(registry.create_by_id("MFCC").is_some());
//!
//! // Filter by category
//! for algorithm in registry.in_category(AlgorithmCategory::Spectral) {
//!     println!("Spectral algorithm: {}", algorithm.name);
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use cepstra_algorithms::{
    FrameCutter, Mfcc, RollOff, Rms, Spectrum, Windowing, ZeroCrossingRate,
};
use cepstra_core::{Algorithm, ConfigError, ParameterMap};

/// Every built-in leaf algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    /// Sample stream to overlapping frames.
    FrameCutter,
    /// Analysis window.
    Windowing,
    /// Magnitude spectrum.
    Spectrum,
    /// Mel-frequency cepstral coefficients.
    Mfcc,
    /// Root mean square.
    Rms,
    /// Spectral roll-off.
    RollOff,
    /// Zero-crossing rate.
    ZeroCrossingRate,
}

impl AlgorithmKind {
    /// All kinds, in registration order.
    pub const ALL: [AlgorithmKind; 7] = [
        AlgorithmKind::FrameCutter,
        AlgorithmKind::Windowing,
        AlgorithmKind::Spectrum,
        AlgorithmKind::Mfcc,
        AlgorithmKind::Rms,
        AlgorithmKind::RollOff,
        AlgorithmKind::ZeroCrossingRate,
    ];

    /// Stable string id; equals the created algorithm's
    /// [`name()`](Algorithm::name).
    pub const fn id(self) -> &'static str {
        match self {
            AlgorithmKind::FrameCutter => "FrameCutter",
            AlgorithmKind::Windowing => "Windowing",
            AlgorithmKind::Spectrum => "Spectrum",
            AlgorithmKind::Mfcc => "MFCC",
            AlgorithmKind::Rms => "RMS",
            AlgorithmKind::RollOff => "RollOff",
            AlgorithmKind::ZeroCrossingRate => "ZeroCrossingRate",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown algorithm id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Category of algorithm for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmCategory {
    /// Framing and windowing of the raw signal
    Segmentation,
    /// Spectrum and spectrum-derived descriptors
    Spectral,
    /// Statistics over arbitrary arrays
    Statistics,
    /// Time-domain descriptors
    Temporal,
}

impl AlgorithmCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            AlgorithmCategory::Segmentation => "Segmentation",
            AlgorithmCategory::Spectral => "Spectral",
            AlgorithmCategory::Statistics => "Statistics",
            AlgorithmCategory::Temporal => "Temporal",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            AlgorithmCategory::Segmentation => "Frame cutting and analysis windows",
            AlgorithmCategory::Spectral => "Spectrum computation and spectral descriptors",
            AlgorithmCategory::Statistics => "Statistics over arrays",
            AlgorithmCategory::Temporal => "Time-domain frame descriptors",
        }
    }
}

/// Describes an algorithm in the registry.
#[derive(Debug, Clone)]
pub struct AlgorithmDescriptor {
    /// Kind this entry creates.
    pub kind: AlgorithmKind,
    /// Stable identifier (same as [`AlgorithmKind::id`]).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the algorithm.
    pub description: &'static str,
    /// Category for organization.
    pub category: AlgorithmCategory,
    /// Number of declared parameters.
    pub param_count: usize,
}

/// Factory function type for creating algorithms.
type AlgorithmFactory = fn() -> Box<dyn Algorithm + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: AlgorithmDescriptor,
    factory: AlgorithmFactory,
}

/// Registry of all built-in algorithms.
pub struct AlgorithmRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgorithmRegistry {
    /// Create a new registry with all built-in algorithms registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(AlgorithmKind::ALL.len()),
        };
        registry.register_builtin_algorithms();
        registry
    }

    fn register_builtin_algorithms(&mut self) {
        self.register(
            AlgorithmKind::FrameCutter,
            "Frame Cutter",
            "Slices a sample stream into overlapping, zero-padded frames",
            AlgorithmCategory::Segmentation,
            || Box::new(FrameCutter::new()),
        );
        self.register(
            AlgorithmKind::Windowing,
            "Windowing",
            "Applies a cosine-sum analysis window to each frame",
            AlgorithmCategory::Segmentation,
            || Box::new(Windowing::new()),
        );
        self.register(
            AlgorithmKind::Spectrum,
            "Spectrum",
            "Magnitude spectrum of each frame",
            AlgorithmCategory::Spectral,
            || Box::new(Spectrum::new()),
        );
        self.register(
            AlgorithmKind::Mfcc,
            "MFCC",
            "Mel band energies and mel-frequency cepstral coefficients",
            AlgorithmCategory::Spectral,
            || Box::new(Mfcc::new()),
        );
        self.register(
            AlgorithmKind::Rms,
            "RMS",
            "Root mean square of an array",
            AlgorithmCategory::Statistics,
            || Box::new(Rms::new()),
        );
        self.register(
            AlgorithmKind::RollOff,
            "Roll-Off",
            "Frequency below which a given share of the spectral energy lies",
            AlgorithmCategory::Spectral,
            || Box::new(RollOff::new()),
        );
        self.register(
            AlgorithmKind::ZeroCrossingRate,
            "Zero-Crossing Rate",
            "Sign changes per sample of a frame",
            AlgorithmCategory::Temporal,
            || Box::new(ZeroCrossingRate::new()),
        );
    }

    fn register(
        &mut self,
        kind: AlgorithmKind,
        name: &'static str,
        description: &'static str,
        category: AlgorithmCategory,
        factory: AlgorithmFactory,
    ) {
        let param_count = factory().parameters().len();
        self.entries.push(RegistryEntry {
            descriptor: AlgorithmDescriptor {
                kind,
                id: kind.id(),
                name,
                description,
                category,
                param_count,
            },
            factory,
        });
    }

    fn entry(&self, kind: AlgorithmKind) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.kind == kind)
    }

    /// Returns descriptors for all registered algorithms.
    pub fn all(&self) -> Vec<&AlgorithmDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for algorithms in a specific category.
    pub fn in_category(&self, category: AlgorithmCategory) -> Vec<&AlgorithmDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get the descriptor of `kind`.
    pub fn descriptor(&self, kind: AlgorithmKind) -> Option<&AlgorithmDescriptor> {
        self.entry(kind).map(|e| &e.descriptor)
    }

    /// Create an algorithm with its declared defaults.
    ///
    /// Every [`AlgorithmKind`] is registered by [`new()`](Self::new), so this
    /// only returns `None` for a registry missing built-ins.
    pub fn create(&self, kind: AlgorithmKind) -> Option<Box<dyn Algorithm + Send>> {
        self.entry(kind).map(|e| (e.factory)())
    }

    /// Create an algorithm and configure it with `overrides` on top of its
    /// declared defaults.
    pub fn create_configured(
        &self,
        kind: AlgorithmKind,
        overrides: &ParameterMap,
    ) -> Result<Box<dyn Algorithm + Send>, ConfigError> {
        let mut algorithm = self.create(kind).ok_or_else(|| ConfigError::Algorithm {
            node: kind.id().to_string(),
            reason: "not registered".to_string(),
        })?;
        let declared = algorithm.parameters();
        let params = ParameterMap::defaults(declared).merged(kind.id(), declared, overrides)?;
        algorithm.configure(&params)?;
        Ok(algorithm)
    }

    /// Create an algorithm by its string id.
    pub fn create_by_id(&self, id: &str) -> Option<Box<dyn Algorithm + Send>> {
        self.create(id.parse().ok()?)
    }

    /// Returns the number of registered algorithms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no algorithms are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
