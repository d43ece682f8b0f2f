//! The low-level extractor: a composite owning the seven-node feature graph.
//!
//! ```text
//!                    +-> ZeroCrossingRate ------------------> zerocrossingrate
//! signal -> FrameCutter
//!                    +-> Windowing -> Spectrum -+-> MFCC ----> mfcc
//!                                               |      `----> (bands, discarded)
//!                                               +-> RMS -----> spectral_rms
//!                                               `-> RollOff -> spectral_rolloff
//! ```
//!
//! The topology is built once in [`LowLevelExtractor::new`]. Callers bind the
//! four source proxies and feed the `signal` sink; see
//! [`BatchExtractor`](crate::BatchExtractor) for the usual wiring.

use cepstra_core::{
    Composite, ConfigError, GraphError, NodeId, ParamDescriptor, ParamRange, ParameterMap,
    ProcessingGraph, SinkProxy, SourceProxy,
};
use cepstra_registry::{AlgorithmKind, AlgorithmRegistry};

/// Window applied before the spectrum. Not exposed as a parameter.
pub const WINDOW_TYPE: &str = "blackmanharris62";

const NAME: &str = "LowLevelExtractor";

const PARAMETERS: &[ParamDescriptor] = &[
    ParamDescriptor::int(
        "frameSize",
        "the frame size for computing low level features",
        ParamRange::samples(2),
        2048,
    ),
    ParamDescriptor::int(
        "hopSize",
        "the hop size for computing low level features",
        ParamRange::samples(1),
        1024,
    ),
    ParamDescriptor::real(
        "sampleRate",
        "the audio sampling rate [Hz]",
        ParamRange::positive(),
        44100.0,
    ),
];

/// Inner node handles.
#[derive(Debug, Clone, Copy)]
struct Nodes {
    frame_cutter: NodeId,
    windowing: NodeId,
    spectrum: NodeId,
    mfcc: NodeId,
    rms: NodeId,
    rolloff: NodeId,
    zcr: NodeId,
}

impl Nodes {
    fn all(&self) -> [NodeId; 7] {
        [
            self.frame_cutter,
            self.windowing,
            self.spectrum,
            self.mfcc,
            self.rms,
            self.rolloff,
            self.zcr,
        ]
    }
}

/// Composite computing MFCC, spectral RMS, spectral roll-off and
/// zero-crossing rate per frame.
///
/// # Example
///
/// ```rust
/// use cepstra_core::Composite;
/// use cepstra_extractor::LowLevelExtractor;
/// use cepstra_registry::AlgorithmRegistry;
///
/// let extractor = LowLevelExtractor::new(&AlgorithmRegistry::new()).unwrap();
/// assert_eq!(extractor.graph().node_count(), 7);
/// assert!(extractor.output("spectral_rolloff").is_ok());
/// ```
pub struct LowLevelExtractor {
    graph: ProcessingGraph,
    nodes: Nodes,
    params: ParameterMap,
    sinks: [SinkProxy; 1],
    sources: [SourceProxy; 4],
}

impl LowLevelExtractor {
    /// Creates every inner node through `registry` and wires the topology.
    ///
    /// # Errors
    ///
    /// - [`ConfigError`] if a kind is missing from `registry` or rejects its
    ///   fixed settings
    /// - [`GraphError`] if the wiring fails, or if a node is not reached
    ///   from the frame cutter
    pub fn new(registry: &AlgorithmRegistry) -> cepstra_core::Result<Self> {
        let mut graph = ProcessingGraph::new();

        let frame_cutter = add_node(
            &mut graph,
            registry,
            AlgorithmKind::FrameCutter,
            &ParameterMap::new().with("silentFrames", "noise"),
        )?;
        let windowing = add_node(
            &mut graph,
            registry,
            AlgorithmKind::Windowing,
            &ParameterMap::new().with("type", WINDOW_TYPE),
        )?;
        let none = ParameterMap::new();
        let spectrum = add_node(&mut graph, registry, AlgorithmKind::Spectrum, &none)?;
        let mfcc = add_node(&mut graph, registry, AlgorithmKind::Mfcc, &none)?;
        let rms = add_node(&mut graph, registry, AlgorithmKind::Rms, &none)?;
        let rolloff = add_node(&mut graph, registry, AlgorithmKind::RollOff, &none)?;
        let zcr = add_node(&mut graph, registry, AlgorithmKind::ZeroCrossingRate, &none)?;

        link(&mut graph, (frame_cutter, "frame"), (windowing, "frame"))?;
        link(&mut graph, (windowing, "frame"), (spectrum, "frame"))?;
        link(&mut graph, (spectrum, "spectrum"), (mfcc, "spectrum"))?;
        link(&mut graph, (spectrum, "spectrum"), (rms, "array"))?;
        link(&mut graph, (spectrum, "spectrum"), (rolloff, "spectrum"))?;
        link(&mut graph, (frame_cutter, "frame"), (zcr, "signal"))?;
        let bands = graph.output(mfcc, "bands")?;
        graph.discard(bands)?;

        let nodes = Nodes {
            frame_cutter,
            windowing,
            spectrum,
            mfcc,
            rms,
            rolloff,
            zcr,
        };

        let order = graph.chain_from(frame_cutter)?;
        if let Some(missing) = nodes.all().into_iter().find(|n| !order.contains(n)) {
            return Err(GraphError::Unreachable(missing).into());
        }

        let sinks = [SinkProxy {
            name: "signal",
            target: graph.input(frame_cutter, "signal")?,
        }];
        let sources = [
            SourceProxy {
                name: "mfcc",
                source: graph.output(mfcc, "mfcc")?,
            },
            SourceProxy {
                name: "spectral_rms",
                source: graph.output(rms, "rms")?,
            },
            SourceProxy {
                name: "spectral_rolloff",
                source: graph.output(rolloff, "rollOff")?,
            },
            SourceProxy {
                name: "zerocrossingrate",
                source: graph.output(zcr, "zeroCrossingRate")?,
            },
        ];

        #[cfg(feature = "tracing")]
        tracing::debug!("extractor_build: {} nodes, order {order:?}", order.len());

        Ok(Self {
            graph,
            nodes,
            params: ParameterMap::defaults(PARAMETERS),
            sinks,
            sources,
        })
    }

    /// Declared parameters: `frameSize`, `hopSize`, `sampleRate`.
    pub fn parameter_specs(&self) -> &'static [ParamDescriptor] {
        PARAMETERS
    }

    /// Current parameter values.
    pub fn parameters(&self) -> &ParameterMap {
        &self.params
    }

    /// Applies `overrides` on top of the current parameters.
    ///
    /// `frameSize` and `hopSize` go to the frame cutter, which keeps treating
    /// silent frames as noise. `sampleRate` goes to MFCC and RollOff. The
    /// overrides are validated before any inner node is touched.
    pub fn configure(&mut self, overrides: &ParameterMap) -> cepstra_core::Result<()> {
        let merged = self.params.merged(NAME, PARAMETERS, overrides)?;
        let (Some(frame_size), Some(hop_size), Some(sample_rate)) = (
            merged.int("frameSize"),
            merged.int("hopSize"),
            merged.real("sampleRate"),
        ) else {
            return Err(ConfigError::Algorithm {
                node: NAME.to_string(),
                reason: "frameSize, hopSize and sampleRate must all be set".to_string(),
            }
            .into());
        };

        self.graph.configure_node(
            self.nodes.frame_cutter,
            &ParameterMap::new()
                .with("frameSize", frame_size)
                .with("hopSize", hop_size)
                .with("silentFrames", "noise"),
        )?;
        let rate = ParameterMap::new().with("sampleRate", sample_rate);
        self.graph.configure_node(self.nodes.mfcc, &rate)?;
        self.graph.configure_node(self.nodes.rolloff, &rate)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("extractor_configure: {merged:?}");
        self.params = merged;
        Ok(())
    }
}

impl Composite for LowLevelExtractor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn graph(&self) -> &ProcessingGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut ProcessingGraph {
        &mut self.graph
    }

    fn sink_proxies(&self) -> &[SinkProxy] {
        &self.sinks
    }

    fn source_proxies(&self) -> &[SourceProxy] {
        &self.sources
    }

    fn process_root(&self) -> NodeId {
        self.nodes.frame_cutter
    }
}

fn add_node(
    graph: &mut ProcessingGraph,
    registry: &AlgorithmRegistry,
    kind: AlgorithmKind,
    overrides: &ParameterMap,
) -> cepstra_core::Result<NodeId> {
    let algorithm = registry
        .create(kind)
        .ok_or_else(|| ConfigError::Algorithm {
            node: kind.id().to_string(),
            reason: "not registered".to_string(),
        })?;
    let id = graph.add_algorithm(algorithm)?;
    if !overrides.is_empty() {
        graph.configure_node(id, overrides)?;
    }
    Ok(id)
}

fn link(
    graph: &mut ProcessingGraph,
    from: (NodeId, &str),
    to: (NodeId, &str),
) -> Result<(), GraphError> {
    let out = graph.output(from.0, from.1)?;
    let inp = graph.input(to.0, to.1)?;
    graph.connect(out, inp)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cepstra_core::{Endpoint, Error};

    fn extractor() -> LowLevelExtractor {
        LowLevelExtractor::new(&AlgorithmRegistry::new()).unwrap()
    }

    #[test]
    fn test_builds_seven_nodes() {
        let ex = extractor();
        assert_eq!(ex.graph().node_count(), 7);
        // 6 links plus the discarded bands output
        assert_eq!(ex.graph().connection_count(), 7);
    }

    #[test]
    fn test_chain_covers_every_node() {
        let ex = extractor();
        let order = ex.graph().chain_from(ex.process_root()).unwrap();
        assert_eq!(order.len(), 7);
        assert_eq!(order[0], ex.process_root());
    }

    #[test]
    fn test_bands_output_is_discarded() {
        let ex = extractor();
        let bands = ex.graph().output(ex.nodes.mfcc, "bands").unwrap();
        assert_eq!(ex.graph().endpoints(bands), [&Endpoint::Discard]);
    }

    #[test]
    fn test_window_is_fixed() {
        let mut ex = extractor();
        let windowing = ex.nodes.windowing;
        assert_eq!(
            ex.graph().parameters(windowing).unwrap().text("type"),
            Some(WINDOW_TYPE)
        );
        ex.configure(&ParameterMap::new().with("frameSize", 1024)).unwrap();
        assert_eq!(
            ex.graph().parameters(windowing).unwrap().text("type"),
            Some(WINDOW_TYPE)
        );
    }

    #[test]
    fn test_proxy_lookup() {
        let ex = extractor();
        assert_eq!(
            ex.input("signal").unwrap(),
            ex.graph().input(ex.nodes.frame_cutter, "signal").unwrap()
        );
        for name in ["mfcc", "spectral_rms", "spectral_rolloff", "zerocrossingrate"] {
            assert!(ex.output(name).is_ok(), "{name}");
        }
        assert_eq!(
            ex.output("bands"),
            Err(GraphError::ProxyNotFound("bands".to_string()))
        );
    }

    #[test]
    fn test_configure_forwards_to_inner_nodes() {
        let mut ex = extractor();
        ex.configure(
            &ParameterMap::new()
                .with("frameSize", 1024)
                .with("hopSize", 256)
                .with("sampleRate", 22050.0),
        )
        .unwrap();

        let cutter = ex.graph().parameters(ex.nodes.frame_cutter).unwrap();
        assert_eq!(cutter.int("frameSize"), Some(1024));
        assert_eq!(cutter.int("hopSize"), Some(256));
        assert_eq!(cutter.text("silentFrames"), Some("noise"));
        for node in [ex.nodes.mfcc, ex.nodes.rolloff] {
            let params = ex.graph().parameters(node).unwrap();
            assert_eq!(params.real("sampleRate"), Some(22050.0));
        }
        assert_eq!(ex.parameters().int("frameSize"), Some(1024));
    }

    #[test]
    fn test_rejected_configuration_keeps_previous_values() {
        let mut ex = extractor();
        let err = ex
            .configure(&ParameterMap::new().with("frameSize", 512).with("hopSize", 0))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::OutOfRange { .. })));

        let cutter = ex.graph().parameters(ex.nodes.frame_cutter).unwrap();
        assert_eq!(cutter.int("frameSize"), Some(2048));
        assert_eq!(ex.parameters().int("frameSize"), Some(2048));
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut ex = extractor();
        let err = ex
            .configure(&ParameterMap::new().with("windowType", "hann"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnknownParameter { ref name, .. }) if name == "windowType"
        ));
    }
}
