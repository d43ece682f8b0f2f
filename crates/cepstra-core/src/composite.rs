//! Composite nodes: a node that is itself a graph.
//!
//! A composite builds its inner [`ProcessingGraph`] once, at construction, and
//! re-exposes a subset of inner ports under stable names. Proxies are plain
//! forwarding records (name plus inner [`PortRef`]), so the outer world wires
//! straight into the inner graph without any live object references.

use crate::error::GraphError;
use crate::graph::{NodeId, PortRef, ProcessingGraph};

/// External input of a composite, forwarding to an inner input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkProxy {
    /// Name exposed by the composite.
    pub name: &'static str,
    /// Inner input port receiving the data.
    pub target: PortRef,
}

/// External output of a composite, forwarding from an inner output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceProxy {
    /// Name exposed by the composite.
    pub name: &'static str,
    /// Inner output port producing the data.
    pub source: PortRef,
}

/// A node that owns a sub-graph.
///
/// Implementors expose their graph, their proxy tables and the inner node the
/// processing order starts from. Name lookups are provided.
pub trait Composite {
    /// Composite name (e.g. `"LowLevelExtractor"`).
    fn name(&self) -> &'static str;

    /// The owned inner graph.
    fn graph(&self) -> &ProcessingGraph;

    /// Mutable access to the inner graph, for binding outputs and running.
    fn graph_mut(&mut self) -> &mut ProcessingGraph;

    /// External inputs.
    fn sink_proxies(&self) -> &[SinkProxy];

    /// External outputs.
    fn source_proxies(&self) -> &[SourceProxy];

    /// Inner node the chain-from processing order starts at.
    fn process_root(&self) -> NodeId;

    /// Inner port behind the external input `name`.
    fn input(&self, name: &str) -> Result<PortRef, GraphError> {
        self.sink_proxies()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.target)
            .ok_or_else(|| GraphError::ProxyNotFound(name.to_string()))
    }

    /// Inner port behind the external output `name`.
    fn output(&self, name: &str) -> Result<PortRef, GraphError> {
        self.source_proxies()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.source)
            .ok_or_else(|| GraphError::ProxyNotFound(name.to_string()))
    }
}
