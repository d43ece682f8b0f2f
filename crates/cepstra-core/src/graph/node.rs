//! Graph node types.
//!
//! Each node has a [`NodeId`] and a [`NodeKind`]: either the external stream
//! entry ([`NodeKind::Input`]) or a leaf [`Algorithm`]. `NodeData` bundles the
//! kind with its run-time queues, current parameter values and adjacency.

use std::collections::VecDeque;

use crate::algorithm::Algorithm;
use crate::param::{ParamDescriptor, ParameterMap};

use super::connection::ConnectionId;
use super::port::{PortSpec, Token};

/// Unique identifier for a node in a graph.
///
/// Node IDs are assigned sequentially and never reused within a graph instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Output port of every [`NodeKind::Input`] node.
pub const INPUT_PORTS: &[PortSpec] = &[PortSpec::real("signal", "the external sample stream")];

/// The role of a node in the graph.
pub enum NodeKind {
    /// Receives the external sample stream. Has no inputs and one `Real`
    /// output named `signal`.
    Input,
    /// Wraps a leaf algorithm.
    Algorithm(Box<dyn Algorithm + Send>),
}

impl NodeKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            NodeKind::Input => "Input",
            NodeKind::Algorithm(a) => a.name(),
        }
    }

    pub(crate) fn input_specs(&self) -> &'static [PortSpec] {
        match self {
            NodeKind::Input => &[],
            NodeKind::Algorithm(a) => a.inputs(),
        }
    }

    pub(crate) fn output_specs(&self) -> &'static [PortSpec] {
        match self {
            NodeKind::Input => INPUT_PORTS,
            NodeKind::Algorithm(a) => a.outputs(),
        }
    }

    pub(crate) fn param_specs(&self) -> &'static [ParamDescriptor] {
        match self {
            NodeKind::Input => &[],
            NodeKind::Algorithm(a) => a.parameters(),
        }
    }
}

/// Internal bookkeeping for a node.
pub(crate) struct NodeData {
    pub kind: NodeKind,
    /// Current parameter values (declared defaults until configured).
    pub params: ParameterMap,
    /// One FIFO per declared input port.
    pub queues: Vec<VecDeque<Token>>,
    /// Producer connection per input port.
    pub incoming: Vec<Option<ConnectionId>>,
    /// Connections leaving each output port.
    pub outgoing: Vec<Vec<ConnectionId>>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        let inputs = kind.input_specs().len();
        let outputs = kind.output_specs().len();
        let params = ParameterMap::defaults(kind.param_specs());
        Self {
            kind,
            params,
            queues: vec![VecDeque::new(); inputs],
            incoming: vec![None; inputs],
            outgoing: vec![Vec::new(); outputs],
        }
    }

    pub fn clear_queues(&mut self) {
        for queue in &mut self.queues {
            queue.clear();
        }
    }
}
