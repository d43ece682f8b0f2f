//! Processing graph: node arena, wiring API and processing-order derivation.
//!
//! [`ProcessingGraph`] owns every node and connection. Wiring is validated at
//! [`connect()`](ProcessingGraph::connect) time (port existence, port types,
//! single producer per input, acyclicity), so a graph that was built without
//! errors is always a DAG. [`chain_from()`](ProcessingGraph::chain_from)
//! derives a deterministic execution order from a single root by following
//! connections forward.

use std::collections::{BTreeSet, VecDeque};

use crate::algorithm::Algorithm;
use crate::error::{ConfigError, GraphError};
use crate::param::{ParamDescriptor, ParameterMap};

use super::connection::{Connection, ConnectionId, Endpoint};
use super::node::{NodeData, NodeId, NodeKind};
use super::port::{PortRef, PortSpec};

/// Directed acyclic graph of processing nodes.
///
/// # Usage
///
/// 1. Create a graph with [`new()`](Self::new)
/// 2. Add nodes: [`add_input()`](Self::add_input), [`add_algorithm()`](Self::add_algorithm)
/// 3. Wire ports: [`connect()`](Self::connect), [`connect_pool()`](Self::connect_pool),
///    [`discard()`](Self::discard)
/// 4. Compile a [`Network`](super::Network) from the input node and run it
#[derive(Default)]
pub struct ProcessingGraph {
    nodes: Vec<Option<NodeData>>,
    connections: Vec<Option<Connection>>,
}

impl ProcessingGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node mutations ---

    /// Adds an external input node. Returns the new node's ID.
    pub fn add_input(&mut self) -> NodeId {
        self.add_node(NodeKind::Input)
    }

    /// Adds a leaf algorithm node, configured with its declared defaults.
    pub fn add_algorithm(
        &mut self,
        mut algorithm: Box<dyn Algorithm + Send>,
    ) -> Result<NodeId, ConfigError> {
        let defaults = ParameterMap::defaults(algorithm.parameters());
        algorithm.configure(&defaults)?;
        #[cfg(feature = "tracing")]
        let name = algorithm.name();
        let id = self.add_node(NodeKind::Algorithm(algorithm));
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: {name} as {id}");
        Ok(id)
    }

    /// Reconfigures a node.
    ///
    /// `overrides` is validated against the node's declared parameters and
    /// merged onto its current values. On error the node keeps its previous
    /// configuration.
    pub fn configure_node(&mut self, id: NodeId, overrides: &ParameterMap) -> crate::Result<()> {
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .and_then(|n| n.as_mut())
            .ok_or(GraphError::NodeNotFound(id))?;

        let NodeKind::Algorithm(algorithm) = &mut node.kind else {
            // Input nodes declare no parameters.
            return match overrides.iter().next() {
                None => Ok(()),
                Some((name, _)) => Err(ConfigError::UnknownParameter {
                    node: "Input".to_string(),
                    name: name.to_string(),
                }
                .into()),
            };
        };

        let merged = node
            .params
            .merged(algorithm.name(), algorithm.parameters(), overrides)?;
        algorithm.configure(&merged)?;
        node.params = merged;
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_configure: {id} {:?}", node.params);
        Ok(())
    }

    // --- Wiring ---

    /// Connects output `from` to `to`.
    ///
    /// Returns the new connection's ID, or an error if:
    /// - Either node or port doesn't exist
    /// - The port types differ
    /// - The consumer input already has a producer
    /// - The same output is already bound to the same endpoint
    /// - The connection would create a cycle
    pub fn connect(
        &mut self,
        from: PortRef,
        to: impl Into<Endpoint>,
    ) -> Result<ConnectionId, GraphError> {
        let to = to.into();
        let from_spec = self.output_spec(from)?;

        if let Endpoint::Port(target) = &to {
            let to_spec = self.input_spec(*target)?;
            if from_spec.port_type != to_spec.port_type {
                return Err(GraphError::PortTypeMismatch {
                    from: from_spec.port_type,
                    to: to_spec.port_type,
                });
            }
            let to_node = self.get_node(target.node)?;
            if to_node.incoming[target.port].is_some() {
                return Err(GraphError::InputAlreadyBound {
                    node: target.node,
                    port: target.port,
                });
            }
            // A cycle exists if the consumer can already reach the producer.
            if target.node == from.node || self.can_reach(target.node, from.node) {
                return Err(GraphError::CycleDetected);
            }
        }

        if self.find_connection(from, &to).is_some() {
            return Err(GraphError::DuplicateConnection(from.node));
        }

        let id = ConnectionId(self.connections.len() as u32);
        if let Endpoint::Port(target) = &to
            && let Some(Some(node)) = self.nodes.get_mut(target.node.0 as usize)
        {
            node.incoming[target.port] = Some(id);
        }
        if let Some(Some(node)) = self.nodes.get_mut(from.node.0 as usize) {
            node.outgoing[from.port].push(id);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {}:{} -> {to:?}", from.node, from.port);
        self.connections.push(Some(Connection { from, to }));
        Ok(id)
    }

    /// Binds output `from` to the pool key `key`.
    pub fn connect_pool(
        &mut self,
        from: PortRef,
        key: impl Into<String>,
    ) -> Result<ConnectionId, GraphError> {
        self.connect(from, Endpoint::Pool(key.into()))
    }

    /// Binds output `from` to the discard sink.
    pub fn discard(&mut self, from: PortRef) -> Result<ConnectionId, GraphError> {
        self.connect(from, Endpoint::Discard)
    }

    /// Removes a connection.
    pub fn disconnect(&mut self, id: ConnectionId) -> Result<(), GraphError> {
        let conn = self
            .connections
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(GraphError::ConnectionNotFound(id))?;

        if let Some(Some(node)) = self.nodes.get_mut(conn.from.node.0 as usize) {
            node.outgoing[conn.from.port].retain(|c| *c != id);
        }
        if let Endpoint::Port(target) = conn.to
            && let Some(Some(node)) = self.nodes.get_mut(target.node.0 as usize)
        {
            node.incoming[target.port] = None;
        }
        Ok(())
    }

    // --- Lookup ---

    /// Resolves an input port by name.
    pub fn input(&self, node: NodeId, name: &str) -> Result<PortRef, GraphError> {
        let specs = self.get_node(node)?.kind.input_specs();
        specs
            .iter()
            .position(|s| s.name == name)
            .map(|port| PortRef::new(node, port))
            .ok_or_else(|| GraphError::PortNotFound {
                node,
                direction: "input",
                port: name.to_string(),
            })
    }

    /// Resolves an output port by name.
    pub fn output(&self, node: NodeId, name: &str) -> Result<PortRef, GraphError> {
        let specs = self.get_node(node)?.kind.output_specs();
        specs
            .iter()
            .position(|s| s.name == name)
            .map(|port| PortRef::new(node, port))
            .ok_or_else(|| GraphError::PortNotFound {
                node,
                direction: "output",
                port: name.to_string(),
            })
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_ok()
    }

    /// Returns the node's algorithm name (`"Input"` for input nodes).
    pub fn node_name(&self, id: NodeId) -> Option<&'static str> {
        self.get_node(id).ok().map(|n| n.kind.name())
    }

    /// Returns the node's current parameter values.
    pub fn parameters(&self, id: NodeId) -> Option<&ParameterMap> {
        self.get_node(id).ok().map(|n| &n.params)
    }

    /// Returns the node's declared parameters.
    pub fn parameter_specs(&self, id: NodeId) -> Option<&'static [ParamDescriptor]> {
        self.get_node(id).ok().map(|n| n.kind.param_specs())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.iter().flatten().count()
    }

    /// Endpoints bound to output `from`, in connection order.
    pub fn endpoints(&self, from: PortRef) -> Vec<&Endpoint> {
        let Ok(node) = self.get_node(from.node) else {
            return Vec::new();
        };
        node.outgoing
            .get(from.port)
            .into_iter()
            .flatten()
            .filter_map(|c| self.connections[c.0 as usize].as_ref())
            .map(|c| &c.to)
            .collect()
    }

    // --- Processing order ---

    /// Derives the processing order reachable from `root`.
    ///
    /// Follows connections forward from `root`, then topologically sorts the
    /// reached nodes with Kahn's algorithm. Ties are broken by lowest node ID,
    /// so the order is a pure function of the topology. Only producers inside
    /// the reached set count towards a node's in-degree.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RootNotFound`] if `root` is not in the graph
    /// - [`GraphError::CycleDetected`] if the reached sub-graph has a cycle
    pub fn chain_from(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        if !self.contains(root) {
            return Err(GraphError::RootNotFound(root));
        }

        let reached = self.reachable_from(root);
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        for &idx in &reached {
            for consumer in self.consumers(idx) {
                if reached.contains(&consumer) {
                    in_degree[consumer] += 1;
                }
            }
        }

        let mut ready: BTreeSet<usize> = reached
            .iter()
            .copied()
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut sorted = Vec::with_capacity(reached.len());

        while let Some(idx) = ready.pop_first() {
            sorted.push(NodeId(idx as u32));
            for consumer in self.consumers(idx) {
                if reached.contains(&consumer) {
                    in_degree[consumer] -= 1;
                    if in_degree[consumer] == 0 {
                        ready.insert(consumer);
                    }
                }
            }
        }

        if sorted.len() != reached.len() {
            return Err(GraphError::CycleDetected);
        }
        Ok(sorted)
    }

    // --- Crate-internal access for the scheduler ---

    pub(crate) fn node_data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    pub(crate) fn node_data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    pub(crate) fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0 as usize)?.as_ref()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeData> {
        self.nodes.iter_mut().flatten()
    }

    // --- Internal helpers ---

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(NodeData::new(kind)));
        id
    }

    fn get_node(&self, id: NodeId) -> Result<&NodeData, GraphError> {
        self.nodes
            .get(id.0 as usize)
            .and_then(|n| n.as_ref())
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn output_spec(&self, port: PortRef) -> Result<PortSpec, GraphError> {
        let node = self.get_node(port.node)?;
        node.kind
            .output_specs()
            .get(port.port)
            .copied()
            .ok_or_else(|| GraphError::PortNotFound {
                node: port.node,
                direction: "output",
                port: port.port.to_string(),
            })
    }

    fn input_spec(&self, port: PortRef) -> Result<PortSpec, GraphError> {
        let node = self.get_node(port.node)?;
        node.kind
            .input_specs()
            .get(port.port)
            .copied()
            .ok_or_else(|| GraphError::PortNotFound {
                node: port.node,
                direction: "input",
                port: port.port.to_string(),
            })
    }

    /// Node indices fed by node `idx`, one entry per connection.
    fn consumers(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[idx]
            .iter()
            .flat_map(|n| n.outgoing.iter().flatten())
            .filter_map(|c| match self.connections[c.0 as usize].as_ref()?.to {
                Endpoint::Port(target) => Some(target.node.0 as usize),
                _ => None,
            })
    }

    fn reachable_from(&self, root: NodeId) -> BTreeSet<usize> {
        let mut reached = BTreeSet::new();
        let mut queue = VecDeque::from([root.0 as usize]);
        while let Some(idx) = queue.pop_front() {
            if reached.insert(idx) {
                queue.extend(self.consumers(idx));
            }
        }
        reached
    }

    /// DFS reachability check: can `from` reach `to` via existing connections?
    fn can_reach(&self, from: NodeId, to: NodeId) -> bool {
        self.reachable_from(from).contains(&(to.0 as usize))
    }

    fn find_connection(&self, from: PortRef, to: &Endpoint) -> Option<ConnectionId> {
        let node = self.get_node(from.node).ok()?;
        node.outgoing.get(from.port)?.iter().copied().find(|c| {
            self.connections[c.0 as usize]
                .as_ref()
                .is_some_and(|conn| conn.to == *to)
        })
    }
}
