//! Scheduler: drives a [`ProcessingGraph`] to exhaustion over one finite input.
//!
//! A [`Network`] is compiled once from a graph and its input node. Compilation
//! derives the chain-from order and rejects incomplete wiring, so a compiled
//! network can only fail at run time with a [`DataError`] raised by an
//! algorithm or the pool.
//!
//! # Execution model
//!
//! Single-threaded and cooperative. Every pass:
//!
//! 1. The input node emits the next [`INPUT_CHUNK`] samples of the signal.
//! 2. Nodes are visited in chain order. A node is stepped while every input
//!    holds at least its demand and the step produced output.
//! 3. A node whose producers have all finished gets one last step with
//!    [`StepIo::end_of_stream`] set and is then finished itself.
//!
//! Staged outputs are routed right after each step: fan-out clones each token
//! to every consumer, pool endpoints append, discard endpoints drop. Queues
//! are unbounded, so an output always has capacity. The run ends when every
//! node has finished.

use std::collections::BTreeSet;

use crate::algorithm::StepStatus;
use crate::error::{DataError, GraphError};
use crate::pool::Pool;

use super::connection::Endpoint;
use super::node::{NodeData, NodeId, NodeKind};
use super::port::{StepIo, Token};
use super::processing::ProcessingGraph;

/// Samples the input node emits per pass.
pub const INPUT_CHUNK: usize = 4096;

/// Compiled execution plan for one input node of a graph.
#[derive(Debug, Clone)]
pub struct Network {
    input: NodeId,
    /// Chain-from order, input node first.
    order: Vec<NodeId>,
    /// Producer positions (into `order`) per entry of `order`.
    producers: Vec<Vec<usize>>,
}

impl Network {
    /// Compiles the chain-from order of `graph` rooted at `input`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RootNotFound`] / [`GraphError::RootNotInput`] if `input`
    ///   is missing or not an input node
    /// - [`GraphError::UnboundInput`] if a reached node has an input without a
    ///   reached producer
    /// - [`GraphError::UnboundOutput`] if a reached node has an output bound to
    ///   nothing (bind unused outputs with [`ProcessingGraph::discard`])
    /// - [`GraphError::DuplicatePoolKey`] if two outputs write the same key
    pub fn new(graph: &ProcessingGraph, input: NodeId) -> Result<Self, GraphError> {
        let order = graph.chain_from(input)?;
        let root = graph.node_data(input).ok_or(GraphError::RootNotFound(input))?;
        if !matches!(root.kind, NodeKind::Input) {
            return Err(GraphError::RootNotInput(input));
        }

        let position = |id: NodeId| order.iter().position(|n| *n == id);
        let mut producers = Vec::with_capacity(order.len());
        let mut pool_keys = BTreeSet::new();

        for &id in &order {
            let node = graph.node_data(id).ok_or(GraphError::NodeNotFound(id))?;

            let mut feeding = Vec::with_capacity(node.incoming.len());
            for (port, incoming) in node.incoming.iter().copied().enumerate() {
                let producer = incoming
                    .and_then(|c| graph.connection(c))
                    .and_then(|c| position(c.from.node));
                match producer {
                    Some(p) => feeding.push(p),
                    None => {
                        return Err(GraphError::UnboundInput {
                            node: id,
                            port: node.kind.input_specs()[port].name,
                        });
                    }
                }
            }
            feeding.sort_unstable();
            feeding.dedup();
            producers.push(feeding);

            for (port, outgoing) in node.outgoing.iter().enumerate() {
                if outgoing.is_empty() {
                    return Err(GraphError::UnboundOutput {
                        node: id,
                        port: node.kind.output_specs()[port].name,
                    });
                }
                for conn in outgoing.iter().filter_map(|c| graph.connection(*c)) {
                    if let Endpoint::Pool(key) = &conn.to
                        && !pool_keys.insert(key.clone())
                    {
                        return Err(GraphError::DuplicatePoolKey(key.clone()));
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "network_compile: {} nodes, order {:?}",
            order.len(),
            order.iter().map(|n| n.index()).collect::<Vec<_>>()
        );

        Ok(Self {
            input,
            order,
            producers,
        })
    }

    /// The input node this network feeds.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Processing order, input node first.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns `true` if `node` is reached from the input node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.order.contains(&node)
    }

    /// Fails with [`GraphError::Unreachable`] unless `node` is reached from
    /// the input node.
    pub fn ensure_reachable(&self, node: NodeId) -> Result<(), GraphError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(GraphError::Unreachable(node))
        }
    }

    /// Streams `signal` through `graph` until every node has finished,
    /// appending terminal tokens to `pool`.
    ///
    /// `signal` is only borrowed for the duration of the call. Queues are left
    /// empty on success; after an error call [`reset()`](Self::reset) before
    /// the next run.
    pub fn run(
        &self,
        graph: &mut ProcessingGraph,
        signal: &[f32],
        pool: &mut Pool,
    ) -> crate::Result<()> {
        let mut finished = vec![false; self.order.len()];
        let mut offset = 0;
        #[cfg(feature = "tracing")]
        let mut steps = 0usize;

        while finished.iter().any(|f| !f) {
            let mut progressed = false;

            for (pos, &id) in self.order.iter().enumerate() {
                if finished[pos] {
                    continue;
                }

                if id == self.input {
                    let end = (offset + INPUT_CHUNK).min(signal.len());
                    let chunk = signal[offset..end].iter().map(|&s| Token::Real(s)).collect();
                    Self::route(graph, id, vec![chunk], pool)?;
                    offset = end;
                    finished[pos] = offset >= signal.len();
                    progressed = true;
                    continue;
                }

                while Self::is_ready(graph, id)? {
                    let (status, staged) = Self::step(graph, id, false)?;
                    Self::route(graph, id, staged, pool)?;
                    progressed = true;
                    #[cfg(feature = "tracing")]
                    {
                        steps += 1;
                    }
                    if status == StepStatus::Idle {
                        break;
                    }
                }

                if self.producers[pos].iter().all(|&p| finished[p]) {
                    let (_, staged) = Self::step(graph, id, true)?;
                    Self::route(graph, id, staged, pool)?;
                    finished[pos] = true;
                    progressed = true;
                }
            }

            if !progressed {
                let unfinished = finished.iter().filter(|f| !**f).count();
                return Err(GraphError::Stalled(unfinished).into());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "network_run: {} samples, {steps} steps, pool keys {:?}",
            signal.len(),
            pool.keys().collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Clears every queue and the run state of every algorithm in `graph`.
    ///
    /// Configuration and wiring are kept.
    pub fn reset(&self, graph: &mut ProcessingGraph) {
        for node in graph.nodes_mut() {
            node.clear_queues();
            if let NodeKind::Algorithm(algorithm) = &mut node.kind {
                algorithm.reset();
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("network_reset: {} nodes", self.order.len());
    }

    fn is_ready(graph: &ProcessingGraph, id: NodeId) -> Result<bool, GraphError> {
        let node = graph.node_data(id).ok_or(GraphError::NodeNotFound(id))?;
        let NodeKind::Algorithm(algorithm) = &node.kind else {
            return Ok(false);
        };
        Ok(node
            .queues
            .iter()
            .enumerate()
            .all(|(port, queue)| queue.len() >= algorithm.input_demand(port).max(1)))
    }

    fn step(
        graph: &mut ProcessingGraph,
        id: NodeId,
        end_of_stream: bool,
    ) -> crate::Result<(StepStatus, Vec<Vec<Token>>)> {
        let node: &mut NodeData = graph.node_data_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        let mut staged = vec![Vec::new(); node.outgoing.len()];
        let NodeKind::Algorithm(algorithm) = &mut node.kind else {
            return Ok((StepStatus::Idle, staged));
        };
        let mut io = StepIo::new(&mut node.queues, &mut staged, end_of_stream);
        let status = algorithm.process(&mut io)?;
        Ok((status, staged))
    }

    fn route(
        graph: &mut ProcessingGraph,
        from: NodeId,
        staged: Vec<Vec<Token>>,
        pool: &mut Pool,
    ) -> Result<(), DataError> {
        for (port, tokens) in staged.into_iter().enumerate() {
            if tokens.is_empty() {
                continue;
            }
            let endpoints: Vec<Endpoint> = graph
                .node_data(from)
                .and_then(|n| n.outgoing.get(port))
                .into_iter()
                .flatten()
                .filter_map(|c| graph.connection(*c).map(|c| c.to.clone()))
                .collect();

            for endpoint in &endpoints {
                match endpoint {
                    Endpoint::Port(target) => {
                        if let Some(queue) = graph
                            .node_data_mut(target.node)
                            .and_then(|n| n.queues.get_mut(target.port))
                        {
                            queue.extend(tokens.iter().cloned());
                        }
                    }
                    Endpoint::Pool(key) => {
                        for token in &tokens {
                            pool.append(key, token.clone())?;
                        }
                    }
                    Endpoint::Discard => {}
                }
            }
        }
        Ok(())
    }
}
