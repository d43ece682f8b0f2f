//! Dataflow graph and scheduler.
//!
//! The graph module models feature extraction as a feed-forward network of
//! typed ports:
//!
//! - [`ProcessingGraph`] holds the topology (nodes, connections) and every
//!   node's run-time queues. Wiring errors surface at
//!   [`connect()`](ProcessingGraph::connect) time.
//! - [`Network`] is the compiled chain-from order for one input node. It
//!   validates the reachable wiring once and then drives the graph to
//!   exhaustion over a finite signal, writing terminal ports into a
//!   [`Pool`](crate::Pool).
//!
//! Connections bind one output port to an [`Endpoint`]: another node's input
//! port, a pool key, or the discard sink. Discarded outputs are still computed.
//!
//! # Example
//!
//! ```rust
//! use cepstra_core::graph::{Network, PortRef, ProcessingGraph};
//! use cepstra_core::Pool;
//!
//! let mut graph = ProcessingGraph::new();
//! let input = graph.add_input();
//! graph.connect_pool(PortRef::new(input, 0), "samples").unwrap();
//!
//! let network = Network::new(&graph, input).unwrap();
//! let mut pool = Pool::new();
//! network.run(&mut graph, &[0.5, -0.5], &mut pool).unwrap();
//!
//! assert_eq!(pool.value::<f32>("samples").unwrap(), [0.5, -0.5]);
//! ```

mod connection;
mod network;
mod node;
mod port;
mod processing;

pub use connection::{ConnectionId, Endpoint};
pub use network::{INPUT_CHUNK, Network};
pub use node::{INPUT_PORTS, NodeId, NodeKind};
pub use port::{PortRef, PortSpec, PortType, StepIo, Token};
pub use processing::ProcessingGraph;
