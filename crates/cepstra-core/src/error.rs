//! Error taxonomy for graph construction, configuration and execution.
//!
//! Three classes are kept apart because they surface at different moments:
//!
//! - [`ConfigError`] - a parameter was rejected while configuring a node.
//! - [`GraphError`] - the topology is malformed. Raised while wiring or
//!   compiling a [`Network`](crate::graph::Network), never while running one.
//! - [`DataError`] - something went wrong while moving data: a pool key is
//!   missing, a stored type does not match, or an algorithm rejected its input.
//!
//! [`Error`] wraps all three for callers that only need to propagate.

use thiserror::Error;

use crate::graph::{ConnectionId, NodeId, PortType};

/// A parameter was rejected during configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The parameter name is not declared by the node.
    #[error("unknown parameter '{name}' for '{node}'")]
    UnknownParameter {
        /// Node (algorithm) name.
        node: String,
        /// Offending parameter name.
        name: String,
    },

    /// The value lies outside the declared range.
    #[error("parameter '{name}' = {value} is outside {range}")]
    OutOfRange {
        /// Parameter name.
        name: String,
        /// Rendered value.
        value: String,
        /// Rendered range, e.g. `(0, inf)`.
        range: String,
    },

    /// The value has the wrong kind (e.g. text for a numeric parameter).
    #[error("parameter '{name}' expects {expected}, got {found}")]
    WrongType {
        /// Parameter name.
        name: String,
        /// Expected value kind.
        expected: &'static str,
        /// Supplied value kind.
        found: &'static str,
    },

    /// A text parameter is not one of its allowed choices.
    #[error("parameter '{name}' = '{value}' is not one of {choices:?}")]
    InvalidChoice {
        /// Parameter name.
        name: String,
        /// Supplied value.
        value: String,
        /// Allowed values.
        choices: &'static [&'static str],
    },

    /// The algorithm rejected an otherwise well-typed configuration.
    #[error("cannot configure '{node}': {reason}")]
    Algorithm {
        /// Node (algorithm) name.
        node: String,
        /// Why the configuration was rejected.
        reason: String,
    },
}

/// The graph topology is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The node does not exist in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node has no port with this index or name.
    #[error("node {node} has no {direction} port '{port}'")]
    PortNotFound {
        /// Owning node.
        node: NodeId,
        /// `"input"` or `"output"`.
        direction: &'static str,
        /// Port index or name as requested.
        port: String,
    },

    /// Producer and consumer disagree on the token type.
    #[error("port type mismatch: {from:?} output cannot feed {to:?} input")]
    PortTypeMismatch {
        /// Producer port type.
        from: PortType,
        /// Consumer port type.
        to: PortType,
    },

    /// The input port already has a producer.
    #[error("input port {port} of node {node} already has a producer")]
    InputAlreadyBound {
        /// Consumer node.
        node: NodeId,
        /// Consumer port index.
        port: usize,
    },

    /// The connection does not exist (or was already removed).
    #[error("connection {0:?} not found")]
    ConnectionNotFound(ConnectionId),

    /// The same producer port is already bound to the same endpoint.
    #[error("duplicate connection from node {0}")]
    DuplicateConnection(NodeId),

    /// Adding this connection would create a cycle.
    #[error("connection would create a cycle")]
    CycleDetected,

    /// The declared processing-order root is not in the graph.
    #[error("processing root {0} is not part of the graph")]
    RootNotFound(NodeId),

    /// The network root must be an external input node.
    #[error("network root {0} is not an input node")]
    RootNotInput(NodeId),

    /// A composite's declared root is not reached from the network root.
    #[error("node {0} is not reachable from the network root")]
    Unreachable(NodeId),

    /// A reachable node has an input with no (reachable) producer.
    #[error("input port '{port}' of node {node} is not bound")]
    UnboundInput {
        /// Node with the unbound input.
        node: NodeId,
        /// Port name.
        port: &'static str,
    },

    /// A reachable node has an output bound to nothing, not even a discard sink.
    #[error("output port '{port}' of node {node} is not bound")]
    UnboundOutput {
        /// Node with the unbound output.
        node: NodeId,
        /// Port name.
        port: &'static str,
    },

    /// Two ports write into the same pool key.
    #[error("pool key '{0}' is bound more than once")]
    DuplicatePoolKey(String),

    /// A composite has no proxy with this name.
    #[error("no proxy port named '{0}'")]
    ProxyNotFound(String),

    /// The scheduler could not make progress although nodes are unfinished.
    #[error("network stalled with {0} unfinished node(s)")]
    Stalled(usize),
}

/// Something went wrong while moving data through the network or the pool.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Nothing was ever written under this key.
    #[error("pool key '{0}' not found")]
    KeyNotFound(String),

    /// The key holds a different element type than requested.
    #[error("pool key '{key}' holds {stored} values, requested {requested}")]
    TypeMismatch {
        /// Pool key.
        key: String,
        /// Stored element type.
        stored: &'static str,
        /// Requested element type.
        requested: &'static str,
    },

    /// A key expected after a non-empty run is absent.
    #[error("expected output '{0}' was not produced")]
    MissingOutput(String),

    /// An algorithm received a token it cannot process.
    #[error("'{node}' failed: {reason}")]
    Algorithm {
        /// Node (algorithm) name.
        node: String,
        /// Failure description.
        reason: String,
    },
}

/// Umbrella error for callers that propagate every class.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Topology is malformed.
    #[error("topology error: {0}")]
    Graph(#[from] GraphError),

    /// Data could not be produced or retrieved.
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Convenience result type using the umbrella [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umbrella_wraps_each_class() {
        let err: Error = GraphError::CycleDetected.into();
        assert!(matches!(err, Error::Graph(GraphError::CycleDetected)));

        let err: Error = DataError::KeyNotFound("mfcc".into()).into();
        assert_eq!(err.to_string(), "data error: pool key 'mfcc' not found");
    }

    #[test]
    fn out_of_range_message_names_the_range() {
        let err = ConfigError::OutOfRange {
            name: "frameSize".into(),
            value: "0".into(),
            range: "(0, inf)".into(),
        };
        assert_eq!(err.to_string(), "parameter 'frameSize' = 0 is outside (0, inf)");
    }
}
